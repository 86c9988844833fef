//! Jack compiler error type, converting into the shared diagnostic taxonomy.

use n2t_common::{Location, ToolError, ToolErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum JackError {
    #[error("unterminated string constant at line {line}")]
    UnterminatedString { line: usize },

    #[error("illegal character {ch:?} at line {line}")]
    IllegalCharacter { ch: char, line: usize },

    #[error("expected {expected}, found {found} at line {line}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("undefined identifier {name} at line {line}")]
    UndefinedIdentifier { name: String, line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<JackError> for ToolError {
    fn from(err: JackError) -> Self {
        match &err {
            JackError::UnterminatedString { line } | JackError::IllegalCharacter { line, .. } => {
                ToolError::at(ToolErrorKind::Lexical, Location { file: None, line: Some(*line) }, err.to_string())
            }
            JackError::UnexpectedToken { line, .. } => ToolError::at(
                ToolErrorKind::Syntax,
                Location { file: None, line: Some(*line) },
                err.to_string(),
            ),
            JackError::UnexpectedEof { .. } => ToolError::new(ToolErrorKind::Syntax, err.to_string()),
            JackError::UndefinedIdentifier { line, .. } => ToolError::at(
                ToolErrorKind::Resolution,
                Location { file: None, line: Some(*line) },
                err.to_string(),
            ),
            JackError::Io(_) => ToolError::new(ToolErrorKind::Io, err.to_string()),
        }
    }
}
