//! VM translator error type, converting into the shared diagnostic taxonomy.

use n2t_common::{ToolError, ToolErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error("unknown arithmetic command: {0}")]
    UnknownArithmetic(String),

    #[error("unknown segment: {0}")]
    UnknownSegment(String),

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("{0} called without a current command")]
    NoCurrentCommand(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<VmError> for ToolError {
    fn from(err: VmError) -> Self {
        match err {
            VmError::UnknownArithmetic(cmd) => ToolError::new(
                ToolErrorKind::Syntax,
                format!("unknown arithmetic command: {cmd}"),
            ),
            VmError::UnknownSegment(seg) => {
                ToolError::new(ToolErrorKind::Resolution, format!("unknown segment: {seg}"))
            }
            VmError::MalformedCommand(cmd) => {
                ToolError::new(ToolErrorKind::Syntax, format!("malformed command: {cmd}"))
            }
            VmError::NoCurrentCommand(what) => ToolError::new(
                ToolErrorKind::Syntax,
                format!("{what} called without a current command"),
            ),
            VmError::Io(e) => ToolError::from(e),
        }
    }
}
