//! The uniform error taxonomy shared by all three stages (spec §7).

use std::fmt;
use std::path::PathBuf;

/// One of the five uniform error kinds every stage reports through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// Unterminated string, illegal character.
    Lexical,
    /// Expected token mismatch.
    Syntax,
    /// Reference to an undefined identifier at a use-site that requires binding.
    Resolution,
    /// Unknown mnemonic, out-of-range address, malformed literal.
    Encoding,
    /// File or directory missing, unreadable, or unwritable.
    Io,
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolErrorKind::Lexical => "lexical error",
            ToolErrorKind::Syntax => "syntax error",
            ToolErrorKind::Resolution => "resolution error",
            ToolErrorKind::Encoding => "encoding error",
            ToolErrorKind::Io => "I/O error",
        };
        f.write_str(name)
    }
}

/// Where a point-of-failure diagnostic originated, when known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{line}", file.display()),
            (Some(file), None) => write!(f, "{}", file.display()),
            (None, Some(line)) => write!(f, "line {line}"),
            (None, None) => Ok(()),
        }
    }
}

/// A single fatal diagnostic. Every stage abandons work at the first one of
/// these it produces — there is no recovery and nothing is ever swallowed.
#[derive(Debug)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub location: Option<Location>,
    pub message: String,
}

impl std::error::Error for ToolError {}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} ({loc}): {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: None,
            message: message.into(),
        }
    }

    pub fn at(kind: ToolErrorKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: Some(location),
            message: message.into(),
        }
    }

    pub fn lexical(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Lexical, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Syntax, message)
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Resolution, message)
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Encoding, message)
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ToolErrorKind::Io, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_location() {
        let err = ToolError::syntax("unexpected token");
        assert_eq!(err.to_string(), "syntax error: unexpected token");
    }

    #[test]
    fn display_with_location() {
        let err = ToolError::at(
            ToolErrorKind::Encoding,
            Location::new("Foo.asm", 12),
            "unknown mnemonic JJJ",
        );
        assert_eq!(
            err.to_string(),
            "encoding error (Foo.asm:12): unknown mnemonic JJJ"
        );
    }
}
