//! Assembler-specific error type, converting into the shared diagnostic taxonomy.

use n2t_common::{ToolError, ToolErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum AssemblerError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("address {0} out of range for a 15-bit A-instruction")]
    AddressOutOfRange(u32),

    #[error("unknown {field} mnemonic: {mnemonic}")]
    UnknownMnemonic { field: &'static str, mnemonic: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<crate::parser::ParserError> for AssemblerError {
    fn from(err: crate::parser::ParserError) -> Self {
        match err {
            crate::parser::ParserError::IoError(e) => AssemblerError::Io(e),
            crate::parser::ParserError::InvalidState(msg) => AssemblerError::InvalidState(msg),
        }
    }
}

impl From<AssemblerError> for ToolError {
    fn from(err: AssemblerError) -> Self {
        match err {
            AssemblerError::InvalidState(msg) => ToolError::new(ToolErrorKind::Syntax, msg),
            AssemblerError::AddressOutOfRange(addr) => ToolError::new(
                ToolErrorKind::Encoding,
                format!("address {addr} out of range for a 15-bit A-instruction"),
            ),
            AssemblerError::UnknownMnemonic { field, mnemonic } => ToolError::new(
                ToolErrorKind::Encoding,
                format!("unknown {field} mnemonic: {mnemonic}"),
            ),
            AssemblerError::Io(e) => ToolError::from(e),
        }
    }
}
