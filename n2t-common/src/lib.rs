//! Shared infrastructure for the Nand2Tetris toolchain.
//!
//! Every stage (assembler, VM translator, Jack compiler) is a single-threaded
//! batch tool that reads files in and writes files out. What they share is
//! not algorithms but the edges: the uniform error-kind taxonomy, the
//! fatal-on-first-error diagnostic policy, and the trivial input-collection
//! rules ("a file, or every matching file in a directory").

pub mod diagnostics;
pub mod error;
pub mod input;

pub use error::{Location, ToolError, ToolErrorKind};
