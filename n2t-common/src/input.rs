//! Input collection: "a file, or every matching file in a directory".
//!
//! spec §1 calls directory traversal an external collaborator not
//! re-specified in detail, so this stays a thin wrapper over `std::fs`
//! rather than a module with its own invariants.

use crate::error::{ToolError, ToolErrorKind};
use std::path::{Path, PathBuf};

/// What a stage was asked to compile: one file, or every file with the
/// given extension inside a directory.
pub enum Inputs {
    File(PathBuf),
    Directory { dir: PathBuf, files: Vec<PathBuf> },
}

impl Inputs {
    /// `extension` excludes the leading dot, e.g. `"vm"` or `"jack"`.
    pub fn collect(path: &Path, extension: &str) -> Result<Self, ToolError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            ToolError::new(
                ToolErrorKind::Io,
                format!("cannot read {}: {e}", path.display()),
            )
        })?;

        if metadata.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
                .collect();
            files.sort();
            if files.is_empty() {
                return Err(ToolError::new(
                    ToolErrorKind::Io,
                    format!(
                        "directory {} contains no .{extension} files",
                        path.display()
                    ),
                ));
            }
            Ok(Inputs::Directory {
                dir: path.to_path_buf(),
                files,
            })
        } else {
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                return Err(ToolError::new(
                    ToolErrorKind::Io,
                    format!("expected a .{extension} file, got {}", path.display()),
                ));
            }
            Ok(Inputs::File(path.to_path_buf()))
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Inputs::Directory { .. })
    }

    pub fn files(&self) -> Vec<&Path> {
        match self {
            Inputs::File(f) => vec![f.as_path()],
            Inputs::Directory { files, .. } => files.iter().map(|p| p.as_path()).collect(),
        }
    }
}

/// Reads a text file into lines, as every stage's lexer/parser wants.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ToolError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ToolError::new(
            ToolErrorKind::Io,
            format!("cannot read {}: {e}", path.display()),
        )
    })?;
    Ok(contents.lines().map(str::to_string).collect())
}
