//! Compiles Jack source files into VM code, one `.vm` file per class.

pub mod compiler;
pub mod error;
pub mod symbol_table;
pub mod token;

pub use compiler::Compiler;
pub use error::JackError;

use n2t_common::ToolError;
use std::fs;
use std::path::Path;

/// Compiles a single `Class.jack` file into `Class.vm` alongside it.
pub fn compile_file(input: &Path) -> Result<(), ToolError> {
    log::debug!("compiling {}", input.display());
    let source = fs::read_to_string(input)?;
    let output_path = input.with_extension("vm");
    let file = fs::File::create(&output_path)?;

    let mut compiler = Compiler::new(&source, file).map_err(JackError::from)?;
    compiler.compile_class().map_err(ToolError::from)?;
    log::trace!("{}: class compiled", input.display());
    log::info!("compiled {} into {}", input.display(), output_path.display());
    Ok(())
}

/// Compiles every `.jack` file in `files` independently; a directory of
/// Jack source has no combined output the way a VM-translated directory
/// does; each class keeps its own compilation unit.
pub fn compile_files(files: &[&Path]) -> Result<(), ToolError> {
    log::debug!("compiling {} class(es)", files.len());
    for file in files {
        compile_file(file)?;
    }
    Ok(())
}
