//! Translates stack-oriented VM code into Hack assembly.
//!
//! # Architecture
//! - [`parser`]: classifies and decomposes each VM command
//! - [`code_writer`]: emits the corresponding Hack assembly
//!
//! A single `.vm` file translates to matching `.asm` next to it. A directory
//! of `.vm` files translates to one `<dir>.asm`, prefixed with a bootstrap
//! (`SP=256; call Sys.init 0`) that a lone-file translation never emits,
//! since a single file has no `Sys.init` to call into.

pub mod code_writer;
pub mod error;
pub mod parser;

pub use code_writer::CodeWriter;
pub use error::VmError;
pub use parser::{CommandType, Parser};

use n2t_common::ToolError;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Translates the commands of one `.vm` file into `writer`, without
/// emitting a bootstrap.
pub fn translate_file(path: &Path, writer: &mut CodeWriter<impl Write>) -> Result<(), ToolError> {
    log::debug!("translating {}", path.display());
    let lines = n2t_common::input::read_lines(path)?;
    let mut parser = Parser::from_lines(lines);
    writer.set_current_source(
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown.vm"),
    );

    let mut commands = 0usize;
    while parser.has_more_commands() {
        parser.advance();
        translate_command(&mut parser, writer).map_err(ToolError::from)?;
        commands += 1;
    }
    log::trace!("{}: {commands} command(s) translated", path.display());
    Ok(())
}

fn translate_command(parser: &mut Parser, writer: &mut CodeWriter<impl Write>) -> Result<(), VmError> {
    match parser.command_type()? {
        CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?),
        CommandType::Push => writer.write_push_pop("push", parser.arg1()?, parser.arg2()?),
        CommandType::Pop => writer.write_push_pop("pop", parser.arg1()?, parser.arg2()?),
        CommandType::Label => writer.write_label(parser.arg1()?),
        CommandType::Goto => writer.write_goto(parser.arg1()?),
        CommandType::If => writer.write_if(parser.arg1()?),
        CommandType::Function => writer.write_function(parser.arg1()?, parser.arg2()?),
        CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?),
        CommandType::Return => writer.write_return(),
    }
}

/// Translates a single `.vm` file to an `.asm` file of the same stem.
/// No bootstrap is emitted: a lone file has no directory-wide entry point.
pub fn translate_single_file(input: &Path, output: &Path) -> Result<(), ToolError> {
    let file = std::fs::File::create(output)?;
    let mut writer = CodeWriter::new(BufWriter::new(file));
    translate_file(input, &mut writer)?;
    writer.flush().map_err(ToolError::from)?;
    log::info!("translated {} into {}", input.display(), output.display());
    Ok(())
}

/// Translates every file in `files` into a single output, preceded by the
/// bootstrap sequence (spec §4.2). Callers pass the `.vm` files of one
/// directory, sorted, so translation order is deterministic.
pub fn translate_directory(files: &[&Path], output: &Path) -> Result<(), ToolError> {
    log::debug!("directory translation: {} file(s)", files.len());
    let file = std::fs::File::create(output)?;
    let mut writer = CodeWriter::new(BufWriter::new(file));
    writer.write_init().map_err(ToolError::from)?;
    for vm_file in files {
        translate_file(vm_file, &mut writer)?;
    }
    writer.flush().map_err(ToolError::from)?;
    log::info!(
        "translated {} file(s) into {}",
        files.len(),
        output.display()
    );
    Ok(())
}
