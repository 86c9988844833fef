//! Hack Assembler for the `Nand2Tetris` course
//!
//! This crate provides a two-pass Hack assembly language assembler that translates
//! assembly code into Hack machine code.
//!
//! # Architecture
//!
//! The assembler consists of three main modules:
//! - [`parser`]: Zero-copy parsing of assembly instructions
//! - [`code`]: Binary encoding using perfect hash functions (PHF)
//! - [`symbol_table`]: Symbol management with predefined symbols
//!
//! # Performance Optimizations
//!
//! - **PHF (Perfect Hash Functions)**: O(1) compile-time hash maps for instruction encoding
//! - **Zero-copy parsing**: Uses string slices to avoid allocations
//! - **Aggressive inlining**: Hot path functions are force-inlined
//! - **Pre-allocated capacity**: Reduces rehashing overhead
//! - **Link-time optimization (LTO)**: Enabled in release profile
//!
//! # Example
//!
//! ```rust
//! use hack_assembler::{ParserLines, CommandType, SymbolTable, code};
//!
//! // Parse assembly code
//! let lines = vec!["@100".to_string(), "D=M".to_string()];
//! let mut parser = ParserLines::from_lines(&lines);
//!
//! // Process first instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::ACommand);
//! assert_eq!(parser.symbol().unwrap(), "100");
//!
//! // Process second instruction
//! parser.advance();
//! assert_eq!(parser.command_type().unwrap(), CommandType::CCommand);
//! let instruction = code::encode_c_instruction("D", "M", "").unwrap();
//! assert_eq!(instruction, "1111110000010000");
//!
//! // Use symbol table
//! let mut symbols = SymbolTable::new();
//! symbols.add_entry("LOOP", 10);
//! assert_eq!(symbols.get_address("LOOP"), 10);
//! assert_eq!(symbols.get_address("SP"), 0); // Predefined symbol
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod code;
pub mod error;
pub mod parser;
pub mod symbol_table;

// Re-export commonly used types for convenience
pub use error::AssemblerError;
pub use parser::{CommandType, ParserError, ParserLines};
pub use symbol_table::SymbolTable;

use n2t_common::ToolError;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Runs the full two-pass assembly pipeline: reads `input`, writes the
/// resulting `.hack` machine code to `output`.
pub fn assemble(input: &Path, output: &Path) -> Result<(), ToolError> {
    let lines = n2t_common::input::read_lines(input)?;

    let mut symbol_table = SymbolTable::new();
    log::debug!("first pass: {} lines", lines.len());
    first_pass(&lines, &mut symbol_table).map_err(AssemblerError::from)?;

    let file = std::fs::File::create(output)?;
    let mut writer = BufWriter::new(file);
    log::debug!("second pass: {} user symbols resolved so far", symbol_table.user_symbol_count());
    second_pass(&lines, &mut symbol_table, &mut writer).map_err(AssemblerError::from)?;

    log::info!("assembled {} into {}", input.display(), output.display());
    Ok(())
}

/// First pass: records the ROM address of every label, without emitting code.
pub fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) -> Result<(), AssemblerError> {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::LCommand => {
                let symbol = parser.symbol()?;
                log::trace!("label {symbol} -> ROM {rom_address}");
                symbol_table.add_entry(symbol, rom_address);
            }
            CommandType::ACommand | CommandType::CCommand => {
                rom_address += 1;
            }
        }
    }

    Ok(())
}

/// Second pass: resolves symbols and emits one binary instruction per line.
pub fn second_pass(
    lines: &[String],
    symbol_table: &mut SymbolTable,
    writer: &mut impl Write,
) -> Result<(), AssemblerError> {
    let mut ram_address = 16u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type()? {
            CommandType::ACommand => {
                let symbol = parser.symbol()?;
                let address = match symbol.parse::<u32>() {
                    Ok(value) => {
                        if value > 0x7FFF {
                            return Err(AssemblerError::AddressOutOfRange(value));
                        }
                        value as u16
                    }
                    Err(_) => symbol_table.get_or_insert(symbol, &mut ram_address),
                };
                writeln!(writer, "{}", code::encode_a_instruction(address))?;
            }
            CommandType::CCommand => {
                let dest = parser.dest()?.unwrap_or("");
                let comp = parser.comp()?.unwrap_or("");
                let jump = parser.jump()?.unwrap_or("");
                writeln!(writer, "{}", code::encode_c_instruction(dest, comp, jump)?)?;
            }
            CommandType::LCommand => {
                return Err(AssemblerError::InvalidState(
                    "label command encountered in second pass",
                ));
            }
        }
    }

    writer.flush()?;
    Ok(())
}
