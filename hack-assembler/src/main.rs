//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use clap::Parser;
use n2t_common::diagnostics::{fail, init_logging};
use std::path::PathBuf;

/// Assembles a `.asm` file into Hack machine code.
#[derive(Debug, Parser)]
#[command(name = "hack-assembler", version, about)]
struct Cli {
    /// Path to the `.asm` source file.
    input: PathBuf,
}

fn output_path(input: &std::path::Path) -> PathBuf {
    input.with_extension("hack")
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if cli.input.extension().and_then(|e| e.to_str()) != Some("asm") {
        fail(format!("expected a .asm file, got {}", cli.input.display()));
    }

    let output = output_path(&cli.input);
    if let Err(err) = hack_assembler::assemble(&cli.input, &output) {
        fail(err);
    }

    println!("Assembly completed. Output written to {}", output.display());
}
