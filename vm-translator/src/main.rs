//! VM Translator - Main Entry Point
//!
//! Translates Hack VM code (`Nand2Tetris` Project 7/8) into Hack assembly.
//! A single `.vm` file translates to `<name>.asm`. A directory of `.vm`
//! files translates to `<dir>.asm`, bootstrapped with `call Sys.init 0`.

use clap::Parser;
use n2t_common::diagnostics::{fail, init_logging};
use n2t_common::input::Inputs;
use std::path::PathBuf;

/// Translates a `.vm` file, or every `.vm` file in a directory, into Hack assembly.
#[derive(Debug, Parser)]
#[command(name = "vm-translator", version, about)]
struct Cli {
    /// Path to a `.vm` file or a directory of `.vm` files.
    input: PathBuf,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let inputs = match Inputs::collect(&cli.input, "vm") {
        Ok(inputs) => inputs,
        Err(err) => fail(err),
    };

    let output = output_path(&cli.input, &inputs);
    let result = match &inputs {
        Inputs::File(file) => vm_translator::translate_single_file(file, &output),
        Inputs::Directory { files, .. } => {
            let files: Vec<&std::path::Path> = files.iter().map(PathBuf::as_path).collect();
            vm_translator::translate_directory(&files, &output)
        }
    };

    if let Err(err) = result {
        fail(err);
    }

    println!("Translation complete: {}", output.display());
}

fn output_path(input: &std::path::Path, inputs: &Inputs) -> PathBuf {
    match inputs {
        Inputs::File(file) => file.with_extension("asm"),
        Inputs::Directory { .. } => {
            let name = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("out");
            input.join(format!("{name}.asm"))
        }
    }
}
