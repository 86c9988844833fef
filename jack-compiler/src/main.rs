use clap::Parser;
use n2t_common::diagnostics::{fail, init_logging};
use n2t_common::input::Inputs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jack-compiler", version, about)]
struct Cli {
    input: PathBuf,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let inputs = match Inputs::collect(&cli.input, "jack") {
        Ok(inputs) => inputs,
        Err(err) => fail(err),
    };

    let files: Vec<&std::path::Path> = inputs.files();
    if let Err(err) = jack_compiler::compile_files(&files) {
        fail(err);
    }

    println!("Compilation complete: {} class(es)", files.len());
}
