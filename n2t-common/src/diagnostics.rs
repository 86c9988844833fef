//! Fatal-error policy and logging init shared by every `main.rs` (spec §7).

use colored::Colorize;
use std::fmt::Display;

/// Installs the process-wide logger. `RUST_LOG` controls verbosity; unset
/// defaults to `warn` so a clean run is silent on stdout/stderr apart from
/// the final success line each binary prints itself.
pub fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    // Re-initializing a logger (e.g. from repeated test-harness calls) is
    // harmless; only the first call wins.
    let _ = builder.try_init();
}

/// Prints a single human-readable diagnostic to stderr and exits the process
/// with status 1. Never returns. This is the only place a stage's `main`
/// should turn an `Err` into a process exit — everywhere else errors
/// propagate with `?`.
pub fn fail(err: impl Display) -> ! {
    eprintln!("{} {err}", "error:".red().bold());
    std::process::exit(1);
}
