use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "call-trace", version, about = "Function call tracing for JavaScript sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Instrument a JavaScript source file and print the rewritten program.
    Instrument {
        /// Source file to instrument.
        file: PathBuf,

        /// Track function execution time with a monotonic clock.
        #[arg(short = 't', long)]
        time: bool,

        /// Write the instrumented program here instead of stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a Chrome DevTools CPU profile from a captured trace file.
    Profile {
        /// Trace capture JSON emitted by an instrumented run.
        trace: PathBuf,

        /// Write the .cpuprofile JSON here instead of stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}
