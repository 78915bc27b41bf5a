use clap::Parser;

use call_trace::args::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = call_trace::run::run(cli) {
        eprintln!("call-trace: {err}");
        std::process::exit(1);
    }
}
