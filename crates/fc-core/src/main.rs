use clap::Parser;

use fc_core::cli::Cli;

fn main() {
    fc_core::logging::init_logging();
    let args = Cli::parse();
    if let Err(err) = fc_core::cli::run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
