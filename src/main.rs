use clap::Parser;
use stocker::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
