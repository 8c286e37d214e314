use clap::Parser;

use gpuarb::adapter::inbound::cli::command::{Cli, ColorChoice};
use gpuarb::adapter::inbound::cli::output::{self, OutputConfig};
use gpuarb::adapter::inbound::cli::{diagnostic, execute};

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = execute(&cli.command) {
        eprintln!("{:?}", diagnostic::report(e));
        std::process::exit(1);
    }
}
