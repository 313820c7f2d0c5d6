mod chart_file;
mod cli;
mod commands;
mod params_file;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ParamsCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.verbose {
        "beatcore=debug"
    } else {
        "beatcore=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    match cli.command {
        Command::Simulate {
            chart,
            params,
            record,
        } => commands::simulate::run(&chart, params.as_deref(), record.as_deref()),
        Command::Verify { chart, replay } => commands::verify::run(&chart, &replay),
        Command::Params { command } => match command {
            ParamsCommand::Encode {
                instrument,
                input,
                output,
            } => commands::params::encode(instrument, &input, &output),
            ParamsCommand::Decode {
                instrument,
                input,
                output,
            } => commands::params::decode(instrument, &input, output.as_deref()),
        },
    }
}
