//! Command line definitions.

use std::path::PathBuf;

use beatcore::InstrumentKind;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "beatcore")]
#[command(about = "Rhythm game timing and scoring engine", version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Let the bot play a chart and print the result
    Simulate {
        /// Chart file (JSON)
        #[arg(short, long)]
        chart: PathBuf,

        /// Engine parameters (TOML); instrument defaults when omitted
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Save the run as a replay file
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Re-run a replay and compare it with its recorded result
    Verify {
        /// Chart file (JSON)
        #[arg(short, long)]
        chart: PathBuf,

        /// Replay file (JSON)
        #[arg(short, long)]
        replay: PathBuf,
    },

    /// Convert engine parameters between TOML and the binary format
    Params {
        #[command(subcommand)]
        command: ParamsCommand,
    },
}

#[derive(Subcommand)]
pub enum ParamsCommand {
    /// Encode a TOML parameter file to binary
    Encode {
        /// Instrument the parameters belong to (drums, vocals)
        #[arg(short, long)]
        instrument: InstrumentKind,

        #[arg(short = 'f', long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode binary parameters and print them as TOML
    Decode {
        /// Instrument the parameters belong to (drums, vocals)
        #[arg(short, long)]
        instrument: InstrumentKind,

        #[arg(short = 'f', long)]
        input: PathBuf,

        /// Write the TOML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::parse_from(["beatcore", "simulate", "--chart", "song.json", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Simulate {
                chart,
                params,
                record,
            } => {
                assert_eq!(chart, PathBuf::from("song.json"));
                assert!(params.is_none());
                assert!(record.is_none());
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_parse_params_instrument() {
        let cli = Cli::parse_from([
            "beatcore",
            "params",
            "encode",
            "--instrument",
            "vocals",
            "--input",
            "vocals.toml",
            "--output",
            "vocals.bin",
        ]);
        match cli.command {
            Command::Params {
                command: ParamsCommand::Encode { instrument, .. },
            } => assert_eq!(instrument, InstrumentKind::Vocals),
            _ => panic!("expected params encode"),
        }
    }

    #[test]
    fn test_unknown_instrument_rejected() {
        let result = Cli::try_parse_from([
            "beatcore",
            "params",
            "decode",
            "--instrument",
            "guitar",
            "--input",
            "x.bin",
        ]);
        assert!(result.is_err());
    }
}
