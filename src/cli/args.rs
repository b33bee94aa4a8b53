use clap::{Parser, Subcommand};
use clap_num::number_range;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "opsfile-semantics")]
#[command(about = "Semantic checks for cf-deployment operations files, driven through bosh interpolate")]
#[command(version)]
pub struct Cli {
    /// Print detailed output during execution
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpolate the base manifest with each scenario's overlays and check the result
    Run {
        /// Root of the cf-deployment checkout (defaults to $CF_DEPLOYMENT_HOME or the nearest ancestor holding cf-deployment.yml)
        #[arg(long)]
        home: Option<PathBuf>,

        /// Interpolation binary to run
        #[arg(long)]
        bosh: Option<String>,

        /// Settings file (yaml, toml or json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Variables file passed to every interpolation with -l
        #[arg(long)]
        vars_file: Option<PathBuf>,

        /// Run only the named scenario (repeatable)
        /// Example: -s aws.yml -s scale-to-one-az.yml
        #[arg(short = 's', long = "scenario", action = clap::ArgAction::Append)]
        scenarios: Vec<String>,

        /// Kill an interpolation that runs longer than this many seconds
        #[arg(long, value_parser = timeout_in_range)]
        timeout: Option<u64>,

        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only print failures
        #[arg(short = 'q', long)]
        quiet: bool,
    },
    /// List every scenario with the overlays it applies
    List,
}

fn timeout_in_range(s: &str) -> Result<u64, String> {
    number_range(s, 1, 3600)
}
