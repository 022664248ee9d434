use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};

mod commands;

/// Create or update CloudFormation stacks from a flat JSON configuration.
#[derive(Parser, Debug)]
#[command(name = "stack-deployer", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (stack options plus optional credentials)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Override the configured AWS region
    #[arg(long)]
    region: Option<String>,

    /// Override the configured AWS profile
    #[arg(long)]
    profile: Option<String>,

    /// Override the configured stack name
    #[arg(long)]
    stack_name: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Validate the configured template with CloudFormation
    Validate,
    /// Print whether the stack exists
    Exists,
    /// Create the stack and wait for completion
    Create,
    /// Update the stack and wait for completion
    Update,
    /// Create the stack if missing, update it otherwise
    Deploy,
    /// Print the stack outputs as JSON
    Outputs,
    /// Print the CloudFormation request payload without contacting AWS
    Payload,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Parsed arguments: {cli:?}");

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
