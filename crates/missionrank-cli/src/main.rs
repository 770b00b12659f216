#![forbid(unsafe_code)]

mod artifacts;
mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use missionrank_core::config::load_config;
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "mrank: score data assets against a mission hierarchy",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: <config dir>/missionrank/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for saved artifacts (overrides the config file).
    #[arg(long, global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Do not write any artifact files.
    #[arg(long, global = true)]
    no_save: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Usage percentage of each data asset per mission",
        after_help = "EXAMPLES:\n    mrank bottom-up payload.json\n    mrank bottom-up payload.json --json --no-save"
    )]
    BottomUp(cmd::ScoreArgs),

    #[command(
        about = "Structural criticality of each data asset, scaled to [1, 4]",
        after_help = "EXAMPLES:\n    mrank criticality payload.json --out-dir results"
    )]
    Criticality(cmd::ScoreArgs),

    #[command(
        about = "PageRank importance of reachable data per mission",
        after_help = "EXAMPLES:\n    mrank importance payload.json --config scoring.toml"
    )]
    Importance(cmd::ScoreArgs),

    #[command(about = "Run every scorer on one payload")]
    All(cmd::ScoreArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("MRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "missionrank=debug,mrank=debug,info"
        } else {
            "missionrank=info,mrank=info,warn"
        })
    });

    let format = env::var("MRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            render_error(output, &CliError::new(format!("{err:#}")))?;
            return Err(err);
        }
    };
    if let Some(dir) = &cli.out_dir {
        config.output.dir.clone_from(dir);
    }
    if cli.no_save {
        config.output.save = false;
    }
    debug!(?config, "configuration resolved");

    let ctx = cmd::RunContext { config, output };

    match &cli.command {
        Commands::BottomUp(args) => cmd::bottom_up::run_bottom_up(args, &ctx),
        Commands::Criticality(args) => cmd::criticality::run_criticality(args, &ctx),
        Commands::Importance(args) => cmd::importance::run_importance(args, &ctx),
        Commands::All(args) => cmd::all::run_all(args, &ctx),
    }
}
