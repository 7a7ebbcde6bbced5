use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghnot_core::tracing_setup::init_tracing;
use ghnot_core::{ActionRegistry, Config, CoreRuntime, GithubClient, RefreshStrategy};

#[derive(Parser)]
#[command(name = "ghnot")]
#[command(about = "Rule-based triage for GitHub notifications")]
struct Cli {
    /// Path to JSON config file (cache, endpoint, rules)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the cache and apply the configured rules
    Sync {
        /// When to fetch from the remote: auto, force or prevent
        #[arg(long, short = 'r', default_value = "auto")]
        refresh: RefreshStrategy,
        /// Log what would run without running actions or saving
        #[arg(long, short = 'n')]
        noop: bool,
    },

    /// List cached notifications
    List {
        /// Filter expression; repeat to narrow further
        #[arg(long, short = 'f')]
        filter: Vec<String>,
        /// Include hidden and done notifications
        #[arg(long, short = 'a')]
        all: bool,
        /// Print JSON instead of display lines
        #[arg(long)]
        json: bool,
        #[arg(long, short = 'r', default_value = "auto")]
        refresh: RefreshStrategy,
    },

    /// Run one action on the notifications matching the filters
    Run {
        /// Action name (see `ghnot rules` for the catalog)
        action: String,
        /// Arguments passed to the action; options go before the action name
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        #[arg(long, short = 'f')]
        filter: Vec<String>,
        #[arg(long, short = 'n')]
        noop: bool,
        #[arg(long, short = 'r', default_value = "auto")]
        refresh: RefreshStrategy,
    },

    /// Show the configured rules and the available actions
    Rules,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Rules => {
            // catalog only; the client never sends a request
            let client = GithubClient::new(String::new(), &config.endpoint);
            let registry = ActionRegistry::standard(Arc::new(client));
            ghnot_cli::cli::rules(&config, &registry.names(), &mut out)?;
        }
        Commands::Sync { refresh, noop } => {
            let mut runtime = connect(config)?;
            let report = ghnot_cli::cli::sync(&mut runtime, refresh, noop, &mut out)?;
            tracing::info!(
                "done: {} actions ran, {} failed{}",
                report.ran,
                report.failed,
                if noop { " (noop)" } else { "" }
            );
        }
        Commands::List {
            filter,
            all,
            json,
            refresh,
        } => {
            let mut runtime = connect(config)?;
            let count = ghnot_cli::cli::list(&mut runtime, refresh, &filter, all, json, &mut out)?;
            tracing::debug!("listed {} notifications", count);
        }
        Commands::Run {
            action,
            args,
            filter,
            noop,
            refresh,
        } => {
            let mut runtime = connect(config)?;
            let report =
                ghnot_cli::cli::run_action(&mut runtime, refresh, &action, args, filter, noop, &mut out)?;
            tracing::info!("{}: {} ran, {} failed", action, report.ran, report.failed);
        }
    }
    Ok(())
}

fn connect(config: Config) -> Result<CoreRuntime> {
    let client = GithubClient::from_env(&config.endpoint).context("Failed to create GitHub client")?;
    Ok(CoreRuntime::new(config, Arc::new(client)))
}
