mod input;
mod render;
mod runtime;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ghnot_core::tracing_setup::init_file_tracing;
use ghnot_core::{ActionRegistry, Config, CoreRuntime, GithubClient, RefreshStrategy};

use crate::runtime::run_app;
use crate::ui::toasts::Toast;
use crate::ui::App;

#[derive(Parser)]
#[command(name = "ghnot-tui")]
#[command(about = "Browse and triage GitHub notifications interactively")]
struct Args {
    /// Path to JSON config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// When to fetch from the remote on startup: auto, force or prevent
    #[arg(long, short = 'r', default_value = "auto")]
    refresh: RefreshStrategy,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_file_tracing();

    let config = Config::load_or_default(args.config.as_deref()).context("Failed to load config")?;
    let client = GithubClient::from_env(&config.endpoint).context("Failed to create GitHub client")?;
    let mut core = CoreRuntime::new(config, Arc::new(client));

    // Blocking HTTP happens here, before the async runtime exists
    core.load().context("Failed to read cache")?;
    let refresh_error = match core.refresh(args.refresh) {
        Ok(Some(report)) => {
            tracing::info!(
                "refreshed: {} new, {} updated, {} kept, {} dropped",
                report.inserted,
                report.updated,
                report.kept,
                report.dropped
            );
            core.save().context("Failed to write cache")?;
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("refresh failed: {:#}", e);
            Some(format!("Refresh failed, showing cached notifications: {:#}", e))
        }
    };

    let registry = Arc::new(ActionRegistry::standard(core.remote()));
    let mut app = App::new(std::mem::take(core.notifications_mut()), registry);
    if let Some(message) = refresh_error {
        app.toasts.push(Toast::warning(message));
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    ui::terminal::install_panic_hook();
    let mut terminal = ui::init_terminal()?;
    let result = rt.block_on(run_app(&mut terminal, &mut app));
    ui::restore_terminal()?;

    // Shut the runtime down first; the client inside `app` must drop outside it
    drop(rt);

    *core.notifications_mut() = app.into_notifications();
    core.save().context("Failed to write cache")?;
    tracing::info!("saved {} notifications", core.notifications().len());

    result
}
