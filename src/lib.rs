pub mod analysis;
pub mod cli;
pub mod config;
pub mod engagement;
pub mod events;
pub mod focus_monitor;
pub mod macos_bridge;
pub mod models;
pub mod notifier;
pub mod overlay;
pub mod store;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use config::EngineConfig;
use engagement::EngagementController;
use events::EventBus;
use notifier::{LogNotifier, Notifier};
use overlay::HudHelper;
use store::JsonStateStore;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

pub fn run() -> Result<()> {
    utils::logging::init();

    let cli = Cli::parse();
    let mut config = EngineConfig::from_env()?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }
    let store = JsonStateStore::new(config.data_path.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    match cli.command {
        Commands::Run => runtime.block_on(serve(config, store)),
        command => runtime.block_on(cli::execute(command, &config, &store)),
    }
}

fn platform_notifier() -> Arc<dyn Notifier> {
    if cfg!(target_os = "macos") {
        Arc::new(macos_bridge::OsascriptNotifier)
    } else {
        Arc::new(LogNotifier)
    }
}

/// The daemon: scheduler, overlay listeners and focus monitor until Ctrl-C.
pub async fn serve(config: EngineConfig, store: JsonStateStore) -> Result<()> {
    log_info!("Engress starting up (data at {})", store.path().display());

    let mut helper = HudHelper::new(config.hud_binary.clone());
    helper.terminate_stale();
    if let Err(err) = helper.launch() {
        log_warn!("Overlay helper failed to start: {err:#}");
    }

    let events = EventBus::new();
    let controller = EngagementController::new(
        config.clone(),
        Arc::new(store),
        platform_notifier(),
        events.clone(),
    );

    let cancel_token = CancellationToken::new();
    let mut tasks = vec![
        controller.spawn_scheduler(cancel_token.clone()),
        tokio::spawn(overlay::command_loop(
            controller.clone(),
            config.command_poll_interval,
            cancel_token.clone(),
        )),
        tokio::spawn(overlay::notes_loop(
            controller.clone(),
            config.notes_poll_interval,
            cancel_token.clone(),
        )),
        tokio::spawn(focus_monitor::focus_loop(
            events.clone(),
            config.url_poll_interval,
            cancel_token.clone(),
        )),
    ];
    tasks.push(tokio::spawn(print_events(events, cancel_token.clone())));

    controller.run_startup_briefing().await;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    log_info!("Shutting down");
    cancel_token.cancel();

    for task in tasks {
        if let Err(err) = task.await {
            log_error!("Background task ended abnormally: {err}");
        }
    }
    helper.shutdown().await;
    Ok(())
}

/// Emitted events go to stdout as JSON lines for whatever shell is attached.
async fn print_events(events: EventBus, cancel_token: CancellationToken) {
    let mut receiver = events.subscribe();
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => log_warn!("Could not serialize {}: {err}", event.name()),
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    log_warn!("Event printer lagged; {skipped} events dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            _ = cancel_token.cancelled() => break,
        }
    }
}
