use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engagement::EngagementController;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Poll the overlay command file until cancelled.
pub async fn command_loop(
    controller: EngagementController,
    poll_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(command) = controller.poll_command().await {
                    log_info!("applied overlay command {}", command.token());
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("overlay command listener shutting down");
                break;
            }
        }
    }
}

/// Forward scratchpad edits made in the overlay until cancelled.
pub async fn notes_loop(
    controller: EngagementController,
    poll_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(notes) = controller.poll_hud_notes().await {
                    log_info!("overlay notes changed ({} bytes)", notes.len());
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("overlay notes watcher shutting down");
                break;
            }
        }
    }
}
