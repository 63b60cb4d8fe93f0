use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, EventBus};
use crate::macos_bridge::active_browser_url;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::{log_error, log_info};

/// Report the frontmost browser tab every `poll_interval` until cancelled.
pub async fn focus_loop(events: EventBus, poll_interval: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_url: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // osascript blocks for as long as the browser takes to answer.
                let url = match tokio::task::spawn_blocking(active_browser_url).await {
                    Ok(url) => url,
                    Err(err) => {
                        log_error!("active tab lookup task failed: {err}");
                        continue;
                    }
                };
                let Some(url) = url else { continue };
                if last_url.as_deref() != Some(url.as_str()) {
                    log_info!("active tab changed: {url}");
                    last_url = Some(url.clone());
                }
                events.emit(AppEvent::UrlActive(url));
            }
            _ = cancel_token.cancelled() => {
                log_info!("focus monitor shutting down");
                break;
            }
        }
    }
}
