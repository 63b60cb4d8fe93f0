use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::generate_briefing,
    config::{EngineConfig, ReminderPolicy},
    events::{AppEvent, EventBus},
    models::DATE_FORMAT,
    notifier::Notifier,
    overlay::{HudCommand, OverlayChannel, HIDDEN},
    store::{load_or_default, save_quietly, StateStore},
};

use super::{
    intervention::Intervention,
    reminder::{due_reminder_slot, minutes_logged_on},
    RuntimeState,
};

/// Owns the runtime state and everything that reacts to it. Cloning is
/// cheap; every clone drives the same state.
#[derive(Clone)]
pub struct EngagementController {
    state: Arc<Mutex<RuntimeState>>,
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn Notifier>,
    events: EventBus,
    overlay: OverlayChannel,
    config: Arc<EngineConfig>,
}

impl EngagementController {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
        events: EventBus,
    ) -> Self {
        let overlay = OverlayChannel::new(config.overlay.clone());
        Self {
            state: Arc::new(Mutex::new(RuntimeState::new())),
            store,
            notifier,
            events,
            overlay,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overlay(&self) -> &OverlayChannel {
        &self.overlay
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn snapshot(&self) -> RuntimeState {
        self.state.lock().await.clone()
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.is_paused
    }

    /// One scheduler pass at `now`: reminder check, then pause watchdog.
    /// Returned interventions have already been dispatched.
    pub async fn tick_at(&self, now: NaiveDateTime) -> Vec<Intervention> {
        let app_state = load_or_default(self.store.as_ref());
        let today = now.date();
        let mut due = Vec::new();

        if let Some(slot) = due_reminder_slot(&app_state, now) {
            let logged = minutes_logged_on(&app_state.daily_logs, today);
            if logged < self.config.daily_target_minutes && self.claim_slot(today, &slot).await {
                info!(
                    "Reminder {slot}: {logged}/{} minutes logged today",
                    self.config.daily_target_minutes
                );
                let briefing = generate_briefing(&app_state, today, &self.config.analysis);
                due.push(Intervention::focus_check(&slot, &briefing));
            }
        }

        let pause_warning = self
            .state
            .lock()
            .await
            .advance_pause_watch(self.config.pause_warning_ticks);
        if pause_warning {
            warn!("Paused for {} ticks; issuing discipline warning", self.config.pause_warning_ticks);
            due.push(Intervention::discipline_warning());
        }

        for intervention in &due {
            // Fire-and-forget: the tick never waits for the user.
            let _ = intervention.clone().dispatch(self.notifier.clone());
        }
        due
    }

    async fn claim_slot(&self, day: NaiveDate, slot: &str) -> bool {
        match self.config.reminder_policy {
            ReminderPolicy::EveryTick => true,
            ReminderPolicy::OncePerMinute => self.state.lock().await.claim_reminder_slot(day, slot),
        }
    }

    /// Spawn the periodic scheduler. The first tick comes one full interval
    /// after start.
    pub fn spawn_scheduler(&self, cancel_token: CancellationToken) -> JoinHandle<()> {
        let controller = self.clone();
        let period = self.config.tick_interval;

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        controller.tick_at(Local::now().naive_local()).await;
                    }
                    _ = cancel_token.cancelled() => {
                        info!("Engagement scheduler shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Pausing hides the overlay and warns right away; resuming only resets
    /// the watchdog.
    pub async fn set_paused(&self, paused: bool) {
        self.state.lock().await.set_paused(paused);
        self.announce_pause(paused).await;
    }

    /// Flip the pause flag under a single lock. Returns the new value.
    pub async fn toggle_pause(&self) -> bool {
        let paused = {
            let mut state = self.state.lock().await;
            let paused = !state.is_paused;
            state.set_paused(paused);
            paused
        };
        self.announce_pause(paused).await;
        paused
    }

    async fn announce_pause(&self, paused: bool) {
        self.events.emit(AppEvent::PauseStateChanged(paused));
        if paused {
            if let Err(err) = self.overlay.write_timer(HIDDEN).await {
                warn!("Failed to hide overlay timer: {err:#}");
            }
            let _ = Intervention::training_halted().dispatch(self.notifier.clone());
        }
    }

    pub async fn set_session_category(&self, category: &str) {
        let line = {
            let mut state = self.state.lock().await;
            state.current_category = category.to_string();
            state.mirror_line()
        };
        self.write_mirror(&line).await;
    }

    /// New timer text from the shell. Also retitles the window.
    pub async fn update_tray_time(&self, time_str: &str) {
        let (title, line) = {
            let mut state = self.state.lock().await;
            state.current_time_str = time_str.trim().to_string();
            (state.window_title(), state.mirror_line())
        };
        self.events.emit(AppEvent::WindowTitle(title));
        self.write_mirror(&line).await;
    }

    pub async fn set_scratchpad_visible(&self, visible: bool) {
        let line = {
            let mut state = self.state.lock().await;
            state.scratchpad_visible = visible;
            state.mirror_line()
        };
        self.write_mirror(&line).await;
    }

    pub async fn update_notes(&self, notes: &str) {
        if let Err(err) = self.overlay.write_notes(notes).await {
            warn!("Failed to mirror notes: {err:#}");
        }
    }

    async fn write_mirror(&self, line: &str) {
        if let Err(err) = self.overlay.write_timer(line).await {
            warn!("Failed to mirror timer: {err:#}");
        }
    }

    pub async fn apply_command(&self, command: HudCommand) {
        info!("Overlay command {}", command.token());
        match command {
            HudCommand::TogglePause => {
                self.toggle_pause().await;
                self.events.emit(AppEvent::ShowWindow);
            }
            HudCommand::Stop => {
                self.events.emit(AppEvent::HudStop);
                self.events.emit(AppEvent::ShowWindow);
            }
            HudCommand::Open => self.events.emit(AppEvent::ShowWindow),
            HudCommand::HideScratchpad => {
                self.state.lock().await.scratchpad_visible = false;
            }
        }
    }

    /// Consume and apply one pending overlay command. Returns it if applied.
    pub async fn poll_command(&self) -> Option<HudCommand> {
        let token = match self.overlay.take_command().await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => {
                warn!("Overlay command read failed: {err:#}");
                return None;
            }
        };
        let Some(command) = HudCommand::parse(&token) else {
            debug!("Ignoring unknown overlay command {token:?}");
            return None;
        };
        self.apply_command(command).await;
        Some(command)
    }

    /// Forward overlay notes once per change, only while the scratchpad is
    /// showing. Returns the forwarded content.
    pub async fn poll_hud_notes(&self) -> Option<String> {
        if !self.state.lock().await.scratchpad_visible {
            return None;
        }
        let content = match self.overlay.read_hud_notes().await {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(err) => {
                warn!("Overlay notes read failed: {err:#}");
                return None;
            }
        };
        let changed = {
            let mut state = self.state.lock().await;
            state.scratchpad_visible && state.observe_hud_notes(&content)
        };
        if !changed {
            return None;
        }
        self.events.emit(AppEvent::HudNotesUpdate(content.clone()));
        Some(content)
    }

    /// Once-per-day briefing. The date is persisted before the alert is
    /// raised. Returns the intervention if one was due.
    pub async fn startup_briefing_at(&self, today: NaiveDate) -> Option<Intervention> {
        let mut app_state = load_or_default(self.store.as_ref());
        let today_str = today.format(DATE_FORMAT).to_string();
        let profile = &app_state.user_profile;
        if !profile.is_setup_complete || profile.last_open_date == today_str {
            return None;
        }

        let briefing = generate_briefing(&app_state, today, &self.config.analysis);
        app_state.user_profile.last_open_date = today_str;
        save_quietly(self.store.as_ref(), &app_state);

        Some(Intervention::mission_briefing(&briefing))
    }

    /// Startup path: waits until the briefing alert is dismissed.
    pub async fn run_startup_briefing(&self) {
        let Some(intervention) = self.startup_briefing_at(Local::now().date_naive()).await else {
            return;
        };
        if let Err(err) = intervention.dispatch(self.notifier.clone()).await {
            warn!("Startup briefing alert task failed: {err}");
        }
    }
}
