use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::process::{Child, Command};

/// Lifecycle of the overlay helper process.
pub struct HudHelper {
    binary: PathBuf,
    child: Option<Child>,
    own_pid: u32,
}

impl HudHelper {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            child: None,
            own_pid: std::process::id(),
        }
    }

    fn process_name(&self) -> Option<String> {
        self.binary
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Kill helpers left behind by an earlier run. Returns how many were
    /// signalled.
    pub fn terminate_stale(&self) -> usize {
        let Some(name) = self.process_name() else {
            return 0;
        };

        let mut system = System::new();
        system.refresh_processes_specifics(ProcessesToUpdate::All, ProcessRefreshKind::everything());

        let mut killed = 0;
        for (pid, process) in system.processes() {
            if pid.as_u32() == self.own_pid {
                continue;
            }
            if process.name().to_string_lossy() != name.as_str() {
                continue;
            }
            if process.kill() {
                killed += 1;
            } else {
                warn!("Could not stop stale overlay helper pid={}", pid.as_u32());
            }
        }
        if killed > 0 {
            info!("Stopped {killed} stale overlay helper(s)");
        }
        killed
    }

    /// Start the helper unless its binary is missing. A missing helper only
    /// means the overlay stays dark.
    pub fn launch(&mut self) -> Result<bool> {
        if !self.binary.exists() {
            warn!(
                "Overlay helper {} not found; running without overlay",
                self.binary.display()
            );
            return Ok(false);
        }

        let child = Command::new(&self.binary)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to launch {}", self.binary.display()))?;
        info!(
            "Overlay helper started (pid={})",
            child.id().map(|id| id.to_string()).unwrap_or_else(|| "?".into())
        );
        self.child = Some(child);
        Ok(true)
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    pub async fn shutdown(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill().await {
                warn!("Failed to stop overlay helper: {err}");
            }
        }
        self.terminate_stale();
    }
}
