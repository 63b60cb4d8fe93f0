use std::{io, path::Path, str::FromStr};

use anyhow::{anyhow, Context, Error, Result};
use tokio::fs;

use crate::config::OverlayPaths;

/// Timer line that tells the overlay to hide.
pub const HIDDEN: &str = "HIDDEN";

/// One-shot commands the overlay can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudCommand {
    TogglePause,
    Stop,
    Open,
    HideScratchpad,
}

impl HudCommand {
    pub fn token(&self) -> &'static str {
        match self {
            HudCommand::TogglePause => "TOGGLE_PAUSE",
            HudCommand::Stop => "STOP",
            HudCommand::Open => "OPEN",
            HudCommand::HideScratchpad => "HIDE_SCRATCHPAD",
        }
    }

    /// `None` for anything that is not a known token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "TOGGLE_PAUSE" => Some(HudCommand::TogglePause),
            "STOP" => Some(HudCommand::Stop),
            "OPEN" => Some(HudCommand::Open),
            "HIDE_SCRATCHPAD" => Some(HudCommand::HideScratchpad),
            _ => None,
        }
    }
}

impl FromStr for HudCommand {
    type Err = Error;

    /// Accepts the wire token or its kebab-case spelling (`toggle-pause`).
    fn from_str(value: &str) -> Result<Self> {
        let token = value.trim().replace('-', "_").to_ascii_uppercase();
        Self::parse(&token).ok_or_else(|| anyhow!("unknown overlay command '{value}'"))
    }
}

/// Reads and writes the files shared with the overlay helper.
#[derive(Debug, Clone)]
pub struct OverlayChannel {
    paths: OverlayPaths,
}

impl OverlayChannel {
    pub fn new(paths: OverlayPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &OverlayPaths {
        &self.paths
    }

    pub async fn write_timer(&self, line: &str) -> Result<()> {
        write(&self.paths.timer, line).await
    }

    pub async fn write_notes(&self, notes: &str) -> Result<()> {
        write(&self.paths.notes_out, notes).await
    }

    /// Consume the pending command, if any. The file is deleted before the
    /// token is interpreted so a command is never applied twice.
    pub async fn take_command(&self) -> Result<Option<String>> {
        let Some(token) = read_if_present(&self.paths.command).await? else {
            return Ok(None);
        };
        match fs::remove_file(&self.paths.command).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to clear command file {}", self.paths.command.display())
                })
            }
        }
        Ok(Some(token))
    }

    /// Queue a command for whoever polls the command file.
    pub async fn post_command(&self, command: HudCommand) -> Result<()> {
        write(&self.paths.command, command.token()).await
    }

    pub async fn read_hud_notes(&self) -> Result<Option<String>> {
        read_if_present(&self.paths.notes_in).await
    }
}

async fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

async fn read_if_present(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_wire_tokens_only() {
        assert_eq!(HudCommand::parse("TOGGLE_PAUSE\n"), Some(HudCommand::TogglePause));
        assert_eq!(HudCommand::parse("HIDE_SCRATCHPAD"), Some(HudCommand::HideScratchpad));
        assert_eq!(HudCommand::parse("toggle_pause"), None);
        assert_eq!(HudCommand::parse("REBOOT"), None);
    }

    #[test]
    fn cli_spelling_maps_to_tokens() {
        assert_eq!("toggle-pause".parse::<HudCommand>().unwrap(), HudCommand::TogglePause);
        assert_eq!("open".parse::<HudCommand>().unwrap(), HudCommand::Open);
        assert!("dance".parse::<HudCommand>().is_err());
    }

    #[tokio::test]
    async fn commands_are_consumed_once() {
        let dir = tempdir().unwrap();
        let channel = OverlayChannel::new(OverlayPaths::in_dir(dir.path()));

        assert_eq!(channel.take_command().await.unwrap(), None);
        channel.post_command(HudCommand::Stop).await.unwrap();
        assert_eq!(channel.take_command().await.unwrap().as_deref(), Some("STOP"));
        assert_eq!(channel.take_command().await.unwrap(), None);
        assert!(!channel.paths().command.exists());
    }

    #[tokio::test]
    async fn notes_round_through_their_files() {
        let dir = tempdir().unwrap();
        let channel = OverlayChannel::new(OverlayPaths::in_dir(dir.path()));

        assert_eq!(channel.read_hud_notes().await.unwrap(), None);
        channel.write_notes("cohesion > coherence").await.unwrap();
        let written = std::fs::read_to_string(&channel.paths().notes_out).unwrap();
        assert_eq!(written, "cohesion > coherence");
    }
}
