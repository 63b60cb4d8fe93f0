use anyhow::{bail, Result};
use log::{debug, warn};

#[cfg(target_os = "macos")]
use anyhow::Context;
#[cfg(target_os = "macos")]
use std::process::Command;

use crate::notifier::{Alert, AlertKind, Notifier};

/// Notifier backed by AppleScript: banners through `display notification`,
/// alerts through `display dialog`.
pub struct OsascriptNotifier;

impl Notifier for OsascriptNotifier {
    fn notify(&self, title: &str, message: &str) {
        if let Err(err) = display_notification(title, message) {
            warn!("Notification '{title}' not delivered: {err:#}");
        }
    }

    fn alert(&self, alert: &Alert) -> Option<String> {
        match display_dialog(alert) {
            Ok(choice) => choice,
            Err(err) => {
                warn!("Alert '{}' not shown: {err:#}", alert.title);
                None
            }
        }
    }
}

pub fn display_notification(title: &str, message: &str) -> Result<()> {
    let script = format!(
        "display notification {} with title {} sound name \"Glass\"",
        quote(message),
        quote(title)
    );
    run_osascript(&script).map(|_| ())
}

/// Shows a modal dialog and returns the button the user pressed.
pub fn display_dialog(alert: &Alert) -> Result<Option<String>> {
    let script = dialog_script(alert);
    let output = run_osascript(&script)?;
    Ok(parse_button_returned(&output))
}

/// URL of the frontmost browser tab, trying Chrome before Safari.
pub fn active_browser_url() -> Option<String> {
    const SCRIPTS: [&str; 2] = [
        r#"tell application "Google Chrome" to get URL of active tab of window 1"#,
        r#"tell application "Safari" to get URL of current tab of window 1"#,
    ];

    SCRIPTS.iter().find_map(|script| match run_osascript(script) {
        Ok(url) if !url.is_empty() => Some(url),
        Ok(_) => None,
        Err(err) => {
            debug!("Active tab lookup failed: {err:#}");
            None
        }
    })
}

#[cfg(target_os = "macos")]
fn run_osascript(script: &str) -> Result<String> {
    let output = Command::new("osascript")
        .args(["-e", script])
        .output()
        .context("failed to spawn osascript")?;

    if !output.status.success() {
        bail!(
            "osascript exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(not(target_os = "macos"))]
fn run_osascript(_script: &str) -> Result<String> {
    bail!("AppleScript is only available on macOS")
}

fn dialog_script(alert: &Alert) -> String {
    let icon = match alert.kind {
        AlertKind::Info => "note",
        AlertKind::Warning => "caution",
        AlertKind::Error => "stop",
    };
    let buttons = alert
        .buttons
        .iter()
        .map(|button| quote(button))
        .collect::<Vec<_>>()
        .join(", ");

    let mut script = format!(
        "display dialog {} with title {} with icon {icon}",
        quote(&alert.message),
        quote(&alert.title)
    );
    if !buttons.is_empty() {
        script.push_str(&format!(" buttons {{{buttons}}}"));
        if !alert.default_button.is_empty() {
            script.push_str(&format!(" default button {}", quote(&alert.default_button)));
        }
    }
    script
}

/// `display dialog` answers with `button returned:<label>`.
fn parse_button_returned(output: &str) -> Option<String> {
    output
        .split(',')
        .find_map(|part| part.trim().strip_prefix("button returned:"))
        .map(|label| label.to_string())
}

/// AppleScript string literal.
fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
    }

    #[test]
    fn dialog_script_lists_buttons_and_default() {
        let alert = Alert::new(
            AlertKind::Warning,
            "ENGRESS: Focus Check",
            "It is 10:00.",
            &["Training Now", "Ignore Mission"],
        );
        let script = dialog_script(&alert);
        assert!(script.starts_with("display dialog \"It is 10:00.\" with title \"ENGRESS: Focus Check\""));
        assert!(script.contains("with icon caution"));
        assert!(script.contains("buttons {\"Training Now\", \"Ignore Mission\"}"));
        assert!(script.ends_with("default button \"Training Now\""));
    }

    #[test]
    fn reads_the_pressed_button() {
        assert_eq!(
            parse_button_returned("button returned:Keep Paused").as_deref(),
            Some("Keep Paused")
        );
        assert_eq!(
            parse_button_returned("button returned:OK, gave up:false").as_deref(),
            Some("OK")
        );
        assert_eq!(parse_button_returned(""), None);
    }
}
