//! OS-level actions: opening web pages and sending keyboard shortcuts

use crate::{EiraError, Result};
use std::fmt;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Opens a URL in the user's browser
pub trait BrowserLauncher: Send + Sync {
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Sends a keyboard shortcut to the focused window
pub trait ShortcutSender: Send + Sync {
    fn send_shortcut(&self, combo: &KeyCombo) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    Command,
    Control,
}

/// A modifier plus a single key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    pub modifier: Modifier,
    pub key: char,
}

impl KeyCombo {
    pub fn new(modifier: Modifier, key: char) -> Self {
        Self { modifier, key }
    }

    /// Close-tab shortcut for the current platform: Cmd+W on macOS, Ctrl+W elsewhere
    pub fn close_tab() -> Self {
        let modifier = if cfg!(target_os = "macos") {
            Modifier::Command
        } else {
            Modifier::Control
        };
        Self::new(modifier, 'w')
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifier = match self.modifier {
            Modifier::Command => "Cmd",
            Modifier::Control => "Ctrl",
        };
        write!(f, "{}+{}", modifier, self.key.to_ascii_uppercase())
    }
}

/// Default browser through the `open` crate
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open_url(&self, url: &str) -> Result<()> {
        info!("Opening {} in browser", url);
        open::that(url)
            .map_err(|e| EiraError::DesktopError(format!("Failed to open {}: {}", url, e)))
    }
}

/// Shortcut injection via the platform's scripting tool
///
/// macOS uses `osascript`, Linux uses `xdotool` (X11), Windows uses
/// PowerShell `SendKeys`.
#[derive(Debug, Default)]
pub struct SystemShortcuts;

impl SystemShortcuts {
    fn command_for(combo: &KeyCombo) -> (&'static str, Vec<String>) {
        let key = combo.key.to_ascii_lowercase();
        if cfg!(target_os = "macos") {
            let using = match combo.modifier {
                Modifier::Command => "command down",
                Modifier::Control => "control down",
            };
            (
                "osascript",
                vec![
                    "-e".into(),
                    format!(
                        "tell application \"System Events\" to keystroke \"{}\" using {}",
                        key, using
                    ),
                ],
            )
        } else if cfg!(target_os = "windows") {
            // SendKeys has no Command key; ^ is Ctrl
            (
                "powershell",
                vec![
                    "-NoProfile".into(),
                    "-Command".into(),
                    format!(
                        "(New-Object -ComObject WScript.Shell).SendKeys('^{}')",
                        key
                    ),
                ],
            )
        } else {
            let modifier = match combo.modifier {
                Modifier::Command => "super",
                Modifier::Control => "ctrl",
            };
            ("xdotool", vec!["key".into(), format!("{}+{}", modifier, key)])
        }
    }
}

impl ShortcutSender for SystemShortcuts {
    fn send_shortcut(&self, combo: &KeyCombo) -> Result<()> {
        let (program, args) = Self::command_for(combo);
        debug!("Sending {} via {}", combo, program);

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EiraError::DesktopError(format!("Failed to spawn {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EiraError::DesktopError(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
