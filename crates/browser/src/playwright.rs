//! Playwright-backed page driver
//!
//! Spawns a Node sidecar running Playwright and speaks a JSON line protocol
//! with it: one command per line on stdin, one reply per line on stdout. The
//! sidecar holds a single persistent browser page for the lifetime of the
//! handle, so a whole authenticated flow (login, navigation, form
//! submission, outcome polling) runs against the same live page.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{BrowserError, BrowserResult};
use crate::page::{Page, WaitState};
use crate::selector::Selector;

const DRIVER_JS: &str = include_str!("driver.js");

/// Browser engine to launch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl std::str::FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(format!("unknown browser: {}", other)),
        }
    }
}

/// Configuration for the Playwright sidecar.
#[derive(Debug, Clone, Serialize)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Default actionability timeout applied by the sidecar when a command
    /// carries no explicit budget.
    pub default_timeout_ms: u64,
    /// How long to wait for the sidecar to come up.
    #[serde(skip)]
    pub startup_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            default_timeout_ms: 5000,
            startup_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Command<'a> {
    Goto { url: &'a str },
    WaitForLoad,
    Fill { selector: &'a Selector, value: &'a str },
    Click { selector: &'a Selector, timeout_ms: u64 },
    TypeText { selector: &'a Selector, text: &'a str },
    Press { selector: &'a Selector, key: &'a str },
    SelectOption { selector: &'a Selector, label: &'a str },
    SetInputFiles { selector: &'a Selector, path: &'a str },
    WaitFor { selector: &'a Selector, state: WaitState, timeout_ms: u64 },
    IsVisible { selector: &'a Selector },
    InnerText { selector: &'a Selector },
    CurrentUrl,
    PageContent,
    Screenshot { path: &'a str },
    Close,
}

struct DriverIo {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

/// A live browser page driven through the Playwright sidecar.
pub struct PlaywrightPage {
    io: Mutex<DriverIo>,
    // Keeps the extracted driver script alive for the sidecar's lifetime.
    _script_dir: tempfile::TempDir,
}

impl PlaywrightPage {
    /// Launch the sidecar and wait for its ready handshake.
    pub async fn launch(config: PlaywrightConfig) -> BrowserResult<Self> {
        Self::check_playwright_installed()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_JS)?;

        let config_json = serde_json::to_string(&config)?;
        debug!("Launching Playwright sidecar: {}", config_json);

        let mut child = TokioCommand::new("node")
            .arg(&script_path)
            .arg(&config_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::DriverExited(format!("failed to spawn node: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BrowserError::DriverExited("no stdin handle".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BrowserError::DriverExited("no stdout handle".to_string()))?;

        let mut io = DriverIo {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        };

        // Browser launch can be slow on cold starts; bound it separately
        // from per-command timeouts.
        let startup = std::time::Duration::from_millis(config.startup_timeout_ms);
        let ready = tokio::time::timeout(startup, io.lines.next_line())
            .await
            .map_err(|_| BrowserError::DriverExited("sidecar startup timed out".to_string()))?
            .map_err(BrowserError::Io)?
            .ok_or_else(|| BrowserError::DriverExited("sidecar closed stdout".to_string()))?;

        let reply: Reply = serde_json::from_str(&ready)
            .map_err(|e| BrowserError::Protocol(format!("bad ready line {:?}: {}", ready, e)))?;
        if !reply.ok || reply.kind.as_deref() != Some("ready") {
            return Err(BrowserError::DriverExited(
                reply.error.unwrap_or_else(|| "sidecar refused to start".to_string()),
            ));
        }

        Ok(Self {
            io: Mutex::new(io),
            _script_dir: script_dir,
        })
    }

    fn check_playwright_installed() -> BrowserResult<()> {
        let status = std::process::Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(BrowserError::DriverNotFound),
        }
    }

    async fn request(&self, cmd: &Command<'_>) -> BrowserResult<Option<serde_json::Value>> {
        let mut io = self.io.lock().await;

        let mut line = serde_json::to_string(cmd)?;
        line.push('\n');
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        let reply_line = io
            .lines
            .next_line()
            .await?
            .ok_or_else(|| BrowserError::DriverExited("sidecar closed stdout".to_string()))?;
        let reply: Reply = serde_json::from_str(&reply_line)
            .map_err(|e| BrowserError::Protocol(format!("bad reply {:?}: {}", reply_line, e)))?;

        if reply.ok {
            return Ok(reply.value);
        }

        let reason = reply.error.unwrap_or_else(|| "unknown driver error".to_string());
        match reply.kind.as_deref() {
            Some("timeout") => Err(self.timeout_error(cmd, reason)),
            Some("fatal") => Err(BrowserError::DriverExited(reason)),
            Some("protocol") => Err(BrowserError::Protocol(reason)),
            _ => Err(BrowserError::ActionFailed {
                action: self.action_name(cmd).to_string(),
                selector: self.action_target(cmd),
                reason,
            }),
        }
    }

    fn timeout_error(&self, cmd: &Command<'_>, reason: String) -> BrowserError {
        let timeout_ms = match cmd {
            Command::Click { timeout_ms, .. } | Command::WaitFor { timeout_ms, .. } => *timeout_ms,
            _ => {
                debug!("Driver timeout outside an explicit budget: {}", reason);
                0
            }
        };
        BrowserError::WaitTimeout {
            selector: self.action_target(cmd),
            timeout_ms,
        }
    }

    fn action_name(&self, cmd: &Command<'_>) -> &'static str {
        match cmd {
            Command::Goto { .. } => "goto",
            Command::WaitForLoad => "wait_for_load",
            Command::Fill { .. } => "fill",
            Command::Click { .. } => "click",
            Command::TypeText { .. } => "type_text",
            Command::Press { .. } => "press",
            Command::SelectOption { .. } => "select_option",
            Command::SetInputFiles { .. } => "set_input_files",
            Command::WaitFor { .. } => "wait_for",
            Command::IsVisible { .. } => "is_visible",
            Command::InnerText { .. } => "inner_text",
            Command::CurrentUrl => "current_url",
            Command::PageContent => "page_content",
            Command::Screenshot { .. } => "screenshot",
            Command::Close => "close",
        }
    }

    fn action_target(&self, cmd: &Command<'_>) -> String {
        match cmd {
            Command::Goto { url } => (*url).to_string(),
            Command::Fill { selector, .. }
            | Command::Click { selector, .. }
            | Command::TypeText { selector, .. }
            | Command::Press { selector, .. }
            | Command::SelectOption { selector, .. }
            | Command::SetInputFiles { selector, .. }
            | Command::WaitFor { selector, .. }
            | Command::IsVisible { selector }
            | Command::InnerText { selector } => selector.to_string(),
            _ => "page".to_string(),
        }
    }

    /// Close the browser and wait for the sidecar to exit.
    pub async fn close(self) -> BrowserResult<()> {
        let _ = self.request(&Command::Close).await;
        let mut io = self.io.into_inner();
        match io.child.wait().await {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                warn!("Sidecar exited with {}", status);
                Ok(())
            }
            Err(e) => Err(BrowserError::Io(e)),
        }
    }
}

#[async_trait]
impl Page for PlaywrightPage {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.request(&Command::Goto { url }).await.map(|_| ())
    }

    async fn wait_for_load(&self) -> BrowserResult<()> {
        self.request(&Command::WaitForLoad).await.map(|_| ())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> BrowserResult<()> {
        self.request(&Command::Fill { selector, value }).await.map(|_| ())
    }

    async fn click(&self, selector: &Selector, timeout_ms: u64) -> BrowserResult<()> {
        self.request(&Command::Click { selector, timeout_ms }).await.map(|_| ())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> BrowserResult<()> {
        self.request(&Command::TypeText { selector, text }).await.map(|_| ())
    }

    async fn press(&self, selector: &Selector, key: &str) -> BrowserResult<()> {
        self.request(&Command::Press { selector, key }).await.map(|_| ())
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> BrowserResult<()> {
        self.request(&Command::SelectOption { selector, label }).await.map(|_| ())
    }

    async fn set_input_files(&self, selector: &Selector, path: &Path) -> BrowserResult<()> {
        let path = path.to_string_lossy();
        self.request(&Command::SetInputFiles { selector, path: &path })
            .await
            .map(|_| ())
    }

    async fn wait_for(
        &self,
        selector: &Selector,
        state: WaitState,
        timeout_ms: u64,
    ) -> BrowserResult<()> {
        self.request(&Command::WaitFor { selector, state, timeout_ms })
            .await
            .map(|_| ())
    }

    async fn is_visible(&self, selector: &Selector) -> BrowserResult<bool> {
        let value = self.request(&Command::IsVisible { selector }).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn inner_text(&self, selector: &Selector) -> BrowserResult<String> {
        let value = self.request(&Command::InnerText { selector }).await?;
        Ok(value
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let value = self.request(&Command::CurrentUrl).await?;
        value
            .and_then(|v| v.as_str().map(String::from))
            .ok_or_else(|| BrowserError::Protocol("current_url returned no value".to_string()))
    }

    async fn page_content(&self) -> BrowserResult<String> {
        let value = self.request(&Command::PageContent).await?;
        value
            .and_then(|v| v.as_str().map(String::from))
            .ok_or_else(|| BrowserError::Protocol("page_content returned no value".to_string()))
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        let path = path.to_string_lossy();
        self.request(&Command::Screenshot { path: &path }).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_format() {
        let sel = Selector::placeholder("Enter username");
        let cmd = Command::Fill { selector: &sel, value: "aman@gmail.com" };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["cmd"], "fill");
        assert_eq!(json["selector"]["by"], "placeholder");
        assert_eq!(json["value"], "aman@gmail.com");
    }

    #[test]
    fn reply_parses_without_optional_fields() {
        let reply: Reply = serde_json::from_str(r#"{"ok":true,"value":null}"#).unwrap();
        assert!(reply.ok);
        assert!(reply.kind.is_none());

        let reply: Reply =
            serde_json::from_str(r#"{"ok":false,"kind":"timeout","error":"Timeout 5000ms"}"#)
                .unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.kind.as_deref(), Some("timeout"));
    }

    #[test]
    fn browser_parses_from_str() {
        assert!(matches!("chromium".parse::<Browser>(), Ok(Browser::Chromium)));
        assert!(matches!("webkit".parse::<Browser>(), Ok(Browser::Webkit)));
        assert!("edge".parse::<Browser>().is_err());
    }
}
