//! Playwright browser automation
//!
//! A Node.js bridge script owns one browser, one context and one page. Rust
//! sends it one JSON command per line on stdin and reads one JSON reply per
//! line on stdout, so the page survives across calls.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::driver::{Driver, LoadState, WaitState};
use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("Unknown browser: {}", other))),
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Default timeout Playwright applies to every action
    pub default_timeout: Duration,

    /// `node` executable
    pub node_binary: PathBuf,

    /// Extra module path so `require('playwright')` resolves
    pub node_path: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            default_timeout: Duration::from_secs(30),
            node_binary: PathBuf::from("node"),
            node_path: None,
        }
    }
}

/// Bridge request; `op` selects the handler in the script
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum BridgeCommand {
    Goto { url: String },
    WaitForLoadState { state: LoadState },
    WaitForSelector { selector: String, state: WaitState, timeout_ms: u64 },
    WaitForUrl { url: String, timeout_ms: u64 },
    Url,
    Fill { selector: String, value: String },
    Click { selector: String },
    SelectOption { selector: String, value: String },
    Count { selector: String },
    TextContent { selector: String },
    AllTextContents { selector: String },
    IsVisible { selector: String },
    Close,
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    id: u64,
    #[serde(flatten)]
    command: &'a BridgeCommand,
}

#[derive(Debug, Deserialize)]
struct Reply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

struct BridgeIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// Playwright browser handle
pub struct PlaywrightHandle {
    io: Mutex<BridgeIo>,
    child: Mutex<Child>,
    next_id: AtomicU64,

    /// Holds the bridge script for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl PlaywrightHandle {
    /// Launch a browser page behind a fresh bridge process
    ///
    /// Does not check for Playwright; callers that want a friendly skip run
    /// [`PlaywrightHandle::check_playwright_installed`] once up front.
    pub async fn launch(config: &PlaywrightConfig) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        tokio::fs::write(&script_path, build_script(config)).await?;

        debug!("Starting Playwright bridge: {}", script_path.display());

        let mut cmd = TokioCommand::new(&config.node_binary);
        cmd.arg(&script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(node_path) = &config.node_path {
            cmd.env("NODE_PATH", node_path);
        }

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => E2eError::PlaywrightNotFound,
            _ => E2eError::Bridge(format!("Failed to spawn {}: {}", config.node_binary.display(), e)),
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Bridge("bridge stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Bridge("bridge stdout unavailable".into()))?;
        let mut stdout = BufReader::new(stdout).lines();

        // The script prints one line once the page exists.
        match stdout.next_line().await? {
            Some(line) if line.contains("\"ready\"") => {}
            Some(line) => return Err(E2eError::Playwright(format!("Bridge failed to start: {}", line))),
            None => return Err(E2eError::Playwright("Bridge exited before the page was ready".into())),
        }

        info!("Launched {} (headless: {})", config.browser.as_str(), config.headless);

        Ok(Self {
            io: Mutex::new(BridgeIo { stdin, stdout }),
            child: Mutex::new(child),
            next_id: AtomicU64::new(1),
            _script_dir: script_dir,
        })
    }

    /// Check if Playwright is installed
    pub async fn check_playwright_installed() -> E2eResult<()> {
        let output = TokioCommand::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    async fn call(&self, command: BridgeCommand) -> E2eResult<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut line = serde_json::to_string(&Request { id, command: &command })?;
        line.push('\n');

        debug!("bridge -> {}", line.trim_end());

        let mut io = self.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        let reply = io
            .stdout
            .next_line()
            .await?
            .ok_or_else(|| E2eError::Bridge("bridge closed its output".into()))?;
        drop(io);

        let reply: Reply = serde_json::from_str(&reply)?;
        if reply.id != id {
            return Err(E2eError::Bridge(format!("reply {} does not match request {}", reply.id, id)));
        }
        if reply.ok {
            return Ok(reply.value);
        }

        let message = reply.error.unwrap_or_else(|| "unknown error".to_string());
        match reply.kind.as_deref() {
            Some("TimeoutError") => Err(E2eError::Timeout(message)),
            _ => Err(E2eError::Playwright(message)),
        }
    }

    async fn call_unit(&self, command: BridgeCommand) -> E2eResult<()> {
        self.call(command).await.map(|_| ())
    }
}

#[async_trait]
impl Driver for PlaywrightHandle {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.call_unit(BridgeCommand::Goto { url: url.to_string() }).await
    }

    async fn wait_for_load_state(&self, state: LoadState) -> E2eResult<()> {
        self.call_unit(BridgeCommand::WaitForLoadState { state }).await
    }

    async fn wait_for_selector(&self, selector: &str, state: WaitState, timeout: Duration) -> E2eResult<()> {
        self.call_unit(BridgeCommand::WaitForSelector {
            selector: selector.to_string(),
            state,
            timeout_ms: timeout.as_millis() as u64,
        })
        .await
    }

    async fn wait_for_url(&self, url: &str, timeout: Duration) -> E2eResult<()> {
        self.call_unit(BridgeCommand::WaitForUrl {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
        .await
    }

    async fn url(&self) -> E2eResult<String> {
        let value = self.call(BridgeCommand::Url).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.call_unit(BridgeCommand::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        })
        .await
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        self.call_unit(BridgeCommand::Click { selector: selector.to_string() }).await
    }

    async fn select_option(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.call_unit(BridgeCommand::SelectOption {
            selector: selector.to_string(),
            value: value.to_string(),
        })
        .await
    }

    async fn count(&self, selector: &str) -> E2eResult<usize> {
        let value = self.call(BridgeCommand::Count { selector: selector.to_string() }).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn text_content(&self, selector: &str) -> E2eResult<Option<String>> {
        let value = self.call(BridgeCommand::TextContent { selector: selector.to_string() }).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn all_text_contents(&self, selector: &str) -> E2eResult<Vec<String>> {
        let value = self.call(BridgeCommand::AllTextContents { selector: selector.to_string() }).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        let value = self.call(BridgeCommand::IsVisible { selector: selector.to_string() }).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn close(&self) -> E2eResult<()> {
        if let Err(e) = self.call_unit(BridgeCommand::Close).await {
            warn!("Bridge close failed: {}", e);
        }
        let mut child = self.child.lock().await;
        match tokio::time::timeout(Duration::from_secs(5), child.wait()).await {
            Ok(status) => {
                debug!("Bridge exited: {}", status?);
            }
            Err(_) => {
                warn!("Bridge did not exit, killing it");
                child.kill().await?;
            }
        }
        Ok(())
    }
}

/// Build the bridge script for a browser configuration
pub fn build_script(config: &PlaywrightConfig) -> String {
    format!(
        r#"
const {{ chromium, firefox, webkit }} = require('playwright');
const readline = require('readline');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  context.setDefaultTimeout({timeout});
  const page = await context.newPage();

  const handlers = {{
    goto: async (a) => {{ await page.goto(a.url); return null; }},
    wait_for_load_state: async (a) => {{ await page.waitForLoadState(a.state); return null; }},
    wait_for_selector: async (a) => {{
      await page.waitForSelector(a.selector, {{ state: a.state, timeout: a.timeout_ms }});
      return null;
    }},
    wait_for_url: async (a) => {{ await page.waitForURL(a.url, {{ timeout: a.timeout_ms }}); return null; }},
    url: async () => page.url(),
    fill: async (a) => {{ await page.locator(a.selector).first().fill(a.value); return null; }},
    click: async (a) => {{ await page.locator(a.selector).first().click(); return null; }},
    select_option: async (a) => {{ await page.locator(a.selector).first().selectOption(a.value); return null; }},
    count: async (a) => page.locator(a.selector).count(),
    text_content: async (a) => {{
      const locator = page.locator(a.selector);
      return (await locator.count()) > 0 ? locator.first().textContent() : null;
    }},
    all_text_contents: async (a) => page.locator(a.selector).allTextContents(),
    is_visible: async (a) => page.locator(a.selector).first().isVisible(),
    close: async () => null,
  }};

  const reply = (msg) => process.stdout.write(JSON.stringify(msg) + '\n');
  reply({{ ready: true }});

  const rl = readline.createInterface({{ input: process.stdin }});
  for await (const line of rl) {{
    if (!line.trim()) continue;
    const req = JSON.parse(line);
    try {{
      const handler = handlers[req.op];
      if (!handler) throw new Error('unknown op ' + req.op);
      const value = await handler(req);
      reply({{ id: req.id, ok: true, value: value === undefined ? null : value }});
    }} catch (error) {{
      reply({{ id: req.id, ok: false, error: error.message, kind: error.name }});
    }}
    if (req.op === 'close') break;
  }}

  await context.close();
  await browser.close();
}})().catch((error) => {{
  process.stdout.write(JSON.stringify({{ fatal: error.message }}) + '\n');
  process.exit(1);
}});
"#,
        browser = config.browser.as_str(),
        headless = config.headless,
        width = config.viewport_width,
        height = config.viewport_height,
        timeout = config.default_timeout.as_millis(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let command = BridgeCommand::WaitForSelector {
            selector: "#inventory_container".into(),
            state: WaitState::Visible,
            timeout_ms: 500,
        };
        let json = serde_json::to_value(Request { id: 7, command: &command }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "op": "wait_for_selector",
                "selector": "#inventory_container",
                "state": "visible",
                "timeout_ms": 500
            })
        );

        let json = serde_json::to_value(Request {
            id: 8,
            command: &BridgeCommand::WaitForLoadState { state: LoadState::NetworkIdle },
        })
        .unwrap();
        assert_eq!(json["state"], "networkidle");
    }

    #[test]
    fn test_reply_parsing() {
        let ok: Reply = serde_json::from_str(r#"{"id":1,"ok":true,"value":3}"#).unwrap();
        assert!(ok.ok);
        assert_eq!(ok.value, serde_json::json!(3));

        let err: Reply =
            serde_json::from_str(r#"{"id":2,"ok":false,"error":"waiting for locator","kind":"TimeoutError"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.kind.as_deref(), Some("TimeoutError"));
    }

    #[test]
    fn test_script_embeds_config() {
        let config = PlaywrightConfig {
            browser: Browser::Firefox,
            headless: false,
            viewport_width: 1920,
            viewport_height: 1080,
            ..Default::default()
        };
        let script = build_script(&config);
        assert!(script.contains("await firefox.launch({ headless: false })"));
        assert!(script.contains("viewport: { width: 1920, height: 1080 }"));
        assert!(script.contains("context.setDefaultTimeout(30000)"));
    }

    #[tokio::test]
    async fn test_launch_without_node_is_not_found() {
        let config = PlaywrightConfig {
            node_binary: PathBuf::from("/nonexistent/bin/node"),
            ..Default::default()
        };
        let result = PlaywrightHandle::launch(&config).await;
        assert!(matches!(result, Err(E2eError::PlaywrightNotFound)));
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("Chromium".parse::<Browser>().unwrap(), Browser::Chromium);
        assert_eq!("webkit".parse::<Browser>().unwrap(), Browser::Webkit);
        assert!("opera".parse::<Browser>().is_err());
    }
}
