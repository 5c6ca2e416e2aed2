use crate::scrapers::traits::PageRenderer;
use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time allowed for client-side rendering before the markup is captured
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Where to drop the per-run debugging artifacts
#[derive(Debug, Clone)]
pub struct DiagnosticPaths {
    pub screenshot: PathBuf,
    pub html: PathBuf,
}

impl Default for DiagnosticPaths {
    fn default() -> Self {
        Self {
            screenshot: PathBuf::from("search_results.png"),
            html: PathBuf::from("search_results.html"),
        }
    }
}

/// Headless Chrome renderer for client-rendered search pages
pub struct ChromeRenderer {
    settle_delay: Duration,
    sandbox: bool,
    diagnostics: DiagnosticPaths,
}

impl ChromeRenderer {
    pub fn new(settle_delay: Duration, sandbox: bool, diagnostics: DiagnosticPaths) -> Self {
        Self {
            settle_delay,
            sandbox,
            diagnostics,
        }
    }

    fn launch(&self) -> Result<Browser> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.sandbox)
            .build()
            .context("Failed to build launch options")?;

        Browser::new(options).context("Failed to launch Chrome browser")
    }

    fn capture_html(tab: &Tab) -> Result<String> {
        let html_result = tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to read page HTML")?;

        html_result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .context("Page HTML was not returned as a string")
    }

    fn save_diagnostics(&self, tab: &Tab, html: &str) {
        match tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true) {
            Ok(png) => write_diagnostic(&self.diagnostics.screenshot, &png),
            Err(e) => warn!("Could not capture screenshot: {:#}", e),
        }
        write_diagnostic(&self.diagnostics.html, html.as_bytes());
    }
}

impl PageRenderer for ChromeRenderer {
    fn render(&self, url: &str) -> Result<String> {
        // Chrome is killed when `browser` drops, on every exit path
        let browser = self.launch()?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        info!("Navigating to: {}", url);
        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?;
        tab.wait_until_navigated()
            .context("Navigation did not complete")?;

        info!("Waiting {:?} for page to render...", self.settle_delay);
        thread::sleep(self.settle_delay);

        match tab.get_title() {
            Ok(title) => info!("Page title: {}", title),
            Err(e) => debug!("Could not read page title: {:#}", e),
        }
        info!("Current URL: {}", tab.get_url());

        let html = Self::capture_html(&tab)?;
        debug!("Captured {} bytes of rendered HTML", html.len());

        self.save_diagnostics(&tab, &html);

        if let Err(e) = tab.close(true) {
            debug!("Tab close failed: {:#}", e);
        }
        drop(browser);
        info!("Browser closed");

        Ok(html)
    }

    fn backend_name(&self) -> &'static str {
        "headless_chrome"
    }
}

/// Best-effort write of a debugging artifact
fn write_diagnostic(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Could not create {}: {}", parent.display(), e);
            return;
        }
    }

    match std::fs::write(path, contents) {
        Ok(()) => info!("Saved {} ({} bytes)", path.display(), contents.len()),
        Err(e) => warn!("Could not write {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_written_into_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug").join("page.html");

        write_diagnostic(&path, b"<html></html>");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn diagnostic_write_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file
        write_diagnostic(dir.path(), b"ignored");
        assert!(dir.path().is_dir());
    }
}
