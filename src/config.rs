use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::scrapers::browser::{DiagnosticPaths, DEFAULT_SETTLE_DELAY};
use crate::scrapers::types::DEFAULT_SEARCH_URL;
use crate::summary::fetcher::DEFAULT_FETCH_TIMEOUT;
use crate::summary::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub search_url: String,
    pub output_path: PathBuf,
    pub diagnostics: DiagnosticPaths,
    pub settle_delay: Duration,
    pub fetch_timeout: Duration,
    pub chrome_sandbox: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = DiagnosticPaths::default();

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            search_url: var("FINDHELP_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            output_path: var("SCOUT_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("findhelp_results.json")),
            diagnostics: DiagnosticPaths {
                screenshot: var("SCOUT_SCREENSHOT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.screenshot),
                html: var("SCOUT_HTML_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.html),
            },
            settle_delay: seconds(&var, "SCOUT_SETTLE_DELAY_SECS", DEFAULT_SETTLE_DELAY)?,
            fetch_timeout: seconds(&var, "SCOUT_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT)?,
            chrome_sandbox: var("SCOUT_CHROME_SANDBOX")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .context("SCOUT_CHROME_SANDBOX must be true or false")?,
        })
    }
}

fn seconds(var: impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Result<Duration> {
    match var(key) {
        Some(value) => value
            .parse()
            .map(Duration::from_secs)
            .with_context(|| format!("{} must be a whole number of seconds", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.search_url, "https://www.findhelp.org/search");
        assert_eq!(config.output_path, PathBuf::from("findhelp_results.json"));
        assert_eq!(config.diagnostics.screenshot, PathBuf::from("search_results.png"));
        assert_eq!(config.diagnostics.html, PathBuf::from("search_results.html"));
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.chrome_sandbox);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("SCOUT_OUTPUT_PATH", "out/results.json"),
            ("SCOUT_SETTLE_DELAY_SECS", "2"),
            ("SCOUT_CHROME_SANDBOX", "false"),
        ])
        .unwrap();

        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.output_path, PathBuf::from("out/results.json"));
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert!(!config.chrome_sandbox);
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("SCOUT_FETCH_TIMEOUT_SECS", "soon")])
            .unwrap_err();
        assert!(err.to_string().contains("SCOUT_FETCH_TIMEOUT_SECS"));
    }
}
