use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::chat_request::DEFAULT_REQUEST_TIMEOUT;
use crate::core::prompts::DEFAULT_REVEAL_INTERVAL;
use crate::ui::theme::ThemeMode;

/// Base URL of the chat proxy when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Environment override for the endpoint; sits between CLI flags and the
/// config file.
pub const ENDPOINT_ENV_VAR: &str = "PARLEY_ENDPOINT";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model id preselected at startup (must exist in the catalog)
    pub default_model: Option<String>,
    /// UI theme mode ("light" or "dark")
    pub theme: Option<String>,
    /// Base URL of the chat proxy
    pub endpoint: Option<String>,
    /// Render assistant replies as markdown
    pub markdown: Option<bool>,
    /// Seconds before a chat request is abandoned
    pub request_timeout_secs: Option<u64>,
    /// Milliseconds between revealed characters of a suggested prompt
    pub reveal_interval_ms: Option<u64>,
}

impl Config {
    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme
            .as_deref()
            .and_then(ThemeMode::parse)
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn reveal_interval(&self) -> Duration {
        match self.reveal_interval_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => DEFAULT_REVEAL_INTERVAL,
        }
    }

    /// Resolve the endpoint: CLI flag, then `PARLEY_ENDPOINT`, then config,
    /// then the built-in default.
    pub fn resolve_endpoint(&self, cli_endpoint: Option<&str>) -> String {
        let env_endpoint = std::env::var(ENDPOINT_ENV_VAR).ok();
        self.resolve_endpoint_with_env(cli_endpoint, env_endpoint.as_deref())
    }

    pub(crate) fn resolve_endpoint_with_env(
        &self,
        cli_endpoint: Option<&str>,
        env_endpoint: Option<&str>,
    ) -> String {
        cli_endpoint
            .or(env_endpoint)
            .or(self.endpoint.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }
}
