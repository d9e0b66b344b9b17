//! Example prompts and the typing-style reveal that feeds them into the input.

use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delay between revealed characters unless the config overrides it.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Deserialize)]
struct BuiltinPromptsConfig {
    prompts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PromptCatalog {
    prompts: Vec<String>,
}

impl PromptCatalog {
    pub fn builtin() -> Self {
        const CONFIG_CONTENT: &str = include_str!("../builtin_prompts.toml");
        let config: BuiltinPromptsConfig =
            toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_prompts.toml");
        Self::new(config.prompts).expect("builtin_prompts.toml must list non-empty prompts")
    }

    /// Returns `None` when the list is empty or holds a blank entry.
    pub fn new(prompts: Vec<String>) -> Option<Self> {
        if prompts.is_empty() || prompts.iter().any(|p| p.trim().is_empty()) {
            return None;
        }
        Some(Self { prompts })
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Wraps out-of-range indices so callers can pass any random value.
    pub fn get(&self, index: usize) -> &str {
        &self.prompts[index % self.prompts.len()]
    }
}

/// Uniform-enough index in `0..len` from OS randomness. Falls back to the
/// clock when the OS source is unavailable.
pub fn random_index(len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let mut buf = [0u8; 8];
    let value = match getrandom::fill(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(_) => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    (value % len as u64) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    /// The tick belongs to a superseded or finished reveal.
    Stale,
    /// Append `ch` to the input; `finished` is set on the last character.
    Char { ch: char, finished: bool },
}

/// State for the character-by-character prompt reveal.
///
/// Each `start` invalidates the previous reveal twice over: its cancellation
/// token is cancelled so the ticker task stops, and its id no longer matches so
/// ticks already queued are discarded.
#[derive(Debug, Default)]
pub struct PromptReveal {
    reveal_id: u64,
    target: Vec<char>,
    revealed: usize,
    cancel_token: Option<CancellationToken>,
}

impl PromptReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, prompt: &str) -> (CancellationToken, u64) {
        self.cancel();
        self.reveal_id += 1;
        self.target = prompt.chars().collect();
        self.revealed = 0;

        let token = CancellationToken::new();
        if self.target.is_empty() {
            token.cancel();
        } else {
            self.cancel_token = Some(token.clone());
        }
        (token, self.reveal_id)
    }

    pub fn tick(&mut self, reveal_id: u64) -> RevealProgress {
        if reveal_id != self.reveal_id || !self.is_active() {
            return RevealProgress::Stale;
        }

        let ch = self.target[self.revealed];
        self.revealed += 1;
        let finished = self.revealed == self.target.len();
        if finished {
            self.cancel();
        }
        RevealProgress::Char { ch, finished }
    }

    /// Stop the current reveal, if any. Already revealed text stays put.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel_token.is_some() && self.revealed < self.target.len()
    }
}
