//! Handlers for positive integer settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{parse_positive, success_set};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::chat_request::DEFAULT_REQUEST_TIMEOUT;
use crate::core::config::Config;
use crate::core::prompts::DEFAULT_REVEAL_INTERVAL;

/// Data-driven handler for a duration stored as a whole number of `unit`s.
pub struct NumericHandler {
    key: &'static str,
    unit: &'static str,
    hint: &'static str,
    example: &'static str,
    default_value: u64,
    get: fn(&Config) -> Option<u64>,
    set_field: fn(&mut Config, Option<u64>),
}

impl SettingHandler for NumericHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        };

        let value = parse_positive(input).ok_or_else(|| SettingError::InvalidValue {
            key: self.key,
            reason: format!("expected a positive whole number of {}, got '{input}'", self.unit),
        })?;
        (self.set_field)(ctx.config, Some(value));
        Ok(success_set(self.key, &format!("{value} {}", self.unit)))
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        (self.set_field)(ctx.config, None);
        Ok(format!(
            "✅ Unset {} (will use default: {} {})",
            self.key, self.default_value, self.unit
        ))
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {value} {}", self.key, self.unit),
            None => format!(
                "  {}: (unset, default: {} {})",
                self.key, self.default_value, self.unit
            ),
        }
    }
}

/// Create a handler for the `request-timeout` setting.
pub fn request_timeout_handler() -> NumericHandler {
    NumericHandler {
        key: "request-timeout",
        unit: "s",
        hint: "To set the request timeout, specify the number of seconds:",
        example: "parley set request-timeout 90",
        default_value: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        get: |c| c.request_timeout_secs,
        set_field: |c, v| c.request_timeout_secs = v,
    }
}

/// Create a handler for the `reveal-interval` setting.
pub fn reveal_interval_handler() -> NumericHandler {
    NumericHandler {
        key: "reveal-interval",
        unit: "ms",
        hint: "To set the prompt reveal speed, specify milliseconds per character:",
        example: "parley set reveal-interval 15",
        default_value: DEFAULT_REVEAL_INTERVAL.as_millis() as u64,
        get: |c| c.reveal_interval_ms,
        set_field: |c, v| c.reveal_interval_ms = v,
    }
}
