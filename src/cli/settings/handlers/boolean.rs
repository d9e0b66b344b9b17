//! The `markdown` on/off setting.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, parse_bool, success_set};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::Config;

const KEY: &str = "markdown";

pub struct MarkdownHandler;

impl SettingHandler for MarkdownHandler {
    fn key(&self) -> &'static str {
        KEY
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let [value] = args else {
            return Err(SettingError::MissingArgs {
                hint: "Turn markdown rendering of replies on or off:",
                example: "parley set markdown off",
            });
        };

        let enabled = parse_bool(value).ok_or_else(|| SettingError::InvalidBoolean(value.clone()))?;
        ctx.config.markdown = Some(enabled);
        Ok(success_set(KEY, format_bool(enabled)))
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        ctx.config.markdown = None;
        Ok(format!("✅ Unset {KEY} (replies render as markdown again)"))
    }

    fn format(&self, config: &Config) -> String {
        match config.markdown {
            Some(enabled) => format!("  {KEY}: {}", format_bool(enabled)),
            None => format!("  {KEY}: (unset, default: on)"),
        }
    }
}
