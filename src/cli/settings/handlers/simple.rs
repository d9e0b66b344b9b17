//! Simple setting handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::{Config, DEFAULT_ENDPOINT};
use crate::ui::theme::ThemeMode;
use crate::utils::url::validate_endpoint;

/// Handler for the `default-model` setting.
pub struct DefaultModelHandler;

impl SettingHandler for DefaultModelHandler {
    fn key(&self) -> &'static str {
        "default-model"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set a default model, specify the model id:",
                example: "parley set default-model openai/gpt-4o",
            });
        };

        let model = ctx
            .catalog
            .require(input)
            .map_err(|_| SettingError::UnknownModel {
                input: input.clone(),
            })?;
        let message = success_set("default-model", &format!("{} ({})", model.id, model.name));
        ctx.config.default_model = Some(model.id.clone());
        Ok(message)
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        ctx.config.default_model = None;
        Ok(success_unset("default-model"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.default_model {
            Some(model) => format!("  default-model: {model}"),
            None => "  default-model: (unset)".to_string(),
        }
    }
}

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set a theme, specify light or dark:",
                example: "parley set theme dark",
            });
        };

        let mode = ThemeMode::parse(input).ok_or_else(|| SettingError::UnknownTheme {
            input: input.clone(),
        })?;
        ctx.config.theme = Some(mode.as_str().to_string());
        Ok(success_set("theme", mode.as_str()))
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        ctx.config.theme = None;
        Ok(format!(
            "✅ Unset theme (will use default: {})",
            ThemeMode::default()
        ))
    }

    fn format(&self, config: &Config) -> String {
        match &config.theme {
            Some(theme) => format!("  theme: {theme}"),
            None => format!("  theme: (unset, default: {})", ThemeMode::default()),
        }
    }
}

/// Handler for the `endpoint` setting.
pub struct EndpointHandler;

impl SettingHandler for EndpointHandler {
    fn key(&self) -> &'static str {
        "endpoint"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the chat endpoint, specify its base URL:",
                example: "parley set endpoint http://localhost:5000",
            });
        };

        let endpoint = validate_endpoint(input).map_err(|reason| SettingError::InvalidValue {
            key: "endpoint",
            reason,
        })?;
        let message = success_set("endpoint", &endpoint);
        ctx.config.endpoint = Some(endpoint);
        Ok(message)
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        ctx.config.endpoint = None;
        Ok(format!("✅ Unset endpoint (will use default: {DEFAULT_ENDPOINT})"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.endpoint {
            Some(endpoint) => format!("  endpoint: {endpoint}"),
            None => format!("  endpoint: (unset, default: {DEFAULT_ENDPOINT})"),
        }
    }
}
