//! Settings management for `parley set` and `parley unset`.
//!
//! Each config key has a [`SettingHandler`]. Handlers edit an in-memory
//! [`Config`]; the caller persists it once the edit succeeds.
//!
//! - Simple settings (`default-model`, `theme`, `endpoint`)
//! - Boolean settings (`markdown`)
//! - Numeric settings (`request-timeout`, `reveal-interval`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::catalog::ModelCatalog;
use crate::core::config::Config;

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    pub config: &'a mut Config,
    pub catalog: &'a ModelCatalog,
}

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the words following the key. Returns the message
    /// to print on success.
    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// Clear the value so the built-in default applies again.
    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// Format the current value for display in `parley set` output.
    fn format(&self, config: &Config) -> String;
}
