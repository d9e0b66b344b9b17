//! Lookup of setting handlers by key.

use super::handlers::{
    request_timeout_handler, reveal_interval_handler, DefaultModelHandler, EndpointHandler,
    MarkdownHandler, ThemeHandler,
};
use super::SettingHandler;

/// Every configurable key, in the order `parley set` lists them.
pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
    keys: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let handlers: Vec<Box<dyn SettingHandler>> = vec![
            Box::new(DefaultModelHandler),
            Box::new(ThemeHandler),
            Box::new(EndpointHandler),
            Box::new(MarkdownHandler),
            Box::new(request_timeout_handler()),
            Box::new(reveal_interval_handler()),
        ];
        let keys = handlers.iter().map(|handler| handler.key()).collect();
        Self { handlers, keys }
    }

    /// Keys are matched exactly; `default-model`, not `default_model`.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.keys
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
