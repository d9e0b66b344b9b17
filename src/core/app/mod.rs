use crate::core::catalog::{ModelCatalog, ModelDescriptor};
use crate::core::config::Config;
use crate::core::prompts::PromptCatalog;
use crate::ui::picker::PickerState;
use crate::ui::theme::ThemeMode;

pub mod actions;
pub mod conversation;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_actions, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope, AppCommand,
};
pub use conversation::ConversationController;
pub use session::{SessionBootstrap, SessionContext};
pub use ui_state::{UiMode, UiState};

/// Startup options gathered from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppInitConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub theme: Option<ThemeMode>,
    pub disable_markdown: bool,
    pub print_transcript: bool,
}

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub picker: Option<PickerState>,
    pub catalog: ModelCatalog,
    pub prompts: PromptCatalog,
}

impl App {
    /// Build the session state: empty conversation, nothing pending, model
    /// and theme from the command line first and the config second.
    pub fn new(init: AppInitConfig, config: &Config) -> Result<App, Box<dyn std::error::Error>> {
        let catalog = ModelCatalog::builtin();
        let SessionBootstrap {
            session,
            startup_warnings,
        } = session::prepare_session(
            init.model.as_deref(),
            init.endpoint.as_deref(),
            config,
            &catalog,
        )?;

        let theme_mode = init.theme.unwrap_or_else(|| config.theme_mode());
        let markdown_enabled = !init.disable_markdown && config.markdown_enabled();
        let mut ui = UiState::new(theme_mode, markdown_enabled);
        ui.print_transcript_on_exit = init.print_transcript;
        if let Some(warning) = startup_warnings.into_iter().next() {
            ui.set_status(warning);
        }

        Ok(App {
            session,
            ui,
            picker: None,
            catalog,
            prompts: PromptCatalog::builtin(),
        })
    }

    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(&mut self.session, &mut self.ui, &self.catalog)
    }

    pub fn selected_model(&self) -> Option<&ModelDescriptor> {
        self.session
            .selected_model
            .as_deref()
            .and_then(|id| self.catalog.find(id))
    }

    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.session.is_current_request(request_id)
    }

    pub fn request_exit(&mut self) {
        self.ui.exit_requested = true;
    }

    pub fn open_model_picker(&mut self) {
        self.picker = Some(PickerState::for_models(
            &self.catalog,
            self.session.selected_model.as_deref(),
        ));
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    #[cfg(test)]
    pub fn new_test_app(catalog: ModelCatalog) -> Self {
        let config = Config::default();
        App {
            session: SessionContext::new("http://127.0.0.1:9".into(), None, &config),
            ui: UiState::new(ThemeMode::Light, true),
            picker: None,
            catalog,
            prompts: PromptCatalog::builtin(),
        }
    }
}

#[cfg(test)]
mod tests;
