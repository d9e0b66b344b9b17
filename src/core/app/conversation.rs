use std::collections::VecDeque;

use super::{session::SessionContext, ui_state::UiMode, ui_state::UiState};
use crate::api::ChatRequest;
use crate::core::catalog::{CatalogError, ModelCatalog};
use crate::core::message::Message;

/// Borrowed view over the conversation: the message store, the selected model
/// and the in-flight flag.
pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    ui: &'a mut UiState,
    catalog: &'a ModelCatalog,
}

impl<'a> ConversationController<'a> {
    pub fn new(
        session: &'a mut SessionContext,
        ui: &'a mut UiState,
        catalog: &'a ModelCatalog,
    ) -> Self {
        Self {
            session,
            ui,
            catalog,
        }
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.ui.messages
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.session.selected_model.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.session.pending
    }

    /// Push a message and follow it to the bottom of the transcript.
    pub fn append_message(&mut self, message: Message) {
        self.ui.messages.push_back(message);
        self.ui.scroll_to_bottom();
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        let message = Message::user(&mut self.session.ids, content);
        self.append_message(message);
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        let message = Message::assistant(&mut self.session.ids, content);
        self.append_message(message);
    }

    pub fn add_fallback_message(&mut self) {
        let message = Message::fallback(&mut self.session.ids);
        self.append_message(message);
    }

    /// Drop every message. Safe to call on an empty store; the selected model
    /// is kept. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_messages = !self.ui.messages.is_empty();
        self.ui.messages.clear();
        self.ui.mode = UiMode::Typing;
        self.ui.scroll_offset = 0;
        self.ui.scroll_to_bottom();
        had_messages
    }

    pub fn set_selected_model(&mut self, id: &str) -> Result<(), CatalogError> {
        let model = self.catalog.require(id)?;
        self.session.selected_model = Some(model.id.clone());
        Ok(())
    }

    /// Wire payload for the whole conversation addressed to `model`.
    pub fn build_chat_request(&self, model: String) -> ChatRequest {
        ChatRequest {
            messages: self
                .ui
                .messages
                .iter()
                .map(Message::to_api_message)
                .collect(),
            model,
        }
    }

    pub fn begin_request(&mut self) -> u64 {
        self.session.begin_request()
    }

    pub fn finish_request(&mut self) {
        self.session.finish_request();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.ui.set_status(message);
    }

    pub fn clear_status(&mut self) {
        self.ui.clear_status();
    }
}
