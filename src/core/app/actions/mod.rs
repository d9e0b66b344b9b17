mod input;
mod picker;
mod prompt;
mod submit;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::App;
use crate::core::chat_request::{ChatOutcome, ChatRequestParams};

pub use prompt::suggest_prompt_at;
pub use submit::submit;

#[derive(Debug)]
pub enum AppAction {
    SubmitMessage {
        message: String,
    },
    ChatReplyReceived {
        request_id: u64,
        content: String,
    },
    ChatRequestFailed {
        request_id: u64,
        error: String,
    },
    SuggestPrompt,
    RevealTick {
        reveal_id: u64,
    },
    ClearConversation,
    ToggleTheme,
    InsertIntoInput {
        text: String,
    },
    SetStatus {
        message: String,
    },
    ClearStatus,
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    EnterCopyMode,
    CopyMoveUp,
    CopyMoveDown,
    CopySelected,
    ExitCopyMode,
    OpenModelPicker,
    PickerMoveUp,
    PickerMoveDown,
    PickerMoveToStart,
    PickerMoveToEnd,
    PickerApplySelection,
    PickerEscape,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }

    /// Whether the receiving end (the event loop) is still alive.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Side effects requested by an action; executed by the event loop.
pub enum AppCommand {
    SendChat(ChatRequestParams),
    StartReveal {
        reveal_id: u64,
        token: CancellationToken,
        interval: Duration,
    },
    CopyToClipboard {
        content: String,
    },
}

/// Turn a finished request into the action that settles it.
pub fn chat_outcome_action(outcome: ChatOutcome, request_id: u64) -> AppAction {
    match outcome {
        Ok(content) => AppAction::ChatReplyReceived {
            request_id,
            content,
        },
        Err(err) => AppAction::ChatRequestFailed {
            request_id,
            error: err.to_string(),
        },
    }
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { .. }
        | AppAction::ChatReplyReceived { .. }
        | AppAction::ChatRequestFailed { .. } => submit::handle_submit_action(app, action, ctx),

        AppAction::SuggestPrompt | AppAction::RevealTick { .. } => {
            prompt::handle_prompt_action(app, action, ctx)
        }

        AppAction::ClearConversation
        | AppAction::ToggleTheme
        | AppAction::InsertIntoInput { .. }
        | AppAction::SetStatus { .. }
        | AppAction::ClearStatus
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::PageUp
        | AppAction::PageDown
        | AppAction::ScrollToTop
        | AppAction::ScrollToBottom
        | AppAction::EnterCopyMode
        | AppAction::CopyMoveUp
        | AppAction::CopyMoveDown
        | AppAction::CopySelected
        | AppAction::ExitCopyMode => input::handle_input_action(app, action, ctx),

        AppAction::OpenModelPicker
        | AppAction::PickerMoveUp
        | AppAction::PickerMoveDown
        | AppAction::PickerMoveToStart
        | AppAction::PickerMoveToEnd
        | AppAction::PickerApplySelection
        | AppAction::PickerEscape => picker::handle_picker_action(app, action, ctx),
    }
}
