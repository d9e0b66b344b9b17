use tracing::debug;

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::prompts::{random_index, RevealProgress};

pub(super) fn handle_prompt_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::SuggestPrompt => suggest_prompt(app),
        AppAction::RevealTick { reveal_id } => {
            reveal_tick(app, reveal_id);
            None
        }
        _ => None,
    }
}

fn suggest_prompt(app: &mut App) -> Option<AppCommand> {
    let index = random_index(app.prompts.len());
    suggest_prompt_at(app, index)
}

/// Begin revealing the example prompt at `index` into an emptied input. Any
/// reveal already running is cancelled first.
pub fn suggest_prompt_at(app: &mut App, index: usize) -> Option<AppCommand> {
    let prompt = app.prompts.get(index).to_string();
    let (token, reveal_id) = app.ui.reveal.start(&prompt);
    app.ui.clear_input();
    debug!(reveal_id, prompt = %prompt, "Revealing example prompt");

    Some(AppCommand::StartReveal {
        reveal_id,
        token,
        interval: app.session.reveal_interval,
    })
}

fn reveal_tick(app: &mut App, reveal_id: u64) {
    if let RevealProgress::Char { ch, .. } = app.ui.reveal.tick(reveal_id) {
        app.ui.push_input_char(ch);
    }
}
