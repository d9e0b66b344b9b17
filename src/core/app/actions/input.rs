use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::app::ui_state::UiMode;
use crate::ui::layout::transcript_height;

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::ClearConversation => {
            if app.conversation().clear() {
                app.ui.set_status("Conversation cleared");
            }
            None
        }
        AppAction::ToggleTheme => {
            let mode = app.ui.theme_mode.toggled();
            app.ui.set_theme_mode(mode);
            app.ui.set_status(format!("Theme: {mode}"));
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.ui.apply_textarea_edit(|ta| {
                ta.insert_str(&text);
            });
            None
        }
        AppAction::SetStatus { message } => {
            app.ui.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
        AppAction::ScrollUp { lines } => {
            let pending = app.session.pending;
            app.ui.scroll_up(lines, ctx.term_width, ctx.term_height, pending);
            None
        }
        AppAction::ScrollDown { lines } => {
            let pending = app.session.pending;
            app.ui.scroll_down(lines, ctx.term_width, ctx.term_height, pending);
            None
        }
        AppAction::PageUp => {
            let pending = app.session.pending;
            let page = page_size(ctx);
            app.ui.scroll_up(page, ctx.term_width, ctx.term_height, pending);
            None
        }
        AppAction::PageDown => {
            let pending = app.session.pending;
            let page = page_size(ctx);
            app.ui.scroll_down(page, ctx.term_width, ctx.term_height, pending);
            None
        }
        AppAction::ScrollToTop => {
            app.ui.scroll_to_top();
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll_to_bottom();
            None
        }
        AppAction::EnterCopyMode => {
            enter_copy_mode(app, ctx);
            None
        }
        AppAction::CopyMoveUp => {
            move_copy_selection(app, ctx, -1);
            None
        }
        AppAction::CopyMoveDown => {
            move_copy_selection(app, ctx, 1);
            None
        }
        AppAction::CopySelected => copy_selected(app),
        AppAction::ExitCopyMode => {
            app.ui.mode = UiMode::Typing;
            app.ui.scroll_to_bottom();
            None
        }
        _ => None,
    }
}

fn page_size(ctx: AppActionContext) -> u16 {
    transcript_height(ctx.term_height).saturating_sub(1).max(1)
}

fn enter_copy_mode(app: &mut App, ctx: AppActionContext) {
    let Some(last) = app.ui.messages.len().checked_sub(1) else {
        app.ui.set_status("Nothing to copy yet");
        return;
    };
    app.ui.mode = UiMode::CopySelect { index: last };
    let pending = app.session.pending;
    app.ui.scroll_message_into_view(last, ctx.term_width, ctx.term_height, pending);
}

fn move_copy_selection(app: &mut App, ctx: AppActionContext, delta: isize) {
    let UiMode::CopySelect { index } = app.ui.mode else {
        return;
    };
    let total = app.ui.messages.len();
    if total == 0 {
        app.ui.mode = UiMode::Typing;
        return;
    }
    let next = (index as isize + delta).rem_euclid(total as isize) as usize;
    app.ui.mode = UiMode::CopySelect { index: next };
    let pending = app.session.pending;
    app.ui.scroll_message_into_view(next, ctx.term_width, ctx.term_height, pending);
}

fn copy_selected(app: &mut App) -> Option<AppCommand> {
    let index = app.ui.copy_selection()?;
    let content = app.ui.messages[index].content.clone();
    app.ui.mode = UiMode::Typing;
    app.ui.scroll_to_bottom();
    Some(AppCommand::CopyToClipboard { content })
}
