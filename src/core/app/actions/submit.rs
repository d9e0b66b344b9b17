use tracing::debug;

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::chat_request::ChatRequestParams;

pub(super) fn handle_submit_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => submit(app, &message),
        AppAction::ChatReplyReceived {
            request_id,
            content,
        } => {
            complete_request(app, request_id, Ok(content));
            None
        }
        AppAction::ChatRequestFailed { request_id, error } => {
            complete_request(app, request_id, Err(error));
            None
        }
        _ => None,
    }
}

/// Start a submission.
///
/// Checks, in order: non-empty trimmed input, a selected model, nothing in
/// flight. A failed check changes nothing. Otherwise the user message is in
/// the store and `pending` is set before the returned command runs.
pub fn submit(app: &mut App, raw_input: &str) -> Option<AppCommand> {
    let content = raw_input.trim();
    if content.is_empty() {
        debug!("Submit skipped: empty input");
        return None;
    }
    let Some(model) = app.session.selected_model.clone() else {
        debug!("Submit skipped: no model selected");
        return None;
    };
    if app.session.pending {
        debug!(
            request_id = app.session.current_request_id,
            "Submit skipped: a request is already in flight"
        );
        return None;
    }

    app.ui.reveal.cancel();
    let (request, request_id) = {
        let mut conversation = app.conversation();
        conversation.add_user_message(content);
        let request = conversation.build_chat_request(model);
        (request, conversation.begin_request())
    };
    app.ui.clear_input();

    debug!(
        request_id,
        model = %request.model,
        messages = request.messages.len(),
        "Submitting conversation"
    );

    Some(AppCommand::SendChat(ChatRequestParams {
        client: app.session.client.clone(),
        endpoint: app.session.endpoint.clone(),
        request,
        timeout: app.session.request_timeout,
        request_id,
    }))
}

/// Settle a submission: append the reply or the fallback, then clear
/// `pending`. Completions for any other request id are ignored.
fn complete_request(app: &mut App, request_id: u64, outcome: Result<String, String>) {
    if !app.is_current_request(request_id) {
        debug!(request_id, "Ignoring completion for a stale request");
        return;
    }

    let mut conversation = app.conversation();
    match outcome {
        Ok(content) => conversation.add_assistant_message(content),
        Err(error) => {
            debug!(request_id, %error, "Showing fallback reply");
            conversation.add_fallback_message();
        }
    }
    conversation.finish_request();
}
