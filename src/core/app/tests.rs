use super::actions::{apply_action, chat_outcome_action, submit, suggest_prompt_at};
use super::*;
use crate::api::ChatMessage;
use crate::core::chat_request::ChatRequestService;
use crate::core::message::{TranscriptRole, FALLBACK_REPLY};
use crate::core::prompts::RevealProgress;
use crate::ui::theme::ThemeMode;
use crate::utils::test_utils::{create_test_app, create_test_message, serve_once, CannedResponse};

const CTX: AppActionContext = AppActionContext {
    term_width: 80,
    term_height: 24,
};

fn app_with_model(model: &str) -> App {
    let mut app = create_test_app();
    app.conversation()
        .set_selected_model(model)
        .expect("model in test catalog");
    app
}

fn transcript(app: &App) -> Vec<(TranscriptRole, String)> {
    app.ui
        .messages
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect()
}

fn expect_send(command: Option<AppCommand>) -> crate::core::chat_request::ChatRequestParams {
    match command {
        Some(AppCommand::SendChat(params)) => params,
        _ => panic!("expected a SendChat command"),
    }
}

/// Run the submission's request through the service and settle it.
async fn settle(app: &mut App, params: crate::core::chat_request::ChatRequestParams) {
    let (service, mut rx) = ChatRequestService::new();
    service.spawn_request(params);
    let (outcome, request_id) = rx.recv().await.expect("one outcome per request");
    apply_action(app, chat_outcome_action(outcome, request_id), CTX);
}

#[test]
fn submit_appends_trimmed_user_message_before_returning() {
    let mut app = app_with_model("m1");
    app.ui.set_input_text("  hello  ".into());

    let params = expect_send(submit(&mut app, "  hello  "));

    assert_eq!(transcript(&app), vec![(TranscriptRole::User, "hello".into())]);
    assert!(app.session.pending);
    assert_eq!(app.ui.get_input_text(), "");
    assert_eq!(params.request.model, "m1");
    assert_eq!(
        params.request.messages,
        vec![ChatMessage {
            role: "user".into(),
            content: "hello".into(),
        }]
    );
    assert_eq!(params.request_id, app.session.current_request_id);
    assert_eq!(params.endpoint, app.session.endpoint);
}

#[test]
fn blank_input_is_a_silent_no_op() {
    let mut app = app_with_model("m1");
    app.ui.set_input_text("   ".into());
    for raw in ["", "   ", "\n\t "] {
        assert!(submit(&mut app, raw).is_none());
    }
    assert!(app.ui.messages.is_empty());
    assert!(!app.session.pending);
    assert_eq!(app.session.current_request_id, 0);
    assert_eq!(app.ui.get_input_text(), "   ");
    assert!(app.ui.status.is_none());
}

#[test]
fn submit_without_model_changes_nothing() {
    let mut app = create_test_app();
    app.ui.set_input_text("hello".into());
    assert!(submit(&mut app, "hello").is_none());
    assert!(app.ui.messages.is_empty());
    assert!(!app.session.pending);
    assert_eq!(app.ui.get_input_text(), "hello");
}

#[test]
fn submit_while_pending_changes_nothing() {
    let mut app = app_with_model("m1");
    let first = expect_send(submit(&mut app, "first"));
    app.ui.set_input_text("second".into());

    assert!(submit(&mut app, "second").is_none());
    assert_eq!(app.ui.messages.len(), 1);
    assert!(app.session.pending);
    assert_eq!(app.session.current_request_id, first.request_id);
    assert_eq!(app.ui.get_input_text(), "second");
}

#[test]
fn busy_flag_is_only_raised_with_a_request_to_send() {
    let mut app = create_test_app();
    assert!(submit(&mut app, "hello").is_none());
    assert!(!app.session.pending);
    assert_eq!(app.session.current_request_id, 0);

    app.conversation()
        .set_selected_model("m2")
        .expect("model in test catalog");
    let params = expect_send(submit(&mut app, "hello"));
    assert!(app.session.pending);
    assert_eq!(params.request_id, 1);
    assert_eq!(params.request.model, "m2");
    assert_eq!(params.request.messages.len(), 1);
}

#[test]
fn reply_appends_assistant_message_then_clears_pending() {
    let mut app = app_with_model("m2");
    let params = expect_send(submit(&mut app, "hi"));
    apply_action(
        &mut app,
        AppAction::ChatReplyReceived {
            request_id: params.request_id,
            content: "**hello** back".into(),
        },
        CTX,
    );
    assert_eq!(
        transcript(&app),
        vec![
            (TranscriptRole::User, "hi".into()),
            (TranscriptRole::Assistant, "**hello** back".into()),
        ]
    );
    assert!(!app.session.pending);
    assert!(app.ui.auto_scroll);
}

#[test]
fn failure_appends_fallback_then_clears_pending() {
    let mut app = app_with_model("m1");
    let params = expect_send(submit(&mut app, "hi"));
    apply_action(
        &mut app,
        AppAction::ChatRequestFailed {
            request_id: params.request_id,
            error: "connection refused".into(),
        },
        CTX,
    );
    assert_eq!(app.ui.messages.len(), 2);
    let last = app.ui.messages.back().expect("fallback");
    assert!(last.is_assistant());
    assert_eq!(last.content, FALLBACK_REPLY);
    assert!(!app.session.pending);

    // The pipeline is usable again.
    assert!(submit(&mut app, "again").is_some());
}

#[test]
fn stale_or_duplicate_completions_are_ignored() {
    let mut app = app_with_model("m1");
    let params = expect_send(submit(&mut app, "hi"));

    apply_action(
        &mut app,
        AppAction::ChatReplyReceived {
            request_id: params.request_id + 7,
            content: "not mine".into(),
        },
        CTX,
    );
    assert_eq!(app.ui.messages.len(), 1);
    assert!(app.session.pending);

    let complete = |app: &mut App| {
        apply_action(
            app,
            AppAction::ChatReplyReceived {
                request_id: params.request_id,
                content: "reply".into(),
            },
            CTX,
        )
    };
    complete(&mut app);
    complete(&mut app);
    assert_eq!(app.ui.messages.len(), 2);
    assert!(!app.session.pending);
}

#[test]
fn clear_is_idempotent_and_keeps_model() {
    let mut app = app_with_model("m2");
    assert!(!app.conversation().clear());
    assert!(app.ui.messages.is_empty());

    app.conversation().add_user_message("a");
    app.conversation().add_assistant_message("b");
    assert!(app.conversation().clear());
    assert!(!app.conversation().clear());
    assert!(app.ui.messages.is_empty());
    assert_eq!(app.session.selected_model.as_deref(), Some("m2"));
}

#[test]
fn clear_action_on_empty_store_is_a_no_op() {
    let mut app = app_with_model("m1");
    apply_action(&mut app, AppAction::ClearConversation, CTX);
    assert!(app.ui.messages.is_empty());
    assert!(app.ui.status.is_none());

    app.conversation().add_user_message("x");
    apply_action(&mut app, AppAction::ClearConversation, CTX);
    assert!(app.ui.messages.is_empty());
    assert_eq!(app.ui.status.as_deref(), Some("Conversation cleared"));
}

#[test]
fn payload_keeps_only_role_and_content_in_order() {
    let mut app = app_with_model("m1");
    app.conversation().add_user_message("a");
    app.conversation().add_assistant_message("b");
    let params = expect_send(submit(&mut app, "c"));

    let body = serde_json::to_value(&params.request).expect("serialize");
    assert_eq!(
        body,
        serde_json::json!({
            "messages": [
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"},
                {"role": "user", "content": "c"}
            ],
            "model": "m1"
        })
    );
}

#[test]
fn selecting_unknown_model_is_rejected() {
    let mut app = app_with_model("m1");
    let err = app
        .conversation()
        .set_selected_model("gpt-nope")
        .expect_err("not in catalog");
    assert!(err.to_string().contains("gpt-nope"));
    assert_eq!(app.session.selected_model.as_deref(), Some("m1"));
}

#[tokio::test]
async fn hello_round_trip_against_endpoint() {
    let (base_url, captured) = serve_once(CannedResponse::json(200, r#"{"content":"hi there"}"#)).await;
    let mut app = app_with_model("m1");
    app.session.endpoint = base_url;

    let params = expect_send(apply_action(
        &mut app,
        AppAction::SubmitMessage {
            message: "hello".into(),
        },
        CTX,
    ));
    // The user turn is visible while the request is still in flight.
    assert_eq!(transcript(&app), vec![(TranscriptRole::User, "hello".into())]);
    assert!(app.session.pending);

    settle(&mut app, params).await;

    assert_eq!(
        transcript(&app),
        vec![
            (TranscriptRole::User, "hello".into()),
            (TranscriptRole::Assistant, "hi there".into()),
        ]
    );
    assert!(!app.session.pending);

    let request = captured.await.expect("request captured");
    assert!(request.head.starts_with("POST /api/chat HTTP/1.1"));
    let body: serde_json::Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(
        body,
        serde_json::json!({
            "messages": [{"role": "user", "content": "hello"}],
            "model": "m1"
        })
    );
}

#[tokio::test]
async fn server_error_ends_in_fallback_message() {
    let (base_url, _captured) = serve_once(CannedResponse::json(
        500,
        r#"{"error":"Internal server error"}"#,
    ))
    .await;
    let mut app = app_with_model("m1");
    app.session.endpoint = base_url;

    let params = expect_send(submit(&mut app, "hello"));
    settle(&mut app, params).await;

    assert_eq!(app.ui.messages.len(), 2);
    assert_eq!(
        app.ui.messages.back().map(|m| m.content.as_str()),
        Some(FALLBACK_REPLY)
    );
    assert!(!app.session.pending);
}

#[tokio::test]
async fn reply_without_content_ends_in_fallback_message() {
    let (base_url, _captured) = serve_once(CannedResponse::json(200, r#"{"reply":"x"}"#)).await;
    let mut app = app_with_model("m2");
    app.session.endpoint = base_url;

    let params = expect_send(submit(&mut app, "hello"));
    settle(&mut app, params).await;

    assert_eq!(
        app.ui.messages.back().map(|m| m.content.as_str()),
        Some(FALLBACK_REPLY)
    );
    assert!(!app.session.pending);
}

#[test]
fn second_suggestion_replaces_first_without_interleaving() {
    let mut app = create_test_app();
    let first_prompt = app.prompts.get(0).to_string();
    let second_prompt = app.prompts.get(1).to_string();

    let (first_token, first_id) = match suggest_prompt_at(&mut app, 0) {
        Some(AppCommand::StartReveal {
            token, reveal_id, ..
        }) => (token, reveal_id),
        _ => panic!("expected StartReveal"),
    };
    for _ in 0..3 {
        apply_action(
            &mut app,
            AppAction::RevealTick {
                reveal_id: first_id,
            },
            CTX,
        );
    }
    assert_eq!(app.ui.get_input_text(), &first_prompt[..3]);

    let second_id = match suggest_prompt_at(&mut app, 1) {
        Some(AppCommand::StartReveal { reveal_id, .. }) => reveal_id,
        _ => panic!("expected StartReveal"),
    };
    assert!(first_token.is_cancelled());
    assert_eq!(app.ui.get_input_text(), "");

    // Ticks from both reveals arrive interleaved; only the second one counts.
    for _ in 0..second_prompt.chars().count() {
        apply_action(
            &mut app,
            AppAction::RevealTick {
                reveal_id: first_id,
            },
            CTX,
        );
        apply_action(
            &mut app,
            AppAction::RevealTick {
                reveal_id: second_id,
            },
            CTX,
        );
    }
    assert_eq!(app.ui.get_input_text(), second_prompt);
    assert!(!app.ui.reveal.is_active());
    assert_eq!(app.ui.reveal.tick(second_id), RevealProgress::Stale);
}

#[test]
fn submitting_stops_a_running_reveal() {
    let mut app = app_with_model("m1");
    let (token, reveal_id) = match suggest_prompt_at(&mut app, 2) {
        Some(AppCommand::StartReveal {
            token, reveal_id, ..
        }) => (token, reveal_id),
        _ => panic!("expected StartReveal"),
    };
    apply_action(&mut app, AppAction::RevealTick { reveal_id }, CTX);
    let partial = app.ui.get_input_text();

    assert!(submit(&mut app, &partial).is_some());
    assert!(token.is_cancelled());
    apply_action(&mut app, AppAction::RevealTick { reveal_id }, CTX);
    assert_eq!(app.ui.get_input_text(), "");
}

#[test]
fn copy_mode_copies_raw_content() {
    let mut app = create_test_app();
    app.ui
        .messages
        .push_back(create_test_message(TranscriptRole::User, "question"));
    app.ui.messages.push_back(create_test_message(
        TranscriptRole::Assistant,
        "**bold** <i>answer</i>",
    ));

    apply_action(&mut app, AppAction::EnterCopyMode, CTX);
    assert_eq!(app.ui.mode, UiMode::CopySelect { index: 1 });

    match apply_action(&mut app, AppAction::CopySelected, CTX) {
        Some(AppCommand::CopyToClipboard { content }) => {
            assert_eq!(content, "**bold** <i>answer</i>")
        }
        _ => panic!("expected CopyToClipboard"),
    }
    assert_eq!(app.ui.mode, UiMode::Typing);

    apply_action(&mut app, AppAction::EnterCopyMode, CTX);
    apply_action(&mut app, AppAction::CopyMoveUp, CTX);
    assert_eq!(app.ui.mode, UiMode::CopySelect { index: 0 });
    apply_action(&mut app, AppAction::CopyMoveUp, CTX);
    assert_eq!(app.ui.mode, UiMode::CopySelect { index: 1 });
    apply_action(&mut app, AppAction::CopyMoveDown, CTX);
    assert_eq!(app.ui.mode, UiMode::CopySelect { index: 0 });

    match apply_action(&mut app, AppAction::CopySelected, CTX) {
        Some(AppCommand::CopyToClipboard { content }) => assert_eq!(content, "question"),
        _ => panic!("expected CopyToClipboard"),
    }
}

#[test]
fn copy_mode_needs_messages() {
    let mut app = create_test_app();
    apply_action(&mut app, AppAction::EnterCopyMode, CTX);
    assert_eq!(app.ui.mode, UiMode::Typing);
    assert!(app.ui.status.is_some());
    assert!(apply_action(&mut app, AppAction::CopySelected, CTX).is_none());
}

#[test]
fn toggle_theme_flips_mode() {
    let mut app = create_test_app();
    assert_eq!(app.ui.theme_mode, ThemeMode::Light);
    apply_action(&mut app, AppAction::ToggleTheme, CTX);
    assert_eq!(app.ui.theme_mode, ThemeMode::Dark);
    apply_action(&mut app, AppAction::ToggleTheme, CTX);
    assert_eq!(app.ui.theme_mode, ThemeMode::Light);
}

#[test]
fn model_picker_selects_and_escapes() {
    let mut app = app_with_model("m1");
    apply_action(&mut app, AppAction::OpenModelPicker, CTX);
    assert_eq!(
        app.picker.as_ref().and_then(|p| p.selected_id()),
        Some("m1")
    );

    apply_action(&mut app, AppAction::PickerMoveDown, CTX);
    apply_action(&mut app, AppAction::PickerEscape, CTX);
    assert!(app.picker.is_none());
    assert_eq!(app.session.selected_model.as_deref(), Some("m1"));

    apply_action(&mut app, AppAction::OpenModelPicker, CTX);
    apply_action(&mut app, AppAction::PickerMoveToEnd, CTX);
    apply_action(&mut app, AppAction::PickerApplySelection, CTX);
    assert!(app.picker.is_none());
    assert_eq!(app.session.selected_model.as_deref(), Some("m2"));
    assert_eq!(app.ui.status.as_deref(), Some("Model: Model Two"));
}

#[test]
fn picker_actions_without_picker_are_ignored() {
    let mut app = app_with_model("m1");
    assert!(apply_action(&mut app, AppAction::PickerApplySelection, CTX).is_none());
    assert_eq!(app.session.selected_model.as_deref(), Some("m1"));
}

#[test]
fn pasted_text_lands_in_input() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::InsertIntoInput {
            text: "pasted\ntext".into(),
        },
        CTX,
    );
    assert_eq!(app.ui.get_input_text(), "pasted\ntext");
}
