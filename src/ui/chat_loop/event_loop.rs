//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop polls terminal input, maps keys to actions, applies queued
//! actions under the app lock, runs the commands they return as Tokio tasks,
//! and redraws at most [`MAX_FPS`] times per second.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::app::actions::chat_outcome_action;
use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
    AppCommand, AppInitConfig,
};
use crate::core::chat_request::{ChatOutcome, ChatRequestService};
use crate::core::config::Config;
use crate::ui::renderer::ui;
use crate::utils::clipboard::copy_to_clipboard;
use crate::utils::input::sanitize_text_input;

use super::keybindings::{map_key, KeyContext, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;

const MAX_FPS: u64 = 60;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.read(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    request_redraw: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        request_redraw: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let keyboard_outcome = route_keyboard_event(app, dispatcher, key, term_size).await;
                if keyboard_outcome.exit_requested {
                    outcome.exit_requested = true;
                    break;
                }
                if keyboard_outcome.request_redraw {
                    outcome.request_redraw = true;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                handle_paste_event(dispatcher, term_size, text);
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(Event::Resize(_, _)) => {
                outcome.request_redraw = true;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

struct KeyboardEventOutcome {
    request_redraw: bool,
    exit_requested: bool,
}

async fn route_keyboard_event(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    key: KeyEvent,
    term_size: Size,
) -> KeyboardEventOutcome {
    let ctx = AppActionContext {
        term_width: term_size.width,
        term_height: term_size.height,
    };
    let context = app.read(KeyContext::from_app).await;

    let handled = match map_key(&key, context) {
        KeyResult::Exit => {
            app.update(|app| app.request_exit()).await;
            return KeyboardEventOutcome {
                request_redraw: true,
                exit_requested: true,
            };
        }
        KeyResult::Submit => {
            let message = app.read(|app| app.ui.get_input_text()).await;
            dispatcher.dispatch_many([AppAction::SubmitMessage { message }], ctx);
            true
        }
        KeyResult::InsertNewline => {
            app.update(|app| app.ui.apply_textarea_edit(|ta| ta.insert_newline()))
                .await;
            true
        }
        KeyResult::TextInput => {
            app.update(|app| {
                app.ui.apply_textarea_edit(|ta| {
                    ta.input(tui_textarea::Input::from(key));
                })
            })
            .await;
            true
        }
        KeyResult::Dispatch(action) => {
            dispatcher.dispatch_many([action], ctx);
            true
        }
        KeyResult::NotHandled => false,
    };

    KeyboardEventOutcome {
        request_redraw: handled,
        exit_requested: false,
    }
}

fn handle_paste_event(dispatcher: &AppActionDispatcher, term_size: Size, text: String) {
    let sanitized_text = sanitize_text_input(&text);
    if sanitized_text.is_empty() {
        return;
    }

    dispatcher.dispatch_many(
        [AppAction::InsertIntoInput {
            text: sanitized_text,
        }],
        AppActionContext {
            term_width: term_size.width,
            term_height: term_size.height,
        },
    );
}

/// Forward finished chat requests to the action queue.
fn process_chat_outcomes(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(ChatOutcome, u64)>,
    term_size: Size,
) -> bool {
    let mut actions = Vec::new();
    while let Ok((outcome, request_id)) = rx.try_recv() {
        actions.push(chat_outcome_action(outcome, request_id));
    }

    if actions.is_empty() {
        return false;
    }

    dispatcher.dispatch_many(
        actions,
        AppActionContext {
            term_width: term_size.width,
            term_height: term_size.height,
        },
    );
    true
}

async fn drain_action_queue(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    chat_service: &ChatRequestService,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::SendChat(params) => {
                chat_service.spawn_request(params);
            }
            AppCommand::StartReveal {
                reveal_id,
                token,
                interval,
            } => {
                spawn_reveal_ticker(dispatcher.clone(), reveal_id, token, interval);
            }
            AppCommand::CopyToClipboard { content } => {
                spawn_clipboard_copy(dispatcher.clone(), content);
            }
        }
    }
    true
}

/// Dispatch a [`AppAction::RevealTick`] every `interval` until `token` is
/// cancelled. The reveal cancels the token itself after its last character.
fn spawn_reveal_ticker(
    dispatcher: AppActionDispatcher,
    reveal_id: u64,
    token: CancellationToken,
    interval: Duration,
) {
    let interval = interval.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    if dispatcher.is_closed() {
                        break;
                    }
                    dispatcher.dispatch_many(
                        [AppAction::RevealTick { reveal_id }],
                        AppActionContext::default(),
                    );
                }
            }
        }
        debug!(reveal_id, "Reveal ticker stopped");
    });
}

fn spawn_clipboard_copy(dispatcher: AppActionDispatcher, content: String) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || copy_to_clipboard(&content))
            .await
            .unwrap_or_else(|err| Err(format!("Clipboard task failed: {err}")));

        let message = match result {
            Ok(()) => "Copied to clipboard".to_string(),
            Err(err) => {
                warn!(error = %err, "Clipboard copy failed");
                format!("Copy failed: {err}")
            }
        };
        dispatcher.dispatch_many([AppAction::SetStatus { message }], AppActionContext::default());
    });
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Plain-text rendition of the conversation, as printed after the session.
fn transcript_text(app: &App, width: u16) -> Vec<String> {
    app.ui
        .build_transcript(width, false)
        .lines
        .iter()
        .map(|line| line.to_string())
        .collect()
}

pub async fn run_chat(init: AppInitConfig, config: Config) -> Result<(), Box<dyn Error>> {
    let app = App::new(init, &config)?;
    let app = AppHandle::new(Arc::new(Mutex::new(app)));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);

    let terminal = setup_terminal()?;

    let (chat_service, mut chat_rx) = ChatRequestService::new();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;
        app.update(|app| {
            app.ui.last_term_size = term_size;
        })
        .await;

        let event_outcome =
            process_ui_events(&app, &mut event_rx, &action_dispatcher, term_size).await;

        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }

        if event_outcome.request_redraw {
            request_redraw = true;
        }

        let received_any = process_chat_outcomes(&action_dispatcher, &mut chat_rx, term_size);

        let actions_applied =
            drain_action_queue(&app, &action_dispatcher, &chat_service, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        let status_expired = app
            .update(|app| app.ui.expire_status(Instant::now()))
            .await;
        if status_expired {
            request_redraw = true;
        }

        let idle = !event_outcome.events_processed && !received_any && !request_redraw;

        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;

    let (should_print, width) = app
        .read(|app| (app.ui.print_transcript_on_exit, app.ui.last_term_size.width))
        .await;

    if should_print {
        let lines = app.read(|app| transcript_text(app, width.max(20))).await;
        for line in lines {
            println!("{line}");
        }
    }

    result
}
