//! TUI-less "say" command

use std::error::Error;

use ratatui::crossterm::terminal;
use tracing::debug;

use crate::core::app::actions::{chat_outcome_action, submit};
use crate::core::app::{actions::apply_action, App, AppActionContext, AppCommand, AppInitConfig};
use crate::core::chat_request::ChatRequestService;
use crate::core::config::Config;
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;
use crate::utils::input::sanitize_text_input;

const FALLBACK_WIDTH: usize = 80;

pub async fn run_say(
    prompt: Vec<String>,
    init: AppInitConfig,
    config: Config,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let mut app = App::new(init, &config)?;
    if let Some(warning) = app.ui.status.take() {
        eprintln!("⚠️  {warning}");
    }

    let reply = request_reply(&mut app, &prompt).await?;

    let width = terminal::size()
        .ok()
        .map(|(w, _)| w as usize)
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_WIDTH);
    for line in reply_lines(&reply, app.ui.markdown_enabled, width) {
        println!("{line}");
    }

    Ok(())
}

/// Terminal-safe lines for a reply, rendered as markdown or kept as plain text.
fn reply_lines(reply: &str, markdown: bool, width: usize) -> Vec<String> {
    if markdown {
        render_markdown(reply, &Theme::monochrome(), width)
            .iter()
            .map(|line| line.to_string())
            .collect()
    } else {
        sanitize_text_input(reply)
            .split('\n')
            .map(str::to_owned)
            .collect()
    }
}

/// Send `prompt` through the normal submission path and wait for it to settle.
/// Returns the assistant reply, or the fallback text when the request failed.
async fn request_reply(app: &mut App, prompt: &str) -> Result<String, Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("Nothing to send. Usage: parley say <message>".into());
    }
    if app.session.selected_model.is_none() {
        return Err(
            "No model selected. Pass --model <id> or run 'parley set default-model <id>'.".into(),
        );
    }

    let Some(AppCommand::SendChat(params)) = submit(app, prompt) else {
        return Err("Message was not sent".into());
    };

    let (service, mut rx) = ChatRequestService::new();
    service.spawn_request(params);
    let (outcome, request_id) = rx.recv().await.ok_or("Request task ended without a result")?;
    if let Err(err) = &outcome {
        debug!(request_id, error = %err, "say: request failed");
    }

    let ctx = AppActionContext {
        term_width: FALLBACK_WIDTH as u16,
        term_height: 24,
    };
    apply_action(app, chat_outcome_action(outcome, request_id), ctx);

    app.ui
        .messages
        .iter()
        .rev()
        .find(|message| message.is_assistant())
        .map(|message| message.content.clone())
        .ok_or_else(|| "No reply was recorded".into())
}
