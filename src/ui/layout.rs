use std::collections::VecDeque;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::markdown::render_markdown;
use super::theme::Theme;
use crate::core::message::{Message, TranscriptRole};
use crate::utils::input::sanitize_text_input;

/// Rows taken by the model header (two text rows plus borders).
pub const HEADER_HEIGHT: u16 = 4;
/// Rows taken by the bordered input box.
pub const INPUT_HEIGHT: u16 = 5;
/// Rows taken by the status line under the input.
pub const STATUS_HEIGHT: u16 = 1;

/// Indent applied to message bodies under their role label.
const BODY_INDENT: &str = "  ";

/// Rows left for the transcript once the fixed chrome is laid out.
pub fn transcript_height(term_height: u16) -> u16 {
    term_height.saturating_sub(HEADER_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT)
}

/// Mapping for a single message's contribution to the flattened line stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLineSpan {
    pub start: usize,
    pub len: usize,
}

/// Display options for [`TranscriptLayout::build`].
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub width: u16,
    pub markdown_enabled: bool,
    pub pending: bool,
    pub highlight: Option<usize>,
}

/// Prewrapped transcript lines plus the line range of every message.
#[derive(Debug, Default)]
pub struct TranscriptLayout {
    pub lines: Vec<Line<'static>>,
    pub message_spans: Vec<MessageLineSpan>,
}

impl TranscriptLayout {
    pub fn build(messages: &VecDeque<Message>, theme: &Theme, config: LayoutConfig) -> Self {
        let width = config.width.max(1) as usize;
        let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
        let mut lines = Vec::new();
        let mut message_spans = Vec::with_capacity(messages.len());

        for (index, message) in messages.iter().enumerate() {
            let start = lines.len();
            lines.push(role_header(message, theme));

            let body = if message.is_assistant() && config.markdown_enabled {
                render_markdown(&message.content, theme, body_width)
            } else {
                render_plain(&message.content, text_style(message.role, theme), body_width)
            };
            lines.extend(body.into_iter().map(indent_line));
            lines.push(Line::default());

            if config.highlight == Some(index) {
                for line in &mut lines[start..] {
                    line.style = line.style.patch(theme.selection_highlight_style);
                }
            }

            message_spans.push(MessageLineSpan {
                start,
                len: lines.len() - start,
            });
        }

        if config.pending {
            lines.push(Line::from(vec![
                Span::styled("Assistant", theme.assistant_prefix_style),
                Span::styled(" · thinking…", theme.pending_indicator_style),
            ]));
        }

        Self {
            lines,
            message_spans,
        }
    }

    /// Largest scroll offset that still fills a viewport of `height` rows.
    pub fn max_scroll(&self, height: u16) -> u16 {
        let total = self.lines.len().min(u16::MAX as usize) as u16;
        total.saturating_sub(height)
    }
}

fn role_header(message: &Message, theme: &Theme) -> Line<'static> {
    let (label, style) = match message.role {
        TranscriptRole::User => ("You", theme.user_prefix_style),
        TranscriptRole::Assistant => ("Assistant", theme.assistant_prefix_style),
    };
    Line::from(vec![
        Span::styled(label, style),
        Span::styled(
            format!(" · {}", message.timestamp.format("%H:%M")),
            theme.timestamp_style,
        ),
    ])
}

fn text_style(role: TranscriptRole, theme: &Theme) -> Style {
    match role {
        TranscriptRole::User => theme.user_text_style,
        TranscriptRole::Assistant => theme.assistant_text_style,
    }
}

fn indent_line(line: Line<'static>) -> Line<'static> {
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(Span::raw(BODY_INDENT));
    spans.extend(line.spans);
    Line::from(spans).style(line.style)
}

/// Wrap text without interpreting it. Explicit newlines are kept and control
/// characters are stripped.
pub fn render_plain(content: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    sanitize_text_input(content)
        .split('\n')
        .flat_map(|raw| wrap_spans(vec![Span::styled(raw.to_string(), style)], width))
        .map(Line::from)
        .collect()
}

struct Token {
    text: String,
    style: Style,
    is_space: bool,
}

fn tokenize(spans: Vec<Span<'static>>) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        let mut current = String::new();
        let mut current_is_space = false;
        for ch in span.content.chars() {
            let is_space = ch.is_whitespace();
            if !current.is_empty() && is_space != current_is_space {
                tokens.push(Token {
                    text: std::mem::take(&mut current),
                    style: span.style,
                    is_space: current_is_space,
                });
            }
            current_is_space = is_space;
            current.push(ch);
        }
        if !current.is_empty() {
            tokens.push(Token {
                text: current,
                style: span.style,
                is_space: current_is_space,
            });
        }
    }
    tokens
}

/// Greedy word wrap of styled spans to `width` display columns.
///
/// Whitespace at a wrap point is dropped. Words wider than the line are split
/// at character boundaries. Always returns at least one (possibly empty) row.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    let mut continuation = false;

    for token in tokenize(spans) {
        let token_width = token.text.width();

        if token.is_space {
            if current_width == 0 && continuation {
                continue;
            }
            if current_width + token_width <= width {
                current.push(Span::styled(token.text, token.style));
                current_width += token_width;
            } else {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
                continuation = true;
            }
            continue;
        }

        if current_width + token_width <= width {
            current.push(Span::styled(token.text, token.style));
            current_width += token_width;
            continue;
        }

        if current_width > 0 {
            while current
                .last()
                .is_some_and(|span| span.content.chars().all(char::is_whitespace))
            {
                current.pop();
            }
            rows.push(std::mem::take(&mut current));
            current_width = 0;
            continuation = true;
        }

        if token_width <= width {
            current.push(Span::styled(token.text, token.style));
            current_width = token_width;
            continue;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0usize;
        for ch in token.text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if chunk_width + ch_width > width && !chunk.is_empty() {
                rows.push(vec![Span::styled(std::mem::take(&mut chunk), token.style)]);
                chunk_width = 0;
            }
            chunk.push(ch);
            chunk_width += ch_width;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, token.style));
            current_width = chunk_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}
