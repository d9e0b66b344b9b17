use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders};
use tui_textarea::{CursorMove, TextArea};

use crate::core::message::Message;
use crate::core::prompts::PromptReveal;
use crate::ui::layout::{transcript_height, LayoutConfig, TranscriptLayout};
use crate::ui::theme::{Theme, ThemeMode};

/// How long a status line stays up before it is cleared.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

const INPUT_TITLE: &str = " Message · Enter send · Shift+Enter newline · Ctrl+P suggest ";
const INPUT_PLACEHOLDER: &str = "Type your message here...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Typing,
    /// Choosing a message to copy; `index` points into `messages`.
    CopySelect { index: usize },
}

pub struct UiState {
    pub messages: VecDeque<Message>,
    pub textarea: TextArea<'static>,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
    pub exit_requested: bool,
    pub reveal: PromptReveal,
    pub mode: UiMode,
    pub last_term_size: Size,
    pub print_transcript_on_exit: bool,
}

impl UiState {
    pub fn new(theme_mode: ThemeMode, markdown_enabled: bool) -> Self {
        let mut ui = Self {
            messages: VecDeque::new(),
            textarea: TextArea::default(),
            theme_mode,
            theme: Theme::for_mode(theme_mode),
            markdown_enabled,
            scroll_offset: 0,
            auto_scroll: true,
            status: None,
            status_set_at: None,
            exit_requested: false,
            reveal: PromptReveal::new(),
            mode: UiMode::Typing,
            last_term_size: Size::default(),
            print_transcript_on_exit: false,
        };
        ui.configure_textarea();
        ui
    }

    pub(crate) fn configure_textarea(&mut self) {
        let textarea_style = self
            .theme
            .input_text_style
            .patch(Style::default().bg(self.theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea.set_placeholder_style(self.theme.timestamp_style);
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.input_border_style)
                .title(Span::styled(INPUT_TITLE, self.theme.input_title_style)),
        );
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.theme = Theme::for_mode(mode);
        self.configure_textarea();
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: String) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(|s| s.to_string()).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.set_input_text(String::new());
    }

    /// Append one character at the end of the input, as the prompt reveal does.
    pub fn push_input_char(&mut self, ch: char) {
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        if ch == '\n' {
            self.textarea.insert_newline();
        } else {
            self.textarea.insert_char(ch);
        }
    }

    /// Apply a user edit. Any running prompt reveal stops so the edit wins.
    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        self.reveal.cancel();
        f(&mut self.textarea);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    /// Drop the status line once it has been visible for [`STATUS_TIMEOUT`].
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_set_at {
            Some(set_at) if now.duration_since(set_at) >= STATUS_TIMEOUT => {
                self.clear_status();
                true
            }
            _ => false,
        }
    }

    pub fn copy_selection(&self) -> Option<usize> {
        match self.mode {
            UiMode::CopySelect { index } if index < self.messages.len() => Some(index),
            _ => None,
        }
    }

    pub fn build_transcript(&self, width: u16, pending: bool) -> TranscriptLayout {
        TranscriptLayout::build(
            &self.messages,
            &self.theme,
            LayoutConfig {
                width,
                markdown_enabled: self.markdown_enabled,
                pending,
                highlight: self.copy_selection(),
            },
        )
    }

    fn max_scroll(&self, term_width: u16, term_height: u16, pending: bool) -> u16 {
        self.build_transcript(term_width, pending)
            .max_scroll(transcript_height(term_height))
    }

    /// Offset the renderer should use; follows the newest line while
    /// auto-scroll is on.
    pub fn effective_scroll(&self, layout: &TranscriptLayout, viewport_height: u16) -> u16 {
        let max = layout.max_scroll(viewport_height);
        if self.auto_scroll {
            max
        } else {
            self.scroll_offset.min(max)
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, lines: u16, term_width: u16, term_height: u16, pending: bool) {
        let max = self.max_scroll(term_width, term_height, pending);
        let current = if self.auto_scroll {
            max
        } else {
            self.scroll_offset.min(max)
        };
        self.auto_scroll = false;
        self.scroll_offset = current.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, term_width: u16, term_height: u16, pending: bool) {
        if self.auto_scroll {
            return;
        }
        let max = self.max_scroll(term_width, term_height, pending);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max);
        if self.scroll_offset >= max {
            self.auto_scroll = true;
        }
    }

    /// Adjust the offset so the message at `index` is on screen.
    pub fn scroll_message_into_view(
        &mut self,
        index: usize,
        term_width: u16,
        term_height: u16,
        pending: bool,
    ) {
        let layout = self.build_transcript(term_width, pending);
        let Some(span) = layout.message_spans.get(index) else {
            return;
        };
        let viewport = transcript_height(term_height) as usize;
        let current = self.effective_scroll(&layout, viewport as u16) as usize;
        let start = span.start;
        let end = span.start + span.len;

        let target = if start < current {
            start
        } else if end > current + viewport {
            end.saturating_sub(viewport).min(start)
        } else {
            current
        };
        let max = layout.max_scroll(viewport as u16);
        self.auto_scroll = false;
        self.scroll_offset = (target.min(u16::MAX as usize) as u16).min(max);
    }
}
