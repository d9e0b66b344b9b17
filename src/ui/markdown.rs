//! Markdown rendering for assistant replies.
//!
//! Replies are displayed, never executed: raw HTML is shown as literal text and
//! links are printed with their destination instead of being followed.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::layout::wrap_spans;
use super::theme::Theme;
use crate::utils::input::sanitize_text_input;

const QUOTE_BAR: &str = "│ ";
const CODE_INDENT: &str = "  ";
const MAX_RULE_WIDTH: usize = 40;

#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
    header_rows: usize,
}

impl TableState {
    fn column_widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<Option<u64>>,
    item_marker: Option<String>,
    item_indent: usize,
    quote_depth: usize,
    code_block: Option<String>,
    link: Option<(String, usize)>,
    table: Option<TableState>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(theme: &'t Theme, width: usize) -> Self {
        Self {
            theme,
            width: width.max(1),
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![theme.assistant_text_style],
            list_stack: Vec::new(),
            item_marker: None,
            item_indent: 0,
            quote_depth: 0,
            code_block: None,
            link: None,
            table: None,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn push_style(&mut self, style: Style) {
        let style = self.current_style().patch(style);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(table) = self.table.as_mut() {
            table.current_cell.push_str(text);
            return;
        }
        let style = self.current_style();
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn line_prefixes(&mut self) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
        let mut first = Vec::new();
        let mut rest = Vec::new();
        if self.quote_depth > 0 {
            let bars = QUOTE_BAR.repeat(self.quote_depth);
            first.push(Span::styled(bars.clone(), self.theme.md_quote_style));
            rest.push(Span::styled(bars, self.theme.md_quote_style));
        }

        if !self.list_stack.is_empty() {
            let nesting = "  ".repeat(self.list_stack.len() - 1);
            match self.item_marker.take() {
                Some(marker) => {
                    first.push(Span::raw(nesting.clone()));
                    first.push(Span::styled(marker, self.theme.md_heading_style));
                }
                None => first.push(Span::raw(format!(
                    "{nesting}{}",
                    " ".repeat(self.item_indent)
                ))),
            }
            rest.push(Span::raw(format!("{nesting}{}", " ".repeat(self.item_indent))));
        }
        (first, rest)
    }

    fn flush_line(&mut self) {
        if self.spans.is_empty() && self.item_marker.is_none() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        self.emit(spans);
    }

    fn emit(&mut self, spans: Vec<Span<'static>>) {
        let (first, rest) = self.line_prefixes();
        let prefix_width = first.iter().map(|s| s.content.width()).sum::<usize>();
        let available = self.width.saturating_sub(prefix_width).max(1);

        for (index, row) in wrap_spans(spans, available).into_iter().enumerate() {
            let mut line_spans = if index == 0 {
                first.clone()
            } else {
                rest.clone()
            };
            line_spans.extend(row);
            self.lines.push(Line::from(line_spans));
        }
    }

    fn push_blank(&mut self) {
        let last_is_blank = self
            .lines
            .last()
            .map(|line| line.spans.iter().all(|s| s.content.trim().is_empty()))
            .unwrap_or(true);
        if !last_is_blank {
            self.lines.push(Line::default());
        }
    }

    fn finish_code_block(&mut self, code: String) {
        let style = self.theme.md_code_style;
        for raw in code.trim_end_matches('\n').split('\n') {
            self.emit(vec![
                Span::styled(CODE_INDENT, style),
                Span::styled(raw.to_string(), style),
            ]);
        }
        self.push_blank();
    }

    fn finish_link(&mut self, dest: String, first_span: usize) {
        if dest.is_empty() {
            return;
        }
        let text: String = self.spans[first_span.min(self.spans.len())..]
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        if text.trim() != dest && !dest.starts_with('#') {
            self.spans.push(Span::styled(
                format!(" ({dest})"),
                self.theme.timestamp_style,
            ));
        }
    }

    fn finish_table(&mut self, table: TableState) {
        let widths = table.column_widths();
        let separator_style = self.theme.md_quote_style;
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut spans = Vec::new();
            for (col, width) in widths.iter().enumerate() {
                if col > 0 {
                    spans.push(Span::styled(" │ ", separator_style));
                }
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                let padding = width.saturating_sub(cell.width());
                let style = if row_index < table.header_rows {
                    self.current_style().add_modifier(Modifier::BOLD)
                } else {
                    self.current_style()
                };
                spans.push(Span::styled(format!("{cell}{}", " ".repeat(padding)), style));
            }
            self.emit(spans);

            if row_index + 1 == table.header_rows {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.emit(vec![Span::styled(rule, separator_style)]);
            }
        }
        self.push_blank();
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.push_style(self.theme.md_heading_style);
                let hashes = "#".repeat(level as usize);
                self.push_text(&format!("{hashes} "));
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
                self.push_style(self.theme.md_quote_style);
            }
            Tag::List(start) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.item_indent = marker.width();
                self.item_marker = Some(marker);
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.code_block = Some(String::new());
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.push_style(self.theme.md_link_style);
                self.link = Some((dest_url.to_string(), self.spans.len()));
            }
            Tag::Table(_) => {
                self.flush_line();
                self.table = Some(TableState::default());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush_line();
                self.pop_style();
                self.push_blank();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                self.push_blank();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                self.item_marker = None;
                if self.list_stack.is_empty() {
                    self.item_indent = 0;
                    self.push_blank();
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.item_marker = None;
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    self.finish_code_block(code);
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link | TagEnd::Image => {
                self.pop_style();
                if let Some((dest, first_span)) = self.link.take() {
                    self.finish_link(dest, first_span);
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                    if matches!(tag, TagEnd::TableHead) {
                        table.header_rows = table.rows.len();
                    }
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.finish_table(table);
                }
            }
            _ => {}
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) => match self.code_block.as_mut() {
                    Some(code) => code.push_str(&text),
                    None => self.push_text(&text),
                },
                Event::Code(code) => {
                    if let Some(table) = self.table.as_mut() {
                        table.current_cell.push_str(&code);
                    } else {
                        self.spans
                            .push(Span::styled(code.to_string(), self.theme.md_code_style));
                    }
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let mut parts = html.split('\n').peekable();
                    while let Some(part) = parts.next() {
                        if !part.is_empty() {
                            self.push_text(part);
                        }
                        if parts.peek().is_some() && self.table.is_none() {
                            self.flush_line();
                        }
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if self.table.is_some() {
                        self.push_text(" ");
                    } else {
                        self.flush_line();
                    }
                }
                Event::Rule => {
                    self.flush_line();
                    let rule = "─".repeat(self.width.min(MAX_RULE_WIDTH));
                    self.lines
                        .push(Line::from(Span::styled(rule, self.theme.md_quote_style)));
                    self.push_blank();
                }
                Event::TaskListMarker(checked) => {
                    self.push_text(if checked { "[x] " } else { "[ ] " });
                }
                _ => {}
            }
        }

        self.flush_line();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|s| s.content.trim().is_empty()))
        {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

/// Render `content` as markdown, wrapped to `width` columns. Control
/// characters are stripped first so nothing reaches the terminal as an escape.
pub fn render_markdown(content: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, width).render(&sanitize_text_input(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeMode;

    fn render(content: &str, width: usize) -> Vec<String> {
        let theme = Theme::for_mode(ThemeMode::Light);
        render_markdown(content, &theme, width)
            .iter()
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_one_blank_line() {
        assert_eq!(render("first\n\nsecond", 40), vec!["first", "", "second"]);
    }

    #[test]
    fn headings_and_emphasis_keep_their_text() {
        let theme = Theme::for_mode(ThemeMode::Light);
        let lines = render_markdown("# Title\n\nsome **bold** text", &theme, 40);
        assert_eq!(lines[0].to_string(), "# Title");
        let bold = lines[2]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .expect("bold span");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn lists_get_markers_and_hanging_indent() {
        let lines = render("- alpha beta gamma\n- two\n\n1. one\n2. next", 12);
        assert_eq!(
            lines,
            vec!["• alpha beta", "  gamma", "• two", "", "1. one", "2. next"]
        );
    }

    #[test]
    fn code_blocks_are_indented_verbatim() {
        let lines = render("```rust\nfn main() {}\n```", 40);
        assert_eq!(lines, vec!["  fn main() {}"]);
    }

    #[test]
    fn escape_sequences_are_not_passed_through() {
        let lines = render("hi \u{1b}]0;pwned\u{7} \u{1b}[2J there", 60);
        assert_eq!(lines, vec!["hi ]0;pwned [2J there"]);

        let code = render("```\n\u{1b}]52;c;aGk=\u{7}\n```", 60);
        assert!(code.iter().all(|line| !line.chars().any(|c| c.is_control())));
    }

    #[test]
    fn raw_html_is_shown_as_text() {
        let lines = render("<script>alert(1)</script>", 40);
        assert_eq!(lines, vec!["<script>alert(1)</script>"]);

        let inline = render("click <b>here</b>", 40);
        assert_eq!(inline, vec!["click <b>here</b>"]);
    }

    #[test]
    fn links_show_their_destination() {
        let lines = render("see [docs](https://example.com)", 60);
        assert_eq!(lines, vec!["see docs (https://example.com)"]);

        let autolink = render("<https://example.com>", 60);
        assert_eq!(autolink, vec!["https://example.com"]);
    }

    #[test]
    fn quotes_prefix_every_wrapped_row() {
        let lines = render("> one two three", 9);
        assert_eq!(lines, vec!["│ one two", "│ three"]);
    }

    #[test]
    fn tables_align_columns() {
        let lines = render("| a | bb |\n|---|---|\n| ccc | d |", 40);
        assert_eq!(lines, vec!["a   │ bb", "────┼───", "ccc │ d "]);
    }
}
