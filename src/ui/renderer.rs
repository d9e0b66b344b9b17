use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::app::{App, UiMode};
use crate::ui::layout::{HEADER_HEIGHT, INPUT_HEIGHT, STATUS_HEIGHT};
use crate::ui::picker::PickerState;
use crate::ui::theme::Theme;

const KEY_HINT: &str =
    "Ctrl+O model · Ctrl+P suggest · Ctrl+Y copy · Ctrl+L clear · Ctrl+T theme · Ctrl+C quit";
const COPY_HINT: &str = "Copy mode · ↑/↓ choose · Enter copy · Esc leave";
const PICKER_HINT: &str = "↑/↓ choose · Enter select · Esc cancel";

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.ui.theme;
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    f.render_widget(&app.ui.textarea, chunks[2]);
    render_status(f, app, chunks[3]);

    if let Some(picker) = &app.picker {
        render_picker(f, picker, theme, area);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let lines = match app.selected_model() {
        Some(model) => vec![
            Line::from(vec![
                Span::styled(model.name.clone(), theme.title_style),
                Span::raw(" "),
                Span::styled(
                    format!(" {} ", model.category.badge()),
                    theme.badge_style(model.category),
                ),
            ]),
            Line::from(Span::styled(
                format!("{} · {}", model.provider, model.description),
                theme.timestamp_style,
            )),
        ],
        None => vec![
            Line::from(Span::styled("No model selected", theme.title_style)),
            Line::from(Span::styled(
                "Press Ctrl+O to choose one",
                theme.timestamp_style,
            )),
        ],
    };

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(Span::styled(" parley ", theme.input_title_style)),
    );
    f.render_widget(header, area);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let pending = app.session.pending;

    if app.ui.messages.is_empty() && !pending {
        render_welcome(f, theme, area);
        return;
    }

    let layout = app.ui.build_transcript(area.width, pending);
    let scroll = app.ui.effective_scroll(&layout, area.height);
    let transcript = Paragraph::new(layout.lines).scroll((scroll, 0));
    f.render_widget(transcript, area);
}

fn render_welcome(f: &mut Frame, theme: &Theme, area: Rect) {
    let top_padding = area.height.saturating_sub(3) / 2;
    let mut lines = vec![Line::default(); top_padding as usize];
    lines.push(Line::from(Span::styled(
        "Welcome to parley",
        theme.title_style.add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Your assistant is ready. Select a model and start your conversation!",
        theme.timestamp_style,
    )));

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(welcome, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let (text, style) = if app.picker.is_some() {
        (PICKER_HINT.to_string(), theme.timestamp_style)
    } else if let Some(status) = &app.ui.status {
        (status.clone(), theme.status_style)
    } else if matches!(app.ui.mode, UiMode::CopySelect { .. }) {
        (COPY_HINT.to_string(), theme.status_style)
    } else {
        (KEY_HINT.to_string(), theme.timestamp_style)
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn render_picker(f: &mut Frame, picker: &PickerState, theme: &Theme, area: Rect) {
    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = picker
        .items
        .iter()
        .map(|item| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(item.label.clone(), theme.user_text_style),
                    Span::raw(" "),
                    Span::styled(
                        format!(" {} ", item.category.badge()),
                        theme.badge_style(item.category),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", item.detail),
                    theme.timestamp_style,
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style)
                .title(Span::styled(
                    format!(" {} ", picker.title),
                    theme.input_title_style,
                ))
                .style(Style::default().bg(theme.background_color)),
        )
        .highlight_style(theme.selection_highlight_style)
        .highlight_symbol("› ");

    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, popup, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let remaining_y = 100u16.saturating_sub(percent_y);
    let top_margin = remaining_y / 2;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(top_margin),
            Constraint::Percentage(percent_y.min(100)),
            Constraint::Percentage(remaining_y.saturating_sub(top_margin)),
        ])
        .split(area);

    let remaining_x = 100u16.saturating_sub(percent_x);
    let left_margin = remaining_x / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_margin),
            Constraint::Percentage(percent_x.min(100)),
            Constraint::Percentage(remaining_x.saturating_sub(left_margin)),
        ])
        .split(vertical[1])[1]
}
