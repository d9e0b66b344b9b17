use crate::ui::builtin_themes::{find_builtin_theme, ThemeSpec};
use ratatui::style::{Color, Modifier, Style};
use std::fmt;

/// Binary appearance toggle for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,

    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub timestamp_style: Style,
    pub selection_highlight_style: Style,

    // Chrome
    pub title_style: Style,
    pub badge_free_style: Style,
    pub badge_premium_style: Style,
    pub pending_indicator_style: Style,
    pub status_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_code_style: Style,
    pub md_link_style: Style,
    pub md_quote_style: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        if let Some(spec) = find_builtin_theme("light") {
            return Self::from_spec(&spec);
        }
        Self::palette_fallback(Color::White, Color::Black, Color::Blue)
    }

    pub fn dark() -> Self {
        if let Some(spec) = find_builtin_theme("dark") {
            return Self::from_spec(&spec);
        }
        Self::palette_fallback(Color::Black, Color::White, Color::Cyan)
    }

    /// Uncolored theme for output that leaves the TUI (e.g. `parley say`).
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            background_color: Color::Reset,
            user_prefix_style: bold,
            user_text_style: plain,
            assistant_prefix_style: bold,
            assistant_text_style: plain,
            timestamp_style: plain,
            selection_highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            title_style: bold,
            badge_free_style: bold,
            badge_premium_style: bold,
            pending_indicator_style: plain,
            status_style: plain,
            input_border_style: plain,
            input_title_style: plain,
            input_text_style: plain,
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            md_heading_style: bold,
            md_code_style: plain,
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default().add_modifier(Modifier::ITALIC),
        }
    }

    fn palette_fallback(background: Color, text: Color, accent: Color) -> Self {
        let accent_style = Style::default().fg(accent);
        let text_style = Style::default().fg(text);
        Theme {
            background_color: background,
            user_prefix_style: accent_style.add_modifier(Modifier::BOLD),
            user_text_style: accent_style,
            assistant_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: text_style,
            timestamp_style: Style::default().fg(Color::DarkGray),
            selection_highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            title_style: accent_style.add_modifier(Modifier::BOLD),
            badge_free_style: Style::default().fg(Color::Green),
            badge_premium_style: Style::default().fg(Color::Yellow),
            pending_indicator_style: accent_style,
            status_style: Style::default().fg(Color::DarkGray),
            input_border_style: accent_style,
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: text_style,
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            md_heading_style: accent_style.add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::Magenta),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let background_color = spec
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::Reset);

        Theme {
            background_color,
            user_prefix_style: parse_style(&spec.user_prefix),
            user_text_style: parse_style(&spec.user_text),
            assistant_prefix_style: parse_style(&spec.assistant_prefix),
            assistant_text_style: parse_style(&spec.assistant_text),
            timestamp_style: parse_style(&spec.timestamp),
            selection_highlight_style: spec
                .selection_highlight
                .as_deref()
                .and_then(parse_color)
                .map(|c| Style::default().bg(c))
                .unwrap_or_else(|| Style::default().add_modifier(Modifier::REVERSED)),
            title_style: parse_style(&spec.title),
            badge_free_style: parse_style(&spec.badge_free),
            badge_premium_style: parse_style(&spec.badge_premium),
            pending_indicator_style: parse_style(&spec.pending_indicator),
            status_style: parse_style(&spec.status),
            input_border_style: parse_style(&spec.input_border),
            input_title_style: parse_style(&spec.input_title),
            input_text_style: parse_style(&spec.input_text),
            input_cursor_style: parse_style(&spec.input_cursor_modifiers),
            md_heading_style: parse_style(&spec.md_heading),
            md_code_style: parse_style(&spec.md_code),
            md_link_style: parse_style(&spec.md_link),
            md_quote_style: parse_style(&spec.md_quote),
        }
    }

    pub fn badge_style(&self, category: crate::core::catalog::ModelCategory) -> Style {
        match category {
            crate::core::catalog::ModelCategory::Free => self.badge_free_style,
            crate::core::catalog::ModelCategory::Premium => self.badge_premium_style,
        }
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-grey" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "yellow" => Some(Color::Yellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_func(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Color::Rgb(
        r.min(255) as u8,
        g.min(255) as u8,
        b.min(255) as u8,
    ))
}

fn parse_style(s: &Option<String>) -> Style {
    let mut style = Style::default();
    if let Some(ref spec) = s {
        for tok in spec.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some(color) = parse_color(tok) {
                style = style.fg(color);
            } else {
                match tok.to_ascii_lowercase().as_str() {
                    "bold" => style = style.add_modifier(Modifier::BOLD),
                    "reversed" => style = style.add_modifier(Modifier::REVERSED),
                    "italic" => style = style.add_modifier(Modifier::ITALIC),
                    "underlined" => style = style.add_modifier(Modifier::UNDERLINED),
                    _ => {}
                }
            }
        }
    }
    style
}
