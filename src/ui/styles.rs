use std::borrow::Cow;

use ratatui::prelude::Stylize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Accent color used for prompts, highlights, and status badges.
pub const ACCENT: Color = Color::Indexed(208);

/// Produce a dimmed line for secondary descriptions and hints.
pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}

/// Red underlined line for inline errors.
pub fn error_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(Span::styled(
        format!("⌦  {owned}"),
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

/// Reverse + bold, the look of the highlighted row in every prompt.
pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

/// Banner-style title span drawn on a colored background.
pub fn title_span<'a>(text: impl Into<Cow<'a, str>>, background: Color) -> Span<'a> {
    let owned = text.into().into_owned();
    Span::styled(
        format!(" {owned} "),
        Style::default()
            .fg(Color::White)
            .bg(background)
            .add_modifier(Modifier::BOLD),
    )
}

/// Keyboard hint line: bold keys followed by their dimmed action.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::from(key.to_string()).bold());
        spans.push(Span::from(format!(" {action}   ")).dim());
    }
    Line::from(spans)
}
