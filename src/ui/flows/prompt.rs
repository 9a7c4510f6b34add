use ratatui::{prelude::*, widgets::*};

use crate::error::Result;
use crate::ui::components::live::{LiveRenderer, View};
use crate::ui::components::utils::{centered_box, split_vertical};
use crate::ui::input::{Key, KeySource};
use crate::ui::session::{drive, with_session, Flow, Interactive, UiOptions};
use crate::ui::styles::{error_line, secondary_line, ACCENT};
use crate::utils::parse_number;

/// Turns the submitted text into a value, or explains why it was refused.
pub type Validator<T> = fn(&str) -> std::result::Result<T, String>;

/// Single-line text prompt; invalid submissions keep the prompt open with an inline error.
pub struct TextPrompt<T> {
    title: String,
    label: String,
    default: Option<String>,
    buffer: String,
    error: Option<String>,
    validate: Validator<T>,
}

impl<T> TextPrompt<T> {
    pub fn new(title: impl Into<String>, label: impl Into<String>, validate: Validator<T>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            default: None,
            buffer: String::new(),
            error: None,
            validate,
        }
    }

    /// Value used when the user submits an empty line.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn submit(mut self) -> Flow<Self, T> {
        let text = match (self.buffer.trim(), &self.default) {
            ("", Some(default)) => default.clone(),
            (typed, _) => typed.to_string(),
        };
        match (self.validate)(&text) {
            Ok(value) => Flow::Done(value),
            Err(reason) => {
                self.error = Some(reason);
                Flow::Continue(self)
            }
        }
    }
}

impl<T> Interactive for TextPrompt<T> {
    type Output = T;
    type View = PromptView;

    fn view(&self) -> PromptView {
        PromptView {
            title: self.title.clone(),
            label: self.label.clone(),
            default: self.default.clone(),
            buffer: self.buffer.clone(),
            error: self.error.clone(),
        }
    }

    fn step(mut self, key: Key) -> Flow<Self, T> {
        match key {
            Key::Enter => return self.submit(),
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Space => self.buffer.push(' '),
            Key::Char(ch) if !ch.is_control() => self.buffer.push(ch),
            _ => {}
        }
        Flow::Continue(self)
    }
}

pub struct PromptView {
    title: String,
    label: String,
    default: Option<String>,
    buffer: String,
    error: Option<String>,
}

impl View for PromptView {
    fn render(&self, frame: &mut Frame<'_>) {
        let area = centered_box(70, 11, frame.size());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(self.title.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = split_vertical(
            inner,
            &[
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ],
        );

        let label = match &self.default {
            Some(default) => Line::from(vec![
                Span::from(format!("〉{} ", self.label)).bold(),
                Span::from(format!("(default: {default})")).italic().dim(),
            ]),
            None => Line::from(Span::from(format!("〉{}", self.label)).bold()),
        };
        frame.render_widget(Paragraph::new(label), chunks[0]);

        let mut display = self.buffer.clone();
        display.push('_');
        let input = Paragraph::new(display)
            .style(Style::default().fg(ACCENT))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(input, chunks[1]);

        let message = match &self.error {
            Some(error) => error_line(error.as_str()),
            None => secondary_line("Enter to confirm • Backspace delete • Ctrl+C quit"),
        };
        frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), chunks[3]);
    }
}

fn accept_text(text: &str) -> std::result::Result<String, String> {
    if text.trim().is_empty() {
        Err("Please enter a value".to_string())
    } else {
        Ok(text.trim().to_string())
    }
}

fn accept_number(text: &str) -> std::result::Result<f64, String> {
    parse_number(text).ok_or_else(|| "Please enter a valid number".to_string())
}

pub fn text_prompt(title: &str, label: &str, default: Option<&str>) -> TextPrompt<String> {
    let prompt = TextPrompt::new(title, label, accept_text as Validator<String>);
    match default {
        Some(default) => prompt.with_default(default),
        None => prompt,
    }
}

pub fn number_prompt(title: &str, label: &str) -> TextPrompt<f64> {
    TextPrompt::new(title, label, accept_number as Validator<f64>)
}

pub fn run_prompt<T, B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    prompt: TextPrompt<T>,
) -> Result<T> {
    drive(live, keys, prompt)
}

/// Ask for a line of text; `default` is used when the line is left empty.
pub fn prompt_text(title: &str, label: &str, default: Option<&str>, ui: &UiOptions) -> Result<String> {
    with_session(ui, |live, keys| run_prompt(live, keys, text_prompt(title, label, default)))
}

/// Ask for a decimal number until a valid one is entered.
pub fn prompt_number(title: &str, label: &str, ui: &UiOptions) -> Result<f64> {
    with_session(ui, |live, keys| run_prompt(live, keys, number_prompt(title, label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::scripted::{typed, ScriptedKeys};
    use ratatui::backend::TestBackend;

    fn live() -> LiveRenderer<TestBackend> {
        LiveRenderer::with_backend(TestBackend::new(80, 20), 10).expect("live renderer")
    }

    fn keys(parts: &[&[Key]]) -> ScriptedKeys {
        ScriptedKeys::new(parts.iter().flat_map(|part| part.iter().copied()))
    }

    #[test]
    fn empty_line_uses_default() {
        let mut keys = keys(&[&[Key::Enter]]);
        let name = run_prompt(&mut live(), &mut keys, text_prompt("Names", "Acid name", Some("acid")))
            .expect("name");
        assert_eq!(name, "acid");
    }

    #[test]
    fn typed_text_with_spaces_and_corrections() {
        let mut keys = keys(&[&typed("acetix"), &[Key::Backspace], &typed("c acid"), &[Key::Enter]]);
        let name = run_prompt(&mut live(), &mut keys, text_prompt("Names", "Acid name", None))
            .expect("name");
        assert_eq!(name, "acetic acid");
    }

    #[test]
    fn invalid_number_reprompts_inline() {
        let prompt = number_prompt("pKA", "pKA (float)");
        let mut state = prompt;
        for key in typed("abc") {
            state = match state.step(key) {
                Flow::Continue(next) => next,
                Flow::Done(_) => panic!("typing never submits"),
            };
        }
        let state = match state.step(Key::Enter) {
            Flow::Continue(next) => next,
            Flow::Done(value) => panic!("accepted invalid number {value}"),
        };
        assert_eq!(state.error(), Some("Please enter a valid number"));
        assert_eq!(state.buffer(), "abc");
    }

    #[test]
    fn number_prompt_accepts_after_correction() {
        let mut keys = keys(&[
            &typed("x"),
            &[Key::Enter, Key::Backspace],
            &typed("4,75"),
            &[Key::Enter],
        ]);
        let pka = run_prompt(&mut live(), &mut keys, number_prompt("pKA", "pKA (float)"))
            .expect("pka");
        assert_eq!(pka, 4.75);
    }

    #[test]
    fn error_is_rendered() {
        let state = match number_prompt("pKA", "pKA").step(Key::Enter) {
            Flow::Continue(next) => next,
            Flow::Done(_) => panic!("empty input accepted"),
        };
        let mut live = live();
        live.update(state.view()).expect("render");
        let screen: String = live
            .terminal()
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Please enter a valid number"));
    }
}
