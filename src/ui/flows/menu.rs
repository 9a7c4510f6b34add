use std::collections::BTreeSet;

use log::debug;
use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::error::{AppError, Result};
use crate::ui::components::live::{LiveRenderer, View};
use crate::ui::components::utils::centered_box;
use crate::ui::input::{Key, KeySource};
use crate::ui::session::{drive, with_session, Flow, Interactive, UiOptions};
use crate::ui::styles::{secondary_line, selection_style, title_span};

pub const SINGLE_SELECT_HINT: &str = "→ ↑/↓ navigate — Enter confirm";
pub const MULTI_SELECT_HINT: &str = "→ ↑/↓ navigate — Space check — Enter confirm";

fn require_options(options: &[String]) -> Result<()> {
    if options.is_empty() {
        Err(AppError::message("a menu needs at least one option"))
    } else {
        Ok(())
    }
}

fn wrap_up(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

fn wrap_down(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Single choice menu; Enter returns the highlighted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSelect {
    options: Vec<String>,
    highlighted: usize,
    prompt: Option<String>,
}

impl SingleSelect {
    pub fn new(options: Vec<String>, prompt: Option<&str>) -> Result<Self> {
        require_options(&options)?;
        Ok(Self {
            options,
            highlighted: 0,
            prompt: prompt.map(str::to_string),
        })
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }
}

impl Interactive for SingleSelect {
    type Output = String;
    type View = MenuView;

    fn view(&self) -> MenuView {
        MenuView {
            rows: self.options.clone(),
            highlighted: self.highlighted,
            prompt: self.prompt.clone(),
            accent: Color::Blue,
            border: Color::Cyan,
            hint: SINGLE_SELECT_HINT,
        }
    }

    fn step(mut self, key: Key) -> Flow<Self, String> {
        let len = self.options.len();
        match key {
            Key::Up | Key::Char('k') => self.highlighted = wrap_up(self.highlighted, len),
            Key::Down | Key::Char('j') => self.highlighted = wrap_down(self.highlighted, len),
            Key::Enter => return Flow::Done(self.options.swap_remove(self.highlighted)),
            _ => {}
        }
        Flow::Continue(self)
    }
}

/// Checklist menu; Space toggles, Enter returns the checked options in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelect {
    options: Vec<String>,
    highlighted: usize,
    checked: BTreeSet<usize>,
    prompt: Option<String>,
}

impl MultiSelect {
    pub fn new(options: Vec<String>, prompt: Option<&str>) -> Result<Self> {
        require_options(&options)?;
        Ok(Self {
            options,
            highlighted: 0,
            checked: BTreeSet::new(),
            prompt: prompt.map(str::to_string),
        })
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn checked(&self) -> &BTreeSet<usize> {
        &self.checked
    }

    fn toggle(&mut self) {
        if !self.checked.remove(&self.highlighted) {
            self.checked.insert(self.highlighted);
        }
    }

    fn into_selection(self) -> Vec<String> {
        let checked = self.checked;
        self.options
            .into_iter()
            .enumerate()
            .filter(|(index, _)| checked.contains(index))
            .map(|(_, option)| option)
            .collect()
    }
}

impl Interactive for MultiSelect {
    type Output = Vec<String>;
    type View = MenuView;

    fn view(&self) -> MenuView {
        let rows = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let mark = if self.checked.contains(&index) { "[X]" } else { "[ ]" };
                format!("{mark} {option}")
            })
            .collect();
        MenuView {
            rows,
            highlighted: self.highlighted,
            prompt: self.prompt.clone(),
            accent: Color::Green,
            border: Color::Green,
            hint: MULTI_SELECT_HINT,
        }
    }

    fn step(mut self, key: Key) -> Flow<Self, Vec<String>> {
        let len = self.options.len();
        match key {
            Key::Up | Key::Char('k') => self.highlighted = wrap_up(self.highlighted, len),
            Key::Down | Key::Char('j') => self.highlighted = wrap_down(self.highlighted, len),
            Key::Space => self.toggle(),
            Key::Enter => return Flow::Done(self.into_selection()),
            _ => {}
        }
        Flow::Continue(self)
    }
}

/// Centered panel listing menu rows with the highlighted one reversed.
pub struct MenuView {
    rows: Vec<String>,
    highlighted: usize,
    prompt: Option<String>,
    accent: Color,
    border: Color,
    hint: &'static str,
}

impl View for MenuView {
    fn render(&self, frame: &mut Frame<'_>) {
        let widest_row = self
            .rows
            .iter()
            .map(|row| UnicodeWidthStr::width(row.as_str()))
            .max()
            .unwrap_or(0);
        let title_width = self
            .prompt
            .as_deref()
            .map(|prompt| UnicodeWidthStr::width(prompt) + 4)
            .unwrap_or(0);
        // Borders plus two columns of padding on each side.
        let hint_width = UnicodeWidthStr::width(self.hint);
        let width = widest_row.max(title_width).max(hint_width) as u16 + 6;
        let height = self.rows.len() as u16 + 4;
        let area = centered_box(width, height, frame.size());

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .padding(Padding::new(2, 2, 1, 1));
        if let Some(prompt) = &self.prompt {
            block = block
                .title(title_span(prompt.as_str(), self.accent))
                .title_alignment(Alignment::Center);
        }

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let item = ListItem::new(Line::from(row.clone()));
                if index == self.highlighted {
                    item.style(selection_style())
                } else {
                    item
                }
            })
            .collect();

        frame.render_widget(Clear, area);
        frame.render_widget(List::new(items).block(block), area);

        let screen = frame.size();
        if area.bottom() < screen.bottom() {
            let hint_area = Rect::new(area.x, area.bottom(), area.width, 1);
            frame.render_widget(
                Paragraph::new(secondary_line(self.hint)).alignment(Alignment::Center),
                hint_area,
            );
        }
    }
}

pub fn run_select_option<B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    options: &[String],
    prompt: Option<&str>,
) -> Result<String> {
    let choice = drive(live, keys, SingleSelect::new(options.to_vec(), prompt)?)?;
    debug!("menu choice: {choice}");
    Ok(choice)
}

pub fn run_select_multiple<B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    options: &[String],
    prompt: Option<&str>,
) -> Result<Vec<String>> {
    let choices = drive(live, keys, MultiSelect::new(options.to_vec(), prompt)?)?;
    debug!("checklist choices: {choices:?}");
    Ok(choices)
}

/// Let the user pick exactly one option. There is no cancel key.
pub fn select_option(options: &[String], prompt: Option<&str>, ui: &UiOptions) -> Result<String> {
    with_session(ui, |live, keys| run_select_option(live, keys, options, prompt))
}

/// Let the user check any subset of `options`; the result keeps list order.
pub fn select_multiple_options(
    options: &[String],
    prompt: Option<&str>,
    ui: &UiOptions,
) -> Result<Vec<String>> {
    with_session(ui, |live, keys| run_select_multiple(live, keys, options, prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::scripted::ScriptedKeys;
    use ratatui::backend::TestBackend;

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| label.to_string()).collect()
    }

    fn live() -> LiveRenderer<TestBackend> {
        LiveRenderer::with_backend(TestBackend::new(60, 12), 10).expect("live renderer")
    }

    fn continue_with<S, T: std::fmt::Debug>(flow: Flow<S, T>) -> S {
        match flow {
            Flow::Continue(state) => state,
            Flow::Done(output) => panic!("prompt finished early with {output:?}"),
        }
    }

    #[test]
    fn rejects_empty_menus() {
        assert!(SingleSelect::new(Vec::new(), None).is_err());
        assert!(MultiSelect::new(Vec::new(), None).is_err());
    }

    #[test]
    fn down_wraps_back_to_start() {
        for len in 1..=7 {
            let labels: Vec<String> = (0..len).map(|i| format!("opt{i}")).collect();
            for start in 0..len {
                let mut menu = SingleSelect::new(labels.clone(), None).expect("menu");
                for _ in 0..start {
                    menu = continue_with(menu.step(Key::Down));
                }
                assert_eq!(menu.highlighted(), start);
                for _ in 0..len {
                    menu = continue_with(menu.step(Key::Down));
                }
                assert_eq!(menu.highlighted(), start, "len={len} start={start}");
            }
        }
    }

    #[test]
    fn up_from_first_wraps_to_last() {
        let menu = SingleSelect::new(options(&["a", "b", "c"]), None).expect("menu");
        let menu = continue_with(menu.step(Key::Up));
        assert_eq!(menu.highlighted(), 2);
    }

    #[test]
    fn single_select_returns_highlighted_option() {
        let mut keys = ScriptedKeys::new([Key::Down, Key::Char('z'), Key::Down, Key::Enter]);
        let choice = run_select_option(
            &mut live(),
            &mut keys,
            &options(&["Continue", "Quit", "Other"]),
            Some(SINGLE_SELECT_HINT),
        )
        .expect("choice");
        assert_eq!(choice, "Other");
    }

    #[test]
    fn double_toggle_leaves_checked_set_unchanged() {
        let menu = MultiSelect::new(options(&["A", "B", "C"]), None).expect("menu");
        let menu = continue_with(menu.step(Key::Space));
        let menu = continue_with(menu.step(Key::Down));
        let before = menu.checked().clone();

        let menu = continue_with(menu.step(Key::Space));
        let menu = continue_with(menu.step(Key::Space));
        assert_eq!(menu.checked(), &before);
    }

    #[test]
    fn multi_select_keeps_list_order() {
        // Check "C" first, then "A".
        let mut keys = ScriptedKeys::new([Key::Up, Key::Space, Key::Down, Key::Space, Key::Enter]);
        let choices = run_select_multiple(&mut live(), &mut keys, &options(&["A", "B", "C"]), None)
            .expect("choices");
        assert_eq!(choices, vec!["A", "C"]);
    }

    #[test]
    fn empty_checklist_is_a_valid_result() {
        let mut keys = ScriptedKeys::new([Key::Down, Key::Enter]);
        let choices = run_select_multiple(&mut live(), &mut keys, &options(&["A", "B"]), None)
            .expect("choices");
        assert!(choices.is_empty());
    }

    #[test]
    fn checklist_view_shows_marks() {
        let menu = MultiSelect::new(options(&["Show chart", "Save chart"]), Some(MULTI_SELECT_HINT))
            .expect("menu");
        let menu = continue_with(menu.step(Key::Space));

        let mut live = live();
        live.update(menu.view()).expect("render");
        let screen: String = live
            .terminal()
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("[X] Show chart"));
        assert!(screen.contains("[ ] Save chart"));
        assert!(screen.contains("Space check"));
    }
}
