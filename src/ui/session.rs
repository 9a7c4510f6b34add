use ratatui::backend::Backend;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::ui::components::live::{LiveRenderer, TerminalLive, View};
use crate::ui::input::{CrosstermKeys, Key, KeySource};

/// Display settings shared by every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub page_size: usize,
    pub refresh_per_second: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            refresh_per_second: 10,
        }
    }
}

impl From<&Config> for UiOptions {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.browser.page_size,
            refresh_per_second: config.display.refresh_per_second,
        }
    }
}

/// Outcome of feeding one key to a prompt state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<S, T> {
    Continue(S),
    Done(T),
}

/// A prompt expressed as `(state, key) -> state'` plus `state -> view`.
pub trait Interactive: Sized {
    type Output;
    type View: View + 'static;

    fn view(&self) -> Self::View;

    fn step(self, key: Key) -> Flow<Self, Self::Output>;
}

/// Run the read-key → next-state → re-render loop until the prompt finishes.
///
/// Ctrl+C aborts every prompt with [`AppError::Interrupted`].
pub fn drive<S, B, K>(live: &mut LiveRenderer<B>, keys: &mut K, initial: S) -> Result<S::Output>
where
    S: Interactive,
    B: Backend,
    K: KeySource,
{
    let mut state = initial;
    loop {
        live.update(state.view())?;
        let key = live.next_key(keys)?;
        if key == Key::Interrupt {
            return Err(AppError::Interrupted);
        }
        match state.step(key) {
            Flow::Continue(next) => state = next,
            Flow::Done(output) => return Ok(output),
        }
    }
}

/// Open a live session on the real terminal for the duration of `body`.
///
/// The terminal is restored on every exit path; an error from `body` wins
/// over an error while restoring.
pub fn with_session<T>(
    options: &UiOptions,
    body: impl FnOnce(&mut TerminalLive, &mut CrosstermKeys) -> Result<T>,
) -> Result<T> {
    let mut keys = CrosstermKeys::new()?;
    let mut live = TerminalLive::open(options.refresh_per_second)?;
    let outcome = body(&mut live, &mut keys);
    let closed = live.close();
    let value = outcome?;
    closed?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::scripted::ScriptedKeys;
    use ratatui::{backend::TestBackend, widgets::Paragraph, Frame};
    use std::io::IsTerminal;

    struct Counter(u32);

    struct CounterView(u32);

    impl View for CounterView {
        fn render(&self, frame: &mut Frame<'_>) {
            frame.render_widget(Paragraph::new(self.0.to_string()), frame.size());
        }
    }

    impl Interactive for Counter {
        type Output = u32;
        type View = CounterView;

        fn view(&self) -> CounterView {
            CounterView(self.0)
        }

        fn step(self, key: Key) -> Flow<Self, u32> {
            match key {
                Key::Up => Flow::Continue(Counter(self.0 + 1)),
                Key::Enter => Flow::Done(self.0),
                _ => Flow::Continue(self),
            }
        }
    }

    fn live() -> LiveRenderer<TestBackend> {
        LiveRenderer::with_backend(TestBackend::new(20, 3), 10).expect("live renderer")
    }

    #[test]
    fn drives_until_done() {
        let mut keys = ScriptedKeys::new([Key::Up, Key::Char('x'), Key::Up, Key::Enter, Key::Up]);
        let out = drive(&mut live(), &mut keys, Counter(0)).expect("finishes");
        assert_eq!(out, 2);
        assert_eq!(keys.remaining(), 1);
    }

    #[test]
    fn session_without_tty_never_runs_the_body() {
        if std::io::stdin().is_terminal() {
            return;
        }
        let mut ran = false;
        let outcome = with_session(&UiOptions::default(), |_, _| {
            ran = true;
            Ok(())
        });
        assert!(matches!(outcome, Err(AppError::NoTerminal)));
        assert!(!ran);
    }

    #[test]
    fn interrupt_aborts() {
        let mut keys = ScriptedKeys::new([Key::Up, Key::Interrupt, Key::Enter]);
        let err = drive(&mut live(), &mut keys, Counter(0)).expect_err("interrupted");
        assert!(matches!(err, AppError::Interrupted));
    }

    #[test]
    fn options_follow_config() {
        let mut config = Config::builtin();
        config.browser.page_size = 4;
        config.display.refresh_per_second = 30;
        let options = UiOptions::from(&config);
        assert_eq!(options.page_size, 4);
        assert_eq!(options.refresh_per_second, 30);
    }
}
