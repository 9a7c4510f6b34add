use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};

use crate::error::{AppError, Result};
use crate::ui::components::terminal::TerminalGuard;
use crate::ui::input::{Key, KeySource};

/// Something the live display can paint.
pub trait View {
    fn render(&self, frame: &mut Frame<'_>);
}

/// Live display bound to the real terminal.
pub type TerminalLive = LiveRenderer<CrosstermBackend<Stdout>>;

static SESSION_OPEN: AtomicBool = AtomicBool::new(false);

/// Marks the terminal as owned by one live session for the lifetime of the lock.
pub struct SessionLock {
    _private: (),
}

impl SessionLock {
    pub fn acquire() -> Result<Self> {
        SESSION_OPEN
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { _private: () })
            .map_err(|_| AppError::SessionBusy)
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        SESSION_OPEN.store(false, Ordering::Release);
    }
}

/// Repaints one screen region in place, at most `refresh_per_second` times a second.
///
/// `update` always records the latest view; frames arriving faster than the
/// refresh interval stay pending and are painted by [`LiveRenderer::next_key`]
/// just before it blocks, unless a key press supersedes them first.
pub struct LiveRenderer<B: Backend> {
    terminal: Terminal<B>,
    guard: Option<TerminalGuard>,
    lock: Option<SessionLock>,
    interval: Duration,
    last_draw: Option<Instant>,
    pending: Option<Box<dyn View>>,
}

impl TerminalLive {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    pub fn open(refresh_per_second: u32) -> Result<Self> {
        let lock = SessionLock::acquire()?;
        let guard = TerminalGuard::enter()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        debug!("live session opened ({refresh_per_second} fps cap)");
        Ok(Self {
            terminal,
            guard: Some(guard),
            lock: Some(lock),
            interval: refresh_interval(refresh_per_second),
            last_draw: None,
            pending: None,
        })
    }
}

impl<B: Backend> LiveRenderer<B> {
    /// Live display over an arbitrary backend; no terminal modes are touched.
    pub fn with_backend(backend: B, refresh_per_second: u32) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            guard: None,
            lock: None,
            interval: refresh_interval(refresh_per_second),
            last_draw: None,
            pending: None,
        })
    }

    /// Replace the displayed content, painting now if the refresh cap allows.
    pub fn update(&mut self, view: impl View + 'static) -> Result<()> {
        self.pending = Some(Box::new(view));
        if self.until_due().is_zero() {
            self.flush()?;
        }
        Ok(())
    }

    /// Paint the pending view, if any, regardless of the refresh cap.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(view) = self.pending.take() {
            self.terminal.draw(|frame| view.render(frame))?;
            self.last_draw = Some(Instant::now());
        }
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the next key press, painting any pending frame once it is due.
    pub fn next_key<K: KeySource>(&mut self, keys: &mut K) -> Result<Key> {
        if self.pending.is_some() {
            let wait = self.until_due();
            if !wait.is_zero() {
                if let Some(key) = keys.poll_key(wait)? {
                    return Ok(key);
                }
            }
            self.flush()?;
        }
        keys.read_key()
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// End the session and restore the terminal.
    pub fn close(mut self) -> Result<()> {
        self.restore()
    }

    fn until_due(&self) -> Duration {
        match self.last_draw {
            Some(at) => self.interval.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    fn restore(&mut self) -> Result<()> {
        self.pending = None;
        if let Some(mut guard) = self.guard.take() {
            guard.restore()?;
            debug!("live session closed");
        }
        self.lock.take();
        Ok(())
    }
}

impl<B: Backend> Drop for LiveRenderer<B> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn refresh_interval(refresh_per_second: u32) -> Duration {
    Duration::from_secs(1) / refresh_per_second.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::scripted::ScriptedKeys;
    use ratatui::{backend::TestBackend, widgets::Paragraph};

    struct Label(&'static str);

    impl View for Label {
        fn render(&self, frame: &mut Frame<'_>) {
            frame.render_widget(Paragraph::new(self.0), frame.size());
        }
    }

    fn live(rate: u32) -> LiveRenderer<TestBackend> {
        LiveRenderer::with_backend(TestBackend::new(40, 5), rate).expect("live renderer")
    }

    fn text(live: &LiveRenderer<TestBackend>) -> String {
        let buffer = live.terminal().backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn first_update_paints_immediately() {
        let mut live = live(10);
        live.update(Label("hello")).expect("update");
        assert!(!live.has_pending());
        assert!(text(&live).contains("hello"));
    }

    #[test]
    fn updates_inside_the_interval_stay_pending() {
        let mut live = live(1);
        live.update(Label("first")).expect("update");
        live.update(Label("second")).expect("update");
        assert!(live.has_pending());
        assert!(text(&live).contains("first"));

        live.flush().expect("flush");
        assert!(!live.has_pending());
        assert!(text(&live).contains("second"));
    }

    #[test]
    fn key_press_supersedes_a_pending_frame() {
        let mut live = live(1);
        let mut keys = ScriptedKeys::new([Key::Down]);
        live.update(Label("first")).expect("update");
        live.update(Label("second")).expect("update");

        assert_eq!(live.next_key(&mut keys).expect("key"), Key::Down);
        assert!(live.has_pending());
        assert_eq!(keys.remaining(), 0);
    }

    #[test]
    fn pending_frame_is_painted_before_blocking() {
        let mut live = live(1);
        let mut keys = ScriptedKeys::new(Vec::new());
        live.update(Label("first")).expect("update");
        live.update(Label("second")).expect("update");

        // Nothing arrives while waiting, so the frame is painted and the read fails.
        assert!(live.next_key(&mut keys).is_err());
        assert!(text(&live).contains("second"));
    }

    #[test]
    fn only_one_session_lock_at_a_time() {
        let first = SessionLock::acquire().expect("first lock");
        assert!(matches!(SessionLock::acquire(), Err(AppError::SessionBusy)));
        drop(first);
        SessionLock::acquire().expect("lock released on drop");
    }

    #[test]
    fn close_is_safe_without_terminal_modes() {
        let mut live = live(10);
        live.update(Label("bye")).expect("update");
        live.close().expect("close");
    }
}
