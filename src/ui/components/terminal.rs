use std::io::{self, Stdout};

use crossterm::{cursor, execute, terminal};

/// RAII wrapper that keeps raw mode and the alternate screen scoped to one prompt.
pub struct TerminalGuard {
    stdout: Stdout,
    restored: bool,
}

impl TerminalGuard {
    /// Enter raw + alternate screen modes and hide the cursor.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self {
            stdout,
            restored: false,
        })
    }

    /// Restore the terminal once, regardless of how many times it is called.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.restored {
            self.restored = true;
            let screen = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
            let raw = terminal::disable_raw_mode();
            screen.and(raw)?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
