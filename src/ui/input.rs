use std::io::IsTerminal;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::{AppError, Result};

/// Symbolic key decoded from a raw terminal key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Space,
    Escape,
    /// Ctrl+C; raw mode keeps the terminal from turning it into SIGINT.
    Interrupt,
    Char(char),
    Other,
}

impl Key {
    /// Case-insensitive match against a letter shortcut.
    pub fn is_letter(self, letter: char) -> bool {
        matches!(self, Key::Char(ch) if ch.to_ascii_lowercase() == letter.to_ascii_lowercase())
    }
}

/// Translate a crossterm key event. Key releases yield `None`.
pub fn decode_key(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(ch) => Key::Char(ch),
        _ => Key::Other,
    };
    Some(key)
}

/// Pull-based source of key presses driving every prompt loop.
pub trait KeySource {
    /// Block until one key is pressed.
    fn read_key(&mut self) -> Result<Key>;

    /// Wait at most `timeout` for a key; `Ok(None)` when none arrived.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>>;
}

/// Keys read from the controlling terminal through crossterm.
pub struct CrosstermKeys {
    _private: (),
}

impl CrosstermKeys {
    /// Fails with [`AppError::NoTerminal`] when stdin/stdout are not a TTY.
    pub fn new() -> Result<Self> {
        ensure_interactive()?;
        Ok(Self { _private: () })
    }
}

impl KeySource for CrosstermKeys {
    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(event) = event::read()? {
                if let Some(key) = decode_key(event) {
                    return Ok(key);
                }
            }
        }
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(event) => Ok(decode_key(event)),
            _ => Ok(None),
        }
    }
}

/// Refuse to start an interactive prompt without a terminal to read from.
pub fn ensure_interactive() -> Result<()> {
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        Ok(())
    } else {
        Err(AppError::NoTerminal)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_navigation_keys() {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(decode_key(plain(KeyCode::Up)), Some(Key::Up));
        assert_eq!(decode_key(plain(KeyCode::Backspace)), Some(Key::Backspace));
        assert_eq!(decode_key(plain(KeyCode::Char(' '))), Some(Key::Space));
        assert_eq!(decode_key(plain(KeyCode::Char('S'))), Some(Key::Char('S')));
        assert_eq!(decode_key(plain(KeyCode::F(2))), Some(Key::Other));
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(decode_key(event), Some(Key::Interrupt));
    }

    #[test]
    fn ignores_key_release() {
        let mut event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(decode_key(event), None);
    }

    #[test]
    fn letter_shortcuts_ignore_case() {
        assert!(Key::Char('Q').is_letter('q'));
        assert!(Key::Char('s').is_letter('S'));
        assert!(!Key::Char('x').is_letter('q'));
        assert!(!Key::Space.is_letter(' '));
    }

    #[test]
    fn no_tty_fails_fast() {
        if std::io::stdin().is_terminal() {
            return;
        }
        assert!(matches!(ensure_interactive(), Err(AppError::NoTerminal)));
        assert!(matches!(CrosstermKeys::new(), Err(AppError::NoTerminal)));
    }
}
