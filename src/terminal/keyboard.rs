//! Key reader thread

use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use console::{Key, Term};
use tokio::sync::mpsc;

use crate::input::{Action, EventSink, InputEvent, InputSource};
use crate::{Error, Result};

/// Map a key to a kiosk action
///
/// W/S or arrows navigate, Enter selects, 3 or Esc goes back, 4 draws a
/// random question, R opens the replay menu and Q quits.
#[must_use]
pub fn map_key(key: &Key) -> Option<Action> {
    match key {
        Key::ArrowUp => Some(Action::Up),
        Key::ArrowDown => Some(Action::Down),
        Key::Enter => Some(Action::Select),
        Key::Escape => Some(Action::Back),
        Key::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Action::Up),
            's' => Some(Action::Down),
            '3' => Some(Action::Back),
            '4' => Some(Action::Random),
            'r' => Some(Action::Repeat),
            'q' => Some(Action::Shutdown),
            _ => None,
        },
        _ => None,
    }
}

/// Keyboard [`InputSource`] reading keys on a dedicated thread
#[derive(Debug)]
pub struct KeyboardInput {
    term: Term,
    line_mode: Arc<AtomicBool>,
    lines: mpsc::UnboundedSender<String>,
}

impl KeyboardInput {
    pub(super) const fn new(
        term: Term,
        line_mode: Arc<AtomicBool>,
        lines: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            term,
            line_mode,
            lines,
        }
    }

    fn read_loop(&self, sink: &EventSink) {
        let mut line = String::new();

        while !sink.is_closed() {
            let key = match self.term.read_key() {
                Ok(key) => key,
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    sink.dispatch(InputEvent::now(Action::Shutdown));
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "keyboard read failed");
                    break;
                }
            };

            if self.line_mode.load(Ordering::SeqCst) {
                self.edit_line(&mut line, &key);
                continue;
            }
            line.clear();

            if let Some(action) = map_key(&key) {
                sink.dispatch(InputEvent::now(action));
            }
        }

        tracing::debug!("keyboard reader stopped");
    }

    fn edit_line(&self, line: &mut String, key: &Key) {
        match key {
            Key::Enter => {
                let _ = self.term.write_line("");
                let _ = self.lines.send(std::mem::take(line));
            }
            Key::Escape => {
                let _ = self.term.write_line("");
                line.clear();
                let _ = self.lines.send(String::new());
            }
            Key::Backspace => {
                if line.pop().is_some() {
                    let _ = self.term.clear_chars(1);
                }
            }
            Key::Char(c) if !c.is_control() => {
                line.push(*c);
                let _ = self.term.write_str(c.encode_utf8(&mut [0; 4]));
            }
            _ => {}
        }
    }
}

impl InputSource for KeyboardInput {
    fn subscribe(self: Box<Self>, sink: EventSink) -> Result<()> {
        std::thread::Builder::new()
            .name("keyboard".to_string())
            .spawn(move || self.read_loop(&sink))
            .map_err(|e| Error::Input(format!("failed to start keyboard reader: {e}")))?;

        tracing::info!("keys mapped: W, S, ENTER, 4, 3, R, Q");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map() {
        assert_eq!(map_key(&Key::Char('w')), Some(Action::Up));
        assert_eq!(map_key(&Key::Char('W')), Some(Action::Up));
        assert_eq!(map_key(&Key::ArrowDown), Some(Action::Down));
        assert_eq!(map_key(&Key::Enter), Some(Action::Select));
        assert_eq!(map_key(&Key::Char('3')), Some(Action::Back));
        assert_eq!(map_key(&Key::Escape), Some(Action::Back));
        assert_eq!(map_key(&Key::Char('4')), Some(Action::Random));
        assert_eq!(map_key(&Key::Char('r')), Some(Action::Repeat));
        assert_eq!(map_key(&Key::Char('q')), Some(Action::Shutdown));
        assert_eq!(map_key(&Key::Char('x')), None);
        assert_eq!(map_key(&Key::Tab), None);
    }
}
