//! Terminal collaborators
//!
//! Lets the kiosk run without audio hardware: keys drive navigation, questions
//! are typed instead of spoken, and speech is printed.

mod keyboard;
mod printed;
mod screen;
mod typed;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use console::Term;
use tokio::sync::mpsc;

pub use keyboard::{KeyboardInput, map_key};
pub use printed::PrintedSpeech;
pub use screen::{TerminalRenderer, layout};
pub use typed::TypedCapture;

/// Keyboard input and typed capture sharing one terminal.
///
/// While the capture is listening the keyboard switches to line entry and
/// hands the finished line over instead of producing actions.
#[must_use]
pub fn open() -> (KeyboardInput, TypedCapture) {
    let term = Term::stdout();
    let line_mode = Arc::new(AtomicBool::new(false));
    let (lines_tx, lines_rx) = mpsc::unbounded_channel();

    let keyboard = KeyboardInput::new(term.clone(), Arc::clone(&line_mode), lines_tx);
    let capture = TypedCapture::new(term, line_mode, lines_rx);
    (keyboard, capture)
}
