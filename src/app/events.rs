//! Terminal input events

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;

/// Input delivered to the run loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
}

/// Polls crossterm with a tick timeout.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Next input event, or a tick when the poll times out.
    pub fn next(&self) -> Option<AppEvent> {
        if event::poll(self.tick_rate).ok()? {
            match event::read().ok()? {
                Event::Key(key) => Some(AppEvent::Key(key)),
                Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
                Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                _ => None,
            }
        } else {
            Some(AppEvent::Tick)
        }
    }
}

/// True when the event is `code` with no modifiers held.
pub fn is_key(event: &KeyEvent, code: KeyCode) -> bool {
    event.code == code && event.modifiers.is_empty()
}

/// q or Ctrl-C.
pub fn is_quit(event: &KeyEvent) -> bool {
    matches!(
        (event.code, event.modifiers),
        (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}

/// Row movement for the record list; arrows first, vi keys as
/// alternatives. `i32::MIN`/`i32::MAX` mean jump to the first/last row.
pub fn row_delta(event: &KeyEvent) -> Option<i32> {
    match (event.code, event.modifiers) {
        (KeyCode::Up, KeyModifiers::NONE) => Some(-1),
        (KeyCode::Down, KeyModifiers::NONE) => Some(1),
        (KeyCode::PageUp, KeyModifiers::NONE) => Some(-10),
        (KeyCode::PageDown, KeyModifiers::NONE) => Some(10),
        (KeyCode::Home, KeyModifiers::NONE) => Some(i32::MIN),
        (KeyCode::End, KeyModifiers::NONE) => Some(i32::MAX),

        (KeyCode::Char('k'), KeyModifiers::NONE) => Some(-1),
        (KeyCode::Char('j'), KeyModifiers::NONE) => Some(1),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(-10),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(10),
        (KeyCode::Char('g'), KeyModifiers::NONE) => Some(i32::MIN),
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Some(i32::MAX),

        _ => None,
    }
}

/// Column selection movement across the header.
pub fn column_delta(event: &KeyEvent) -> Option<i32> {
    match (event.code, event.modifiers) {
        (KeyCode::Right, KeyModifiers::NONE) => Some(1),
        (KeyCode::Left, KeyModifiers::NONE) => Some(-1),
        (KeyCode::Char('l'), KeyModifiers::NONE) => Some(1),
        (KeyCode::Char('h'), KeyModifiers::NONE) => Some(-1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn row_and_column_keys_map_to_deltas() {
        assert_eq!(row_delta(&key(KeyCode::Down, KeyModifiers::NONE)), Some(1));
        assert_eq!(row_delta(&key(KeyCode::Home, KeyModifiers::NONE)), Some(i32::MIN));
        assert_eq!(column_delta(&key(KeyCode::Left, KeyModifiers::NONE)), Some(-1));
        assert_eq!(column_delta(&key(KeyCode::Char('l'), KeyModifiers::NONE)), Some(1));
        assert_eq!(column_delta(&key(KeyCode::Up, KeyModifiers::NONE)), None);
    }
}
