//! Key/mouse bindings

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::sim::Intent;

/// Map a terminal event to an intent; anything unbound is ignored
pub fn intent_for_event(event: &Event) -> Option<Intent> {
    match event {
        Event::Key(key) => intent_for_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Intent::Confirm),
            _ => None,
        },
        _ => None,
    }
}

fn intent_for_key(key: &KeyEvent) -> Option<Intent> {
    // Some terminals report releases and repeats too; act on presses only
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Intent::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
            Some(Intent::Flap)
        }
        KeyCode::Enter => Some(Intent::Confirm),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::PauseToggle),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}
