use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::{mpsc, Notify};

use crate::app::Action;

/// Forward terminal key presses as actions. Ctrl+C also pokes `quit` so that
/// the sync loop can abandon an in-flight fetch.
pub async fn run_event_loop(tx: mpsc::UnboundedSender<Action>, quit: Arc<Notify>) {
    let mut reader = EventStream::new();

    while let Some(event) = reader.next().await {
        match event {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                let Some(action) = key_to_action(key) else {
                    continue;
                };
                if matches!(action, Action::Quit) {
                    quit.notify_one();
                }
                if tx.send(action).is_err() {
                    break;
                }
            }
            Ok(_) => {
                // Resize and the like: the next draw picks up the new size
            }
            Err(e) => {
                tracing::error!(error = %e, "terminal event stream failed");
                break;
            }
        }
    }
}

fn key_to_action(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Up => Some(Action::Key(KeyAction::Up)),
        KeyCode::Down => Some(Action::Key(KeyAction::Down)),
        KeyCode::Left => Some(Action::Key(KeyAction::Left)),
        KeyCode::Right => Some(Action::Key(KeyAction::Right)),
        KeyCode::Enter => Some(Action::Key(KeyAction::Enter)),
        KeyCode::Esc => Some(Action::Key(KeyAction::Escape)),
        KeyCode::Tab => Some(Action::Key(KeyAction::Tab)),
        KeyCode::BackTab => Some(Action::Key(KeyAction::BackTab)),
        KeyCode::Backspace => Some(Action::Key(KeyAction::Backspace)),
        KeyCode::Char(c) => Some(Action::Key(KeyAction::Char(c))),
        _ => None,
    }
}

/// Keys stay raw here; what a letter means depends on whether text is being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Char(char),
}
