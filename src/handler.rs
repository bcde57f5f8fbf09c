use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Action;

/// Map a key press to a controller action. Keys with no meaning return `None`.
///
/// Printable characters always go to the search input, so there is no
/// single-letter quit key. Use Esc or Ctrl+C.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('u') => Some(Action::ClearQuery),
            KeyCode::Char('p') | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Char('n') | KeyCode::Char('j') => Some(Action::Down),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Up | KeyCode::BackTab => Some(Action::Up),
        KeyCode::Down | KeyCode::Tab => Some(Action::Down),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => Some(Action::Insert(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(action_for_key(ctrl('c')), Some(Action::Quit));
    }

    #[test]
    fn test_printable_keys_insert() {
        assert_eq!(action_for_key(key(KeyCode::Char('q'))), Some(Action::Insert('q')));
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Action::Insert('Q'))
        );
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_editing_and_navigation() {
        assert_eq!(action_for_key(key(KeyCode::Esc)), Some(Action::Cancel));
        assert_eq!(action_for_key(key(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(action_for_key(key(KeyCode::Backspace)), Some(Action::Backspace));
        assert_eq!(action_for_key(ctrl('u')), Some(Action::ClearQuery));
        assert_eq!(action_for_key(key(KeyCode::Up)), Some(Action::Up));
        assert_eq!(action_for_key(ctrl('n')), Some(Action::Down));
        assert_eq!(action_for_key(key(KeyCode::End)), Some(Action::Bottom));
        assert_eq!(action_for_key(key(KeyCode::F(1))), None);
        assert_eq!(action_for_key(ctrl('x')), None);
    }
}
