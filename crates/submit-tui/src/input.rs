use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    BeginLoading,
    CancelLoading,
    BeginSuccess,
    RunFullCycle,
    Reset,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        // Button operations
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::BeginLoading,
        (KeyCode::Enter, KeyModifiers::NONE) => Action::BeginLoading,
        (KeyCode::Char('c'), KeyModifiers::NONE) => Action::CancelLoading,
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::BeginSuccess,
        (KeyCode::Char('f'), KeyModifiers::NONE) => Action::RunFullCycle,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Reset,

        _ => Action::None,
    }
}
