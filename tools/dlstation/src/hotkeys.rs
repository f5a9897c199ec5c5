use crossterm::event::{KeyCode, KeyEvent};

/// Everything a key press can mean on the task list. Modal overlays route
/// their own input and never consult this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    AddTask,
    DeleteTask,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

pub const LIST_BINDINGS: [HotkeyBinding; 6] = [
    HotkeyBinding { key: "A", action: "Add download task" },
    HotkeyBinding { key: "D", action: "Delete selected task" },
    HotkeyBinding { key: "R", action: "Refresh list" },
    HotkeyBinding { key: "?", action: "Show this help" },
    HotkeyBinding { key: "Q", action: "Quit" },
    HotkeyBinding { key: "j/k", action: "Move selection" },
];

/// Letter keys are case-insensitive; Esc quits like 'q' does.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' => Some(Action::MoveUp),
            'j' => Some(Action::MoveDown),
            'a' => Some(Action::AddTask),
            'd' => Some(Action::DeleteTask),
            'r' => Some(Action::Refresh),
            '?' => Some(Action::Help),
            'q' => Some(Action::Quit),
            _ => None,
        },
        _ => None,
    }
}

pub fn controls_legend() -> String {
    let parts = LIST_BINDINGS
        .iter()
        .map(|binding| format!("{} ... {}", binding.key, binding.action))
        .collect::<Vec<_>>();
    parts.join("\n")
}
