//! Key mapping for the chat loop.
//!
//! Keys resolve against the active mode: the model picker when it is open,
//! copy mode while a message is being chosen, and the input box otherwise.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{App, AppAction, UiMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Typing,
    CopySelect,
    Picker,
}

impl KeyContext {
    pub fn from_app(app: &App) -> Self {
        if app.picker.is_some() {
            KeyContext::Picker
        } else if matches!(app.ui.mode, UiMode::CopySelect { .. }) {
            KeyContext::CopySelect
        } else {
            KeyContext::Typing
        }
    }
}

#[derive(Debug)]
pub enum KeyResult {
    Exit,
    /// Submit whatever is currently in the input box.
    Submit,
    InsertNewline,
    /// Hand the key to the textarea.
    TextInput,
    Dispatch(AppAction),
    NotHandled,
}

pub fn map_key(key: &KeyEvent, context: KeyContext) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyResult::Exit;
    }

    match context {
        KeyContext::Picker => map_picker_key(key),
        KeyContext::CopySelect => map_copy_key(key),
        KeyContext::Typing => map_typing_key(key, ctrl),
    }
}

fn map_picker_key(key: &KeyEvent) -> KeyResult {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => AppAction::PickerMoveUp,
        KeyCode::Down | KeyCode::Char('j') => AppAction::PickerMoveDown,
        KeyCode::Home => AppAction::PickerMoveToStart,
        KeyCode::End => AppAction::PickerMoveToEnd,
        KeyCode::Enter => AppAction::PickerApplySelection,
        KeyCode::Esc => AppAction::PickerEscape,
        _ => return KeyResult::NotHandled,
    };
    KeyResult::Dispatch(action)
}

fn map_copy_key(key: &KeyEvent) -> KeyResult {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => AppAction::CopyMoveUp,
        KeyCode::Down | KeyCode::Char('j') => AppAction::CopyMoveDown,
        KeyCode::Enter | KeyCode::Char('c') => AppAction::CopySelected,
        KeyCode::Esc => AppAction::ExitCopyMode,
        _ => return KeyResult::NotHandled,
    };
    KeyResult::Dispatch(action)
}

fn map_typing_key(key: &KeyEvent, ctrl: bool) -> KeyResult {
    if ctrl {
        let action = match key.code {
            KeyCode::Char('p') => AppAction::SuggestPrompt,
            KeyCode::Char('o') => AppAction::OpenModelPicker,
            KeyCode::Char('l') => AppAction::ClearConversation,
            KeyCode::Char('y') => AppAction::EnterCopyMode,
            KeyCode::Char('t') => AppAction::ToggleTheme,
            KeyCode::Home => AppAction::ScrollToTop,
            KeyCode::End => AppAction::ScrollToBottom,
            _ => return KeyResult::TextInput,
        };
        return KeyResult::Dispatch(action);
    }

    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            KeyResult::InsertNewline
        }
        KeyCode::Enter => KeyResult::Submit,
        KeyCode::PageUp => KeyResult::Dispatch(AppAction::PageUp),
        KeyCode::PageDown => KeyResult::Dispatch(AppAction::PageDown),
        KeyCode::Home => KeyResult::Dispatch(AppAction::ScrollToTop),
        KeyCode::End => KeyResult::Dispatch(AppAction::ScrollToBottom),
        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
            KeyResult::Dispatch(AppAction::ScrollUp { lines: 1 })
        }
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
            KeyResult::Dispatch(AppAction::ScrollDown { lines: 1 })
        }
        KeyCode::Esc => KeyResult::NotHandled,
        _ => KeyResult::TextInput,
    }
}
