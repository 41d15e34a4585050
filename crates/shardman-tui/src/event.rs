//! Event handling for the dashboard.
//!
//! Maps raw crossterm key events to application events. The handler owns a
//! single mode flag for the chat compose prompt; everything else is
//! stateless mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Navigate up (selection or log scroll)
    NavigateUp,
    /// Navigate down (selection or log scroll)
    NavigateDown,
    /// Cycle the horizontal cursor left, or leave the log viewer
    NavigateLeft,
    /// Cycle the horizontal cursor right
    NavigateRight,
    /// Run the focused action
    Confirm,
    /// Toggle enable/disable for the focused shard
    ToggleEnable,
    /// Open the chat compose prompt
    ComposeChat,
    /// Leave the current mode, or quit at top level
    Back,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Character typed into the compose prompt
    TextInput(char),
    /// Backspace in the compose prompt
    Backspace,
    /// Submit the compose prompt
    Submit,
    /// Compose prompt dismissed without sending
    Cancel,
    /// No action needed
    None,
}

/// Input handler converting key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Whether the chat compose prompt is active
    compose_mode: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            compose_mode: false,
        }
    }

    /// Set whether the compose prompt is active.
    pub fn set_compose_mode(&mut self, active: bool) {
        self.compose_mode = active;
    }

    /// Returns whether the compose prompt is active.
    pub fn is_compose_mode(&self) -> bool {
        self.compose_mode
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        if self.compose_mode {
            return self.handle_compose_input(key);
        }

        self.handle_normal_mode(key)
    }

    /// Handle input while the compose prompt is open.
    fn handle_compose_input(&mut self, key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Enter => {
                self.compose_mode = false;
                AppEvent::Submit
            }
            KeyCode::Esc => {
                self.compose_mode = false;
                AppEvent::Cancel
            }
            KeyCode::Backspace => AppEvent::Backspace,
            KeyCode::Char(c) => AppEvent::TextInput(c),
            _ => AppEvent::None,
        }
    }

    /// Handle input in normal navigation mode.
    fn handle_normal_mode(&mut self, key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => AppEvent::Back,

            KeyCode::Up | KeyCode::Char('k') => AppEvent::NavigateUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::NavigateDown,
            KeyCode::Left | KeyCode::Char('h') => AppEvent::NavigateLeft,
            KeyCode::Right | KeyCode::Char('l') => AppEvent::NavigateRight,

            KeyCode::Enter => AppEvent::Confirm,

            KeyCode::Char('e') | KeyCode::Char('E') => AppEvent::ToggleEnable,

            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.compose_mode = true;
                AppEvent::ComposeChat
            }

            _ => AppEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_event_with_mods(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_navigation_keys() {
        let mut handler = InputHandler::new();

        assert_eq!(handler.handle_key(key_event(KeyCode::Up)), AppEvent::NavigateUp);
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Down)),
            AppEvent::NavigateDown
        );
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('j'))),
            AppEvent::NavigateDown
        );
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('h'))),
            AppEvent::NavigateLeft
        );
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Right)),
            AppEvent::NavigateRight
        );
    }

    #[test]
    fn test_confirm_and_toggle() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Enter)), AppEvent::Confirm);
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('e'))),
            AppEvent::ToggleEnable
        );
    }

    #[test]
    fn test_back_keys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('q'))), AppEvent::Back);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), AppEvent::Back);
    }

    #[test]
    fn test_compose_mode_activation_and_input() {
        let mut handler = InputHandler::new();
        assert!(!handler.is_compose_mode());

        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('c'))),
            AppEvent::ComposeChat
        );
        assert!(handler.is_compose_mode());

        // Navigation keys become text while composing
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Char('j'))),
            AppEvent::TextInput('j')
        );
        assert_eq!(
            handler.handle_key(key_event(KeyCode::Backspace)),
            AppEvent::Backspace
        );
    }

    #[test]
    fn test_compose_submit_leaves_mode() {
        let mut handler = InputHandler::new();
        handler.set_compose_mode(true);
        assert_eq!(handler.handle_key(key_event(KeyCode::Enter)), AppEvent::Submit);
        assert!(!handler.is_compose_mode());
    }

    #[test]
    fn test_compose_escape_cancels() {
        let mut handler = InputHandler::new();
        handler.set_compose_mode(true);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), AppEvent::Cancel);
        assert!(!handler.is_compose_mode());
    }

    #[test]
    fn test_ctrl_c_force_quit_in_any_mode() {
        let mut handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key_event_with_mods(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppEvent::ForceQuit
        );

        handler.set_compose_mode(true);
        assert_eq!(
            handler.handle_key(key_event_with_mods(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppEvent::ForceQuit
        );
    }
}
