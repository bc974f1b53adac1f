use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use droidtail_types::Severity;

use crate::app::{Action, FilterField};

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    DeviceList,
    LogViewer,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        // Device list bindings
        let mut device_list = HashMap::new();
        device_list.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        device_list.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        device_list.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        device_list.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        device_list.insert(KeyBinding::new(KeyCode::Enter), Action::ListSelect);
        device_list.insert(KeyBinding::new(KeyCode::Char('r')), Action::RefreshDevices);
        bindings.insert(KeyContext::DeviceList, device_list);

        // Log viewer bindings
        let mut log_viewer = HashMap::new();
        for severity in Severity::ALL {
            let key = severity.tag().to_ascii_lowercase();
            log_viewer.insert(
                KeyBinding::new(KeyCode::Char(key)),
                Action::ToggleSeverity(severity),
            );
        }
        log_viewer.insert(KeyBinding::new(KeyCode::Char('u')), Action::ToggleUnityOnly);
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('/')),
            Action::OpenFilterInput(FilterField::Substring),
        );
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('r')),
            Action::OpenFilterInput(FilterField::Regex),
        );
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char('[')),
            Action::OpenFilterInput(FilterField::TimeFrom),
        );
        log_viewer.insert(
            KeyBinding::new(KeyCode::Char(']')),
            Action::OpenFilterInput(FilterField::TimeTo),
        );
        log_viewer.insert(KeyBinding::new(KeyCode::Char('t')), Action::ToggleTimeFilter);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('n')), Action::ClearFilters);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('c')), Action::ClearLogs);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('s')), Action::ToggleCapture);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('f')), Action::ToggleFollow);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('j')), Action::ScrollDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Down), Action::ScrollDown(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Char('k')), Action::ScrollUp(1));
        log_viewer.insert(KeyBinding::new(KeyCode::Up), Action::ScrollUp(1));
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::PageDown);
        log_viewer.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::PageUp);
        log_viewer.insert(KeyBinding::new(KeyCode::Char('g')), Action::ScrollToTop);
        log_viewer.insert(
            KeyBinding::shift(KeyCode::Char('G')),
            Action::ScrollToBottom,
        );
        bindings.insert(KeyContext::LogViewer, log_viewer);

        Self { bindings }
    }

    /// Look up an action for the given context, falling back to Global
    pub fn get_action(&self, context: KeyContext, event: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);

        self.bindings
            .get(&context)
            .and_then(|map| map.get(&binding))
            .or_else(|| {
                self.bindings
                    .get(&KeyContext::Global)
                    .and_then(|map| map.get(&binding))
            })
            .cloned()
    }

    /// Key handling while a filter field is being typed: every printable
    /// character goes into the buffer, so this bypasses the binding maps.
    pub fn get_filter_input_action(&self, event: &KeyEvent) -> Option<Action> {
        // Ctrl-c still quits; it must not become a literal 'c'
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            };
        }
        match event.code {
            KeyCode::Esc => Some(Action::CloseFilterInput),
            KeyCode::Enter => Some(Action::ApplyFilterInput),
            KeyCode::Backspace => Some(Action::FilterInputBackspace),
            KeyCode::Char(c) => Some(Action::FilterInputChar(c)),
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_severity_toggles_bound_in_log_viewer() {
        let bindings = KeyBindings::new();
        let action = bindings.get_action(KeyContext::LogViewer, &key('e'));
        assert!(matches!(
            action,
            Some(Action::ToggleSeverity(Severity::Error))
        ));
    }

    #[test]
    fn test_global_fallback() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::DeviceList, &key('q')),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_context_overrides_global() {
        let bindings = KeyBindings::new();
        // 'r' refreshes in the device list but opens regex input in the viewer
        assert!(matches!(
            bindings.get_action(KeyContext::DeviceList, &key('r')),
            Some(Action::RefreshDevices)
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::LogViewer, &key('r')),
            Some(Action::OpenFilterInput(FilterField::Regex))
        ));
    }

    #[test]
    fn test_ctrl_c_quits_while_typing_a_filter() {
        let bindings = KeyBindings::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            bindings.get_filter_input_action(&ctrl_c),
            Some(Action::Quit)
        ));
        // Plain 'c' still types
        assert!(matches!(
            bindings.get_filter_input_action(&key('c')),
            Some(Action::FilterInputChar('c'))
        ));
    }

    #[test]
    fn test_filter_input_captures_characters() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_filter_input_action(&key('x')),
            Some(Action::FilterInputChar('x'))
        ));
        assert!(matches!(
            bindings.get_filter_input_action(&KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE
            )),
            Some(Action::ApplyFilterInput)
        ));
    }
}
