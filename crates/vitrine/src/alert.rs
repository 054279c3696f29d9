//! Native dialog state.
//!
//! A page action may open a dialog; the gateway observes it as
//! [`AlertState::Open`] until it is accepted or dismissed. Sessions keep a
//! log of handled [`Dialog`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed dialog state of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertState {
    /// No dialog is open
    NoAlert,
    /// A dialog is open
    Open {
        /// Dialog message
        text: String,
    },
}

impl AlertState {
    /// Build the state from an optional dialog text
    #[must_use]
    pub fn from_text(text: Option<String>) -> Self {
        text.map_or(Self::NoAlert, |text| Self::Open { text })
    }

    /// Whether a dialog is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Message of the open dialog
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Open { text } => Some(text),
            Self::NoAlert => None,
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAlert => f.write_str("no alert"),
            Self::Open { text } => write!(f, "alert open: {text:?}"),
        }
    }
}

/// Kind of native dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// OK button only
    Alert,
    /// OK and Cancel
    Confirm,
    /// Text input with OK and Cancel
    Prompt,
    /// Leave or stay on unload
    BeforeUnload,
}

impl DialogType {
    /// Parse a CDP dialog type name
    #[must_use]
    pub fn from_cdp(name: &str) -> Self {
        match name {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

/// How a dialog was closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Accepted (OK)
    Accept,
    /// Dismissed (Cancel)
    Dismiss,
    /// Still open
    Pending,
}

/// A dialog seen by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
    action: DialogAction,
}

impl Dialog {
    /// Create a pending dialog
    #[must_use]
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            dialog_type,
            message: message.into(),
            action: DialogAction::Pending,
        }
    }

    /// Create a pending alert
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message)
    }

    /// Dialog kind
    #[must_use]
    pub const fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Dialog message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// How the dialog was closed
    #[must_use]
    pub const fn action(&self) -> &DialogAction {
        &self.action
    }

    /// Mark accepted
    pub fn accept(&mut self) {
        self.action = DialogAction::Accept;
    }

    /// Mark dismissed
    pub fn dismiss(&mut self) {
        self.action = DialogAction::Dismiss;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_state_from_text() {
        assert_eq!(AlertState::from_text(None), AlertState::NoAlert);
        let open = AlertState::from_text(Some("Please enter".into()));
        assert!(open.is_open());
        assert_eq!(open.text(), Some("Please enter"));
        assert_eq!(open.to_string(), r#"alert open: "Please enter""#);
    }

    #[test]
    fn test_dialog_lifecycle() {
        let mut dialog = Dialog::alert("hello");
        assert_eq!(dialog.action(), &DialogAction::Pending);
        dialog.dismiss();
        assert_eq!(dialog.action(), &DialogAction::Dismiss);
        assert_eq!(dialog.dialog_type(), DialogType::Alert);
    }

    #[test]
    fn test_dialog_type_from_cdp() {
        assert_eq!(DialogType::from_cdp("confirm"), DialogType::Confirm);
        assert_eq!(DialogType::from_cdp("alert"), DialogType::Alert);
        assert_eq!(DialogType::from_cdp("beforeunload"), DialogType::BeforeUnload);
    }
}
