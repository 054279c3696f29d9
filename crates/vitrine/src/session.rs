//! Browser session abstraction.
//!
//! A [`BrowserSession`] is the seam between the gateway and whatever drives
//! the browser. Commands are synchronous and map one-to-one onto WebDriver
//! style operations; waiting lives in the gateway, never in a session.

use crate::error::SessionResult;
use crate::locator::Locator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Short-lived reference to a live DOM node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Session-scoped node id
    pub id: String,
    /// Lowercase tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into().to_ascii_lowercase(),
        }
    }
}

/// One `<option>` of a dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Visible label
    pub label: String,
    /// `value` attribute
    pub value: String,
    /// Whether the option is currently selected
    pub selected: bool,
}

impl SelectOption {
    /// Create an unselected option
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected: false,
        }
    }
}

/// Argument passed to [`BrowserSession::execute_script`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    /// Plain JSON value
    Value(Value),
    /// A DOM node, available to the script as an element
    Element(ElementHandle),
}

impl From<ElementHandle> for ScriptArg {
    fn from(handle: ElementHandle) -> Self {
        Self::Element(handle)
    }
}

impl From<Value> for ScriptArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Commands a browser session must support
///
/// Element commands take a handle returned by [`find_elements`]; a handle
/// whose node has been detached yields `SessionError::StaleElement`.
/// While a native dialog is open, DOM commands yield
/// `SessionError::UnexpectedAlert`.
///
/// [`find_elements`]: BrowserSession::find_elements
pub trait BrowserSession {
    /// Navigate to an absolute URL
    fn navigate(&mut self, url: &str) -> SessionResult<()>;

    /// URL of the current document
    fn current_url(&mut self) -> SessionResult<String>;

    /// All nodes matching the locator, in document order
    fn find_elements(&mut self, locator: &Locator) -> SessionResult<Vec<ElementHandle>>;

    /// Whether the node is rendered
    fn is_displayed(&mut self, element: &ElementHandle) -> SessionResult<bool>;

    /// Whether the node accepts interaction
    fn is_enabled(&mut self, element: &ElementHandle) -> SessionResult<bool>;

    /// Value of a DOM attribute
    fn attribute(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<String>>;

    /// Value of a DOM property
    fn property(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<Value>>;

    /// Rendered text
    fn text(&mut self, element: &ElementHandle) -> SessionResult<String>;

    /// Empty an editable control
    fn clear(&mut self, element: &ElementHandle) -> SessionResult<()>;

    /// Type text into the focused control
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> SessionResult<()>;

    /// Click the node
    fn click(&mut self, element: &ElementHandle) -> SessionResult<()>;

    /// Options of a `<select>`
    fn options(&mut self, element: &ElementHandle) -> SessionResult<Vec<SelectOption>>;

    /// Select the option at `index` of a `<select>`
    fn select_index(&mut self, element: &ElementHandle, index: usize) -> SessionResult<()>;

    /// Text of the open dialog, if any
    fn alert_text(&mut self) -> SessionResult<Option<String>>;

    /// Accept the open dialog
    fn accept_alert(&mut self) -> SessionResult<()>;

    /// Dismiss the open dialog
    fn dismiss_alert(&mut self) -> SessionResult<()>;

    /// Run a script; element arguments are passed as nodes via `arguments[i]`
    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> SessionResult<Value>;

    /// End the session
    fn close(&mut self) -> SessionResult<()>;
}

impl<S: BrowserSession + ?Sized> BrowserSession for Box<S> {
    fn navigate(&mut self, url: &str) -> SessionResult<()> {
        (**self).navigate(url)
    }

    fn current_url(&mut self) -> SessionResult<String> {
        (**self).current_url()
    }

    fn find_elements(&mut self, locator: &Locator) -> SessionResult<Vec<ElementHandle>> {
        (**self).find_elements(locator)
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        (**self).is_displayed(element)
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        (**self).is_enabled(element)
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<String>> {
        (**self).attribute(element, name)
    }

    fn property(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<Value>> {
        (**self).property(element, name)
    }

    fn text(&mut self, element: &ElementHandle) -> SessionResult<String> {
        (**self).text(element)
    }

    fn clear(&mut self, element: &ElementHandle) -> SessionResult<()> {
        (**self).clear(element)
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> SessionResult<()> {
        (**self).send_keys(element, text)
    }

    fn click(&mut self, element: &ElementHandle) -> SessionResult<()> {
        (**self).click(element)
    }

    fn options(&mut self, element: &ElementHandle) -> SessionResult<Vec<SelectOption>> {
        (**self).options(element)
    }

    fn select_index(&mut self, element: &ElementHandle, index: usize) -> SessionResult<()> {
        (**self).select_index(element, index)
    }

    fn alert_text(&mut self) -> SessionResult<Option<String>> {
        (**self).alert_text()
    }

    fn accept_alert(&mut self) -> SessionResult<()> {
        (**self).accept_alert()
    }

    fn dismiss_alert(&mut self) -> SessionResult<()> {
        (**self).dismiss_alert()
    }

    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> SessionResult<Value> {
        (**self).execute_script(script, args)
    }

    fn close(&mut self) -> SessionResult<()> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_lowercases_tag() {
        let handle = ElementHandle::new("node-1", "INPUT");
        assert_eq!(handle.tag_name, "input");
    }

    #[test]
    fn test_script_arg_conversions() {
        let handle = ElementHandle::new("node-1", "a");
        assert_eq!(ScriptArg::from(handle.clone()), ScriptArg::Element(handle));
        assert_eq!(
            ScriptArg::from(serde_json::json!(3)),
            ScriptArg::Value(serde_json::json!(3))
        );
    }
}
