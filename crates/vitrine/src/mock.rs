//! In-memory browser session for tests.
//!
//! [`MockSession`] keeps a flat DOM of [`MockElement`]s, each stored under a
//! caller-chosen key. Elements can be scripted to appear late, open dialogs
//! on click, or be replaced to invalidate outstanding handles. Every command
//! is appended to a call history (`navigate:`, `find:`, `click:`, ...).
//!
//! ```
//! use vitrine::mock::{ClickEffect, MockElement, MockSession};
//! use vitrine::{BrowserSession, Locator};
//!
//! let mut session = MockSession::new()
//!     .with_element("email", MockElement::input("Email"))
//!     .with_element(
//!         "go",
//!         MockElement::button("search-box-button").on_click(ClickEffect::OpenAlert("Please enter".into())),
//!     );
//!
//! let button = session.find_elements(&Locator::id("search-box-button")).unwrap().remove(0);
//! session.click(&button).unwrap();
//! assert_eq!(session.alert_text().unwrap().as_deref(), Some("Please enter"));
//! ```

use crate::alert::Dialog;
use crate::error::{SessionError, SessionResult};
use crate::locator::{By, Locator};
use crate::session::{BrowserSession, ElementHandle, ScriptArg, SelectOption};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

// =============================================================================
// ELEMENTS
// =============================================================================

/// Side effect of clicking a mock element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Open a native alert with the given text
    OpenAlert(String),
    /// Make the element stored under the key visible
    Reveal(String),
    /// Hide the element stored under the key
    Hide(String),
    /// Remove the element stored under the key
    Remove(String),
    /// Change the current URL
    Navigate(String),
    /// Set the text of the element stored under the key
    SetText(String, String),
}

/// A scripted DOM node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    checked: bool,
    displayed: bool,
    enabled: bool,
    options: Vec<SelectOption>,
    aliases: Vec<Locator>,
    appears_after: Duration,
    stale_checks: u32,
    on_click: Vec<ClickEffect>,
}

impl MockElement {
    /// Create a visible, enabled element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: None,
            checked: false,
            displayed: true,
            enabled: true,
            options: Vec::new(),
            aliases: Vec::new(),
            appears_after: Duration::ZERO,
            stale_checks: 0,
            on_click: Vec::new(),
        }
    }

    /// Empty text `<input>` with an id
    #[must_use]
    pub fn input(id: &str) -> Self {
        Self::new("input")
            .with_id(id)
            .with_attribute("type", "text")
            .with_value("")
    }

    /// Password `<input>` with an id
    #[must_use]
    pub fn password(id: &str) -> Self {
        Self::input(id).with_attribute("type", "password")
    }

    /// Unchecked checkbox with an id
    #[must_use]
    pub fn checkbox(id: &str) -> Self {
        Self::new("input")
            .with_id(id)
            .with_attribute("type", "checkbox")
    }

    /// `<button>` with an id
    #[must_use]
    pub fn button(id: &str) -> Self {
        Self::new("button").with_id(id)
    }

    /// `<a>` with visible text
    #[must_use]
    pub fn link(text: &str) -> Self {
        Self::new("a").with_text(text)
    }

    /// `<select>` with an id and one option per label; the first is selected
    #[must_use]
    pub fn select(id: &str, labels: &[&str]) -> Self {
        let mut element = Self::new("select").with_id(id);
        for (index, label) in labels.iter().enumerate() {
            element = element.with_option(SelectOption {
                label: (*label).to_string(),
                value: index.to_string(),
                selected: index == 0,
            });
        }
        element
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attribute("id", id)
    }

    /// Set the `name` attribute
    #[must_use]
    pub fn with_name(self, name: &str) -> Self {
        self.with_attribute("name", name)
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        let classes = self.attributes.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set the `value` property
    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Mark a checkbox as checked
    #[must_use]
    pub const fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Render the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Render the element disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Append a dropdown option
    #[must_use]
    pub fn with_option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    /// Also match a CSS or XPath locator
    #[must_use]
    pub fn matching(mut self, locator: Locator) -> Self {
        self.aliases.push(locator);
        self
    }

    /// Attach to the document only after `delay` has passed since insertion
    #[must_use]
    pub const fn appearing_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    /// Report the node as stale for the first `checks` visibility checks
    #[must_use]
    pub const fn stale_for(mut self, checks: u32) -> Self {
        self.stale_checks = checks;
        self
    }

    /// Add a click side effect
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click.push(effect);
        self
    }

    /// Value of an attribute
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn is_checkbox(&self) -> bool {
        self.tag == "input"
            && matches!(self.attribute("type"), Some("checkbox" | "radio"))
    }

    fn is_editable(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea") && !self.is_checkbox()
    }

    fn matches(&self, locator: &Locator) -> bool {
        if self.aliases.contains(locator) {
            return true;
        }
        let wanted = locator.value();
        match locator.by() {
            By::Id => self.attribute("id") == Some(wanted),
            By::Name => self.attribute("name") == Some(wanted),
            By::ClassName => {
                let classes: Vec<&str> = self.attribute("class").unwrap_or_default().split_whitespace().collect();
                wanted
                    .split(|c: char| c.is_whitespace() || c == '.')
                    .filter(|class| !class.is_empty())
                    .all(|class| classes.contains(&class))
            }
            By::TagName => self.tag.eq_ignore_ascii_case(wanted),
            By::LinkText => self.tag == "a" && self.text.trim() == wanted.trim(),
            By::PartialLinkText => self.tag == "a" && self.text.contains(wanted),
            By::CssSelector | By::XPath => false,
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

#[derive(Debug, Clone)]
struct MockNode {
    key: String,
    id: String,
    element: MockElement,
    inserted: Instant,
}

impl MockNode {
    fn attached(&self) -> bool {
        self.inserted.elapsed() >= self.element.appears_after
    }

    fn handle(&self) -> ElementHandle {
        ElementHandle::new(self.id.clone(), self.element.tag.clone())
    }
}

/// Mutable state behind a [`MockSession`]
#[derive(Debug, Clone)]
pub struct MockDom {
    nodes: Vec<MockNode>,
    next_id: u64,
    url: String,
    alert: Option<String>,
    dialogs: Vec<Dialog>,
}

impl Default for MockDom {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 1,
            url: "about:blank".to_string(),
            alert: None,
            dialogs: Vec::new(),
        }
    }
}

impl MockDom {
    /// Insert an element under `key`, replacing any element already there
    pub fn insert(&mut self, key: &str, element: MockElement) {
        let id = format!("node-{}", self.next_id);
        self.next_id += 1;
        let node = MockNode {
            key: key.to_string(),
            id,
            element,
            inserted: Instant::now(),
        };
        match self.nodes.iter().position(|n| n.key == key) {
            Some(index) => self.nodes[index] = node,
            None => self.nodes.push(node),
        }
    }

    /// Re-render the element under `key` as a new node; old handles go stale
    pub fn replace(&mut self, key: &str, element: MockElement) {
        self.insert(key, element);
    }

    /// Remove the element under `key`
    pub fn remove(&mut self, key: &str) {
        self.nodes.retain(|n| n.key != key);
    }

    /// Make the element under `key` visible
    pub fn reveal(&mut self, key: &str) {
        if let Some(node) = self.node_mut(key) {
            node.element.displayed = true;
        }
    }

    /// Hide the element under `key`
    pub fn hide(&mut self, key: &str) {
        if let Some(node) = self.node_mut(key) {
            node.element.displayed = false;
        }
    }

    /// Set the rendered text of the element under `key`
    pub fn set_text(&mut self, key: &str, text: &str) {
        if let Some(node) = self.node_mut(key) {
            node.element.text = text.to_string();
        }
    }

    /// Set an attribute of the element under `key`
    pub fn set_attribute(&mut self, key: &str, name: &str, value: &str) {
        if let Some(node) = self.node_mut(key) {
            node.element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Element stored under `key`
    #[must_use]
    pub fn element(&self, key: &str) -> Option<&MockElement> {
        self.node(key).map(|n| &n.element)
    }

    /// Current node id of the element under `key`
    #[must_use]
    pub fn node_id(&self, key: &str) -> Option<&str> {
        self.node(key).map(|n| n.id.as_str())
    }

    /// `value` property of the element under `key`
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<String> {
        self.node(key).and_then(|n| n.element.value.clone())
    }

    /// Checked state of the element under `key`
    #[must_use]
    pub fn is_checked(&self, key: &str) -> bool {
        self.node(key).is_some_and(|n| n.element.checked)
    }

    /// Label of the selected option of the dropdown under `key`
    #[must_use]
    pub fn selected_label(&self, key: &str) -> Option<String> {
        self.node(key)?
            .element
            .options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.label.clone())
    }

    /// Open a native alert
    pub fn open_alert(&mut self, text: &str) {
        self.alert = Some(text.to_string());
    }

    /// Text of the open alert
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Dialogs handled so far, oldest first
    #[must_use]
    pub fn dialogs(&self) -> &[Dialog] {
        &self.dialogs
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the current URL
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    fn node(&self, key: &str) -> Option<&MockNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    fn node_mut(&mut self, key: &str) -> Option<&mut MockNode> {
        self.nodes.iter_mut().find(|n| n.key == key)
    }

    fn live(&mut self, handle: &ElementHandle) -> SessionResult<&mut MockElement> {
        if let Some(text) = &self.alert {
            return Err(SessionError::UnexpectedAlert { text: text.clone() });
        }
        self.nodes
            .iter_mut()
            .find(|n| n.id == handle.id && n.attached())
            .map(|n| &mut n.element)
            .ok_or_else(|| SessionError::StaleElement {
                id: handle.id.clone(),
            })
    }

    fn apply(&mut self, effect: ClickEffect) {
        match effect {
            ClickEffect::OpenAlert(text) => self.open_alert(&text),
            ClickEffect::Reveal(key) => self.reveal(&key),
            ClickEffect::Hide(key) => self.hide(&key),
            ClickEffect::Remove(key) => self.remove(&key),
            ClickEffect::Navigate(url) => self.set_url(&url),
            ClickEffect::SetText(key, text) => self.set_text(&key, &text),
        }
    }

    fn close_alert(&mut self, accept: bool) -> SessionResult<()> {
        let text = self.alert.take().ok_or(SessionError::NoSuchAlert)?;
        let mut dialog = Dialog::alert(text);
        if accept {
            dialog.accept();
        } else {
            dialog.dismiss();
        }
        self.dialogs.push(dialog);
        Ok(())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Handler invoked for scripts containing a registered needle
pub type ScriptHook = Box<dyn FnMut(&mut MockDom, &[ScriptArg]) -> Value + Send>;

/// In-memory [`BrowserSession`]
#[derive(Default)]
pub struct MockSession {
    dom: MockDom,
    hooks: Vec<(String, ScriptHook)>,
    history: Vec<String>,
    closed: bool,
}

impl fmt::Debug for MockSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSession")
            .field("dom", &self.dom)
            .field("hooks", &self.hooks.iter().map(|(needle, _)| needle).collect::<Vec<_>>())
            .field("history", &self.history.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl MockSession {
    /// Create an empty session at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element under `key`
    #[must_use]
    pub fn with_element(mut self, key: &str, element: MockElement) -> Self {
        self.dom.insert(key, element);
        self
    }

    /// Register a script hook
    #[must_use]
    pub fn on_script<F>(mut self, needle: &str, hook: F) -> Self
    where
        F: FnMut(&mut MockDom, &[ScriptArg]) -> Value + Send + 'static,
    {
        self.hooks.push((needle.to_string(), Box::new(hook)));
        self
    }

    /// Document state
    #[must_use]
    pub const fn dom(&self) -> &MockDom {
        &self.dom
    }

    /// Mutable document state
    pub fn dom_mut(&mut self) -> &mut MockDom {
        &mut self.dom
    }

    /// Commands issued so far
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether any command starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of commands starting with `prefix`
    #[must_use]
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.history.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Whether [`BrowserSession::close`] was called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn record(&mut self, entry: String) {
        self.history.push(entry);
    }

    fn ensure_no_alert(&self) -> SessionResult<()> {
        match &self.dom.alert {
            Some(text) => Err(SessionError::UnexpectedAlert { text: text.clone() }),
            None => Ok(()),
        }
    }
}

impl BrowserSession for MockSession {
    fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.record(format!("navigate:{url}"));
        self.ensure_no_alert()?;
        self.dom.set_url(url);
        Ok(())
    }

    fn current_url(&mut self) -> SessionResult<String> {
        Ok(self.dom.url.clone())
    }

    fn find_elements(&mut self, locator: &Locator) -> SessionResult<Vec<ElementHandle>> {
        self.record(format!("find:{locator}"));
        self.ensure_no_alert()?;
        Ok(self
            .dom
            .nodes
            .iter()
            .filter(|n| n.attached() && n.element.matches(locator))
            .map(MockNode::handle)
            .collect())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        let node = self.dom.live(element)?;
        if node.stale_checks > 0 {
            node.stale_checks -= 1;
            return Err(SessionError::StaleElement {
                id: element.id.clone(),
            });
        }
        Ok(node.displayed)
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> SessionResult<bool> {
        Ok(self.dom.live(element)?.enabled)
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<String>> {
        Ok(self.dom.live(element)?.attribute(name).map(str::to_string))
    }

    fn property(&mut self, element: &ElementHandle, name: &str) -> SessionResult<Option<Value>> {
        let node = self.dom.live(element)?;
        Ok(match name {
            "value" if node.tag == "select" => node
                .options
                .iter()
                .find(|o| o.selected)
                .map(|o| Value::String(o.value.clone())),
            "value" => node.value.clone().map(Value::String),
            "checked" => Some(Value::Bool(node.checked)),
            "disabled" => Some(Value::Bool(!node.enabled)),
            "tagName" => Some(Value::String(node.tag.to_ascii_uppercase())),
            other => node.attribute(other).map(|v| Value::String(v.to_string())),
        })
    }

    fn text(&mut self, element: &ElementHandle) -> SessionResult<String> {
        let node = self.dom.live(element)?;
        Ok(if node.displayed {
            node.text.clone()
        } else {
            String::new()
        })
    }

    fn clear(&mut self, element: &ElementHandle) -> SessionResult<()> {
        self.record(format!("clear:{}", element.id));
        let node = self.dom.live(element)?;
        if !node.is_editable() {
            return Err(SessionError::command("invalid element state: element is not editable"));
        }
        node.value = Some(String::new());
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> SessionResult<()> {
        self.record(format!("send_keys:{}:{text}", element.id));
        let node = self.dom.live(element)?;
        if !node.is_editable() || !node.displayed || !node.enabled {
            return Err(SessionError::command("element not interactable"));
        }
        node.value.get_or_insert_with(String::new).push_str(text);
        Ok(())
    }

    fn click(&mut self, element: &ElementHandle) -> SessionResult<()> {
        self.record(format!("click:{}", element.id));
        let node = self.dom.live(element)?;
        if !node.displayed || !node.enabled {
            return Err(SessionError::command("element not interactable"));
        }
        if node.is_checkbox() {
            node.checked = !node.checked;
        }
        let effects = node.on_click.clone();
        for effect in effects {
            self.dom.apply(effect);
        }
        Ok(())
    }

    fn options(&mut self, element: &ElementHandle) -> SessionResult<Vec<SelectOption>> {
        let node = self.dom.live(element)?;
        if node.tag != "select" {
            return Err(SessionError::command("element is not a select"));
        }
        Ok(node.options.clone())
    }

    fn select_index(&mut self, element: &ElementHandle, index: usize) -> SessionResult<()> {
        self.record(format!("select:{}:{index}", element.id));
        let node = self.dom.live(element)?;
        if index >= node.options.len() {
            return Err(SessionError::command(format!(
                "option index {index} out of range for {} options",
                node.options.len()
            )));
        }
        for (i, option) in node.options.iter_mut().enumerate() {
            option.selected = i == index;
        }
        Ok(())
    }

    fn alert_text(&mut self) -> SessionResult<Option<String>> {
        Ok(self.dom.alert.clone())
    }

    fn accept_alert(&mut self) -> SessionResult<()> {
        self.record("accept_alert".to_string());
        self.dom.close_alert(true)
    }

    fn dismiss_alert(&mut self) -> SessionResult<()> {
        self.record("dismiss_alert".to_string());
        self.dom.close_alert(false)
    }

    fn execute_script(&mut self, script: &str, args: &[ScriptArg]) -> SessionResult<Value> {
        self.record(format!("script:{script}"));
        self.ensure_no_alert()?;
        for arg in args {
            if let ScriptArg::Element(handle) = arg {
                self.dom.live(handle)?;
            }
        }
        let dom = &mut self.dom;
        for (needle, hook) in &mut self.hooks {
            if script.contains(needle.as_str()) {
                return Ok(hook(&mut *dom, args));
            }
        }
        Ok(Value::Null)
    }

    fn close(&mut self) -> SessionResult<()> {
        self.record("close".to_string());
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn first(session: &mut MockSession, locator: &Locator) -> ElementHandle {
        session.find_elements(locator).unwrap().remove(0)
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn test_match_by_id_name_and_class() {
            let mut session = MockSession::new().with_element(
                "day",
                MockElement::select("dob", &["1", "2"])
                    .with_name("DateOfBirthDay")
                    .with_class("form-select")
                    .with_class("small"),
            );
            assert_eq!(session.find_elements(&Locator::id("dob")).unwrap().len(), 1);
            assert_eq!(session.find_elements(&Locator::name("DateOfBirthDay")).unwrap().len(), 1);
            assert_eq!(session.find_elements(&Locator::class_name("small form-select")).unwrap().len(), 1);
            assert!(session.find_elements(&Locator::class_name("large")).unwrap().is_empty());
        }

        #[test]
        fn test_link_text_matching() {
            let mut session = MockSession::new().with_element("login", MockElement::link("  Log in "));
            assert_eq!(session.find_elements(&Locator::link_text("Log in")).unwrap().len(), 1);
            assert_eq!(session.find_elements(&Locator::partial_link_text("Log")).unwrap().len(), 1);
        }

        #[test]
        fn test_css_requires_alias() {
            const ITEM: Locator = Locator::css("div.product-item");
            let mut session = MockSession::new()
                .with_element("plain", MockElement::new("div").with_class("product-item"))
                .with_element("aliased", MockElement::new("div").matching(ITEM));
            let found = session.find_elements(&ITEM).unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(Some(found[0].id.as_str()), session.dom().node_id("aliased"));
        }

        #[test]
        fn test_delayed_element_is_absent_until_due() {
            let mut session = MockSession::new()
                .with_element("late", MockElement::input("late").appearing_after(Duration::from_millis(30)));
            assert!(session.find_elements(&Locator::id("late")).unwrap().is_empty());
            std::thread::sleep(Duration::from_millis(40));
            assert_eq!(session.find_elements(&Locator::id("late")).unwrap().len(), 1);
        }
    }

    mod command_tests {
        use super::*;

        #[test]
        fn test_send_keys_appends_and_clear_empties() {
            let mut session = MockSession::new().with_element("e", MockElement::input("Email").with_value("old"));
            let handle = first(&mut session, &Locator::id("Email"));
            session.send_keys(&handle, "!").unwrap();
            assert_eq!(session.dom().value_of("e").as_deref(), Some("old!"));
            session.clear(&handle).unwrap();
            assert_eq!(session.dom().value_of("e").as_deref(), Some(""));
        }

        #[test]
        fn test_replaced_node_is_stale() {
            let mut session = MockSession::new().with_element("e", MockElement::input("Email"));
            let old = first(&mut session, &Locator::id("Email"));
            session.dom_mut().replace("e", MockElement::input("Email"));
            let err = session.send_keys(&old, "x").unwrap_err();
            assert!(err.is_stale());
            let fresh = first(&mut session, &Locator::id("Email"));
            assert_ne!(fresh.id, old.id);
        }

        #[test]
        fn test_click_toggles_checkbox_and_runs_effects() {
            let mut session = MockSession::new()
                .with_element("box", MockElement::checkbox("terms").on_click(ClickEffect::Reveal("msg".into())))
                .with_element("msg", MockElement::new("div").with_id("msg").hidden());
            let handle = first(&mut session, &Locator::id("terms"));
            session.click(&handle).unwrap();
            assert!(session.dom().is_checked("box"));
            assert!(session.dom().element("msg").unwrap().displayed);
        }

        #[test]
        fn test_hidden_element_not_clickable() {
            let mut session = MockSession::new().with_element("b", MockElement::button("b").hidden());
            let handle = first(&mut session, &Locator::id("b"));
            assert!(matches!(session.click(&handle), Err(SessionError::Command { .. })));
        }

        #[test]
        fn test_select_index() {
            let mut session = MockSession::new().with_element("s", MockElement::select("s", &["A", "B"]));
            let handle = first(&mut session, &Locator::id("s"));
            session.select_index(&handle, 1).unwrap();
            assert_eq!(session.dom().selected_label("s").as_deref(), Some("B"));
            assert_eq!(session.property(&handle, "value").unwrap(), Some(Value::String("1".into())));
            assert!(session.select_index(&handle, 5).is_err());
        }
    }

    mod alert_tests {
        use super::*;
        use crate::alert::DialogAction;

        #[test]
        fn test_open_alert_blocks_dom_commands() {
            let mut session = MockSession::new().with_element("e", MockElement::input("Email"));
            let handle = first(&mut session, &Locator::id("Email"));
            session.dom_mut().open_alert("Please enter some search keyword");
            assert!(matches!(
                session.send_keys(&handle, "x"),
                Err(SessionError::UnexpectedAlert { .. })
            ));
            assert!(matches!(
                session.find_elements(&Locator::id("Email")),
                Err(SessionError::UnexpectedAlert { .. })
            ));
        }

        #[test]
        fn test_accept_and_dismiss_record_dialogs() {
            let mut session = MockSession::new();
            assert_eq!(session.accept_alert(), Err(SessionError::NoSuchAlert));
            session.dom_mut().open_alert("one");
            session.accept_alert().unwrap();
            session.dom_mut().open_alert("two");
            session.dismiss_alert().unwrap();
            let dialogs = session.dom().dialogs();
            assert_eq!(dialogs.len(), 2);
            assert_eq!(dialogs[0].action(), &DialogAction::Accept);
            assert_eq!(dialogs[1].message(), "two");
            assert_eq!(dialogs[1].action(), &DialogAction::Dismiss);
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_hook_mutates_dom() {
            let mut session = MockSession::new()
                .with_element("pw", MockElement::password("Password"))
                .on_script("type", |dom, _| {
                    dom.set_attribute("pw", "type", "text");
                    Value::Bool(true)
                });
            let result = session.execute_script("arguments[0].type = 'text';", &[]).unwrap();
            assert_eq!(result, Value::Bool(true));
            assert_eq!(session.dom().element("pw").unwrap().attribute("type"), Some("text"));
        }

        #[test]
        fn test_unmatched_script_returns_null_and_is_recorded() {
            let mut session = MockSession::new();
            let value = session.execute_script("window.scrollTo(0, 0);", &[]).unwrap();
            assert_eq!(value, Value::Null);
            assert_eq!(session.count_calls("script:window.scrollTo"), 1);
        }

        #[test]
        fn test_stale_element_argument() {
            let mut session = MockSession::new().with_element("e", MockElement::input("Email"));
            let handle = first(&mut session, &Locator::id("Email"));
            session.dom_mut().remove("e");
            let err = session
                .execute_script("arguments[0].scrollIntoView();", &[ScriptArg::Element(handle)])
                .unwrap_err();
            assert!(err.is_stale());
        }
    }
}
