//! Locators: immutable `(strategy, selector)` pairs.
//!
//! Page objects declare their locators once as `const` items:
//!
//! ```
//! use vitrine::Locator;
//!
//! const EMAIL: Locator = Locator::id("Email");
//! const LOGIN_BUTTON: Locator = Locator::css("button.login-button");
//!
//! assert_eq!(EMAIL.to_string(), r#"id="Email""#);
//! assert_eq!(LOGIN_BUTTON.value(), "button.login-button");
//! ```
//!
//! An empty selector in a `const` item fails const evaluation. Selectors
//! built at runtime go through [`Locator::try_new`].

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// STRATEGY
// =============================================================================

/// Element lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum By {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// CSS selector
    CssSelector,
    /// XPath expression
    XPath,
    /// Exact visible text of a link
    LinkText,
    /// Substring of the visible text of a link
    PartialLinkText,
    /// One or more class names
    ClassName,
    /// Element tag name
    TagName,
}

impl By {
    /// WebDriver name of the strategy
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CssSelector => "css selector",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::ClassName => "class name",
            Self::TagName => "tag name",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LOCATOR
// =============================================================================

/// A strategy plus a non-empty selector value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    by: By,
    value: Cow<'static, str>,
}

impl Locator {
    const fn from_static(by: By, value: &'static str) -> Self {
        assert!(!value.is_empty(), "locator selector must not be empty");
        Self {
            by,
            value: Cow::Borrowed(value),
        }
    }

    /// Locate by `id` attribute
    #[must_use]
    pub const fn id(value: &'static str) -> Self {
        Self::from_static(By::Id, value)
    }

    /// Locate by `name` attribute
    #[must_use]
    pub const fn name(value: &'static str) -> Self {
        Self::from_static(By::Name, value)
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(value: &'static str) -> Self {
        Self::from_static(By::CssSelector, value)
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(value: &'static str) -> Self {
        Self::from_static(By::XPath, value)
    }

    /// Locate a link by its exact visible text
    #[must_use]
    pub const fn link_text(value: &'static str) -> Self {
        Self::from_static(By::LinkText, value)
    }

    /// Locate a link by part of its visible text
    #[must_use]
    pub const fn partial_link_text(value: &'static str) -> Self {
        Self::from_static(By::PartialLinkText, value)
    }

    /// Locate by class name(s)
    #[must_use]
    pub const fn class_name(value: &'static str) -> Self {
        Self::from_static(By::ClassName, value)
    }

    /// Locate by tag name
    #[must_use]
    pub const fn tag_name(value: &'static str) -> Self {
        Self::from_static(By::TagName, value)
    }

    /// Build a locator from a runtime string
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidLocator`] if `value` is empty or blank.
    pub fn try_new(by: By, value: impl Into<String>) -> GatewayResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(GatewayError::InvalidLocator { by });
        }
        Ok(Self {
            by,
            value: Cow::Owned(value),
        })
    }

    /// Lookup strategy
    #[must_use]
    pub const fn by(&self) -> By {
        self.by
    }

    /// Selector value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Equivalent CSS selector, if the strategy has one
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self.by {
            By::Id => Some(format!("[id={}]", css_string(&self.value))),
            By::Name => Some(format!("[name={}]", css_string(&self.value))),
            By::ClassName => Some(
                self.value
                    .split(|c: char| c.is_whitespace() || c == '.')
                    .filter(|class| !class.is_empty())
                    .map(|class| format!("[class~={}]", css_string(class)))
                    .collect(),
            ),
            By::CssSelector | By::TagName => Some(self.value.to_string()),
            By::XPath | By::LinkText | By::PartialLinkText => None,
        }
    }

    /// Equivalent XPath expression, for strategies CSS cannot express
    #[must_use]
    pub fn to_xpath(&self) -> Option<String> {
        match self.by {
            By::XPath => Some(self.value.to_string()),
            By::LinkText => Some(format!(
                "//a[normalize-space(.)={}]",
                xpath_literal(self.value.trim())
            )),
            By::PartialLinkText => Some(format!(
                "//a[contains(., {})]",
                xpath_literal(&self.value)
            )),
            _ => None,
        }
    }

    /// JavaScript expression evaluating to an `Array` of matching nodes
    /// in document order
    #[must_use]
    pub fn to_js_query(&self) -> String {
        if let Some(css) = self.to_css() {
            return format!("Array.from(document.querySelectorAll({}))", js_string(&css));
        }
        let xpath = self.to_xpath().unwrap_or_default();
        format!(
            "(() => {{ const r = document.evaluate({}, document, null, \
             XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
             const out = []; for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
             return out; }})()",
            js_string(&xpath)
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.by, self.value)
    }
}

/// Quote a string as a CSS attribute value
fn css_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Quote a string as a JavaScript literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Quote a string as an XPath literal; XPath 1.0 has no escapes, so mixed
/// quotes need `concat()`
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
