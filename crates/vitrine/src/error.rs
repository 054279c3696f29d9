//! Result and error types for Vitrine.

use crate::assertion::{AssertionMismatch, MismatchReport};
use crate::locator::{By, Locator};
use crate::wait::WaitCondition;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type for browser session commands
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors reported by a browser session for a single command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The referenced node is no longer attached to the document
    #[error("Stale element reference: {id}")]
    StaleElement {
        /// Handle id of the detached node
        id: String,
    },

    /// No dialog is open
    #[error("No alert is open")]
    NoSuchAlert,

    /// A dialog is open and blocks DOM commands
    #[error("Unexpected alert open: {text:?}")]
    UnexpectedAlert {
        /// Dialog message
        text: String,
    },

    /// Script evaluation failed
    #[error("Script failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Any other command failure
    #[error("Session command failed: {message}")]
    Command {
        /// Error message
        message: String,
    },

    /// Browser could not be started or connected
    #[error("Failed to launch browser: {message}")]
    Launch {
        /// Error message
        message: String,
    },
}

impl SessionError {
    /// Create a command error
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Check if this is a stale-element error
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }
}

/// Errors that can occur in the gateway and the layers on top of it
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Condition never held within the timeout
    #[error("No element matching {locator} became {condition} within {}ms", .timeout.as_millis())]
    ElementNotFound {
        /// Locator that was polled
        locator: Locator,
        /// Condition that never held
        condition: WaitCondition,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// Dropdown has no option with the requested label
    #[error("Dropdown {locator} has no option labelled {label:?} (available: {available:?})")]
    OptionNotFound {
        /// Dropdown locator
        locator: Locator,
        /// Requested label
        label: String,
        /// Labels that were present
        available: Vec<String>,
    },

    /// No dialog appeared within the timeout
    #[error("No alert appeared within {}ms", .timeout.as_millis())]
    AlertNotFound {
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// Accept or dismiss called with no dialog open
    #[error("No active alert to accept or dismiss")]
    NoActiveAlert,

    /// Attribute value differs from the expected one
    #[error("{0}")]
    AssertionMismatch(Box<AssertionMismatch>),

    /// A batch of attribute checks had mismatches
    #[error("{0}")]
    Mismatches(MismatchReport),

    /// Condition cannot be evaluated against elements
    #[error("Condition {condition} does not apply to element locators")]
    InvalidCondition {
        /// Rejected condition
        condition: WaitCondition,
    },

    /// Locator with an empty selector
    #[error("Locator {by} requires a non-empty selector")]
    InvalidLocator {
        /// Strategy of the rejected locator
        by: By,
    },

    /// Session command failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Test data file missing or malformed
    #[error("Test data {path:?}: {message}")]
    TestData {
        /// Path of the data file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is a timeout of any kind
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::AlertNotFound { .. }
        )
    }
}

impl From<AssertionMismatch> for GatewayError {
    fn from(mismatch: AssertionMismatch) -> Self {
        Self::AssertionMismatch(Box::new(mismatch))
    }
}
