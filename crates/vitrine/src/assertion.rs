//! Attribute assertions.
//!
//! Checks static DOM attributes such as `placeholder` against expected
//! values. Batch checks collect every mismatch instead of stopping at the
//! first one; an element that never appears is a lookup failure, not a
//! mismatch, and is returned as an error.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::locator::Locator;
use crate::session::BrowserSession;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An attribute that differs from its expected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionMismatch {
    /// Element checked
    pub locator: Locator,
    /// Attribute name
    pub attribute: String,
    /// Expected value
    pub expected: String,
    /// Actual value; `None` when the attribute is absent
    pub actual: Option<String>,
}

impl fmt::Display for AssertionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {}: expected {:?}, found ",
            self.attribute, self.locator, self.expected
        )?;
        match &self.actual {
            Some(actual) => write!(f, "{actual:?}"),
            None => f.write_str("no attribute"),
        }
    }
}

/// Mismatches collected by a batch check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchReport {
    mismatches: Vec<AssertionMismatch>,
}

impl MismatchReport {
    /// Wrap collected mismatches
    #[must_use]
    pub const fn new(mismatches: Vec<AssertionMismatch>) -> Self {
        Self { mismatches }
    }

    /// Whether every check passed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of mismatches
    #[must_use]
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Collected mismatches, in input order
    #[must_use]
    pub fn mismatches(&self) -> &[AssertionMismatch] {
        &self.mismatches
    }

    /// `Ok` when empty, otherwise [`GatewayError::Mismatches`]
    ///
    /// # Errors
    ///
    /// Returns the report itself as an error when it is not empty.
    pub fn into_result(self) -> GatewayResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Mismatches(self))
        }
    }
}

impl From<Vec<AssertionMismatch>> for MismatchReport {
    fn from(mismatches: Vec<AssertionMismatch>) -> Self {
        Self::new(mismatches)
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attribute mismatch(es):", self.mismatches.len())?;
        for (i, mismatch) in self.mismatches.iter().enumerate() {
            write!(f, "\n  {}. {mismatch}", i + 1)?;
        }
        Ok(())
    }
}

/// Attribute checks that borrow a gateway
#[derive(Debug)]
pub struct AttributeAssertions<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> AttributeAssertions<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Check one attribute of the first present match
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ElementNotFound`] if nothing matches in time
    /// - [`GatewayError::AssertionMismatch`] if the value differs
    pub fn assert_attribute_equals(
        &mut self,
        locator: &Locator,
        attribute: &str,
        expected: &str,
        timeout: Duration,
    ) -> GatewayResult<()> {
        match self.check(locator, attribute, expected, timeout)? {
            None => Ok(()),
            Some(mismatch) => Err(mismatch.into()),
        }
    }

    /// Check `attribute` for every `(locator, expected)` pair and collect
    /// all mismatches
    ///
    /// # Errors
    ///
    /// Returns the first lookup failure; mismatches are never errors here.
    pub fn assert_all(
        &mut self,
        pairs: &[(Locator, &str)],
        attribute: &str,
        timeout: Duration,
    ) -> GatewayResult<Vec<AssertionMismatch>> {
        let mut mismatches = Vec::new();
        for (locator, expected) in pairs {
            if let Some(mismatch) = self.check(locator, attribute, expected, timeout)? {
                mismatches.push(mismatch);
            }
        }
        if mismatches.is_empty() {
            tracing::info!(attribute, checked = pairs.len(), "all attributes match");
        } else {
            tracing::warn!(
                attribute,
                checked = pairs.len(),
                mismatched = mismatches.len(),
                "attribute mismatches found"
            );
        }
        Ok(mismatches)
    }

    /// [`assert_all`](Self::assert_all) for `placeholder`, as a report
    ///
    /// # Errors
    ///
    /// Returns the first lookup failure.
    pub fn assert_placeholders(
        &mut self,
        pairs: &[(Locator, &str)],
        timeout: Duration,
    ) -> GatewayResult<MismatchReport> {
        self.assert_all(pairs, "placeholder", timeout).map(MismatchReport::from)
    }

    fn check(
        &mut self,
        locator: &Locator,
        attribute: &str,
        expected: &str,
        timeout: Duration,
    ) -> GatewayResult<Option<AssertionMismatch>> {
        let actual = self.gateway.read_attribute_within(locator, attribute, timeout)?;
        if actual.as_deref() == Some(expected) {
            tracing::debug!(%locator, attribute, expected, "attribute matches");
            return Ok(None);
        }
        tracing::warn!(%locator, attribute, expected, ?actual, "attribute mismatch");
        Ok(Some(AssertionMismatch {
            locator: locator.clone(),
            attribute: attribute.to_string(),
            expected: expected.to_string(),
            actual,
        }))
    }
}
