//! Page object support.
//!
//! A page object describes where a page lives and which element signals
//! that it has rendered. Interaction methods live on the concrete page
//! types, which borrow a [`Gateway`](crate::Gateway) and declare their
//! locators as `const` items.
//!
//! ```
//! use vitrine::{Locator, PageObject};
//!
//! struct LoginPage;
//!
//! impl LoginPage {
//!     const EMAIL: Locator = Locator::id("Email");
//! }
//!
//! impl PageObject for LoginPage {
//!     fn path(&self) -> &str {
//!         "login"
//!     }
//!
//!     fn ready_marker(&self) -> Option<Locator> {
//!         Some(Self::EMAIL)
//!     }
//! }
//!
//! assert_eq!(LoginPage.page_name(), "LoginPage");
//! ```

use crate::locator::Locator;
use std::time::Duration;

/// A page or component of the application under test
pub trait PageObject {
    /// Path relative to the base URL
    fn path(&self) -> &str;

    /// Element that is visible once the page has rendered
    fn ready_marker(&self) -> Option<Locator> {
        None
    }

    /// Timeout for the ready marker; `None` uses the gateway default
    fn load_timeout(&self) -> Option<Duration> {
        None
    }

    /// Short name for logs
    fn page_name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Owned snapshot of a page's location and ready marker
///
/// Page types that hold `&mut Gateway` cannot pass themselves to
/// [`Gateway::open_page`](crate::Gateway::open_page) while the gateway is
/// borrowed; they open a route taken from themselves instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    path: String,
    ready_marker: Option<Locator>,
    load_timeout: Option<Duration>,
    name: String,
}

impl PageRoute {
    /// Snapshot `page`
    pub fn of<P: PageObject + ?Sized>(page: &P) -> Self {
        Self {
            path: page.path().to_string(),
            ready_marker: page.ready_marker(),
            load_timeout: page.load_timeout(),
            name: page.page_name().to_string(),
        }
    }
}

impl PageObject for PageRoute {
    fn path(&self) -> &str {
        &self.path
    }

    fn ready_marker(&self) -> Option<Locator> {
        self.ready_marker.clone()
    }

    fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout
    }

    fn page_name(&self) -> &str {
        &self.name
    }
}
