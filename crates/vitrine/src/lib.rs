//! Vitrine: element interaction gateway for page-object browser tests
//!
//! Vitrine sits between page objects and a browser session. It owns the
//! retry and timeout contract for element lookups, a typed error taxonomy,
//! and interactions that are safe to repeat (clear before type, scroll into
//! view before click).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌──────────────────────┐
//! │ Page objects │──►│ Gateway              │──►│ BrowserSession       │
//! │ (const       │   │  resolve / wait      │   │  MockSession         │
//! │  Locators)   │   │  type / click / read │   │  ChromiumSession     │
//! └──────────────┘   │  alerts              │   │  (feature `browser`) │
//!        │           └──────────────────────┘   └──────────────────────┘
//!        ▼                      │
//! ┌──────────────┐              ▼
//! │ Attribute    │   ┌──────────────────────┐
//! │ assertions   │   │ InteractionObserver  │──► tracing
//! └──────────────┘   └──────────────────────┘
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod alert;
pub mod assertion;
pub mod config;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod logging;
pub mod mock;
pub mod observe;
pub mod page;
pub mod session;
pub mod wait;

/// Chromium session over CDP
#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening)]
pub mod chromium;

pub use alert::{AlertState, Dialog, DialogAction, DialogType};
pub use assertion::{AssertionMismatch, AttributeAssertions, MismatchReport};
pub use config::{BrowserConfig, BrowserKind, GatewayConfig, SuiteConfig};
pub use error::{GatewayError, GatewayResult, SessionError, SessionResult};
pub use gateway::Gateway;
pub use locator::{By, Locator};
pub use logging::{LogConfig, LogFormat};
pub use observe::{
    Action, InteractionEvent, InteractionObserver, Outcome, RecordingObserver, TracingObserver,
};
pub use page::{PageObject, PageRoute};
pub use session::{BrowserSession, ElementHandle, ScriptArg, SelectOption};
pub use wait::{WaitCondition, WaitOptions, WaitOutcome, Waiter};

#[cfg(feature = "browser")]
pub use chromium::ChromiumSession;

/// Prelude for page objects and tests
pub mod prelude {
    pub use super::{
        AttributeAssertions, BrowserSession, By, Gateway, GatewayConfig, GatewayError,
        GatewayResult, Locator, PageObject, WaitCondition,
    };
}
