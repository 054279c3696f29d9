//! Page objects for the nopCommerce demo storefront.
//!
//! Each page borrows a [`Gateway`] for as long as a scenario step needs it
//! and owns nothing but `const` locators. Locator choice follows the
//! storefront markup: ids where the form has them, class lists for buttons
//! and banners, link text for navigation links.
//!
//! ```
//! use std::time::Duration;
//! use vitrine::mock::{ClickEffect, MockElement, MockSession};
//! use vitrine::{Gateway, GatewayConfig};
//! use vitrine_storefront::{Credentials, LoginPage};
//!
//! let session = MockSession::new()
//!     .with_element("email", MockElement::input("Email"))
//!     .with_element("password", MockElement::password("Password"))
//!     .with_element(
//!         "submit",
//!         MockElement::new("button")
//!             .with_class("button-1 login-button")
//!             .on_click(ClickEffect::Reveal("account".into())),
//!     )
//!     .with_element("account", MockElement::link("My account").with_class("ico-account").hidden());
//!
//! let config = GatewayConfig::new().with_default_timeout(Duration::from_millis(100));
//! let mut gateway = Gateway::new(session, config);
//! let mut login = LoginPage::new(&mut gateway);
//! login.login(&Credentials::new("jane@example.com", "Secret123!")).unwrap();
//! assert!(login.is_logged_in());
//! ```

pub mod checkout;
pub mod data;
pub mod login;
pub mod registration;
pub mod search;

pub use checkout::{
    BillingAddressSection, BillingDetails, CheckoutPage, ConfirmOrderSection, PaymentInfoSection,
    PaymentMethodSection, ShippingAddressSection, ShippingMethodSection,
};
pub use data::{
    AlertKind, AlertMessages, BillingAddress, BirthDate, CheckoutData, Credentials, Gender,
    Payment, PaymentCard, RegistrationForm, SearchData, ShippingMethod, TestData,
};
pub use login::LoginPage;
pub use registration::{PasswordStrength, RegistrationPage};
pub use search::{AdvancedSearch, SearchPage, SortOrder};

use vitrine::{BrowserSession, Gateway, GatewayResult, Locator, ScriptArg, WaitCondition};

/// Click `locator` with the default timeout, keeping the gateway's error
///
/// Page steps that cannot continue without the click use this instead of
/// [`Gateway::click`], which only reports success as a flag.
pub(crate) fn require_click<S: BrowserSession>(
    gateway: &mut Gateway<S>,
    locator: &Locator,
) -> GatewayResult<()> {
    let timeout = gateway.default_timeout();
    gateway.try_click(locator, timeout)
}

/// Type `text` only when the field is currently empty
pub(crate) fn fill_if_empty<S: BrowserSession>(
    gateway: &mut Gateway<S>,
    locator: &Locator,
    text: &str,
) -> GatewayResult<bool> {
    if gateway.read_value(locator)?.is_empty() {
        gateway.type_text(locator, text)?;
        Ok(true)
    } else {
        tracing::debug!(%locator, "field already filled, keeping value");
        Ok(false)
    }
}

/// Click a checkbox or radio when its checked state differs from `checked`
pub(crate) fn set_checked<S: BrowserSession>(
    gateway: &mut Gateway<S>,
    locator: &Locator,
    checked: bool,
) -> GatewayResult<()> {
    if gateway.is_checked(locator)? == checked {
        return Ok(());
    }
    require_click(gateway, locator)
}

const SET_INPUT_TYPE: &str = "arguments[0].setAttribute('type', arguments[1]);";

/// Change the `type` attribute of a visible input, e.g. to unmask a password
pub(crate) fn set_input_type<S: BrowserSession>(
    gateway: &mut Gateway<S>,
    locator: &Locator,
    input_type: &str,
) -> GatewayResult<()> {
    let timeout = gateway.default_timeout();
    let field = gateway.resolve(locator, WaitCondition::Visible, timeout)?;
    gateway.execute_script(
        SET_INPUT_TYPE,
        &[ScriptArg::Element(field), ScriptArg::Value(input_type.into())],
    )?;
    Ok(())
}

const MOUSE_OVER: &str =
    "arguments[0].dispatchEvent(new MouseEvent('mouseover', {bubbles: true}));";

/// Move the pointer over a visible element to open hover menus
pub(crate) fn hover<S: BrowserSession>(
    gateway: &mut Gateway<S>,
    locator: &Locator,
) -> GatewayResult<()> {
    let timeout = gateway.default_timeout();
    let target = gateway.resolve(locator, WaitCondition::Visible, timeout)?;
    tracing::debug!(%locator, "hovering");
    gateway.execute_script(MOUSE_OVER, &[ScriptArg::Element(target)])?;
    Ok(())
}
