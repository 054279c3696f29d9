//! Shipping address step, shown when billing and delivery addresses differ.

use crate::data::BillingAddress;
use crate::require_click;
use vitrine::{BrowserSession, Gateway, GatewayResult, Locator, WaitCondition};

/// Saved addresses of a signed-in customer
pub const SAVED_ADDRESS: Locator = Locator::id("shipping-address-select");

// New address form
/// First name field
pub const FIRST_NAME: Locator = Locator::id("ShippingNewAddress_FirstName");
/// Last name field
pub const LAST_NAME: Locator = Locator::id("ShippingNewAddress_LastName");
/// Email field
pub const EMAIL: Locator = Locator::id("ShippingNewAddress_Email");
/// Company field
pub const COMPANY: Locator = Locator::id("ShippingNewAddress_Company");
/// Country dropdown
pub const COUNTRY: Locator = Locator::id("ShippingNewAddress_CountryId");
/// State dropdown
pub const STATE: Locator = Locator::id("ShippingNewAddress_StateProvinceId");
/// City field
pub const CITY: Locator = Locator::id("ShippingNewAddress_City");
/// First address line
pub const ADDRESS1: Locator = Locator::id("ShippingNewAddress_Address1");
/// Second address line
pub const ADDRESS2: Locator = Locator::id("ShippingNewAddress_Address2");
/// Zip / postal code field
pub const ZIP_CODE: Locator = Locator::id("ShippingNewAddress_ZipPostalCode");
/// Phone field
pub const PHONE_NUMBER: Locator = Locator::id("ShippingNewAddress_PhoneNumber");
/// Fax field
pub const FAX_NUMBER: Locator = Locator::id("ShippingNewAddress_FaxNumber");

/// Back to the billing step
pub const BACK: Locator = Locator::class_name("back-link");
/// Shares its class with the billing step's button; only the open step
/// renders it visible
pub const CONTINUE: Locator = Locator::class_name("new-address-next-step-button");

/// Shipping address form
#[derive(Debug)]
pub struct ShippingAddressSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> ShippingAddressSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Type every field `address` has a value for, then continue
    ///
    /// Unlike the billing form nothing is prefilled here, so fields are
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Fails if the form does not render, a field cannot be reached or a
    /// dropdown lacks the requested label.
    pub fn fill(&mut self, address: &BillingAddress) -> GatewayResult<()> {
        let timeout = self.gateway.default_timeout();
        self.gateway.resolve(&FIRST_NAME, WaitCondition::Visible, timeout)?;

        let text_fields = [
            (FIRST_NAME, &address.first_name),
            (LAST_NAME, &address.last_name),
            (EMAIL, &address.email),
            (COMPANY, &address.company),
        ];
        for (locator, value) in &text_fields {
            if let Some(value) = value {
                self.gateway.type_text(locator, value)?;
            }
        }
        if let Some(country) = &address.country {
            self.gateway.select_option(&COUNTRY, country)?;
        }
        if let Some(state) = &address.state {
            self.gateway.select_option(&STATE, state)?;
        }
        let text_fields = [
            (CITY, &address.city),
            (ADDRESS1, &address.address1),
            (ADDRESS2, &address.address2),
            (ZIP_CODE, &address.zip_code),
            (PHONE_NUMBER, &address.phone_number),
            (FAX_NUMBER, &address.fax_number),
        ];
        for (locator, value) in &text_fields {
            if let Some(value) = value {
                self.gateway.type_text(locator, value)?;
            }
        }

        tracing::info!("shipping address entered");
        self.proceed()
    }

    /// Ship to one of the customer's saved addresses
    ///
    /// # Errors
    ///
    /// Fails if the dropdown lacks `label` or continue is not clickable.
    pub fn use_saved_address(&mut self, label: &str) -> GatewayResult<()> {
        self.gateway.select_option(&SAVED_ADDRESS, label)?;
        self.proceed()
    }

    /// Click "Continue"
    ///
    /// # Errors
    ///
    /// Propagates the click error.
    pub fn proceed(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &CONTINUE)
    }

    /// Go back to the billing step
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }
}
