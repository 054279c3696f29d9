//! Billing address step of the one-page checkout.

use crate::data::BillingAddress;
use crate::{fill_if_empty, require_click, set_checked};
use serde::{Deserialize, Serialize};
use vitrine::{
    AssertionMismatch, AttributeAssertions, BrowserSession, Gateway, GatewayResult, Locator,
    MismatchReport, WaitCondition,
};

/// "Ship to the same address" checkbox
pub const SHIP_TO_SAME_ADDRESS: Locator = Locator::id("ShipToSameAddress");

// Address form fields
/// First name
pub const FIRST_NAME: Locator = Locator::id("BillingNewAddress_FirstName");
/// Last name
pub const LAST_NAME: Locator = Locator::id("BillingNewAddress_LastName");
/// Email
pub const EMAIL: Locator = Locator::id("BillingNewAddress_Email");
/// Inline error under the email field
pub const EMAIL_ERROR: Locator = Locator::id("BillingNewAddress_Email-error");
/// Company
pub const COMPANY: Locator = Locator::id("BillingNewAddress_Company");
/// Country dropdown
pub const COUNTRY: Locator = Locator::id("BillingNewAddress_CountryId");
/// State or province dropdown, repopulated when the country changes
pub const STATE: Locator = Locator::id("BillingNewAddress_StateProvinceId");
/// City
pub const CITY: Locator = Locator::id("BillingNewAddress_City");
/// First address line
pub const ADDRESS1: Locator = Locator::id("BillingNewAddress_Address1");
/// Second address line
pub const ADDRESS2: Locator = Locator::id("BillingNewAddress_Address2");
/// Zip or postal code
pub const ZIP_CODE: Locator = Locator::id("BillingNewAddress_ZipPostalCode");
/// Phone number
pub const PHONE_NUMBER: Locator = Locator::id("BillingNewAddress_PhoneNumber");
/// Fax number
pub const FAX_NUMBER: Locator = Locator::id("BillingNewAddress_FaxNumber");

/// Back to the sign-in step
pub const BACK: Locator = Locator::class_name("back-link");
/// Continue to the next section
pub const CONTINUE: Locator = Locator::class_name("new-address-next-step-button");

/// Placeholders of the free-text address fields; the storefront renders
/// them empty
pub const PLACEHOLDERS: [(Locator, &'static str); 7] = [
    (COMPANY, ""),
    (CITY, ""),
    (ADDRESS1, ""),
    (ADDRESS2, ""),
    (ZIP_CODE, ""),
    (PHONE_NUMBER, ""),
    (FAX_NUMBER, ""),
];

/// Name and email the form is prefilled with for a signed-in customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl BillingDetails {
    /// Create details
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Names of the fields that differ from `expected`
    #[must_use]
    pub fn differences(&self, expected: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.first_name != expected.first_name {
            fields.push("first_name");
        }
        if self.last_name != expected.last_name {
            fields.push("last_name");
        }
        if self.email != expected.email {
            fields.push("email");
        }
        fields
    }
}

/// Billing address form
#[derive(Debug)]
pub struct BillingAddressSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> BillingAddressSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Fill every field `address` has a value for and continue
    ///
    /// Text fields that already hold a value keep it; the storefront
    /// prefills name and email for signed-in customers.
    ///
    /// # Errors
    ///
    /// Fails if the form does not render, a field cannot be reached or a
    /// dropdown lacks the requested label.
    pub fn fill(&mut self, address: &BillingAddress) -> GatewayResult<()> {
        let timeout = self.gateway.default_timeout();
        self.gateway.resolve(&COUNTRY, WaitCondition::Clickable, timeout)?;

        let leading = [
            (FIRST_NAME, &address.first_name),
            (LAST_NAME, &address.last_name),
            (EMAIL, &address.email),
            (COMPANY, &address.company),
        ];
        self.fill_fields(&leading)?;

        if let Some(country) = &address.country {
            self.gateway.select_option(&COUNTRY, country)?;
        }
        if let Some(state) = &address.state {
            self.gateway.select_option(&STATE, state)?;
        }

        let trailing = [
            (CITY, &address.city),
            (ADDRESS1, &address.address1),
            (ADDRESS2, &address.address2),
            (ZIP_CODE, &address.zip_code),
            (PHONE_NUMBER, &address.phone_number),
            (FAX_NUMBER, &address.fax_number),
        ];
        self.fill_fields(&trailing)?;

        tracing::info!("billing address entered");
        require_click(self.gateway, &CONTINUE)
    }

    /// Current name and email values
    ///
    /// # Errors
    ///
    /// Fails if a field never becomes visible.
    pub fn details(&mut self) -> GatewayResult<BillingDetails> {
        Ok(BillingDetails {
            first_name: self.gateway.read_value(&FIRST_NAME)?,
            last_name: self.gateway.read_value(&LAST_NAME)?,
            email: self.gateway.read_value(&EMAIL)?,
        })
    }

    /// Check the prefilled name and email against `expected`
    ///
    /// # Errors
    ///
    /// [`vitrine::GatewayError::Mismatches`] with one entry per differing
    /// field; fails earlier if a field never becomes visible.
    pub fn verify_prefill(&mut self, expected: &BillingDetails) -> GatewayResult<()> {
        let actual = self.details()?;
        let fields = [
            (FIRST_NAME, &expected.first_name, actual.first_name),
            (LAST_NAME, &expected.last_name, actual.last_name),
            (EMAIL, &expected.email, actual.email),
        ];
        let mismatches: Vec<_> = fields
            .into_iter()
            .filter(|(_, expected, actual)| *expected != actual)
            .map(|(locator, expected, actual)| AssertionMismatch {
                locator,
                attribute: "value".to_string(),
                expected: expected.clone(),
                actual: Some(actual),
            })
            .collect();
        if !mismatches.is_empty() {
            tracing::error!(count = mismatches.len(), "billing prefill differs from account");
        }
        MismatchReport::new(mismatches).into_result()
    }

    /// Click "Continue" with nothing filled in, accept the validation
    /// dialog and return its text
    ///
    /// # Errors
    ///
    /// [`vitrine::GatewayError::AlertNotFound`] if no dialog appears.
    pub fn submit_empty(&mut self) -> GatewayResult<String> {
        require_click(self.gateway, &CONTINUE)?;
        let timeout = self.gateway.default_timeout();
        let text = self.gateway.wait_for_alert(timeout)?;
        tracing::info!(text = %text, "billing validation dialog");
        self.gateway.accept_alert()?;
        Ok(text)
    }

    /// Set "Ship to the same address"
    ///
    /// # Errors
    ///
    /// Fails if the checkbox never appears.
    pub fn ship_to_same_address(&mut self, same: bool) -> GatewayResult<()> {
        set_checked(self.gateway, &SHIP_TO_SAME_ADDRESS, same)
    }

    /// Go back to the previous step
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }

    /// Compare the address fields against [`PLACEHOLDERS`]
    ///
    /// # Errors
    ///
    /// Fails if a field never appears; mismatches are in the report.
    pub fn validate_placeholders(&mut self) -> GatewayResult<MismatchReport> {
        let timeout = self.gateway.default_timeout();
        AttributeAssertions::new(self.gateway).assert_placeholders(&PLACEHOLDERS, timeout)
    }

    fn fill_fields(&mut self, fields: &[(Locator, &Option<String>)]) -> GatewayResult<()> {
        for (locator, value) in fields {
            if let Some(value) = value {
                fill_if_empty(self.gateway, locator, value)?;
            }
        }
        Ok(())
    }
}
