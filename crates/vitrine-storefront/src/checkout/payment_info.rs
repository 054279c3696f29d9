//! Payment information step.
//!
//! For check or money order the step only shows the mailing instructions;
//! for cards it shows the card form.

use crate::data::PaymentCard;
use crate::require_click;
use vitrine::{BrowserSession, Gateway, GatewayResult, Locator};

// Card form
/// Card type dropdown
pub const CARD_TYPE: Locator = Locator::id("CreditCardType");
/// Cardholder name field
pub const CARDHOLDER_NAME: Locator = Locator::id("CardholderName");
/// Card number field
pub const CARD_NUMBER: Locator = Locator::id("CardNumber");
/// Expiry month dropdown
pub const EXPIRE_MONTH: Locator = Locator::id("ExpireMonth");
/// Expiry year dropdown
pub const EXPIRE_YEAR: Locator = Locator::id("ExpireYear");
/// Security code field
pub const CARD_CODE: Locator = Locator::id("CardCode");

/// Back to the payment method step
pub const BACK: Locator = Locator::class_name("back-link");
/// Continue to order confirmation
pub const CONTINUE: Locator = Locator::class_name("payment-info-next-step-button");

/// Payment details
#[derive(Debug)]
pub struct PaymentInfoSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> PaymentInfoSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Enter `card` and continue
    ///
    /// # Errors
    ///
    /// Fails if a field cannot be reached, a dropdown lacks the requested
    /// label or continue is not clickable.
    pub fn fill_card(&mut self, card: &PaymentCard) -> GatewayResult<()> {
        self.gateway.select_option(&CARD_TYPE, &card.card_type)?;
        self.gateway.type_text(&CARDHOLDER_NAME, &card.cardholder_name)?;
        self.gateway.type_text(&CARD_NUMBER, &card.number)?;
        self.gateway.select_option(&EXPIRE_MONTH, &card.expire_month)?;
        self.gateway.select_option(&EXPIRE_YEAR, &card.expire_year)?;
        self.gateway.type_text(&CARD_CODE, &card.code)?;
        tracing::info!(card_type = %card.card_type, "card details entered");
        self.proceed()
    }

    /// Click "Continue" without entering anything
    ///
    /// # Errors
    ///
    /// Propagates the click error.
    pub fn proceed(&mut self) -> GatewayResult<()> {
        require_click(self.gateway, &CONTINUE)
    }

    /// Go back to the payment method step
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }
}
