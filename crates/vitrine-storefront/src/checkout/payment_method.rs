//! Payment method step.

use crate::data::Payment;
use crate::{require_click, set_checked};
use vitrine::{BrowserSession, Gateway, GatewayResult, Locator};

/// "Check / Money Order" radio
pub const CHECK_MONEY_ORDER: Locator = Locator::id("paymentmethod_0");
/// "Credit Card" radio
pub const CREDIT_CARD: Locator = Locator::id("paymentmethod_1");
/// Back to the shipping method step
pub const BACK: Locator = Locator::class_name("back-link");
/// Continue to payment information
pub const CONTINUE: Locator = Locator::class_name("payment-method-next-step-button");

/// Payment method choices
#[derive(Debug)]
pub struct PaymentMethodSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> PaymentMethodSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Pick the radio matching `payment` and continue
    ///
    /// # Errors
    ///
    /// Fails if the radio or the continue button cannot be clicked.
    pub fn select(&mut self, payment: &Payment) -> GatewayResult<()> {
        let radio = match payment {
            Payment::CheckMoneyOrder => CHECK_MONEY_ORDER,
            Payment::CreditCard(_) => CREDIT_CARD,
        };
        tracing::info!(%radio, "selecting payment method");
        set_checked(self.gateway, &radio, true)?;
        require_click(self.gateway, &CONTINUE)
    }

    /// Go back to the shipping method step
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }
}
