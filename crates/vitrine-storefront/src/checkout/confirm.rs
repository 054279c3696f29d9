//! Confirm order step and the completion page that follows it.

use crate::require_click;
use vitrine::{BrowserSession, Gateway, GatewayResult, Locator};

/// Back to payment information
pub const BACK: Locator = Locator::class_name("back-link");
/// Place the order
pub const CONFIRM: Locator = Locator::class_name("confirm-order-next-step-button");
/// Completion section shown once the order is placed
pub const ORDER_COMPLETED: Locator = Locator::class_name("order-completed");
/// "ORDER NUMBER: 1234"
pub const ORDER_NUMBER: Locator = Locator::class_name("order-number");
/// Back to the home page after completion
pub const COMPLETED_CONTINUE: Locator = Locator::class_name("order-completed-continue-button");

/// Order summary and confirmation
#[derive(Debug)]
pub struct ConfirmOrderSection<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<'g, S: BrowserSession> ConfirmOrderSection<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Place the order and return its number
    ///
    /// # Errors
    ///
    /// Fails if the confirm button is not clickable or the completion page
    /// never shows an order number.
    pub fn confirm(&mut self) -> GatewayResult<String> {
        require_click(self.gateway, &CONFIRM)?;
        let number = self.order_number()?;
        tracing::info!(order = %number, "order placed");
        Ok(number)
    }

    /// Whether the completion section is showing
    pub fn is_completed(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&ORDER_COMPLETED, timeout)
    }

    /// Number of the order just placed, without the label
    ///
    /// # Errors
    ///
    /// Fails if the order number never becomes visible.
    pub fn order_number(&mut self) -> GatewayResult<String> {
        let text = self.gateway.read_text(&ORDER_NUMBER)?;
        Ok(strip_label(&text).to_string())
    }

    /// Go back to payment information
    pub fn back(&mut self) -> bool {
        self.gateway.click(&BACK)
    }

    /// Leave the completion page
    pub fn finish(&mut self) -> bool {
        self.gateway.click(&COMPLETED_CONTINUE)
    }
}

fn strip_label(text: &str) -> &str {
    text.rsplit_once(':').map_or(text, |(_, number)| number).trim()
}
