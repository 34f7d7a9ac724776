//! Order execution sinks.
//!
//! The signal engine only emits actions; a caller may turn Buy/Sell actions
//! into [`OrderTicket`]s and hand them to an [`ExecutionSink`]. The returned
//! confirmation is informational and never feeds back into decisions.

pub mod paper;
pub mod rest;

pub use paper::PaperBroker;
pub use rest::RestBroker;

use crate::domain::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Map a signal to an order side; `Nothing` has none.
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Buy => Some(Side::Buy),
            Action::Sell => Some(Side::Sell),
            Action::Nothing => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// A single-leg equity order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub account_id: String,
    pub ticker: String,
    pub price: f64,
    pub quantity: u32,
    pub side: Side,
}

impl OrderTicket {
    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.account_id.trim().is_empty() {
            return Err(ExecutionError::InvalidTicket("account_id is empty".into()));
        }
        if self.ticker.trim().is_empty() {
            return Err(ExecutionError::InvalidTicket("ticker is empty".into()));
        }
        if self.quantity == 0 {
            return Err(ExecutionError::InvalidTicket("quantity must be >= 1".into()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ExecutionError::InvalidTicket(format!(
                "price must be finite and > 0, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// Acknowledgement returned by a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Broker-assigned order id, when the broker reports one.
    pub order_id: Option<String>,
    /// HTTP status or a synthetic code for non-HTTP sinks.
    pub status: u16,
    /// Raw response payload, kept for auditing.
    pub body: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("order rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid order ticket: {0}")]
    InvalidTicket(String),
}

/// Destination for order tickets.
pub trait ExecutionSink: Send + Sync {
    fn name(&self) -> &str;

    fn submit(&self, ticket: &OrderTicket) -> Result<Confirmation, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> OrderTicket {
        OrderTicket {
            account_id: "123".into(),
            ticker: "SPY".into(),
            price: 470.5,
            quantity: 1,
            side: Side::Buy,
        }
    }

    #[test]
    fn side_from_action() {
        assert_eq!(Side::from_action(Action::Buy), Some(Side::Buy));
        assert_eq!(Side::from_action(Action::Sell), Some(Side::Sell));
        assert_eq!(Side::from_action(Action::Nothing), None);
    }

    #[test]
    fn ticket_validation() {
        assert!(ticket().validate().is_ok());
        let mut t = ticket();
        t.quantity = 0;
        assert!(t.validate().is_err());
        let mut t = ticket();
        t.price = f64::NAN;
        assert!(t.validate().is_err());
        let mut t = ticket();
        t.account_id = " ".into();
        assert!(t.validate().is_err());
    }
}
