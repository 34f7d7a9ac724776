//! In-memory execution sink for dry runs and tests.

use super::{Confirmation, ExecutionError, ExecutionSink, OrderTicket};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Records every accepted ticket; never talks to a broker.
#[derive(Debug, Default)]
pub struct PaperBroker {
    tickets: Mutex<Vec<OrderTicket>>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets accepted so far, in submission order.
    pub fn tickets(&self) -> Vec<OrderTicket> {
        self.tickets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ExecutionSink for PaperBroker {
    fn name(&self) -> &str {
        "paper"
    }

    fn submit(&self, ticket: &OrderTicket) -> Result<Confirmation, ExecutionError> {
        ticket.validate()?;
        let mut tickets = self.tickets.lock().unwrap_or_else(PoisonError::into_inner);
        tickets.push(ticket.clone());
        let order_id = format!("paper-{}", tickets.len());
        info!(
            order_id = %order_id,
            ticker = %ticket.ticker,
            side = %ticket.side,
            price = ticket.price,
            quantity = ticket.quantity,
            "paper order recorded"
        );
        Ok(Confirmation {
            order_id: Some(order_id.clone()),
            status: 200,
            body: serde_json::json!({ "orderId": order_id, "status": "FILLED" }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::Side;

    #[test]
    fn records_in_order_with_sequential_ids() {
        let broker = PaperBroker::new();
        let mut t = OrderTicket {
            account_id: "acct".into(),
            ticker: "SPY".into(),
            price: 100.0,
            quantity: 1,
            side: Side::Buy,
        };
        let c1 = broker.submit(&t).unwrap();
        t.side = Side::Sell;
        let c2 = broker.submit(&t).unwrap();
        assert_eq!(c1.order_id.as_deref(), Some("paper-1"));
        assert_eq!(c2.order_id.as_deref(), Some("paper-2"));
        let sides: Vec<Side> = broker.tickets().iter().map(|t| t.side).collect();
        assert_eq!(sides, vec![Side::Buy, Side::Sell]);
    }

    #[test]
    fn rejects_invalid_ticket_without_recording() {
        let broker = PaperBroker::new();
        let t = OrderTicket {
            account_id: "acct".into(),
            ticker: "SPY".into(),
            price: 100.0,
            quantity: 0,
            side: Side::Buy,
        };
        assert!(broker.submit(&t).is_err());
        assert!(broker.tickets().is_empty());
    }
}
