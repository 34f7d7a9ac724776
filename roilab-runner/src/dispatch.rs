//! Turn evaluated actions into orders.
//!
//! Only Buy/Sell actions become tickets. In `Latest` mode a ticker yields at
//! most one ticket (its final bar); `All` replays every trade in order, which
//! is mostly useful against the paper broker.

use roilab_core::execution::{Confirmation, ExecutionSink, OrderTicket, Side};
use tracing::{info, warn};

use crate::config::{DispatchConfig, DispatchMode};
use crate::runner::{RunError, TickerReport};

/// Build the tickets for one report.
pub fn build_tickets(
    report: &TickerReport,
    dispatch: &DispatchConfig,
    account_id: &str,
) -> Vec<OrderTicket> {
    let ticket = |index: usize| -> Option<OrderTicket> {
        let side = Side::from_action(report.actions.get(index)?)?;
        Some(OrderTicket {
            account_id: account_id.to_string(),
            ticker: report.ticker.clone(),
            price: report.prices.price(index)?,
            quantity: dispatch.quantity,
            side,
        })
    };

    match dispatch.mode {
        DispatchMode::Latest => report
            .actions
            .len()
            .checked_sub(1)
            .and_then(ticket)
            .into_iter()
            .collect(),
        DispatchMode::All => (0..report.actions.len()).filter_map(ticket).collect(),
    }
}

/// Submit tickets in order, stopping at the first failure.
pub fn submit_all(
    sink: &dyn ExecutionSink,
    tickets: &[OrderTicket],
) -> Result<Vec<Confirmation>, RunError> {
    let mut confirmations = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        match sink.submit(ticket) {
            Ok(confirmation) => {
                info!(
                    sink = sink.name(),
                    ticker = %ticket.ticker,
                    side = %ticket.side,
                    quantity = ticket.quantity,
                    price = ticket.price,
                    order_id = confirmation.order_id.as_deref().unwrap_or("-"),
                    "order submitted"
                );
                confirmations.push(confirmation);
            }
            Err(e) => {
                warn!(sink = sink.name(), ticker = %ticket.ticker, error = %e, "order failed");
                return Err(e.into());
            }
        }
    }
    Ok(confirmations)
}

/// Build and submit orders for every report.
///
/// The account comes from `dispatch.account_id` unless `account_override`
/// is given.
pub fn dispatch_reports(
    sink: &dyn ExecutionSink,
    reports: &[TickerReport],
    dispatch: &DispatchConfig,
    account_override: Option<&str>,
) -> Result<Vec<Confirmation>, RunError> {
    let account_id = account_override
        .or(dispatch.account_id.as_deref())
        .filter(|a| !a.trim().is_empty())
        .ok_or(RunError::MissingAccount)?;

    let tickets: Vec<OrderTicket> = reports
        .iter()
        .flat_map(|r| build_tickets(r, dispatch, account_id))
        .collect();
    if tickets.is_empty() {
        info!(reports = reports.len(), "no orders to dispatch");
        return Ok(Vec::new());
    }
    submit_all(sink, &tickets)
}
