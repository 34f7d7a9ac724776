//! Realized profit/loss over an action series.
//!
//! One-slot position state machine, no sizing:
//!
//! ```text
//!   Flat { last_cost } --Buy(p)--> Holding { cost: p }
//!   Holding { cost }   --Buy(p)--> Holding { cost: p }        (cost overwritten)
//!   Holding { cost }   --Sell(p)-> Flat { last_cost: cost }   (+= p - cost)
//!   Flat { last_cost } --Sell(p)-> per UnmatchedSell policy
//! ```

use crate::domain::{Action, ActionSeries, PriceSeries};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Position state between actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionState {
    /// No open position. `last_cost` is the cost of the most recently closed
    /// position, if any.
    Flat { last_cost: Option<f64> },
    /// One open position bought at `cost`.
    Holding { cost: f64 },
}

impl Default for PositionState {
    fn default() -> Self {
        PositionState::Flat { last_cost: None }
    }
}

/// How a Sell with no open position is booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedSell {
    /// Book `price - last_cost` (0 if nothing was ever bought). This is the
    /// long-standing behaviour of the tracker.
    #[default]
    ReuseLastCost,
    /// Skip the sell; it does not touch the total.
    Ignore,
}

/// One booked sell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    /// Index of the Buy that set the cost, `None` for an unmatched sell.
    pub entry_index: Option<usize>,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
    /// False when the sell had no open position behind it.
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfitLossReport {
    pub total: f64,
    pub round_trips: Vec<RoundTrip>,
    pub unmatched_sells: usize,
    /// Position state after the last action.
    pub final_state: PositionState,
}

impl ProfitLossReport {
    pub fn matched_trips(&self) -> impl Iterator<Item = &RoundTrip> {
        self.round_trips.iter().filter(|t| t.matched)
    }

    /// Fraction of matched round trips with positive P&L; `None` without any.
    pub fn win_rate(&self) -> Option<f64> {
        let (wins, total) = self
            .matched_trips()
            .fold((0usize, 0usize), |(w, n), t| (w + usize::from(t.pnl > 0.0), n + 1));
        (total > 0).then(|| wins as f64 / total as f64)
    }
}

/// Walk the aligned (action, price) pairs and book every sell.
pub fn profit_loss_report(
    actions: &ActionSeries,
    prices: &PriceSeries,
    policy: UnmatchedSell,
) -> Result<ProfitLossReport, CoreError> {
    if actions.len() != prices.len() {
        return Err(CoreError::LengthMismatch {
            indicators: actions.len(),
            prices: prices.len(),
        });
    }

    let mut report = ProfitLossReport::default();
    let mut state = PositionState::default();
    let mut entry_index: Option<usize> = None;
    let mut last_entry_index: Option<usize> = None;

    for (i, (action, point)) in actions.iter().zip(prices.points()).enumerate() {
        let price = point.price;
        match (action, state) {
            (Action::Buy, _) => {
                state = PositionState::Holding { cost: price };
                entry_index = Some(i);
            }
            (Action::Sell, PositionState::Holding { cost }) => {
                let pnl = price - cost;
                report.total += pnl;
                report.round_trips.push(RoundTrip {
                    entry_index,
                    exit_index: i,
                    entry_price: cost,
                    exit_price: price,
                    pnl,
                    matched: true,
                });
                last_entry_index = entry_index.take();
                state = PositionState::Flat {
                    last_cost: Some(cost),
                };
            }
            (Action::Sell, PositionState::Flat { last_cost }) => {
                report.unmatched_sells += 1;
                if policy == UnmatchedSell::ReuseLastCost {
                    let cost = last_cost.unwrap_or(0.0);
                    let pnl = price - cost;
                    report.total += pnl;
                    report.round_trips.push(RoundTrip {
                        entry_index: last_entry_index,
                        exit_index: i,
                        entry_price: cost,
                        exit_price: price,
                        pnl,
                        matched: false,
                    });
                }
            }
            (Action::Nothing, _) => {}
        }
    }

    report.final_state = state;
    Ok(report)
}

/// Cumulative realized P&L with the default unmatched-sell policy.
pub fn realized_profit_loss(actions: &ActionSeries, prices: &PriceSeries) -> Result<f64, CoreError> {
    profit_loss_report(actions, prices, UnmatchedSell::default()).map(|r| r.total)
}
