//! REST brokerage client.
//!
//! Posts a single-leg DAY equity order as JSON to
//! `{base_url}/accounts/{account_id}/orders` with a bearer token. Any non-2xx
//! response is a rejection; there are no retries here.

use super::{Confirmation, ExecutionError, ExecutionSink, OrderTicket};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Instrument<'a> {
    symbol: &'a str,
    asset_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderLeg<'a> {
    instruction: &'static str,
    quantity: u32,
    instrument: Instrument<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody<'a> {
    order_type: &'static str,
    session: &'static str,
    duration: &'static str,
    order_strategy_type: &'static str,
    order_leg_collection: Vec<OrderLeg<'a>>,
    price: f64,
}

fn order_body(ticket: &OrderTicket) -> OrderBody<'_> {
    let instruction = match ticket.side {
        super::Side::Buy => "BUY",
        super::Side::Sell => "SELL",
    };
    OrderBody {
        order_type: "LIMIT",
        session: "NORMAL",
        duration: "DAY",
        order_strategy_type: "SINGLE",
        order_leg_collection: vec![OrderLeg {
            instruction,
            quantity: ticket.quantity,
            instrument: Instrument {
                symbol: &ticket.ticker,
                asset_type: "EQUITY",
            },
        }],
        price: ticket.price,
    }
}

pub struct RestBroker {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
}

impl RestBroker {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self, ExecutionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ExecutionError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn orders_url(&self, account_id: &str) -> String {
        format!("{}/accounts/{account_id}/orders", self.base_url)
    }
}

impl ExecutionSink for RestBroker {
    fn name(&self) -> &str {
        "rest"
    }

    fn submit(&self, ticket: &OrderTicket) -> Result<Confirmation, ExecutionError> {
        ticket.validate()?;

        let url = self.orders_url(&ticket.account_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&order_body(ticket))
            .send()
            .map_err(|e| ExecutionError::Transport(e.to_string()))?;

        let status = resp.status();
        let order_id = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| loc.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let text = resp
            .text()
            .map_err(|e| ExecutionError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(ticker = %ticket.ticker, side = %ticket.side, %status, "order rejected");
            return Err(ExecutionError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        info!(ticker = %ticket.ticker, side = %ticket.side, %status, "order submitted");
        Ok(Confirmation {
            order_id,
            status: status.as_u16(),
            body,
        })
    }
}
