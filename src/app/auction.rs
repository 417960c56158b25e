//! In-memory auction the gate protects.
//!
//! Deliberately small: the interesting behavior of this service lives in
//! front of these handlers, not inside them.

use std::sync::Mutex;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::server::AppState;

/// How many past bids `GET /state` reports.
const HISTORY_WINDOW: usize = 5;

/// One accepted bid.
#[derive(Debug, Clone, Serialize)]
pub struct BidRecord {
    pub bidder: String,
    pub amount: f64,
    /// Acceptance time, serialized ISO-8601.
    pub ts: DateTime<Utc>,
}

#[derive(Debug)]
struct AuctionInner {
    current_bid: f64,
    highest_bidder: String,
    history: Vec<BidRecord>,
}

/// Shared auction state. Mutated under a mutex that is never held across
/// an await point.
#[derive(Debug)]
pub struct AuctionHouse {
    inner: Mutex<AuctionInner>,
}

impl AuctionHouse {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(AuctionInner {
                current_bid: 100.0,
                highest_bidder: "House".to_string(),
                history: Vec::new(),
            }),
        }
    }

    /// Accept a bid: the amount is added to the running total and the
    /// bidder becomes the leader.
    pub fn apply_bid(&self, bidder: &str, amount: f64) {
        let mut inner = self.inner.lock().expect("auction state poisoned");
        inner.current_bid += amount;
        inner.highest_bidder = bidder.to_string();
        inner.history.push(BidRecord {
            bidder: bidder.to_string(),
            amount,
            ts: Utc::now(),
        });
    }

    /// Current total and leader.
    pub fn leader(&self) -> (f64, String) {
        let inner = self.inner.lock().expect("auction state poisoned");
        (inner.current_bid, inner.highest_bidder.clone())
    }

    /// Snapshot with the last [`HISTORY_WINDOW`] bids.
    pub fn snapshot(&self) -> AuctionSnapshot {
        let inner = self.inner.lock().expect("auction state poisoned");
        let start = inner.history.len().saturating_sub(HISTORY_WINDOW);
        AuctionSnapshot {
            current_bid: inner.current_bid,
            highest_bidder: inner.highest_bidder.clone(),
            history: inner.history[start..].to_vec(),
        }
    }
}

impl Default for AuctionHouse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response shape of `GET /state`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSnapshot {
    pub current_bid: f64,
    pub highest_bidder: String,
    pub history: Vec<BidRecord>,
}

/// Payload for `POST /bid`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BidRequest {
    pub amount: Option<f64>,
    pub bidder: Option<String>,
}

/// Current auction standing.
pub async fn auction_state(State(state): State<AppState>) -> Json<AuctionSnapshot> {
    Json(state.auction.snapshot())
}

/// Place a bid, then simulate a slow settlement step before answering.
pub async fn place_bid(State(state): State<AppState>, Json(body): Json<BidRequest>) -> Response {
    let amount = body.amount.unwrap_or(0.0);
    let bidder = body.bidder.unwrap_or_else(|| "Anonymous".to_string());

    if amount <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Bid must be positive" })),
        )
            .into_response();
    }

    state.auction.apply_bid(&bidder, amount);
    tracing::debug!(bidder = %bidder, amount, "Bid accepted");

    // Simulated settlement latency; callers just wait, no timeout here.
    let max_delay = state.config.app.max_bid_delay_ms;
    if max_delay > 0 {
        tokio::time::sleep(Duration::from_millis(fastrand::u64(0..max_delay))).await;
    }

    let (current_bid, highest_bidder) = state.auction.leader();
    Json(json!({
        "status": "accepted",
        "currentBid": current_bid,
        "highestBidder": highest_bidder
    }))
    .into_response()
}
