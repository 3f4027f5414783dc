//! HTTP routes
//!
//! Maps requests onto [`Lottery`] operations. Every response is a JSON
//! envelope `{success, err_msg?, ...payload}`; engine errors and malformed
//! requests are reported in the envelope, never by failing the request.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use lottery_core::{Lottery, LotterySnapshot, Participant, PrizeNo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::task::JoinError;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

/// Shared state for route handlers
#[derive(Clone)]
pub struct AppState {
    /// The lottery session
    pub lottery: Arc<Lottery>,
    /// Save after every successful mutation
    pub autosave: bool,
}

impl AppState {
    /// Wrap a lottery for serving
    pub fn new(lottery: Lottery, autosave: bool) -> Self {
        Self {
            lottery: Arc::new(lottery),
            autosave,
        }
    }

    /// Run `op` on the blocking pool; the session lock and snapshot I/O
    /// never run on a runtime worker.
    async fn blocking<T, F>(&self, op: F) -> Result<T, JoinError>
    where
        F: FnOnce(&AppState) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || op(&state)).await
    }

    /// Apply a mutation and autosave on success
    fn mutate<T>(
        &self,
        op: impl FnOnce(&Lottery) -> lottery_core::Result<T>,
    ) -> lottery_core::Result<T> {
        let out = op(&self.lottery)?;
        self.persist();
        Ok(out)
    }

    fn persist(&self) {
        if !self.autosave {
            return;
        }
        if let Err(e) = self.lottery.save_to_file() {
            error!(error = %e, "Autosave failed");
        }
    }
}

/// Uniform response body
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Error text when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
    /// Operation payload, flattened into the envelope
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    fn ok(payload: T) -> Json<Self> {
        Json(Self {
            success: true,
            err_msg: None,
            payload: Some(payload),
        })
    }

    fn err(op: &str, e: impl Display) -> Json<Self> {
        let err_msg = format!("{op}(): {e}");
        warn!(%err_msg, "Request failed");
        Json(Self {
            success: false,
            err_msg: Some(err_msg),
            payload: None,
        })
    }
}

type Reply<T> = Json<Envelope<T>>;

type Outcome<T> = Result<lottery_core::Result<T>, JoinError>;

fn reply<T, P>(op: &str, outcome: Outcome<T>, payload: impl FnOnce(T) -> P) -> Reply<P> {
    match outcome {
        Ok(Ok(value)) => Envelope::ok(payload(value)),
        Ok(Err(e)) => Envelope::err(op, e),
        Err(e) => Envelope::err(op, e),
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/lottery", get(get_lottery))
        .route("/winners", get(get_all_winners))
        .route("/winners/:prize_no", get(get_winners))
        .route("/available/:prize_no", get(get_available))
        .route("/draw", post(draw))
        .route("/redraw", post(redraw))
        .route("/revoke", post(revoke))
        .route("/clear", post(clear))
        .route("/clear_all", post(clear_all))
        .route("/save", post(save))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// `GET /lottery`
#[derive(Debug, Serialize)]
pub struct LotteryPayload {
    /// Full session
    pub lottery: LotterySnapshot,
}

/// `GET /winners`
#[derive(Debug, Serialize)]
pub struct AllWinnersPayload {
    /// Ledger keyed by prize number
    pub winners: BTreeMap<PrizeNo, Vec<Participant>>,
}

/// Winners of one prize
#[derive(Debug, Serialize)]
pub struct WinnersPayload {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Winners
    pub winners: Vec<Participant>,
}

/// `GET /available/:prize_no`
#[derive(Debug, Serialize)]
pub struct AvailablePayload {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Eligible pool
    pub participants: Vec<Participant>,
}

/// `POST /revoke`
#[derive(Debug, Serialize)]
pub struct RevokePayload {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Removed winners
    pub revoked: Vec<Participant>,
}

/// `POST /clear`
#[derive(Debug, Serialize)]
pub struct PrizePayload {
    /// Prize number
    pub prize_no: PrizeNo,
}

/// `POST /save`
#[derive(Debug, Serialize)]
pub struct SavePayload {
    /// Data file written
    pub path: String,
}

/// Empty payload
#[derive(Debug, Serialize)]
pub struct Empty {}

// ─── Requests ────────────────────────────────────────────────────────────────

/// `POST /draw`
#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Override of the prize's configured amount
    #[serde(default)]
    pub amount: Option<i64>,
}

/// `POST /redraw`
#[derive(Debug, Deserialize)]
pub struct RedrawRequest {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Number of winners to add
    pub amount: i64,
}

/// `POST /revoke`
#[derive(Debug, Deserialize)]
pub struct RevokeRequest {
    /// Prize number
    pub prize_no: PrizeNo,
    /// Winner IDs to remove
    pub ids: Vec<String>,
}

/// `POST /clear`
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    /// Prize number
    pub prize_no: PrizeNo,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn get_lottery(State(state): State<AppState>) -> Reply<LotteryPayload> {
    let outcome: Outcome<_> = state.blocking(|s| Ok(s.lottery.snapshot())).await;
    reply("lottery", outcome, |lottery| LotteryPayload { lottery })
}

async fn get_all_winners(State(state): State<AppState>) -> Reply<AllWinnersPayload> {
    let outcome: Outcome<_> = state.blocking(|s| Ok(s.lottery.all_winners())).await;
    reply("winners", outcome, |winners| AllWinnersPayload { winners })
}

async fn get_winners(
    State(state): State<AppState>,
    path: Result<Path<PrizeNo>, PathRejection>,
) -> Reply<WinnersPayload> {
    let prize_no = match path {
        Ok(Path(prize_no)) => prize_no,
        Err(e) => return Envelope::err("winners", e),
    };
    let outcome: Outcome<_> = state.blocking(move |s| Ok(s.lottery.winners(prize_no))).await;
    reply("winners", outcome, |winners| WinnersPayload { prize_no, winners })
}

async fn get_available(
    State(state): State<AppState>,
    path: Result<Path<PrizeNo>, PathRejection>,
) -> Reply<AvailablePayload> {
    let prize_no = match path {
        Ok(Path(prize_no)) => prize_no,
        Err(e) => return Envelope::err("available", e),
    };
    let outcome: Outcome<_> = state
        .blocking(move |s| Ok(s.lottery.available_participants(prize_no)))
        .await;
    reply("available", outcome, |participants| AvailablePayload {
        prize_no,
        participants,
    })
}

async fn draw(
    State(state): State<AppState>,
    body: Result<Json<DrawRequest>, JsonRejection>,
) -> Reply<WinnersPayload> {
    let Json(DrawRequest { prize_no, amount }) = match body {
        Ok(body) => body,
        Err(e) => return Envelope::err("draw", e),
    };
    let outcome: Outcome<_> = state
        .blocking(move |s| {
            s.mutate(|lottery| match amount {
                Some(amount) => lottery.draw_amount(prize_no, amount),
                None => lottery.draw(prize_no),
            })
        })
        .await;
    reply("draw", outcome, |winners| WinnersPayload { prize_no, winners })
}

async fn redraw(
    State(state): State<AppState>,
    body: Result<Json<RedrawRequest>, JsonRejection>,
) -> Reply<WinnersPayload> {
    let Json(RedrawRequest { prize_no, amount }) = match body {
        Ok(body) => body,
        Err(e) => return Envelope::err("redraw", e),
    };
    let outcome: Outcome<_> = state
        .blocking(move |s| s.mutate(|lottery| lottery.redraw(prize_no, amount)))
        .await;
    reply("redraw", outcome, |winners| WinnersPayload { prize_no, winners })
}

async fn revoke(
    State(state): State<AppState>,
    body: Result<Json<RevokeRequest>, JsonRejection>,
) -> Reply<RevokePayload> {
    let Json(RevokeRequest { prize_no, ids }) = match body {
        Ok(body) => body,
        Err(e) => return Envelope::err("revoke", e),
    };
    let outcome: Outcome<_> = state
        .blocking(move |s| s.mutate(|lottery| lottery.revoke(prize_no, &ids)))
        .await;
    reply("revoke", outcome, |revoked| RevokePayload { prize_no, revoked })
}

async fn clear(
    State(state): State<AppState>,
    body: Result<Json<ClearRequest>, JsonRejection>,
) -> Reply<PrizePayload> {
    let Json(ClearRequest { prize_no }) = match body {
        Ok(body) => body,
        Err(e) => return Envelope::err("clear", e),
    };
    let outcome: Outcome<_> = state
        .blocking(move |s| {
            s.mutate(|lottery| {
                lottery.clear_winners(prize_no);
                Ok(())
            })
        })
        .await;
    reply("clear", outcome, |()| PrizePayload { prize_no })
}

async fn clear_all(State(state): State<AppState>) -> Reply<Empty> {
    let outcome: Outcome<_> = state
        .blocking(|s| {
            s.mutate(|lottery| {
                lottery.clear_all_winners();
                Ok(())
            })
        })
        .await;
    reply("clear_all", outcome, |()| Empty {})
}

async fn save(State(state): State<AppState>) -> Reply<SavePayload> {
    let outcome: Outcome<_> = state
        .blocking(|s| -> lottery_core::Result<String> {
            s.lottery.save_to_file()?;
            Ok(s.lottery.data_file_path().display().to_string())
        })
        .await;
    reply("save", outcome, |path| SavePayload { path })
}
