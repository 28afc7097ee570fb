use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;
use crate::load::cpu::busy_work;
use crate::load::params::clamp_param;

/// Query string as ordered pairs, so repeated keys are never a rejection.
pub type QueryPairs = Vec<(String, String)>;

/// First value of `key`; later repeats are ignored.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[derive(Debug, Serialize)]
pub struct WorkResponse {
    #[serde(rename = "didWorkMs")]
    pub did_work_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct LeakResponse {
    #[serde(rename = "leakedMB")]
    pub leaked_mb: u64,
    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,
}

/// `GET /work?ms=`
pub async fn work(State(state): State<AppState>, Query(query): Query<QueryPairs>) -> Json<WorkResponse> {
    let limits = &state.limits;
    let ms = clamp_param(first_value(&query, "ms"), limits.default_work_ms, limits.max_work_ms);

    tracing::debug!(ms, "Starting busy loop");
    let did_work_ms = busy_work(ms);

    Json(WorkResponse { did_work_ms })
}

/// `GET /leak?mb=`
pub async fn leak(State(state): State<AppState>, Query(query): Query<QueryPairs>) -> Json<LeakResponse> {
    let limits = &state.limits;
    let mb = clamp_param(first_value(&query, "mb"), limits.default_leak_mb, limits.max_leak_mb);

    let receipt = state.leak_store.leak(mb);
    state.metrics.set_leak_totals(receipt.total_chunks, receipt.total_bytes);
    tracing::info!(
        leaked_mb = receipt.leaked_mb,
        total_chunks = receipt.total_chunks,
        total_bytes = receipt.total_bytes,
        "Leaked buffer retained"
    );

    Json(LeakResponse {
        leaked_mb: receipt.leaked_mb,
        total_chunks: receipt.total_chunks,
    })
}
