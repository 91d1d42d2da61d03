use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use search_core::corpus::index_directory;
use search_core::{run_query, IndexStats, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    /// Sorted for stable output; the match itself is an unordered set.
    pub doc_ids: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus_dir: PathBuf,
    /// Swapped wholesale on rebuild; readers clone the `Arc` and drop the lock.
    pub index: Arc<RwLock<Arc<InvertedIndex>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn snapshot(&self) -> Arc<InvertedIndex> {
        self.index.read().clone()
    }
}

pub fn build_app(corpus_dir: String) -> Result<Router> {
    build_app_with_token(corpus_dir, std::env::var("ADMIN_TOKEN").ok())
}

pub fn build_app_with_token(corpus_dir: String, admin_token: Option<String>) -> Result<Router> {
    // Build the index at startup; nothing is persisted between runs
    let index = index_directory(&corpus_dir)?;
    let app_state = AppState {
        corpus_dir: PathBuf::from(&corpus_dir),
        index: Arc::new(RwLock::new(Arc::new(index))),
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let index = state.snapshot();
    let hits = run_query(&index, &params.q).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut doc_ids: Vec<String> = hits.into_iter().collect();
    doc_ids.sort();
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits: doc_ids.len(), doc_ids }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.snapshot().stats())
}

async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<IndexStats>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let dir = state.corpus_dir.clone();
    let index = tokio::task::spawn_blocking(move || index_directory(dir))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let stats = index.stats();
    *state.index.write() = Arc::new(index);
    tracing::info!(num_terms = stats.num_terms, num_docs = stats.num_docs, "index rebuilt");
    Ok(Json(stats))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
