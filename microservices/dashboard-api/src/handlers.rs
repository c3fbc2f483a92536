//! HTTP handlers for the dashboard API

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use dashboard_engine::{
    CacheStats, FilterValue, ViewDefinition, ViewResult, ViewStatus,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, Error, Result};

/// `?filter=` query parameter; absent means "All"
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

impl FilterQuery {
    pub fn value(&self) -> FilterValue {
        self.filter
            .as_deref()
            .map(FilterValue::new)
            .unwrap_or_default()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Ready check response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub rows: usize,
}

/// Stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

/// Dropdown options
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub options: Vec<FilterValue>,
    pub default: FilterValue,
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: &'static [ViewDefinition],
}

/// Every view for one filter
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub filter: FilterValue,
    pub dispatch_id: Uuid,
    pub views: BTreeMap<&'static str, ViewStatus>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: String,
    pub filter: FilterValue,
    pub result: Arc<ViewResult>,
}

// ============================================
// Health & Metrics Handlers
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    // The dataset is loaded before the server starts, so a running server
    // is always ready; an empty dataset still serves empty views.
    Json(ReadyResponse {
        ready: true,
        rows: state.dispatcher.dataset().len(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime_secs: state.uptime_secs(),
        cache: state.dispatcher.cache().stats(),
    })
}

// ============================================
// Dashboard Handlers
// ============================================

pub async fn list_filters(State(state): State<AppState>) -> Json<FiltersResponse> {
    Json(FiltersResponse {
        options: FilterValue::options(state.dispatcher.dataset()),
        default: FilterValue::all(),
    })
}

pub async fn list_views(State(state): State<AppState>) -> Json<ViewsResponse> {
    Json(ViewsResponse {
        views: state.dispatcher.views(),
    })
}

/// Recompute the whole dashboard for a filter. Expensive views that do not
/// settle within the configured wait are reported with their status and keep
/// computing in the background.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<DashboardResponse> {
    let filter = query.value();
    let change = state.dispatcher.on_filter_change(&filter);
    let dispatch_id = change.dispatch_id();
    let wait = state.config.view_wait;

    let settled = join_all(
        change
            .into_outcomes()
            .into_iter()
            .map(|(name, outcome)| async move { (name, outcome.settle_within(wait).await) }),
    )
    .await;

    let views: BTreeMap<&'static str, ViewStatus> = settled.into_iter().collect();
    debug!(
        %dispatch_id,
        filter = %filter,
        unsettled = views.values().filter(|s| !s.is_settled()).count(),
        "Dashboard served"
    );

    Json(DashboardResponse {
        filter,
        dispatch_id,
        views,
    })
}

/// A single view. Expensive views are awaited until they settle.
pub async fn get_view(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ViewResponse>> {
    let filter = query.value();
    let result = state.dispatcher.compute(&filter, &name).await?;

    Ok(Json(ViewResponse {
        view: name,
        filter,
        result,
    }))
}

/// Cache status of a view without triggering a computation
pub async fn view_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Value>> {
    let filter = query.value();
    let status = state.dispatcher.status(&filter, &name)?;

    let mut body = match status {
        Some(status) => {
            serde_json::to_value(status).map_err(|e| Error::Internal(e.to_string()))?
        }
        None => json!({ "status": "none" }),
    };
    if let Some(fields) = body.as_object_mut() {
        fields.insert("view".to_string(), json!(name));
        fields.insert("filter".to_string(), json!(filter));
    }

    Ok(Json(body))
}
