use crate::infra::{AppState, AuditDefaults};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use region_audit::audit::{
    analyze_page, analyze_site, Evidence, PageAnalysis, PageEvidence, SiteAnalysis,
};
use region_audit::error::AppError;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum AuditRequestError {
    #[error("site url must not be blank")]
    MissingUrl,
    #[error("site audit requires at least one page")]
    NoPages,
}

impl From<AuditRequestError> for AppError {
    fn from(value: AuditRequestError) -> Self {
        AppError::InvalidRequest(value.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PageAuditRequest {
    pub(crate) url: String,
    pub(crate) depth: u32,
    pub(crate) evidence: Evidence,
    pub(crate) target_audience: Option<String>,
    pub(crate) include_recommendations: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteAuditRequest {
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) pages: Vec<PageEvidence>,
    #[serde(default)]
    pub(crate) target_audience: Option<String>,
    #[serde(default)]
    pub(crate) include_recommendations: Option<bool>,
}

impl SiteAuditRequest {
    fn validate(&self) -> Result<(), AuditRequestError> {
        if self.url.trim().is_empty() {
            return Err(AuditRequestError::MissingUrl);
        }
        if self.pages.is_empty() {
            return Err(AuditRequestError::NoPages);
        }
        Ok(())
    }
}

pub(crate) fn with_audit_routes(defaults: AuditDefaults) -> Router {
    Router::new()
        .route("/api/v1/audit/page", post(audit_page_endpoint))
        .route("/api/v1/audit/site", post(audit_site_endpoint))
        .with_state(defaults)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn audit_page_endpoint(
    State(defaults): State<AuditDefaults>,
    Json(payload): Json<PageAuditRequest>,
) -> Json<PageAnalysis> {
    let PageAuditRequest {
        url,
        depth,
        evidence,
        target_audience,
        include_recommendations,
    } = payload;

    let options = defaults.options(include_recommendations, target_audience);
    let page = PageEvidence {
        url,
        depth,
        evidence,
    };

    Json(analyze_page(page, &options))
}

pub(crate) async fn audit_site_endpoint(
    State(defaults): State<AuditDefaults>,
    Json(payload): Json<SiteAuditRequest>,
) -> Result<Json<SiteAnalysis>, AppError> {
    payload.validate()?;

    let SiteAuditRequest {
        url,
        pages,
        target_audience,
        include_recommendations,
    } = payload;

    let options = defaults.options(include_recommendations, target_audience);
    Ok(Json(analyze_site(url.trim(), pages, &options, Utc::now())))
}
