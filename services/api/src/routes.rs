use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use career_sponsorship::error::AppError;
use career_sponsorship::workflows::careers::{career_router, CareerStore, TeacherStore};
use career_sponsorship::workflows::sponsorship::{
    sponsorship_router, CodePeriod, SponsorshipCode, SponsorshipService, TemplateCatalog,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CodePreviewQuery {
    #[serde(rename = "secuencia", default)]
    pub(crate) sequence: Option<u32>,
    #[serde(rename = "anio", default)]
    pub(crate) year: Option<i32>,
    #[serde(rename = "mes", default)]
    pub(crate) month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CodePreviewResponse {
    #[serde(rename = "codigo")]
    pub(crate) code: SponsorshipCode,
}

pub(crate) fn with_sponsorship_routes<C, T, K>(
    careers: Arc<C>,
    teachers: Arc<T>,
    catalog: Arc<K>,
    service: Arc<SponsorshipService<K>>,
) -> Router
where
    C: CareerStore + 'static,
    T: TeacherStore + 'static,
    K: TemplateCatalog + 'static,
{
    career_router(Arc::clone(&careers), Arc::clone(&teachers))
        .merge(sponsorship_router(careers, teachers, catalog, service))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/patrocinios/codigo", get(code_preview_endpoint))
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

/// Code a teacher with the given sequence would receive; the current month
/// fills whatever part of the period is omitted.
pub(crate) async fn code_preview_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<CodePreviewQuery>,
) -> Result<Json<CodePreviewResponse>, AppError> {
    let current = CodePeriod::current();
    let period = CodePeriod::new(
        query.year.unwrap_or(current.year),
        query.month.unwrap_or(current.month),
    )?;
    let code = state.codes.generate(query.sequence, period)?;
    Ok(Json(CodePreviewResponse { code }))
}
