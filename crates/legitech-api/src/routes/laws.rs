//! # Regulatory Monitor API
//!
//! Law listing with derived views, AI-backed discovery, and per-record
//! enrichment. All endpoints sit behind the entitlement gate.
//!
//! ## Endpoints
//!
//! - `GET  /v1/laws`                 — Filtered listing plus derived figures
//! - `POST /v1/laws/discover`        — Ask the advisor for one new regulation
//! - `POST /v1/laws/:law_id/enrich`  — Apply deep analysis to one record

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use legitech_core::{Industry, LawId};
use legitech_laws::{FilteredView, Law, NavTab};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters for the law listing.
#[derive(Debug, Default, Deserialize)]
pub struct LawListQuery {
    /// Navigation tab name. Unknown values fall back to the monitor view.
    pub tab: Option<String>,
    /// Case-insensitive search over title and description.
    pub q: Option<String>,
}

/// Filtered listing plus the figures derived from it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LawListResponse {
    #[schema(value_type = Vec<Object>)]
    pub laws: Vec<Law>,
    pub total: usize,
    /// Mean compliance across the view, rounded; 0 for an empty view.
    pub compliance_pct: u8,
}

impl From<FilteredView> for LawListResponse {
    fn from(view: FilteredView) -> Self {
        Self {
            laws: view.laws,
            total: view.total,
            compliance_pct: view.compliance_pct,
        }
    }
}

/// Request to discover a new regulation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscoverRequest {
    /// Industry to scope the search to.
    #[schema(value_type = String)]
    pub industry: Industry,
}

/// Result of a discovery attempt. `law` is `null` when the advisor had
/// nothing usable; the law book is unchanged in that case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscoverResponse {
    #[schema(value_type = Option<Object>)]
    pub law: Option<Law>,
}

/// Request to enrich one law with deep analysis.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnrichRequest {
    /// Industry context for the analysis. Defaults to mining.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub industry: Option<Industry>,
}

/// The record after enrichment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrichResponse {
    #[schema(value_type = Object)]
    pub law: Law,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the regulatory monitor router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/laws", get(list_laws))
        .route("/v1/laws/discover", post(discover_law))
        .route("/v1/laws/:law_id/enrich", post(enrich_law))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/laws — Filtered listing plus derived compliance figures.
#[utoipa::path(
    get,
    path = "/v1/laws",
    params(
        ("tab" = Option<String>, Query, description = "Navigation tab"),
        ("q" = Option<String>, Query, description = "Search query"),
    ),
    responses(
        (status = 200, description = "Filtered law listing", body = LawListResponse),
        (status = 403, description = "Entitlement denied", body = crate::error::ErrorBody),
    ),
    tag = "laws"
)]
async fn list_laws(
    State(state): State<AppState>,
    Query(query): Query<LawListQuery>,
) -> Json<LawListResponse> {
    let tab = query
        .tab
        .as_deref()
        .map(NavTab::parse_lossy)
        .unwrap_or_default();
    let view = state.laws.view(tab, query.q.as_deref().unwrap_or(""));
    Json(LawListResponse::from(view))
}

/// POST /v1/laws/discover — Ask the advisor for one new relevant regulation.
#[utoipa::path(
    post,
    path = "/v1/laws/discover",
    request_body = DiscoverRequest,
    responses(
        (status = 201, description = "A new law was added to the book", body = DiscoverResponse),
        (status = 200, description = "Discovery yielded nothing; book unchanged", body = DiscoverResponse),
        (status = 503, description = "Advisor not configured", body = crate::error::ErrorBody),
    ),
    tag = "laws"
)]
async fn discover_law(
    State(state): State<AppState>,
    body: Result<Json<DiscoverRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DiscoverResponse>), AppError> {
    let request = extract_json(body)?;
    let advisor = state.advisor.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Servicio de IA no configurado".to_string())
    })?;

    match advisor.discover(request.industry).await {
        Some(law) => {
            state.laws.prepend(law.clone());
            tracing::info!(law_id = %law.id, industry = %request.industry, "law discovered");
            Ok((StatusCode::CREATED, Json(DiscoverResponse { law: Some(law) })))
        }
        // Degraded discovery is a normal outcome, not an error.
        None => Ok((StatusCode::OK, Json(DiscoverResponse { law: None }))),
    }
}

/// POST /v1/laws/:law_id/enrich — Apply deep analysis to one record.
///
/// Idempotent on enriched records: if the law already carries a summary the
/// stored record is returned untouched and the advisor is not called.
#[utoipa::path(
    post,
    path = "/v1/laws/{law_id}/enrich",
    params(("law_id" = Uuid, Path, description = "Law identifier")),
    request_body = EnrichRequest,
    responses(
        (status = 200, description = "Enriched record", body = EnrichResponse),
        (status = 404, description = "Unknown law", body = crate::error::ErrorBody),
        (status = 503, description = "Advisor not configured", body = crate::error::ErrorBody),
    ),
    tag = "laws"
)]
async fn enrich_law(
    State(state): State<AppState>,
    Path(law_id): Path<Uuid>,
    body: Result<Json<EnrichRequest>, JsonRejection>,
) -> Result<Json<EnrichResponse>, AppError> {
    let request = extract_json(body)?;
    let law_id = LawId::from_uuid(law_id);

    let law = state
        .laws
        .get(&law_id)
        .ok_or_else(|| AppError::NotFound("Regulación no encontrada".to_string()))?;
    if law.is_enriched() {
        return Ok(Json(EnrichResponse { law }));
    }

    let advisor = state.advisor.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Servicio de IA no configurado".to_string())
    })?;
    let industry = request.industry.unwrap_or(Industry::Mineria);

    // Never fails; degrades to a labeled fallback patch.
    let analysis = advisor.deep_analyze(&law.title, industry).await;
    let law = state
        .laws
        .apply_analysis(&law_id, &analysis)
        .ok_or_else(|| AppError::NotFound("Regulación no encontrada".to_string()))?;

    Ok(Json(EnrichResponse { law }))
}
