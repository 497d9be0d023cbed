//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{
    CleanRequest, CleanResponse, DisplayRequest, ErrorResponse, SelectionRequest,
    SelectionResponse, ViewResponse,
};
use crate::error::Error;
use crate::mix::{Selection, YearCatalog};
use crate::region::{Region, RegionId};
use crate::source::{GenerationFetcher, ImportExportFetcher};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn from_error(err: &Error) -> ApiError {
    let status = match err {
        Error::UnknownRegion(_) | Error::UnknownYear(_) | Error::UnknownSubset(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::Fetch(_) => StatusCode::BAD_GATEWAY,
        Error::NoYears | Error::CapacityTable { .. } | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    api_error(status, err.to_string())
}

fn committed_view<S>(state: &AppState<S>) -> Result<ViewResponse, ApiError>
where
    S: GenerationFetcher + ImportExportFetcher,
{
    let dashboard = &state.dashboard;
    dashboard
        .view()
        .map(|view| ViewResponse::new(view, dashboard.subsets(), &state.capacity_years))
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, "no data committed yet"))
}

/// `GET /view` → 200 + `ViewResponse`, or 503 before the first commit.
pub async fn get_view<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ViewResponse>, ApiError>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    committed_view(&state).map(Json)
}

/// `GET /regions` → 200 + `Vec<Region>`
pub async fn get_regions<S>(State(state): State<Arc<AppState<S>>>) -> Json<Vec<Region>>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    Json(state.dashboard.regions().regions().to_vec())
}

/// `GET /years` → 200 + years, newest first
pub async fn get_years<S>(State(state): State<Arc<AppState<S>>>) -> Json<YearCatalog>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    Json(state.dashboard.years().clone())
}

/// Selects a region and/or year, keeping whichever is omitted.
///
/// `POST /selection` → 200 + `SelectionResponse`
/// unknown region or year → 400; upstream failure → 502
pub async fn post_selection<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, ApiError>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    let dashboard = &state.dashboard;
    let current = dashboard.view().map(|v| v.selection);

    let region = match req.region.as_deref() {
        Some(query) => dashboard
            .regions()
            .resolve(query)
            .map(|r| r.id.clone())
            .ok_or_else(|| from_error(&Error::UnknownRegion(query.to_string())))?,
        None => current
            .as_ref()
            .map_or_else(RegionId::national, |s| s.region.clone()),
    };
    let year = req
        .year
        .or_else(|| current.as_ref().map(|s| s.year))
        .or_else(|| dashboard.years().latest())
        .ok_or_else(|| from_error(&Error::NoYears))?;

    let outcome = dashboard
        .select(Selection::new(region, year))
        .await
        .map_err(|e| from_error(&e))?;

    Ok(Json(SelectionResponse {
        outcome,
        view: committed_view(&state)?,
    }))
}

/// `POST /clean` → 200 + `CleanResponse`; unknown subset → 400
pub async fn post_clean<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CleanRequest>,
) -> Result<Json<CleanResponse>, ApiError>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    let changed = state
        .dashboard
        .set_clean(&req.subset, req.clean)
        .map_err(|e| from_error(&e))?;
    Ok(Json(CleanResponse {
        changed,
        view: committed_view(&state)?,
    }))
}

/// `POST /display` → 200 + `ViewResponse`
pub async fn post_display<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<DisplayRequest>,
) -> Result<Json<ViewResponse>, ApiError>
where
    S: GenerationFetcher + ImportExportFetcher + 'static,
{
    if let Some(unit) = req.unit {
        state.dashboard.set_unit(unit);
    }
    if let Some(scenario) = req.scenario {
        state.dashboard.set_scenario(scenario);
    }
    committed_view(&state).map(Json)
}
