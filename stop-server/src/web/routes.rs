//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::arrivals::select_arrivals;
use crate::domain::{
    InvalidReference, MalformedTime, ReferenceInstant, RouteId, StopId, sort_routes,
};
use crate::geo::{GeoError, nearest};
use crate::store::{ScheduleStore, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/areas", get(list_areas))
        .route("/stops", get(list_stops))
        .route("/buses", get(list_buses))
        .route("/nearest-stop", get(nearest_stop))
        .route("/arrival-times", get(arrival_times))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "Connected to stop server"
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stop areas, ascending.
async fn list_areas(State(state): State<AppState>) -> Result<Json<Vec<AreaResult>>, AppError> {
    let store = state.dataset.get().await?;
    let areas = store
        .fetch_all_areas()?
        .into_iter()
        .map(|area| AreaResult { area })
        .collect();
    Ok(Json(areas))
}

/// Stops in one area, by name.
async fn list_stops(
    State(state): State<AppState>,
    Query(req): Query<StopsRequest>,
) -> Result<Json<Vec<StopResult>>, AppError> {
    let area = req
        .area
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::bad_request("stop_area is required"))?;

    let store = state.dataset.get().await?;
    let stops = store.fetch_stops_in_area(&area)?;
    Ok(Json(stops.iter().map(StopResult::from).collect()))
}

/// Routes calling at a stop, in natural route-code order.
async fn list_buses(
    State(state): State<AppState>,
    Query(req): Query<BusesRequest>,
) -> Result<Json<Vec<BusResult>>, AppError> {
    let stop_id = parse_stop_id(req.stop.as_deref())
        .ok_or_else(|| AppError::bad_request("stop_id is required"))?;

    let store = state.dataset.get().await?;
    let mut routes = store.fetch_routes_for_stop(stop_id)?;
    sort_routes(&mut routes);
    debug!(stop = %stop_id, routes = routes.len(), "routes for stop");

    Ok(Json(routes.into_iter().map(BusResult::from).collect()))
}

/// The stop closest to the caller's location.
async fn nearest_stop(
    State(state): State<AppState>,
    Query(req): Query<NearestStopRequest>,
) -> Result<Json<NearestStopResult>, AppError> {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<f64>().ok());
    let (Some(lat), Some(lon)) = (
        parse(req.latitude.as_deref()),
        parse(req.longitude.as_deref()),
    ) else {
        return Err(AppError::bad_request("Invalid latitude or longitude"));
    };

    let store = state.dataset.get().await?;
    let stops = store.fetch_all_stops()?;
    let found = nearest(lat, lon, &stops)?;

    Ok(Json(NearestStopResult::from(found)))
}

/// Next arrivals of a route at a stop.
async fn arrival_times(
    State(state): State<AppState>,
    Query(req): Query<ArrivalTimesRequest>,
) -> Result<Json<Vec<ArrivalResult>>, AppError> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(stop), Some(route), Some(reference_date), Some(offset)) = (
        present(req.stop),
        present(req.route),
        present(req.reference_date),
        present(req.offset),
    ) else {
        return Err(AppError::bad_request(
            "route_id, stop_id, and reference_date are required",
        ));
    };

    let stop_id = parse_stop_id(Some(stop.as_str()))
        .ok_or_else(|| AppError::bad_request(format!("Invalid stop_id: {stop}")))?;
    let offset: i64 = offset
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid offset: {offset}")))?;
    let reference = ReferenceInstant::from_client(&reference_date, offset)?;

    let store = state.dataset.get().await?;
    let entries = store.fetch_schedule_entries(&RouteId(route), stop_id)?;
    let arrivals = select_arrivals(&entries, reference.as_datetime(), state.arrivals.limit)?;

    Ok(Json(arrivals.into_iter().map(ArrivalResult::from).collect()))
}

fn parse_stop_id(value: Option<&str>) -> Option<StopId> {
    value?.trim().parse().ok().map(StopId)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<MalformedTime> for AppError {
    fn from(e: MalformedTime) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<InvalidReference> for AppError {
    fn from(e: InvalidReference) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<GeoError> for AppError {
    fn from(e: GeoError) -> Self {
        match e {
            GeoError::InvalidCoordinate(_) => {
                AppError::bad_request("Invalid latitude or longitude")
            }
            GeoError::NotFound => AppError::NotFound {
                message: "No stops found".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound { message } => {
                warn!(%message, "not found");
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Internal { message } => {
                // Details stay in the log
                error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
