//! Request parameter handling and response shaping for the dashboard API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use carbomap::filter::ViewFilter;
use carbomap::models::{Metric, PerformanceTier};
use carbomap::resolver::{MatchOutcome, QueryError, Resolution};

/// Error surfaced to the dashboard as a readable message; the server keeps
/// serving after any of these.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn query(err: QueryError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }

    pub fn unknown_machine(name: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Unknown machine '{}'", name),
        }
    }

    pub fn bad_param(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// View selection parameters shared by the map and legend endpoints.
#[derive(Debug, Deserialize)]
pub struct ViewParams {
    /// Machine dataset (defaults to the first configured)
    pub machine: Option<String>,
    /// "cost" or "energy"; required when a tier or range is given
    pub metric: Option<Metric>,
    /// "best" | "good" | "moderate" | "worst"
    pub tier: Option<PerformanceTier>,
    /// Range filter lower bound
    pub min: Option<f64>,
    /// Range filter upper bound
    pub max: Option<f64>,
}

/// Derive the view filter from request parameters.
pub fn view_filter(params: &ViewParams) -> Result<ViewFilter, ApiError> {
    match (params.tier, params.min, params.max) {
        (None, None, None) => Ok(ViewFilter::None),
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ApiError::bad_param(
            "Select either a tier or a range, not both",
        )),
        (Some(tier), None, None) => {
            let metric = require_metric(params)?;
            Ok(ViewFilter::Tier { metric, tier })
        }
        (None, Some(min), Some(max)) => {
            let metric = require_metric(params)?;
            if min > max {
                return Err(ApiError::bad_param("Range minimum exceeds maximum"));
            }
            Ok(ViewFilter::Range { metric, min, max })
        }
        (None, _, _) => Err(ApiError::bad_param(
            "Both min and max are required for a range filter",
        )),
    }
}

fn require_metric(params: &ViewParams) -> Result<Metric, ApiError> {
    params
        .metric
        .ok_or_else(|| ApiError::bad_param("A metric is required when filtering"))
}

/// Resolution payload plus the details-panel summary text.
#[derive(Serialize)]
pub struct ResolveResponse {
    pub machine: String,
    pub resolution: Resolution,
    /// Human-readable summary, mirrors the dashboard details panel
    pub message: String,
}

impl ResolveResponse {
    pub fn new(machine: &str, resolution: Resolution) -> Self {
        let message = summary(&resolution);
        Self {
            machine: machine.to_string(),
            resolution,
            message,
        }
    }
}

fn summary(resolution: &Resolution) -> String {
    let mut parts = Vec::new();

    match &resolution.outcome {
        Some(MatchOutcome::Exact { record }) => {
            parts.push(format!(
                "Found dataset record {} at {}.",
                record.id, record.coordinates
            ));
        }
        Some(MatchOutcome::Nearest {
            record,
            distance_km,
        }) => {
            parts.push(format!(
                "Coordinates not found in the dataset. Closest coordinates at {} with distance {:.2} km.",
                record.coordinates, distance_km
            ));
        }
        None => parts.push("The dataset is empty.".to_string()),
    }

    match &resolution.zone {
        Some(zone) => parts.push(format!(
            "Climate zone: {} (GRIDCODE: {}).",
            zone.description, zone.grid_code
        )),
        None => parts.push("Coordinates are outside the defined climate zones.".to_string()),
    }

    parts.join(" ")
}
