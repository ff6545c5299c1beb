use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::service::{AdvisorService, AdvisorServiceError};
use super::waste::WastePeriod;
use crate::workflows::ledger::domain::OwnerId;
use crate::workflows::ledger::stores::StoreError;

/// Router builder exposing the advisory endpoints.
pub fn advisor_router(service: Arc<AdvisorService>) -> Router {
    Router::new()
        .route("/api/v1/advisor/:owner_id/risks", get(risks_handler))
        .route("/api/v1/advisor/:owner_id/alerts", get(alerts_handler))
        .route("/api/v1/advisor/:owner_id/patterns", get(patterns_handler))
        .route("/api/v1/advisor/:owner_id/waste", get(waste_handler))
        .route(
            "/api/v1/advisor/:owner_id/waste/report",
            get(waste_report_handler),
        )
        .route("/api/v1/advisor/:owner_id/sdg", get(sdg_handler))
        .route("/api/v1/advisor/:owner_id/sdg/save", post(sdg_save_handler))
        .route(
            "/api/v1/advisor/:owner_id/sdg/history",
            get(sdg_history_handler),
        )
        .route(
            "/api/v1/advisor/:owner_id/meal-plan",
            post(meal_plan_handler),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RisksQuery {
    #[serde(default)]
    days_ahead: Option<i64>,
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlertsQuery {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodayQuery {
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WasteQuery {
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SdgQuery {
    #[serde(default)]
    week_start: Option<String>,
    #[serde(default)]
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealPlanRequest {
    #[serde(default)]
    budget_limit: Option<f64>,
    #[serde(default)]
    use_llm: bool,
}

pub(crate) async fn risks_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<RisksQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    match service.score_expiration_risks(&OwnerId(owner_id), query.days_ahead, today) {
        Ok(predictions) => (StatusCode::OK, axum::Json(predictions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn alerts_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<AlertsQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    match service.high_risk_alerts(&OwnerId(owner_id), query.limit.unwrap_or(10), today) {
        Ok(alerts) => (StatusCode::OK, axum::Json(alerts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn patterns_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    match service.consumption_patterns(&OwnerId(owner_id), today) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn waste_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<WasteQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    let period = match query.period.as_deref() {
        None => WastePeriod::Week,
        Some(raw) => match WastePeriod::parse(raw) {
            Some(period) => period,
            None => {
                return bad_request(format!(
                    "period '{raw}' is not one of week, month, year"
                ))
            }
        },
    };

    match service.estimate_waste(&OwnerId(owner_id), period, today) {
        Ok(estimate) => (StatusCode::OK, axum::Json(estimate)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn waste_report_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };

    match service.waste_report(&OwnerId(owner_id), today) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sdg_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<SdgQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };
    let week_start = match parse_optional_date(query.week_start.as_deref(), "week_start") {
        Ok(week_start) => week_start,
        Err(response) => return response,
    };

    match service.compute_sdg_score(&OwnerId(owner_id), week_start, today) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sdg_save_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<SdgQuery>,
) -> Response {
    let today = match resolve_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };
    let week_start = match parse_optional_date(query.week_start.as_deref(), "week_start") {
        Ok(week_start) => week_start,
        Err(response) => return response,
    };

    match service.save_weekly_score(&OwnerId(owner_id), week_start, today) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    #[serde(default)]
    limit: Option<usize>,
}

pub(crate) async fn sdg_history_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match service.score_history(&OwnerId(owner_id), query.limit.unwrap_or(12)) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn meal_plan_handler(
    State(service): State<Arc<AdvisorService>>,
    Path(owner_id): Path<String>,
    axum::Json(request): axum::Json<MealPlanRequest>,
) -> Response {
    if let Some(budget) = request.budget_limit {
        if !budget.is_finite() || budget <= 0.0 {
            return bad_request("budget_limit must be a positive number".to_string());
        }
    }

    match service.optimize_meal_plan(&OwnerId(owner_id), request.budget_limit, request.use_llm) {
        Ok(plan) => (StatusCode::OK, axum::Json(plan)).into_response(),
        Err(err) => error_response(err),
    }
}

fn resolve_today(raw: Option<&str>) -> Result<NaiveDate, Response> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(raw) => parse_date(raw, "today"),
    }
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, Response> {
    raw.map(|raw| parse_date(raw, field)).transpose()
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| bad_request(format!("{field} '{raw}' is not YYYY-MM-DD")))
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: AdvisorServiceError) -> Response {
    let status = match &error {
        AdvisorServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AdvisorServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AdvisorServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
