//! HTTP route handlers for the forecast API.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::engine::EstimateRequest;

use super::server::AppState;

/// Build all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/earnings", get(earnings))
        .route("/api/earnings/batch", post(earnings_batch))
        .route("/api/capabilities", get(capabilities))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsQuery {
    location: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    date: Option<String>,
    start_time: Option<String>,
    /// Accepted for API compatibility; slots are one hour wide.
    #[allow(dead_code)]
    end_time: Option<String>,
    service: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest {
    location: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    date: Option<String>,
    service: Option<String>,
    #[serde(default)]
    times: Vec<String>,
}

/// GET /api/earnings?location=...&date=YYYY-MM-DD&startTime=6:00%20PM
async fn earnings(
    State(state): State<AppState>,
    Query(q): Query<EarningsQuery>,
) -> Json<Value> {
    let req = EstimateRequest {
        location: q.location,
        lat: q.lat,
        lng: q.lng,
        date: q.date,
        hour: parse_hour(q.start_time.as_deref()),
        service: q.service,
    };
    let forecast = state.engine.estimate(&req).await;
    Json(json!(forecast))
}

/// POST /api/earnings/batch — one forecast per requested time slot.
async fn earnings_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchRequest>,
) -> Json<Value> {
    let mut forecasts = Vec::with_capacity(body.times.len());
    for time in &body.times {
        let req = EstimateRequest {
            location: body.location.clone(),
            lat: body.lat,
            lng: body.lng,
            date: body.date.clone(),
            hour: parse_hour(Some(time)),
            service: body.service.clone(),
        };
        forecasts.push(state.engine.estimate(&req).await);
    }
    Json(json!({ "forecasts": forecasts }))
}

/// GET /api/capabilities — which live providers are configured.
async fn capabilities(State(state): State<AppState>) -> Json<Value> {
    let caps = state.engine.config().providers.capabilities();
    Json(json!({
        "weather": caps.weather,
        "events": caps.events,
        "traffic": caps.traffic,
    }))
}

/// GET /health — simple health check.
async fn health() -> &'static str {
    "ok"
}

/// Accepts "6:00 PM", "6 PM", "18:00", or "18". Unparseable input lands on
/// mid-morning rather than erroring.
pub fn parse_hour(time: Option<&str>) -> u32 {
    const FALLBACK: u32 = 9;
    let Some(raw) = time else { return FALLBACK };
    let raw = raw.trim();
    if raw.is_empty() {
        return FALLBACK;
    }

    let upper = raw.to_uppercase();
    let (num_part, meridiem) = if let Some(stripped) = upper.strip_suffix("PM") {
        (stripped.trim().to_string(), Some("PM"))
    } else if let Some(stripped) = upper.strip_suffix("AM") {
        (stripped.trim().to_string(), Some("AM"))
    } else {
        (upper, None)
    };

    let hour_str = num_part.split(':').next().unwrap_or("").trim();
    let Ok(mut hour) = hour_str.parse::<u32>() else {
        return FALLBACK;
    };

    match meridiem {
        Some("PM") if hour < 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }
    if hour > 23 {
        FALLBACK
    } else {
        hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_formats() {
        assert_eq!(parse_hour(Some("6:00 PM")), 18);
        assert_eq!(parse_hour(Some("6:30 pm")), 18);
        assert_eq!(parse_hour(Some("12:00 PM")), 12);
        assert_eq!(parse_hour(Some("12:00 AM")), 0);
        assert_eq!(parse_hour(Some("9 AM")), 9);
    }

    #[test]
    fn twenty_four_hour_formats() {
        assert_eq!(parse_hour(Some("18:00")), 18);
        assert_eq!(parse_hour(Some("18")), 18);
        assert_eq!(parse_hour(Some("0")), 0);
        assert_eq!(parse_hour(Some("23")), 23);
    }

    #[test]
    fn garbage_falls_back_to_midmorning() {
        assert_eq!(parse_hour(None), 9);
        assert_eq!(parse_hour(Some("")), 9);
        assert_eq!(parse_hour(Some("noonish")), 9);
        assert_eq!(parse_hour(Some("25:00")), 9);
    }
}
