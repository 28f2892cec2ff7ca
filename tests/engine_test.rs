//! Engine integration tests.
//!
//! These run fully offline: no provider keys are configured, so every
//! source answers with its estimate or default tier and no network calls
//! are made. Known-city names resolve from the built-in table.

use gigcast::config::Config;
use gigcast::engine::EstimateEngine;
use gigcast::geo::GeoConfidence;
use gigcast::sources::types::Provenance;

fn offline_engine() -> EstimateEngine {
    let mut config = Config::default();
    config.providers.openweather_api_key.clear();
    config.providers.ticketmaster_api_key.clear();
    config.providers.google_maps_api_key.clear();
    EstimateEngine::new(config)
}

#[tokio::test]
async fn full_prediction_set_without_any_keys() {
    let engine = offline_engine();
    let forecast = engine
        .forecast("san francisco", Some("2025-11-08"), 18)
        .await;

    assert_eq!(forecast.location, "San Francisco");
    assert_eq!(forecast.date, "2025-11-08");
    assert_eq!(forecast.time_slot, "6:00 PM - 7:00 PM");
    assert_eq!(forecast.predictions.len(), 5);

    let names: Vec<&str> = forecast
        .predictions
        .iter()
        .map(|p| p.service.as_str())
        .collect();
    assert_eq!(
        names,
        ["UberX", "Lyft", "DoorDash", "UberEats", "GrubHub"]
    );
}

#[tokio::test]
async fn offline_forecasts_carry_estimate_provenance() {
    let engine = offline_engine();
    let forecast = engine.forecast("chicago", Some("2025-11-08"), 12).await;

    let meta = &forecast.metadata;
    assert_eq!(meta.geo_confidence, GeoConfidence::ExactName);
    assert_eq!(meta.weather_source, Provenance::Estimate);
    assert_eq!(meta.events_source, Provenance::Estimate);
    assert_eq!(meta.traffic_source, Provenance::Estimate);
    // Illinois is in the regional fuel table
    assert_eq!(meta.fuel_source, Provenance::Estimate);
    assert_eq!(meta.gas_price, 4.50);
    assert_eq!(meta.event_count, 0);
    assert_eq!(meta.event_boost, 0.0);
    // nothing live answered
    assert!(meta.reduced_confidence);
    // Saturday noon runs the midday traffic estimate
    assert_eq!(meta.traffic_factor, 1.1);
    assert!(meta.rideshare_demand <= 1.8);
    assert!(meta.delivery_demand <= 2.0);
}

#[tokio::test]
async fn service_filter_narrows_predictions() {
    use gigcast::engine::EstimateRequest;

    let engine = offline_engine();
    let req = EstimateRequest {
        location: Some("miami".into()),
        date: Some("2025-11-08".into()),
        hour: 18,
        service: Some("lyft".into()),
        ..Default::default()
    };
    let forecast = engine.estimate(&req).await;
    assert_eq!(forecast.predictions.len(), 1);
    assert_eq!(forecast.predictions[0].service, "Lyft");

    // the filtered request still populated the shared cache slot
    let full = engine.forecast("miami", Some("2025-11-08"), 18).await;
    assert_eq!(full.predictions.len(), 5);
    assert_eq!(full.metadata.generated_at, forecast.metadata.generated_at);
}

#[tokio::test]
async fn coordinates_snap_to_the_nearest_metro() {
    use gigcast::engine::EstimateRequest;

    let engine = offline_engine();
    // Oakland coordinates, well within range of San Francisco
    let req = EstimateRequest {
        lat: Some(37.8044),
        lng: Some(-122.2712),
        date: Some("2025-11-08".into()),
        hour: 18,
        ..Default::default()
    };
    let forecast = engine.estimate(&req).await;
    assert_eq!(forecast.location, "San Francisco");
    assert_eq!(
        forecast.metadata.geo_confidence,
        GeoConfidence::ApproximateTable
    );
}

#[tokio::test]
async fn supplied_name_labels_the_forecast_when_coordinates_resolve() {
    use gigcast::engine::EstimateRequest;

    let engine = offline_engine();
    let req = EstimateRequest {
        location: Some("Oakland".into()),
        lat: Some(37.8044),
        lng: Some(-122.2712),
        date: Some("2025-11-08".into()),
        hour: 18,
        ..Default::default()
    };
    let forecast = engine.estimate(&req).await;
    // numbers come from the nearest metro, the label stays the caller's
    assert_eq!(forecast.location, "Oakland");
    assert_eq!(
        forecast.metadata.geo_confidence,
        GeoConfidence::ApproximateTable
    );

    // the label never leaks into the shared cache slot
    let plain = engine
        .forecast("san francisco", Some("2025-11-08"), 18)
        .await;
    assert_eq!(plain.location, "San Francisco");
    assert_eq!(plain.metadata.generated_at, forecast.metadata.generated_at);
}

#[tokio::test]
async fn repeat_lookups_are_served_from_the_response_cache() {
    let engine = offline_engine();
    let a = engine
        .forecast("san francisco", Some("2025-11-08"), 18)
        .await;
    let b = engine
        .forecast("san francisco", Some("2025-11-08"), 18)
        .await;

    // identical including the generation timestamp: the second call hit
    // the response cache instead of rebuilding
    assert_eq!(a.metadata.generated_at, b.metadata.generated_at);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[tokio::test]
async fn alias_and_canonical_name_share_a_cache_slot() {
    let engine = offline_engine();
    let a = engine.forecast("sf", Some("2025-11-08"), 18).await;
    let b = engine
        .forecast("San Francisco", Some("2025-11-08"), 18)
        .await;
    assert_eq!(a.metadata.generated_at, b.metadata.generated_at);
}

#[tokio::test]
async fn numeric_invariants_hold_across_slots() {
    let engine = offline_engine();
    for (city, hour) in [
        ("san francisco", 3u32),
        ("new york", 8),
        ("miami", 12),
        ("austin", 18),
        ("seattle", 23),
    ] {
        let forecast = engine.forecast(city, Some("2025-11-08"), hour).await;
        for p in &forecast.predictions {
            assert!(p.min <= p.max, "{} min>max at hour {hour}", p.service);
            assert!(p.min >= 10.0, "{} min {} too low", p.service, p.min);
            assert!(p.max <= 61.0, "{} max {} too high", p.service, p.max);
            assert!((0.0..=1.0).contains(&p.demand_score));
            assert!((0.0..=1.5).contains(&p.event_boost));
            assert!(p.trips_per_hour > 0.0 && p.trips_per_hour <= 4.0);
            assert!(p.surge_multiplier >= 0.95 && p.surge_multiplier <= 1.35);
            assert!(!p.hotspot.is_empty());
            assert!(p.color.starts_with('#'));
        }
    }
}

#[tokio::test]
async fn saturday_evening_beats_tuesday_overnight() {
    let engine = offline_engine();
    // 2025-11-08 is a Saturday, 2025-11-04 a Tuesday
    let busy = engine
        .forecast("san francisco", Some("2025-11-08"), 18)
        .await;
    let dead = engine
        .forecast("san francisco", Some("2025-11-04"), 3)
        .await;

    let busy_uber = &busy.predictions[0];
    let dead_uber = &dead.predictions[0];
    assert!(busy_uber.max > dead_uber.max);
    assert!(busy_uber.demand_score > dead_uber.demand_score);

    // Tuesday 3 AM bottoms out at the published floor
    assert_eq!(dead_uber.min, 10.0);
}

#[tokio::test]
async fn unknown_location_falls_back_without_erroring() {
    // empty input never reaches the geocoder, so this stays offline
    let engine = offline_engine();
    let forecast = engine.forecast("", Some("2025-11-08"), 18).await;
    assert_eq!(forecast.location, "San Francisco");
    assert_eq!(forecast.metadata.geo_confidence, GeoConfidence::DefaultFallback);
    assert_eq!(forecast.predictions.len(), 5);
}

#[tokio::test]
async fn bad_date_still_produces_a_forecast() {
    let engine = offline_engine();
    let forecast = engine.forecast("boston", Some("tomorrow-ish"), 18).await;
    assert_eq!(forecast.predictions.len(), 5);
    assert_eq!(forecast.hour, 18);
}
