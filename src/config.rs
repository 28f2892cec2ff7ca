//! Configuration — TOML file defaults + environment variable overrides.
//!
//! Tuning tables (time-of-day factors, pricing tiers, deadtime, caps) live in
//! `config/default.toml`. Provider API keys come from environment variables
//! and are never read from TOML.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub demand: DemandConfig,
    #[serde(default)]
    pub supply: SupplyConfig,
    #[serde(default)]
    pub boost: BoostConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub rideshare: RideshareConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub costs: CostConfig,
    #[serde(default)]
    pub rideshare_deadtime: DeadtimeConfig,
    #[serde(default = "default_delivery_deadtime")]
    pub delivery_deadtime: DeadtimeConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ── Providers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_base_url: String,
    #[serde(default = "default_openweather_url")]
    pub openweather_base_url: String,
    #[serde(default = "default_ticketmaster_url")]
    pub ticketmaster_base_url: String,
    #[serde(default = "default_eventbrite_url")]
    pub eventbrite_base_url: String,
    #[serde(default = "default_google_maps_url")]
    pub google_maps_base_url: String,
    /// Which events provider to attempt: ticketmaster | eventbrite | meetup | songkick.
    #[serde(default = "default_events_provider")]
    pub events_provider: String,
    #[serde(default = "default_event_radius")]
    pub event_radius_miles: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub openweather_api_key: String,
    #[serde(default)]
    pub ticketmaster_api_key: String,
    #[serde(default)]
    pub eventbrite_api_key: String,
    #[serde(default)]
    pub google_maps_api_key: String,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".into()
}
fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/2.5".into()
}
fn default_ticketmaster_url() -> String {
    "https://app.ticketmaster.com/discovery/v2".into()
}
fn default_eventbrite_url() -> String {
    "https://www.eventbriteapi.com/v3".into()
}
fn default_google_maps_url() -> String {
    "https://maps.googleapis.com/maps/api".into()
}
fn default_events_provider() -> String {
    "ticketmaster".into()
}
fn default_event_radius() -> u32 {
    25
}
fn default_request_timeout() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: default_nominatim_url(),
            openweather_base_url: default_openweather_url(),
            ticketmaster_base_url: default_ticketmaster_url(),
            eventbrite_base_url: default_eventbrite_url(),
            google_maps_base_url: default_google_maps_url(),
            events_provider: default_events_provider(),
            event_radius_miles: default_event_radius(),
            request_timeout_secs: default_request_timeout(),
            openweather_api_key: String::new(),
            ticketmaster_api_key: String::new(),
            eventbrite_api_key: String::new(),
            google_maps_api_key: String::new(),
        }
    }
}

/// Which live providers are usable, resolved once at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderCapabilities {
    pub weather: bool,
    pub events: bool,
    pub traffic: bool,
}

impl ProviderConfig {
    /// Resolve capability flags from configured keys.
    pub fn capabilities(&self) -> ProviderCapabilities {
        let events = match self.events_provider.as_str() {
            "ticketmaster" => !self.ticketmaster_api_key.is_empty(),
            "eventbrite" => !self.eventbrite_api_key.is_empty(),
            // meetup/songkick need OAuth flows this engine does not carry;
            // they degrade to the time-based estimate
            _ => false,
        };
        ProviderCapabilities {
            weather: !self.openweather_api_key.is_empty(),
            events,
            traffic: !self.google_maps_api_key.is_empty(),
        }
    }
}

// ── Caching ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_hour_ttl")]
    pub weather_ttl_secs: u64,
    #[serde(default = "default_hour_ttl")]
    pub events_ttl_secs: u64,
    #[serde(default = "default_traffic_ttl")]
    pub traffic_ttl_secs: u64,
    #[serde(default = "default_hour_ttl")]
    pub fuel_ttl_secs: u64,
    #[serde(default = "default_hour_ttl")]
    pub response_ttl_secs: u64,
}

fn default_hour_ttl() -> u64 {
    3600
}
fn default_traffic_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_secs: default_hour_ttl(),
            events_ttl_secs: default_hour_ttl(),
            traffic_ttl_secs: default_traffic_ttl(),
            fuel_ttl_secs: default_hour_ttl(),
            response_ttl_secs: default_hour_ttl(),
        }
    }
}

// ── Demand composition ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DemandConfig {
    #[serde(default = "default_rideshare_cap")]
    pub rideshare_cap: f64,
    #[serde(default = "default_delivery_cap")]
    pub delivery_cap: f64,
    #[serde(default = "default_rideshare_weekend")]
    pub rideshare_weekend: f64,
    #[serde(default = "default_rideshare_friday")]
    pub rideshare_friday: f64,
    #[serde(default = "default_delivery_weekend")]
    pub delivery_weekend: f64,
    #[serde(default = "default_delivery_friday")]
    pub delivery_friday: f64,
    /// November/December holiday season.
    #[serde(default = "default_holiday_seasonal")]
    pub holiday_seasonal: f64,
    #[serde(default = "default_rideshare_summer")]
    pub rideshare_summer: f64,
    #[serde(default = "default_delivery_summer")]
    pub delivery_summer: f64,
    /// Hour-keyed demand factors, commute-peaked.
    #[serde(default = "default_rideshare_time_factors")]
    pub rideshare_time_factors: [f64; 24],
    /// Hour-keyed demand factors, meal-peaked.
    #[serde(default = "default_delivery_time_factors")]
    pub delivery_time_factors: [f64; 24],
}

fn default_rideshare_cap() -> f64 {
    1.8
}
fn default_delivery_cap() -> f64 {
    2.0
}
fn default_rideshare_weekend() -> f64 {
    1.25
}
fn default_rideshare_friday() -> f64 {
    1.15
}
fn default_delivery_weekend() -> f64 {
    1.35
}
fn default_delivery_friday() -> f64 {
    1.25
}
fn default_holiday_seasonal() -> f64 {
    1.2
}
fn default_rideshare_summer() -> f64 {
    1.1
}
fn default_delivery_summer() -> f64 {
    0.95
}

fn default_rideshare_time_factors() -> [f64; 24] {
    [
        0.35, 0.30, 0.25, 0.25, 0.30, 0.45, // overnight
        0.65, 0.90, 1.10, 0.85, 0.75, 0.85, // morning commute
        0.95, 0.85, 0.70, 0.85, 1.15, 1.35, // afternoon ramp
        1.50, 1.25, 1.00, 0.85, 0.70, 0.50, // evening peak
    ]
}

fn default_delivery_time_factors() -> [f64; 24] {
    [
        0.10, 0.05, 0.05, 0.05, 0.05, 0.10, // dead hours
        0.20, 0.40, 0.50, 0.40, 0.60, 0.90, // morning pickup
        1.50, 1.30, 0.80, 0.50, 0.60, 1.00, // lunch rush
        1.50, 1.40, 1.20, 0.80, 0.40, 0.20, // dinner rush
    ]
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            rideshare_cap: default_rideshare_cap(),
            delivery_cap: default_delivery_cap(),
            rideshare_weekend: default_rideshare_weekend(),
            rideshare_friday: default_rideshare_friday(),
            delivery_weekend: default_delivery_weekend(),
            delivery_friday: default_delivery_friday(),
            holiday_seasonal: default_holiday_seasonal(),
            rideshare_summer: default_rideshare_summer(),
            delivery_summer: default_delivery_summer(),
            rideshare_time_factors: default_rideshare_time_factors(),
            delivery_time_factors: default_delivery_time_factors(),
        }
    }
}

// ── Driver supply model ─────────────────────────────────────────────

/// Hour-keyed driver availability relative to each service's daily peak.
/// The demand/supply ratio is composed demand times market density over
/// these factors; absolute fleet sizes cancel out of that ratio.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplyConfig {
    #[serde(default = "default_rideshare_supply_factors")]
    pub rideshare_supply_factors: [f64; 24],
    #[serde(default = "default_delivery_supply_factors")]
    pub delivery_supply_factors: [f64; 24],
}

fn default_rideshare_supply_factors() -> [f64; 24] {
    [
        0.35, 0.30, 0.25, 0.25, 0.30, 0.45, //
        0.60, 0.80, 0.95, 0.90, 0.85, 0.85, //
        0.90, 0.85, 0.75, 0.85, 0.95, 1.05, //
        1.10, 0.95, 0.85, 0.75, 0.60, 0.45,
    ]
}

fn default_delivery_supply_factors() -> [f64; 24] {
    [
        0.25, 0.20, 0.15, 0.15, 0.20, 0.30, //
        0.40, 0.55, 0.65, 0.60, 0.65, 0.75, //
        0.85, 0.80, 0.65, 0.70, 0.80, 0.90, //
        1.00, 0.95, 0.90, 0.75, 0.50, 0.35,
    ]
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            rideshare_supply_factors: default_rideshare_supply_factors(),
            delivery_supply_factors: default_delivery_supply_factors(),
        }
    }
}

// ── Event boost ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BoostConfig {
    /// Below this capacity an event is "small".
    #[serde(default = "default_small_capacity")]
    pub small_capacity: u32,
    /// At or above this capacity an event is "large".
    #[serde(default = "default_large_capacity")]
    pub large_capacity: u32,
    #[serde(default = "default_small_attendance")]
    pub small_attendance: f64,
    #[serde(default = "default_medium_attendance")]
    pub medium_attendance: f64,
    #[serde(default = "default_large_attendance")]
    pub large_attendance: f64,
    /// Surge window widths in hours, applied before arrival and after departure.
    #[serde(default = "default_small_window")]
    pub small_window_hours: f64,
    #[serde(default = "default_medium_window")]
    pub medium_window_hours: f64,
    #[serde(default = "default_large_window")]
    pub large_window_hours: f64,
    #[serde(default = "default_max_boost")]
    pub max_boost: f64,
}

fn default_small_capacity() -> u32 {
    500
}
fn default_large_capacity() -> u32 {
    5000
}
fn default_small_attendance() -> f64 {
    0.05
}
fn default_medium_attendance() -> f64 {
    0.2
}
fn default_large_attendance() -> f64 {
    0.5
}
fn default_small_window() -> f64 {
    1.0
}
fn default_medium_window() -> f64 {
    2.0
}
fn default_large_window() -> f64 {
    3.0
}
fn default_max_boost() -> f64 {
    1.5
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            small_capacity: default_small_capacity(),
            large_capacity: default_large_capacity(),
            small_attendance: default_small_attendance(),
            medium_attendance: default_medium_attendance(),
            large_attendance: default_large_attendance(),
            small_window_hours: default_small_window(),
            medium_window_hours: default_medium_window(),
            large_window_hours: default_large_window(),
            max_boost: default_max_boost(),
        }
    }
}

// ── City market tiers ───────────────────────────────────────────────

/// Per-city market data; base hourly rates already encode local pricing.
#[derive(Debug, Clone, Deserialize)]
pub struct CityTier {
    pub pricing_multiplier: f64,
    pub base_demand_multiplier: f64,
    pub base_hourly_rideshare: f64,
    pub base_hourly_delivery: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_city_tiers")]
    pub cities: HashMap<String, CityTier>,
    #[serde(default = "default_base_rideshare")]
    pub default_base_hourly_rideshare: f64,
    #[serde(default = "default_base_delivery")]
    pub default_base_hourly_delivery: f64,
    /// Cities whose pricing tier exceeds this get the capped adjustment.
    #[serde(default = "default_adjustment_threshold")]
    pub location_adjustment_threshold: f64,
    #[serde(default = "default_location_adjustment")]
    pub location_adjustment: f64,
    #[serde(default = "default_lyft_adjustment")]
    pub lyft_adjustment: f64,
    #[serde(default = "default_ubereats_adjustment")]
    pub ubereats_adjustment: f64,
    #[serde(default = "default_grubhub_adjustment")]
    pub grubhub_adjustment: f64,
}

fn tier(pricing: f64, demand: f64, rideshare: f64, delivery: f64) -> CityTier {
    CityTier {
        pricing_multiplier: pricing,
        base_demand_multiplier: demand,
        base_hourly_rideshare: rideshare,
        base_hourly_delivery: delivery,
    }
}

fn default_city_tiers() -> HashMap<String, CityTier> {
    HashMap::from([
        ("san francisco".into(), tier(1.2, 1.3, 28.0, 24.0)),
        ("new york".into(), tier(1.3, 1.5, 32.0, 26.0)),
        ("los angeles".into(), tier(1.15, 1.4, 26.0, 22.0)),
        ("chicago".into(), tier(1.1, 1.2, 24.0, 20.0)),
        ("seattle".into(), tier(1.15, 1.1, 25.0, 21.0)),
        ("boston".into(), tier(1.1, 1.15, 24.0, 20.0)),
        ("austin".into(), tier(1.0, 1.05, 22.0, 18.0)),
        ("miami".into(), tier(1.1, 1.25, 23.0, 19.0)),
    ])
}

fn default_base_rideshare() -> f64 {
    22.0
}
fn default_base_delivery() -> f64 {
    18.0
}
fn default_adjustment_threshold() -> f64 {
    1.2
}
fn default_location_adjustment() -> f64 {
    1.1
}
fn default_lyft_adjustment() -> f64 {
    0.92
}
fn default_ubereats_adjustment() -> f64 {
    0.95
}
fn default_grubhub_adjustment() -> f64 {
    1.05
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cities: default_city_tiers(),
            default_base_hourly_rideshare: default_base_rideshare(),
            default_base_hourly_delivery: default_base_delivery(),
            location_adjustment_threshold: default_adjustment_threshold(),
            location_adjustment: default_location_adjustment(),
            lyft_adjustment: default_lyft_adjustment(),
            ubereats_adjustment: default_ubereats_adjustment(),
            grubhub_adjustment: default_grubhub_adjustment(),
        }
    }
}

// ── Rideshare earnings model ────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RideshareConfig {
    #[serde(default = "default_base_trips")]
    pub base_trips_per_hour: f64,
    #[serde(default = "default_min_trips")]
    pub min_trips_per_hour: f64,
    #[serde(default = "default_max_trips")]
    pub max_trips_per_hour: f64,
    #[serde(default = "default_trip_distance")]
    pub avg_trip_distance_miles: f64,
    #[serde(default = "default_trip_duration")]
    pub avg_trip_duration_minutes: f64,
    #[serde(default = "default_avg_mpg")]
    pub avg_mpg: f64,
    #[serde(default = "default_rideshare_net_floor")]
    pub net_floor: f64,
    #[serde(default = "default_rideshare_net_cap")]
    pub net_cap: f64,
    #[serde(default = "default_rideshare_spread")]
    pub range_spread: f64,
    #[serde(default = "default_rideshare_range_floor")]
    pub range_floor: f64,
    #[serde(default = "default_surge_high_threshold")]
    pub surge_high_threshold: f64,
    #[serde(default = "default_surge_high")]
    pub surge_high: f64,
    #[serde(default = "default_surge_mid_threshold")]
    pub surge_mid_threshold: f64,
    #[serde(default = "default_surge_mid")]
    pub surge_mid: f64,
    #[serde(default = "default_surge_low_threshold")]
    pub surge_low_threshold: f64,
    #[serde(default = "default_surge_low")]
    pub surge_low: f64,
    /// Fraction of the event boost folded into the surge multiplier.
    #[serde(default = "default_event_surge_weight")]
    pub event_surge_weight: f64,
    #[serde(default = "default_event_surge_cap")]
    pub event_surge_cap: f64,
    #[serde(default = "default_surge_cap")]
    pub surge_cap: f64,
}

fn default_base_trips() -> f64 {
    2.2
}
fn default_min_trips() -> f64 {
    1.0
}
fn default_max_trips() -> f64 {
    3.5
}
fn default_trip_distance() -> f64 {
    4.2
}
fn default_trip_duration() -> f64 {
    18.0
}
fn default_avg_mpg() -> f64 {
    22.0
}
fn default_rideshare_net_floor() -> f64 {
    8.0
}
fn default_rideshare_net_cap() -> f64 {
    55.0
}
fn default_rideshare_spread() -> f64 {
    5.0
}
fn default_rideshare_range_floor() -> f64 {
    10.0
}
fn default_surge_high_threshold() -> f64 {
    1.5
}
fn default_surge_high() -> f64 {
    1.15
}
fn default_surge_mid_threshold() -> f64 {
    1.3
}
fn default_surge_mid() -> f64 {
    1.1
}
fn default_surge_low_threshold() -> f64 {
    0.7
}
fn default_surge_low() -> f64 {
    0.95
}
fn default_event_surge_weight() -> f64 {
    0.3
}
fn default_event_surge_cap() -> f64 {
    0.15
}
fn default_surge_cap() -> f64 {
    1.3
}

impl Default for RideshareConfig {
    fn default() -> Self {
        Self {
            base_trips_per_hour: default_base_trips(),
            min_trips_per_hour: default_min_trips(),
            max_trips_per_hour: default_max_trips(),
            avg_trip_distance_miles: default_trip_distance(),
            avg_trip_duration_minutes: default_trip_duration(),
            avg_mpg: default_avg_mpg(),
            net_floor: default_rideshare_net_floor(),
            net_cap: default_rideshare_net_cap(),
            range_spread: default_rideshare_spread(),
            range_floor: default_rideshare_range_floor(),
            surge_high_threshold: default_surge_high_threshold(),
            surge_high: default_surge_high(),
            surge_mid_threshold: default_surge_mid_threshold(),
            surge_mid: default_surge_mid(),
            surge_low_threshold: default_surge_low_threshold(),
            surge_low: default_surge_low(),
            event_surge_weight: default_event_surge_weight(),
            event_surge_cap: default_event_surge_cap(),
            surge_cap: default_surge_cap(),
        }
    }
}

// ── Delivery earnings model ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_base_deliveries")]
    pub base_deliveries_per_hour: f64,
    #[serde(default = "default_min_deliveries")]
    pub min_deliveries_per_hour: f64,
    #[serde(default = "default_max_deliveries")]
    pub max_deliveries_per_hour: f64,
    #[serde(default = "default_delivery_distance")]
    pub avg_delivery_distance_miles: f64,
    #[serde(default = "default_delivery_duration")]
    pub avg_delivery_duration_minutes: f64,
    #[serde(default = "default_delivery_mpg")]
    pub delivery_mpg: f64,
    /// Shorter trips wear the vehicle less per mile.
    #[serde(default = "default_wear_factor")]
    pub wear_factor: f64,
    #[serde(default = "default_delivery_net_floor")]
    pub net_floor: f64,
    #[serde(default = "default_delivery_net_cap")]
    pub net_cap: f64,
    #[serde(default = "default_delivery_spread")]
    pub range_spread: f64,
    #[serde(default = "default_delivery_range_floor")]
    pub range_floor: f64,
    #[serde(default = "default_peak_lunch")]
    pub peak_lunch: f64,
    #[serde(default = "default_peak_dinner")]
    pub peak_dinner: f64,
    #[serde(default = "default_peak_shoulder")]
    pub peak_shoulder: f64,
    #[serde(default = "default_event_peak_weight")]
    pub event_peak_weight: f64,
    #[serde(default = "default_event_peak_cap")]
    pub event_peak_cap: f64,
    #[serde(default = "default_peak_cap")]
    pub peak_cap: f64,
    /// Demand/supply ratio above which stacked orders kick in.
    #[serde(default = "default_stacked_min_ratio")]
    pub stacked_min_demand_ratio: f64,
    #[serde(default = "default_stacked_efficiency")]
    pub stacked_efficiency: f64,
}

fn default_base_deliveries() -> f64 {
    2.5
}
fn default_min_deliveries() -> f64 {
    1.0
}
fn default_max_deliveries() -> f64 {
    4.0
}
fn default_delivery_distance() -> f64 {
    2.5
}
fn default_delivery_duration() -> f64 {
    10.0
}
fn default_delivery_mpg() -> f64 {
    25.0
}
fn default_wear_factor() -> f64 {
    0.7
}
fn default_delivery_net_floor() -> f64 {
    10.0
}
fn default_delivery_net_cap() -> f64 {
    45.0
}
fn default_delivery_spread() -> f64 {
    6.0
}
fn default_delivery_range_floor() -> f64 {
    12.0
}
fn default_peak_lunch() -> f64 {
    1.15
}
fn default_peak_dinner() -> f64 {
    1.2
}
fn default_peak_shoulder() -> f64 {
    1.05
}
fn default_event_peak_weight() -> f64 {
    0.25
}
fn default_event_peak_cap() -> f64 {
    0.12
}
fn default_peak_cap() -> f64 {
    1.35
}
fn default_stacked_min_ratio() -> f64 {
    1.5
}
fn default_stacked_efficiency() -> f64 {
    1.3
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_deliveries_per_hour: default_base_deliveries(),
            min_deliveries_per_hour: default_min_deliveries(),
            max_deliveries_per_hour: default_max_deliveries(),
            avg_delivery_distance_miles: default_delivery_distance(),
            avg_delivery_duration_minutes: default_delivery_duration(),
            delivery_mpg: default_delivery_mpg(),
            wear_factor: default_wear_factor(),
            net_floor: default_delivery_net_floor(),
            net_cap: default_delivery_net_cap(),
            range_spread: default_delivery_spread(),
            range_floor: default_delivery_range_floor(),
            peak_lunch: default_peak_lunch(),
            peak_dinner: default_peak_dinner(),
            peak_shoulder: default_peak_shoulder(),
            event_peak_weight: default_event_peak_weight(),
            event_peak_cap: default_event_peak_cap(),
            peak_cap: default_peak_cap(),
            stacked_min_demand_ratio: default_stacked_min_ratio(),
            stacked_efficiency: default_stacked_efficiency(),
        }
    }
}

// ── Operating costs ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_gas_price")]
    pub default_gas_price_per_gallon: f64,
    #[serde(default = "default_wear_tear")]
    pub wear_tear_per_mile: f64,
    #[serde(default = "default_regional_gas_prices")]
    pub regional_gas_prices: HashMap<String, f64>,
}

fn default_gas_price() -> f64 {
    5.25
}
fn default_wear_tear() -> f64 {
    0.35
}

fn default_regional_gas_prices() -> HashMap<String, f64> {
    HashMap::from([
        ("CA".into(), 5.25),
        ("NY".into(), 4.80),
        ("TX".into(), 3.90),
        ("FL".into(), 4.20),
        ("IL".into(), 4.50),
        ("WA".into(), 5.10),
        ("MA".into(), 4.70),
        ("AZ".into(), 4.30),
    ])
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            default_gas_price_per_gallon: default_gas_price(),
            wear_tear_per_mile: default_wear_tear(),
            regional_gas_prices: default_regional_gas_prices(),
        }
    }
}

// ── Deadtime model ──────────────────────────────────────────────────

/// Minutes lost between trips; reduces the achievable throughput ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct DeadtimeConfig {
    #[serde(default = "default_rs_wait")]
    pub avg_wait_minutes: f64,
    #[serde(default = "default_rs_pickup")]
    pub avg_pickup_minutes: f64,
    /// Restaurant wait; zero for rideshare.
    #[serde(default)]
    pub restaurant_wait_minutes: f64,
    #[serde(default = "default_rs_deadtime_factors")]
    pub hour_factors: [f64; 24],
    #[serde(default = "default_rs_min_deadtime")]
    pub min_minutes: f64,
    #[serde(default = "default_rs_max_deadtime")]
    pub max_minutes: f64,
}

fn default_rs_wait() -> f64 {
    12.0
}
fn default_rs_pickup() -> f64 {
    7.0
}
fn default_rs_min_deadtime() -> f64 {
    5.0
}
fn default_rs_max_deadtime() -> f64 {
    25.0
}

fn default_rs_deadtime_factors() -> [f64; 24] {
    [
        1.8, 2.0, 2.2, 2.2, 1.8, 1.4, //
        1.2, 1.0, 0.8, 0.8, 0.8, 0.8, //
        0.8, 0.8, 0.9, 0.8, 0.8, 0.7, //
        0.7, 0.8, 0.9, 1.1, 1.4, 1.6,
    ]
}

impl Default for DeadtimeConfig {
    fn default() -> Self {
        Self {
            avg_wait_minutes: default_rs_wait(),
            avg_pickup_minutes: default_rs_pickup(),
            restaurant_wait_minutes: 0.0,
            hour_factors: default_rs_deadtime_factors(),
            min_minutes: default_rs_min_deadtime(),
            max_minutes: default_rs_max_deadtime(),
        }
    }
}

fn default_delivery_deadtime() -> DeadtimeConfig {
    DeadtimeConfig {
        avg_wait_minutes: 6.0,
        avg_pickup_minutes: 4.0,
        restaurant_wait_minutes: 5.0,
        hour_factors: [
            2.0, 2.5, 2.5, 2.5, 2.0, 1.5, //
            1.3, 1.1, 1.0, 0.9, 0.8, 0.7, //
            0.5, 0.6, 1.0, 1.2, 0.9, 0.6, //
            0.5, 0.6, 0.7, 0.9, 1.3, 1.7,
        ],
        min_minutes: 3.0,
        max_minutes: 15.0,
    }
}

// ── Web / logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_true() -> bool {
    true
}
fn default_port() -> u16 {
    5002
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_output: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_output: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProviderConfig::default(),
            cache: CacheConfig::default(),
            demand: DemandConfig::default(),
            supply: SupplyConfig::default(),
            boost: BoostConfig::default(),
            market: MarketConfig::default(),
            rideshare: RideshareConfig::default(),
            delivery: DeliveryConfig::default(),
            costs: CostConfig::default(),
            rideshare_deadtime: DeadtimeConfig::default(),
            delivery_deadtime: default_delivery_deadtime(),
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `config/default.toml` merged with env vars.
    /// Secrets come from env vars, never from TOML.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("GIG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = builder.try_deserialize()?;

        // Provider keys only ever come from env (these should never be in TOML)
        if let Ok(v) = env::var("OPENWEATHER_API_KEY") {
            cfg.providers.openweather_api_key = v;
        }
        if let Ok(v) = env::var("TICKETMASTER_API_KEY") {
            cfg.providers.ticketmaster_api_key = v;
        }
        if let Ok(v) = env::var("EVENTBRITE_API_KEY") {
            cfg.providers.eventbrite_api_key = v;
        }
        if let Ok(v) = env::var("GOOGLE_MAPS_API_KEY") {
            cfg.providers.google_maps_api_key = v;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_consistent() {
        let cfg = Config::load().expect("default config loads");
        assert!(cfg.demand.rideshare_cap < cfg.demand.delivery_cap);
        assert_eq!(cfg.demand.rideshare_time_factors.len(), 24);
        // every hour of the day has a supply factor the ratio can divide by
        assert!(cfg.supply.rideshare_supply_factors.iter().all(|f| *f > 0.0));
        assert!(cfg.supply.delivery_supply_factors.iter().all(|f| *f > 0.0));
        assert!(cfg.rideshare.net_floor < cfg.rideshare.net_cap);
        assert!(cfg.delivery.net_floor < cfg.delivery.net_cap);
        assert!(cfg.market.cities.contains_key("san francisco"));
    }

    #[test]
    fn capabilities_follow_configured_keys() {
        let mut providers = ProviderConfig::default();
        let caps = providers.capabilities();
        assert!(!caps.weather && !caps.events && !caps.traffic);

        providers.openweather_api_key = "k".into();
        providers.ticketmaster_api_key = "k".into();
        assert!(providers.capabilities().weather);
        assert!(providers.capabilities().events);

        // alternate provider without a key stays unavailable
        providers.events_provider = "meetup".into();
        assert!(!providers.capabilities().events);
    }
}
