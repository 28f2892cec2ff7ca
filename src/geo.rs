//! Location resolution.
//!
//! Free-text input is matched against a built-in table of supported metros
//! first; unknown names go to Nominatim forward geocoding; if that fails the
//! resolver falls back to the default market rather than erroring, and the
//! result records which path produced it.

use crate::config::ProviderConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// How a location was resolved, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoConfidence {
    ExactName,
    /// Matched the built-in table through an alias or coordinate proximity.
    ApproximateTable,
    Geocoded,
    DefaultFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Canonical lowercase city key used for market tier lookup.
    pub city_key: String,
    /// Display name echoed back in responses.
    pub display_name: String,
    /// Two-letter state code when known, used for regional fuel pricing.
    pub state: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub confidence: GeoConfidence,
}

struct KnownCity {
    key: &'static str,
    display: &'static str,
    state: &'static str,
    lat: f64,
    lng: f64,
    aliases: &'static [&'static str],
}

const KNOWN_CITIES: &[KnownCity] = &[
    KnownCity {
        key: "san francisco",
        display: "San Francisco",
        state: "CA",
        lat: 37.7749,
        lng: -122.4194,
        aliases: &["sf", "san fran"],
    },
    KnownCity {
        key: "new york",
        display: "New York",
        state: "NY",
        lat: 40.7128,
        lng: -74.0060,
        aliases: &["nyc", "new york city", "manhattan"],
    },
    KnownCity {
        key: "los angeles",
        display: "Los Angeles",
        state: "CA",
        lat: 34.0522,
        lng: -118.2437,
        aliases: &["la"],
    },
    KnownCity {
        key: "chicago",
        display: "Chicago",
        state: "IL",
        lat: 41.8781,
        lng: -87.6298,
        aliases: &[],
    },
    KnownCity {
        key: "seattle",
        display: "Seattle",
        state: "WA",
        lat: 47.6062,
        lng: -122.3321,
        aliases: &[],
    },
    KnownCity {
        key: "boston",
        display: "Boston",
        state: "MA",
        lat: 42.3601,
        lng: -71.0589,
        aliases: &[],
    },
    KnownCity {
        key: "austin",
        display: "Austin",
        state: "TX",
        lat: 30.2672,
        lng: -97.7431,
        aliases: &[],
    },
    KnownCity {
        key: "miami",
        display: "Miami",
        state: "FL",
        lat: 25.7617,
        lng: -80.1918,
        aliases: &[],
    },
];

const DEFAULT_CITY: &str = "san francisco";

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct GeoResolver {
    http: reqwest::Client,
    base_url: String,
}

impl GeoResolver {
    pub fn new(providers: &ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(providers.request_timeout_secs))
            .user_agent("gigcast/0.1")
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: providers.nominatim_base_url.clone(),
        }
    }

    /// Resolve free-text input into coordinates. Never fails: unresolvable
    /// input lands on the default market with `DefaultFallback` confidence.
    pub async fn resolve(&self, input: &str) -> ResolvedLocation {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return default_location();
        }

        if let Some(city) = lookup_known(&needle) {
            return city;
        }

        match self.geocode(input).await {
            Some(loc) => loc,
            None => {
                warn!(input, "geocoding failed, using default market");
                default_location()
            }
        }
    }

    /// Resolve raw coordinates. A known metro within ~50 miles wins; then
    /// Nominatim reverse geocoding; then the default market keeping the
    /// caller's coordinates.
    pub async fn resolve_coords(&self, lat: f64, lng: f64) -> ResolvedLocation {
        if let Some(city) = nearest_known(lat, lng, 50.0) {
            return city;
        }
        match self.reverse_geocode(lat, lng).await {
            Some(loc) => loc,
            None => {
                warn!(lat, lng, "reverse geocoding failed, using default market");
                let mut loc = default_location();
                loc.lat = lat;
                loc.lng = lng;
                loc
            }
        }
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<ResolvedLocation> {
        let url = format!("{}/reverse", self.base_url);
        let hit: NominatimHit = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("format", "json".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
            .ok()?
            .json()
            .await
            .ok()?;

        debug!(lat, lng, place = %hit.display_name, "reverse geocoded via nominatim");

        let display = hit
            .display_name
            .split(',')
            .next()
            .unwrap_or("unknown")
            .trim()
            .to_string();
        let state = extract_state(&hit.display_name);

        Some(ResolvedLocation {
            city_key: display.to_lowercase(),
            display_name: display,
            state,
            lat,
            lng,
            confidence: GeoConfidence::Geocoded,
        })
    }

    async fn geocode(&self, input: &str) -> Option<ResolvedLocation> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", input),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "us"),
            ])
            .send()
            .await
            .ok()?;

        let hits: Vec<NominatimHit> = resp.json().await.ok()?;
        let hit = hits.into_iter().next()?;
        let lat: f64 = hit.lat.parse().ok()?;
        let lng: f64 = hit.lon.parse().ok()?;

        debug!(input, %lat, %lng, "geocoded via nominatim");

        // first comma-separated component is the place name
        let display = hit
            .display_name
            .split(',')
            .next()
            .unwrap_or(input)
            .trim()
            .to_string();
        let state = extract_state(&hit.display_name);

        Some(ResolvedLocation {
            city_key: display.to_lowercase(),
            display_name: display,
            state,
            lat,
            lng,
            confidence: GeoConfidence::Geocoded,
        })
    }
}

fn lookup_known(needle: &str) -> Option<ResolvedLocation> {
    KNOWN_CITIES
        .iter()
        .find(|c| c.key == needle || c.aliases.contains(&needle))
        .map(|c| {
            let confidence = if c.key == needle {
                GeoConfidence::ExactName
            } else {
                GeoConfidence::ApproximateTable
            };
            to_resolved(c, confidence)
        })
}

fn nearest_known(lat: f64, lng: f64, max_miles: f64) -> Option<ResolvedLocation> {
    KNOWN_CITIES
        .iter()
        .map(|c| (c, approx_miles(lat, lng, c.lat, c.lng)))
        .filter(|(_, d)| *d <= max_miles)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| to_resolved(c, GeoConfidence::ApproximateTable))
}

fn to_resolved(c: &KnownCity, confidence: GeoConfidence) -> ResolvedLocation {
    ResolvedLocation {
        city_key: c.key.to_string(),
        display_name: c.display.to_string(),
        state: Some(c.state.to_string()),
        lat: c.lat,
        lng: c.lng,
        confidence,
    }
}

/// Equirectangular distance, good enough for a coarse proximity check.
fn approx_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const MILES_PER_DEG: f64 = 69.0;
    let dlat = lat1 - lat2;
    let dlng = (lng1 - lng2) * lat1.to_radians().cos();
    (dlat * dlat + dlng * dlng).sqrt() * MILES_PER_DEG
}

pub fn default_location() -> ResolvedLocation {
    let mut loc = lookup_known(DEFAULT_CITY).expect("default city is in the table");
    loc.confidence = GeoConfidence::DefaultFallback;
    loc
}

/// Pull a state code out of a Nominatim display name like
/// "Portland, Multnomah County, Oregon, United States".
fn extract_state(display_name: &str) -> Option<String> {
    const STATES: &[(&str, &str)] = &[
        ("california", "CA"),
        ("new york", "NY"),
        ("texas", "TX"),
        ("florida", "FL"),
        ("illinois", "IL"),
        ("washington", "WA"),
        ("massachusetts", "MA"),
        ("arizona", "AZ"),
        ("oregon", "OR"),
        ("nevada", "NV"),
        ("colorado", "CO"),
        ("georgia", "GA"),
        ("pennsylvania", "PA"),
    ];
    let lower = display_name.to_lowercase();
    for part in lower.split(',').map(str::trim) {
        if let Some((_, code)) = STATES.iter().find(|(name, _)| *name == part) {
            return Some((*code).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_matches_by_name_and_alias() {
        let sf = lookup_known("san francisco").unwrap();
        assert_eq!(sf.confidence, GeoConfidence::ExactName);
        assert_eq!(sf.state.as_deref(), Some("CA"));

        let nyc = lookup_known("nyc").unwrap();
        assert_eq!(nyc.city_key, "new york");
        assert_eq!(nyc.confidence, GeoConfidence::ApproximateTable);
    }

    #[test]
    fn coordinates_near_a_metro_snap_to_it() {
        // Oakland coordinates land on San Francisco
        let hit = nearest_known(37.8044, -122.2712, 50.0).unwrap();
        assert_eq!(hit.city_key, "san francisco");
        assert_eq!(hit.confidence, GeoConfidence::ApproximateTable);

        // middle of Kansas is near nothing
        assert!(nearest_known(38.5, -98.0, 50.0).is_none());
    }

    #[test]
    fn default_fallback_is_marked() {
        let loc = default_location();
        assert_eq!(loc.city_key, "san francisco");
        assert_eq!(loc.confidence, GeoConfidence::DefaultFallback);
    }

    #[test]
    fn state_extraction_from_display_name() {
        let state = extract_state("Portland, Multnomah County, Oregon, United States");
        assert_eq!(state.as_deref(), Some("OR"));
        assert_eq!(extract_state("Somewhere, Atlantis"), None);
    }

    #[tokio::test]
    async fn empty_input_resolves_to_default() {
        let resolver = GeoResolver::new(&ProviderConfig::default());
        let loc = resolver.resolve("   ").await;
        assert_eq!(loc.confidence, GeoConfidence::DefaultFallback);
    }
}
