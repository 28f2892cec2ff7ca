//! Events source client.
//!
//! One provider is attempted per call, chosen by configuration. Ticketmaster
//! is the primary; Eventbrite is a thinner alternate. Providers that need
//! OAuth flows this engine does not carry (meetup, songkick) degrade to the
//! calendar estimate, as does any provider failure.

use crate::config::ProviderConfig;
use crate::sources::types::{Event, EventsReading, Provenance};
use crate::timeslot::TimeContext;
use serde::Deserialize;
use tracing::{debug, warn};

// ── Ticketmaster wire types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TmResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<TmEmbedded>,
    #[serde(default)]
    page: Option<TmPage>,
}

#[derive(Debug, Deserialize)]
struct TmPage {
    #[serde(rename = "totalPages")]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct TmEmbedded {
    events: Vec<TmEvent>,
}

#[derive(Debug, Deserialize)]
struct TmEvent {
    name: String,
    dates: TmDates,
    #[serde(default)]
    classifications: Vec<TmClassification>,
    #[serde(rename = "_embedded")]
    embedded: Option<TmEventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct TmDates {
    start: TmStart,
}

#[derive(Debug, Deserialize)]
struct TmStart {
    #[serde(rename = "localTime")]
    local_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmClassification {
    segment: Option<TmNamed>,
}

#[derive(Debug, Deserialize)]
struct TmNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmEventEmbedded {
    venues: Vec<TmVenue>,
}

#[derive(Debug, Deserialize)]
struct TmVenue {
    name: Option<String>,
}

// ── Eventbrite wire types ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EbResponse {
    #[serde(default)]
    events: Vec<EbEvent>,
}

#[derive(Debug, Deserialize)]
struct EbEvent {
    name: EbText,
    start: EbStart,
    #[serde(default)]
    capacity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EbText {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EbStart {
    local: String,
}

pub struct EventsClient {
    http: reqwest::Client,
    provider: String,
    ticketmaster_url: String,
    ticketmaster_key: String,
    eventbrite_url: String,
    eventbrite_key: String,
    radius_miles: u32,
}

impl EventsClient {
    pub fn new(http: reqwest::Client, providers: &ProviderConfig) -> Self {
        Self {
            http,
            provider: providers.events_provider.clone(),
            ticketmaster_url: providers.ticketmaster_base_url.clone(),
            ticketmaster_key: providers.ticketmaster_api_key.clone(),
            eventbrite_url: providers.eventbrite_base_url.clone(),
            eventbrite_key: providers.eventbrite_api_key.clone(),
            radius_miles: providers.event_radius_miles,
        }
    }

    /// Events for the slot's date near the coordinates. Falls through to the
    /// calendar estimate on any provider problem.
    pub async fn fetch(&self, lat: f64, lng: f64, ctx: &TimeContext) -> EventsReading {
        let (provider, attempt) = match self.provider.as_str() {
            "ticketmaster" if !self.ticketmaster_key.is_empty() => {
                ("ticketmaster", self.fetch_ticketmaster(lat, lng, ctx).await)
            }
            "eventbrite" if !self.eventbrite_key.is_empty() => {
                ("eventbrite", self.fetch_eventbrite(lat, lng, ctx).await)
            }
            _ => return calendar_estimate(ctx),
        };

        match attempt {
            Ok(events) => {
                debug!(count = events.len(), provider, "live events");
                EventsReading {
                    events,
                    // with live events the boost carries the signal
                    event_multiplier: 1.0,
                    provenance: Provenance::Live(provider),
                }
            }
            Err(err) => {
                warn!(%err, provider = %self.provider, "events provider failed");
                calendar_estimate(ctx)
            }
        }
    }

    async fn fetch_ticketmaster(
        &self,
        lat: f64,
        lng: f64,
        ctx: &TimeContext,
    ) -> crate::error::Result<Vec<Event>> {
        const MAX_PAGES: u32 = 3;

        let url = format!("{}/events.json", self.ticketmaster_url);
        let date = ctx.date.format("%Y-%m-%d");
        let mut raw = Vec::new();
        let mut page = 0;
        loop {
            let resp: TmResponse = self
                .http
                .get(&url)
                .query(&[
                    ("apikey", self.ticketmaster_key.clone()),
                    ("latlong", format!("{lat},{lng}")),
                    ("radius", self.radius_miles.to_string()),
                    ("unit", "miles".to_string()),
                    ("startDateTime", format!("{date}T00:00:00Z")),
                    ("endDateTime", format!("{date}T23:59:59Z")),
                    ("size", "50".to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if let Some(embedded) = resp.embedded {
                raw.extend(embedded.events);
            }
            page += 1;
            let total = resp.page.map(|p| p.total_pages).unwrap_or(1);
            if page >= total.min(MAX_PAGES) {
                break;
            }
        }

        Ok(raw
            .into_iter()
            .map(|e| {
                let category = e
                    .classifications
                    .first()
                    .and_then(|c| c.segment.as_ref())
                    .map(|s| s.name.to_lowercase())
                    .unwrap_or_else(|| "other".to_string());
                let venue = e
                    .embedded
                    .as_ref()
                    .and_then(|emb| emb.venues.first())
                    .and_then(|v| v.name.clone())
                    .unwrap_or_else(|| "unknown venue".to_string());
                let start_hour = e
                    .dates
                    .start
                    .local_time
                    .as_deref()
                    .and_then(parse_local_hour)
                    .unwrap_or(19.0);
                Event {
                    capacity: estimate_capacity(&venue),
                    duration_hours: category_duration(&category),
                    name: e.name,
                    venue,
                    category,
                    start_hour,
                }
            })
            .collect())
    }

    async fn fetch_eventbrite(
        &self,
        lat: f64,
        lng: f64,
        ctx: &TimeContext,
    ) -> crate::error::Result<Vec<Event>> {
        let url = format!("{}/events/search/", self.eventbrite_url);
        let resp: EbResponse = self
            .http
            .get(&url)
            .bearer_auth(&self.eventbrite_key)
            .query(&[
                ("location.latitude", lat.to_string()),
                ("location.longitude", lng.to_string()),
                ("location.within", format!("{}mi", self.radius_miles)),
                (
                    "start_date.range_start",
                    format!("{}T00:00:00", ctx.date.format("%Y-%m-%d")),
                ),
                (
                    "start_date.range_end",
                    format!("{}T23:59:59", ctx.date.format("%Y-%m-%d")),
                ),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .events
            .into_iter()
            .map(|e| {
                let start_hour = e
                    .start
                    .local
                    .split('T')
                    .nth(1)
                    .and_then(parse_local_hour)
                    .unwrap_or(19.0);
                Event {
                    name: e.name.text.unwrap_or_else(|| "untitled".to_string()),
                    venue: "unknown venue".to_string(),
                    category: "other".to_string(),
                    capacity: e.capacity.unwrap_or(1000),
                    start_hour,
                    duration_hours: 2.0,
                }
            })
            .collect())
    }
}

/// "19:30:00" -> 19.5
fn parse_local_hour(time: &str) -> Option<f64> {
    let mut parts = time.split(':');
    let hour: f64 = parts.next()?.parse().ok()?;
    let minute: f64 = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0.0);
    Some(hour + minute / 60.0)
}

/// Typical run time by segment.
fn category_duration(category: &str) -> f64 {
    match category {
        "music" | "sports" => 3.0,
        "arts & theatre" | "comedy" | "film" => 2.0,
        _ => 2.0,
    }
}

/// Venue capacity from name keywords when the provider does not say.
fn estimate_capacity(venue: &str) -> u32 {
    let v = venue.to_lowercase();
    if v.contains("stadium") || v.contains("speedway") {
        50_000
    } else if v.contains("arena") || v.contains("coliseum") || v.contains("amphitheat") {
        20_000
    } else if v.contains("theater") || v.contains("theatre") || v.contains("hall") {
        2_000
    } else if v.contains("club") || v.contains("lounge") || v.contains("bar") {
        500
    } else {
        1_000
    }
}

/// No provider available: weekends and Fridays still lift demand.
fn calendar_estimate(ctx: &TimeContext) -> EventsReading {
    let event_multiplier = if ctx.is_weekend {
        1.3
    } else if ctx.is_friday {
        1.2
    } else {
        1.0
    };
    EventsReading {
        events: Vec::new(),
        event_multiplier,
        provenance: Provenance::Estimate,
    }
}
