use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo;
use crate::models::{Event, VerificationStatus};

/// Browsing filters. Unset options do not constrain; every set option must
/// hold for an event to survive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryFilters {
    pub search: Option<String>,
    pub radius: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_free: Option<bool>,
    pub is_family_friendly: Option<bool>,
    pub is_outdoor: Option<bool>,
    pub verified_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub distance: f64,
}

fn matches_search(event: &Event, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    event.title.to_lowercase().contains(&needle)
        || event.location_name.to_lowercase().contains(&needle)
        || event.description.to_lowercase().contains(&needle)
}

fn passes(event: &Event, filters: &DiscoveryFilters, distance: f64) -> bool {
    if let Some(search) = filters.search.as_deref() {
        if !search.is_empty() && !matches_search(event, search) {
            return false;
        }
    }

    if let Some(radius) = filters.radius {
        if distance > radius {
            return false;
        }
    }

    if let Some(start_date) = filters.start_date {
        if event.start_datetime < start_date {
            return false;
        }
    }
    if let Some(end_date) = filters.end_date {
        if event.start_datetime > end_date {
            return false;
        }
    }

    if let Some(is_free) = filters.is_free {
        if event.is_free != is_free {
            return false;
        }
    }
    if let Some(is_family_friendly) = filters.is_family_friendly {
        if event.is_family_friendly != is_family_friendly {
            return false;
        }
    }
    if let Some(is_outdoor) = filters.is_outdoor {
        if event.is_outdoor != is_outdoor {
            return false;
        }
    }

    if filters.verified_only.unwrap_or(false)
        && event.verification_status != VerificationStatus::Verified
    {
        return false;
    }

    true
}

/// Filters the full event set against the viewer's position, annotates each
/// survivor with its distance, and sorts nearest-first. Events at the same
/// distance keep their input order. Recomputed in full on every call; there
/// is no index to maintain.
pub fn discover(
    events: Vec<Event>,
    viewer_lat: f64,
    viewer_lng: f64,
    filters: &DiscoveryFilters,
) -> Vec<RankedEvent> {
    let mut ranked: Vec<RankedEvent> = events
        .into_iter()
        .filter_map(|event| {
            // An event without parseable coordinates cannot be ranked.
            let (lat, lng) = event.coordinates()?;
            let distance = geo::distance_miles(viewer_lat, viewer_lng, lat, lng);
            passes(&event, filters, distance).then_some(RankedEvent { event, distance })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}
