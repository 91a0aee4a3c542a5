use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::confidence;
use crate::models::{
    Event, EventSource, EventSubmission, FlagRequest, SourceType, StatusUpdate,
    VerificationStatus,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event not found")]
    NotFound,
    #[error("event storage unavailable")]
    Unavailable,
}

struct StoredEvent {
    // Insertion sequence; the stable tie-break when start times collide.
    seq: u64,
    event: Event,
}

struct Inner {
    events: HashMap<Uuid, StoredEvent>,
    next_seq: u64,
}

/// Authoritative collection of event records. Owned by the process and
/// handed to the request layer by reference; moderation writes race under
/// last-write-wins, readers always see a whole record.
pub struct EventStore {
    inner: RwLock<Inner>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Inserts demo events around Charlotte when the store is empty, so a
    /// fresh install has something on the map.
    pub fn seed_if_empty(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Unavailable)?;
        if !inner.events.is_empty() {
            return Ok(0);
        }

        let samples = sample_events();
        let count = samples.len();
        for event in samples {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.events.insert(event.id, StoredEvent { seq, event });
        }
        tracing::info!(count, "seeded demo events");
        Ok(count)
    }

    /// Admits a validated submission: assigns a fresh id, computes the
    /// initial confidence, attaches the mandatory user_submission source,
    /// and pins the status to unverified.
    pub fn create_event(&self, submission: EventSubmission) -> Result<Event, StoreError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            confidence: confidence::initial_score(&submission),
            verification_status: VerificationStatus::Unverified,
            sources: vec![EventSource {
                kind: SourceType::UserSubmission,
                url: String::new(),
                cached_snapshot: None,
            }],
            created_at: now,
            last_checked_at: now,
            moderation_notes: None,
            flag_reason: None,
            title: submission.title,
            description: submission.description,
            start_datetime: submission.start_datetime,
            end_datetime: submission.end_datetime,
            timezone: submission.timezone,
            location_name: submission.location_name,
            location_address: submission.location_address,
            lat: submission.lat,
            lng: submission.lng,
            organizer_name: submission.organizer_name,
            organizer_website: submission.organizer_website,
            organizer_email: submission.organizer_email,
            contact_public: submission.contact_public,
            tags: submission.tags,
            is_free: submission.is_free,
            is_family_friendly: submission.is_family_friendly,
            is_outdoor: submission.is_outdoor,
            neighborhood: submission.neighborhood,
            image_url: submission.image_url,
        };

        let mut inner = self.inner.write().map_err(|_| StoreError::Unavailable)?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.events.insert(
            event.id,
            StoredEvent {
                seq,
                event: event.clone(),
            },
        );
        Ok(event)
    }

    /// All events ordered by start time, earliest first. Events sharing a
    /// start time keep their insertion order.
    pub fn all_events(&self) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Unavailable)?;
        let mut records: Vec<&StoredEvent> = inner.events.values().collect();
        records.sort_by_key(|stored| (stored.event.start_datetime, stored.seq));
        Ok(records.into_iter().map(|stored| stored.event.clone()).collect())
    }

    pub fn event(&self, id: Uuid) -> Result<Event, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Unavailable)?;
        inner
            .events
            .get(&id)
            .map(|stored| stored.event.clone())
            .ok_or(StoreError::NotFound)
    }

    /// Moderation: overwrite the verification status (any state to any
    /// state), optionally the confidence and notes. The flag reason is left
    /// alone even when un-flagging; the last reason stays on the record.
    pub fn update_status(&self, id: Uuid, update: StatusUpdate) -> Result<Event, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Unavailable)?;
        let stored = inner.events.get_mut(&id).ok_or(StoreError::NotFound)?;

        stored.event.verification_status = update.verification_status;
        if let Some(confidence) = update.confidence {
            stored.event.confidence = confidence;
        }
        if let Some(notes) = update.moderation_notes {
            stored.event.moderation_notes = Some(notes);
        }
        stored.event.last_checked_at = Utc::now();

        Ok(stored.event.clone())
    }

    /// Moderation: force the event into the flagged state with a reason.
    /// Confidence is untouched; only an explicit status update changes it.
    pub fn flag(&self, id: Uuid, request: FlagRequest) -> Result<Event, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Unavailable)?;
        let stored = inner.events.get_mut(&id).ok_or(StoreError::NotFound)?;

        stored.event.verification_status = VerificationStatus::Flagged;
        stored.event.flag_reason = Some(request.flag_reason);
        if let Some(notes) = request.notes {
            stored.event.moderation_notes = Some(notes);
        }
        stored.event.last_checked_at = Utc::now();

        Ok(stored.event.clone())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

struct Sample {
    title: &'static str,
    description: &'static str,
    days_ahead: i64,
    duration_hours: i64,
    location_name: &'static str,
    location_address: &'static str,
    lat: &'static str,
    lng: &'static str,
    organizer_name: &'static str,
    organizer_website: Option<&'static str>,
    organizer_email: Option<&'static str>,
    tags: &'static [&'static str],
    is_family_friendly: bool,
    is_outdoor: bool,
    source: (SourceType, &'static str),
    confidence: u8,
    verification_status: VerificationStatus,
    neighborhood: &'static str,
}

fn sample_events() -> Vec<Event> {
    let samples = [
        Sample {
            title: "Freedom Park Community Concert",
            description: "Join us for a free outdoor concert featuring local acoustic \
                artists. Bring your blanket and enjoy an evening of music under the \
                stars. Food trucks will be available.",
            days_ahead: 4,
            duration_hours: 3,
            location_name: "Freedom Park",
            location_address: "1900 East Blvd, Charlotte, NC 28203",
            lat: "35.2042",
            lng: "-80.8426",
            organizer_name: "Friends of Freedom Park",
            organizer_website: Some("https://friendsoffreedompark.org"),
            organizer_email: Some("info@friendsoffreedompark.org"),
            tags: &["music", "outdoor", "community"],
            is_family_friendly: true,
            is_outdoor: true,
            source: (
                SourceType::CityCalendar,
                "https://charlottenc.gov/events/freedom-park-concert",
            ),
            confidence: 95,
            verification_status: VerificationStatus::Verified,
            neighborhood: "Dilworth",
        },
        Sample {
            title: "Plaza Midwood Art Walk",
            description: "Monthly art walk through Plaza Midwood featuring local \
                artists, galleries, and pop-up exhibitions. Meet artists, enjoy \
                refreshments, and explore the vibrant art scene.",
            days_ahead: 9,
            duration_hours: 4,
            location_name: "Central Avenue - Plaza Midwood",
            location_address: "1600 Central Ave, Charlotte, NC 28205",
            lat: "35.2220",
            lng: "-80.8050",
            organizer_name: "Plaza Midwood Merchants Association",
            organizer_website: Some("https://plazamidwood.com"),
            organizer_email: None,
            tags: &["art", "culture", "walking"],
            is_family_friendly: true,
            is_outdoor: true,
            source: (SourceType::CommunityGroup, "https://plazamidwood.com/events"),
            confidence: 88,
            verification_status: VerificationStatus::Verified,
            neighborhood: "Plaza Midwood",
        },
        Sample {
            title: "NoDa Neighborhood Cleanup",
            description: "Help keep NoDa beautiful! Join neighbors for a community \
                cleanup day. We'll provide gloves, bags, and refreshments. Perfect \
                for families wanting to give back.",
            days_ahead: 7,
            duration_hours: 3,
            location_name: "NoDa Company Store",
            location_address: "3106 N Davidson St, Charlotte, NC 28205",
            lat: "35.2451",
            lng: "-80.8098",
            organizer_name: "NoDa Neighborhood Association",
            organizer_website: None,
            organizer_email: Some("cleanup@noda.org"),
            tags: &["community", "volunteer", "outdoor"],
            is_family_friendly: true,
            is_outdoor: true,
            source: (SourceType::UserSubmission, ""),
            confidence: 65,
            verification_status: VerificationStatus::Unverified,
            neighborhood: "NoDa",
        },
        Sample {
            title: "South End Farmers Market",
            description: "Weekly farmers market with local produce, artisan goods, \
                baked items, and live music. Support local farmers and enjoy the \
                community atmosphere.",
            days_ahead: 8,
            duration_hours: 4,
            location_name: "Atherton Mill & Market",
            location_address: "2104 South Blvd, Charlotte, NC 28203",
            lat: "35.2070",
            lng: "-80.8640",
            organizer_name: "Atherton Market",
            organizer_website: Some("https://athertonmill.com/market"),
            organizer_email: None,
            tags: &["market", "food", "local"],
            is_family_friendly: true,
            is_outdoor: true,
            source: (
                SourceType::CityCalendar,
                "https://charlottenc.gov/events/atherton-market",
            ),
            confidence: 92,
            verification_status: VerificationStatus::Verified,
            neighborhood: "South End",
        },
        Sample {
            title: "Myers Park Library Story Time",
            description: "Interactive story time for children ages 2-5 with songs, \
                crafts, and activities. No registration required. Join us for fun \
                learning!",
            days_ahead: 6,
            duration_hours: 1,
            location_name: "Myers Park Library",
            location_address: "310 E Worthington Ave, Charlotte, NC 28203",
            lat: "35.1950",
            lng: "-80.8340",
            organizer_name: "Charlotte Mecklenburg Library",
            organizer_website: Some("https://cmlibrary.org"),
            organizer_email: None,
            tags: &["kids", "education", "library"],
            is_family_friendly: true,
            is_outdoor: false,
            source: (SourceType::Library, "https://cmlibrary.org/events/story-time"),
            confidence: 98,
            verification_status: VerificationStatus::Verified,
            neighborhood: "Myers Park",
        },
    ];

    let now = Utc::now();
    samples
        .into_iter()
        .map(|sample| sample_event(sample, now))
        .collect()
}

fn sample_event(sample: Sample, now: DateTime<Utc>) -> Event {
    let start = now + Duration::days(sample.days_ahead);
    Event {
        id: Uuid::new_v4(),
        title: sample.title.to_string(),
        description: sample.description.to_string(),
        start_datetime: start,
        end_datetime: start + Duration::hours(sample.duration_hours),
        timezone: "America/New_York".to_string(),
        location_name: sample.location_name.to_string(),
        location_address: sample.location_address.to_string(),
        lat: sample.lat.to_string(),
        lng: sample.lng.to_string(),
        organizer_name: sample.organizer_name.to_string(),
        organizer_website: sample.organizer_website.map(str::to_string),
        organizer_email: sample.organizer_email.map(str::to_string),
        contact_public: false,
        tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
        is_free: true,
        is_family_friendly: sample.is_family_friendly,
        is_outdoor: sample.is_outdoor,
        sources: vec![EventSource {
            kind: sample.source.0,
            url: sample.source.1.to_string(),
            cached_snapshot: None,
        }],
        confidence: sample.confidence,
        verification_status: sample.verification_status,
        neighborhood: Some(sample.neighborhood.to_string()),
        image_url: None,
        created_at: now - Duration::days(3),
        last_checked_at: now - Duration::days(1),
        moderation_notes: None,
        flag_reason: None,
    }
}
