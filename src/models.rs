use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Verified,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Outdated,
    Spam,
    IncorrectLocation,
    SafetyRisk,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    CityCalendar,
    Library,
    LocalNews,
    CommunityGroup,
    UserSubmission,
    Other,
}

/// Provenance record backing an event's factual claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_snapshot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub timezone: String,
    pub location_name: String,
    pub location_address: String,
    // Kept as submitted decimal strings so stored precision survives round-trips.
    pub lat: String,
    pub lng: String,
    pub organizer_name: String,
    pub organizer_website: Option<String>,
    pub organizer_email: Option<String>,
    pub contact_public: bool,
    pub tags: Vec<String>,
    pub is_free: bool,
    pub is_family_friendly: bool,
    pub is_outdoor: bool,
    pub sources: Vec<EventSource>,
    pub confidence: u8,
    pub verification_status: VerificationStatus,
    pub neighborhood: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: DateTime<Utc>,
    pub moderation_notes: Option<String>,
    pub flag_reason: Option<FlagReason>,
}

impl Event {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lng = self.lng.parse::<f64>().ok()?;
        Some((lat, lng))
    }

    /// Display badge derived from status and raw score together. Recomputed
    /// on every call so the label never drifts from the stored fields.
    pub fn badge(&self) -> TrustBadge {
        if self.verification_status == VerificationStatus::Verified || self.confidence >= 80 {
            TrustBadge::Verified
        } else if self.verification_status == VerificationStatus::Flagged || self.confidence < 50 {
            TrustBadge::Flagged
        } else {
            TrustBadge::Unverified
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustBadge {
    Verified,
    Unverified,
    Flagged,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_is_free() -> bool {
    true
}

/// A new event as submitted by a community member. Trust and provenance
/// fields are absent on purpose: the store assigns them at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    pub title: String,
    pub description: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub location_name: String,
    pub location_address: String,
    pub lat: String,
    pub lng: String,
    pub organizer_name: String,
    #[serde(default)]
    pub organizer_website: Option<String>,
    #[serde(default)]
    pub organizer_email: Option<String>,
    #[serde(default)]
    pub contact_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_is_free")]
    pub is_free: bool,
    #[serde(default)]
    pub is_family_friendly: bool,
    #[serde(default)]
    pub is_outdoor: bool,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Moderation command: overwrite the verification status, optionally the
/// confidence and notes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub confidence: Option<u8>,
    #[serde(default)]
    pub moderation_notes: Option<String>,
}

/// Moderation command: force an event into the flagged state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagRequest {
    pub flag_reason: FlagReason,
    #[serde(default)]
    pub notes: Option<String>,
}
