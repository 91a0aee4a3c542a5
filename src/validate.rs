use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::EventSubmission;

static COORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.?\d*$").expect("valid coordinate regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub const MAX_TAGS: usize = 5;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("title must be between 5 and 200 characters")]
    TitleLength,
    #[error("description must be between 20 and 1000 characters")]
    DescriptionLength,
    #[error("location name must be at least 3 characters")]
    LocationNameLength,
    #[error("location address must be at least 5 characters")]
    LocationAddressLength,
    #[error("invalid latitude: {0}")]
    InvalidLatitude(String),
    #[error("invalid longitude: {0}")]
    InvalidLongitude(String),
    #[error("organizer name must be at least 2 characters")]
    OrganizerNameLength,
    #[error("organizer website is not a valid url")]
    InvalidWebsite,
    #[error("organizer email is not a valid address")]
    InvalidEmail,
    #[error("image url is not a valid url")]
    InvalidImageUrl,
    #[error("at most {MAX_TAGS} tags are allowed")]
    TooManyTags,
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

fn is_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Rejects a submission that fails the intake constraints. Optional fields
/// are only checked when present and non-empty; an empty string counts as
/// absent, matching how the submission form sends untouched fields.
pub fn check_submission(submission: &EventSubmission) -> Result<(), ValidationError> {
    let title_len = submission.title.chars().count();
    if !(5..=200).contains(&title_len) {
        return Err(ValidationError::TitleLength);
    }

    let description_len = submission.description.chars().count();
    if !(20..=1000).contains(&description_len) {
        return Err(ValidationError::DescriptionLength);
    }

    if submission.location_name.chars().count() < 3 {
        return Err(ValidationError::LocationNameLength);
    }
    if submission.location_address.chars().count() < 5 {
        return Err(ValidationError::LocationAddressLength);
    }

    if !COORD_RE.is_match(&submission.lat) {
        return Err(ValidationError::InvalidLatitude(submission.lat.clone()));
    }
    if !COORD_RE.is_match(&submission.lng) {
        return Err(ValidationError::InvalidLongitude(submission.lng.clone()));
    }

    if submission.organizer_name.chars().count() < 2 {
        return Err(ValidationError::OrganizerNameLength);
    }

    if let Some(website) = submission.organizer_website.as_deref() {
        if !website.is_empty() && !is_url(website) {
            return Err(ValidationError::InvalidWebsite);
        }
    }
    if let Some(email) = submission.organizer_email.as_deref() {
        if !email.is_empty() && !EMAIL_RE.is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }
    if let Some(image_url) = submission.image_url.as_deref() {
        if !image_url.is_empty() && !is_url(image_url) {
            return Err(ValidationError::InvalidImageUrl);
        }
    }

    if submission.tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags);
    }

    if submission.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(ValidationError::UnknownTimezone(submission.timezone.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn valid_submission() -> EventSubmission {
        let start = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        EventSubmission {
            title: "South End Farmers Market".to_string(),
            description: "Weekly farmers market with local produce and artisan goods.".to_string(),
            start_datetime: start,
            end_datetime: start,
            timezone: "America/New_York".to_string(),
            location_name: "Atherton Mill & Market".to_string(),
            location_address: "2104 South Blvd, Charlotte, NC 28203".to_string(),
            lat: "35.2070".to_string(),
            lng: "-80.8640".to_string(),
            organizer_name: "Atherton Market".to_string(),
            organizer_website: Some("https://athertonmill.com/market".to_string()),
            organizer_email: None,
            contact_public: false,
            tags: vec!["market".to_string(), "food".to_string()],
            is_free: true,
            is_family_friendly: true,
            is_outdoor: true,
            neighborhood: Some("South End".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        check_submission(&valid_submission()).expect("submission should pass");
    }

    #[test]
    fn rejects_short_title() {
        let mut submission = valid_submission();
        submission.title = "Expo".to_string();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::TitleLength)
        ));
    }

    #[test]
    fn rejects_short_description() {
        let mut submission = valid_submission();
        submission.description = "Too short".to_string();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::DescriptionLength)
        ));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let mut submission = valid_submission();
        submission.lat = "35.20.70".to_string();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::InvalidLatitude(_))
        ));

        let mut submission = valid_submission();
        submission.lng = "west".to_string();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn accepts_negative_and_integer_coordinates() {
        let mut submission = valid_submission();
        submission.lat = "35".to_string();
        submission.lng = "-80.".to_string();
        check_submission(&submission).expect("pattern allows integers and trailing dot");
    }

    #[test]
    fn empty_optional_fields_are_ignored() {
        let mut submission = valid_submission();
        submission.organizer_website = Some(String::new());
        submission.organizer_email = Some(String::new());
        submission.image_url = Some(String::new());
        check_submission(&submission).expect("empty optionals count as absent");
    }

    #[test]
    fn rejects_bad_website_and_email() {
        let mut submission = valid_submission();
        submission.organizer_website = Some("not a url".to_string());
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::InvalidWebsite)
        ));

        let mut submission = valid_submission();
        submission.organizer_email = Some("info.example.com".to_string());
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::InvalidEmail)
        ));
    }

    #[test]
    fn rejects_sixth_tag() {
        let mut submission = valid_submission();
        submission.tags = (0..6).map(|i| format!("tag-{i}")).collect();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::TooManyTags)
        ));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut submission = valid_submission();
        submission.timezone = "America/Charlotte".to_string();
        assert!(matches!(
            check_submission(&submission),
            Err(ValidationError::UnknownTimezone(_))
        ));
    }
}
