use crate::models::EventSubmission;

/// Everything starts here; a bare submission is neither trusted nor suspect.
pub const BASE_SCORE: u8 = 50;

/// Ceiling for self-reported submissions. Kept below the verified badge
/// threshold (80) so an unmoderated event can never render as verified.
pub const SUBMISSION_CAP: u8 = 75;

const WEBSITE_BONUS: u8 = 15;
const EMAIL_BONUS: u8 = 10;
const NEIGHBORHOOD_BONUS: u8 = 5;

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}

/// Initial confidence for a fresh submission: a deterministic function of
/// which optional contact metadata the organizer chose to provide. No
/// network calls, no lookups; the score is explainable from the input alone.
pub fn initial_score(submission: &EventSubmission) -> u8 {
    let mut score = BASE_SCORE;

    if present(&submission.organizer_website) {
        score += WEBSITE_BONUS;
    }
    if present(&submission.organizer_email) {
        score += EMAIL_BONUS;
    }
    if present(&submission.neighborhood) {
        score += NEIGHBORHOOD_BONUS;
    }

    score.min(SUBMISSION_CAP)
}
