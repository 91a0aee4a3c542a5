use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::filter::{discover, DiscoveryFilters, RankedEvent};
use crate::geocode::{GeocodeError, GeocodedPoint, Geocoder};
use crate::models::{Event, EventSubmission, FlagRequest, StatusUpdate};
use crate::store::{EventStore, StoreError};
use crate::validate::{check_submission, ValidationError};

pub struct AppState {
    pub store: EventStore,
    pub geocoder: Box<dyn Geocoder>,
    pub config: AppConfig,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(&'static str),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Event not found"),
            StoreError::Unavailable => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::EmptyAddress => ApiError::Validation(err.to_string()),
            GeocodeError::NoMatch => ApiError::NotFound("No match for address"),
            GeocodeError::Http(_) => ApiError::Internal(err.to_string()),
        }
    }
}

async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.store.all_events()?))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.store.event(id)?))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<EventSubmission>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    check_submission(&submission)?;
    let event = state.store.create_event(submission)?;
    tracing::info!(id = %event.id, confidence = event.confidence, "event submitted");
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Event>, ApiError> {
    if let Some(confidence) = update.confidence {
        if confidence > 100 {
            return Err(ApiError::Validation(
                "confidence must be between 0 and 100".to_string(),
            ));
        }
    }
    let event = state.store.update_status(id, update)?;
    tracing::info!(id = %event.id, status = ?event.verification_status, "status updated");
    Ok(Json(event))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagBody {
    id: Uuid,
    #[serde(flatten)]
    request: FlagRequest,
}

async fn flag_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FlagBody>,
) -> Result<Json<Event>, ApiError> {
    let event = state.store.flag(body.id, body.request)?;
    tracing::info!(id = %event.id, reason = ?event.flag_reason, "event flagged");
    Ok(Json(event))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
    search: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    is_free: Option<bool>,
    is_family_friendly: Option<bool>,
    is_outdoor: Option<bool>,
    verified_only: Option<bool>,
}

async fn nearby_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<RankedEvent>>, ApiError> {
    let viewer_lat = query.lat.unwrap_or(state.config.center_lat);
    let viewer_lng = query.lng.unwrap_or(state.config.center_lng);
    let filters = DiscoveryFilters {
        search: query.search,
        radius: Some(query.radius.unwrap_or(state.config.default_radius_miles)),
        start_date: query.start_date,
        end_date: query.end_date,
        is_free: query.is_free,
        is_family_friendly: query.is_family_friendly,
        is_outdoor: query.is_outdoor,
        verified_only: query.verified_only,
    };

    let events = state.store.all_events()?;
    Ok(Json(discover(events, viewer_lat, viewer_lng, &filters)))
}

#[derive(Debug, Deserialize)]
struct GeocodeBody {
    address: String,
}

async fn geocode_address(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GeocodeBody>,
) -> Result<Json<GeocodedPoint>, ApiError> {
    let point = state.geocoder.geocode(&body.address).await?;
    Ok(Json(point))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/nearby", get(nearby_events))
        .route("/api/events/{id}", get(get_event))
        .route(
            "/api/events/{id}/status",
            axum::routing::patch(update_event_status),
        )
        .route("/api/events/flag", post(flag_event))
        .route("/api/geocode", post(geocode_address))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::ApproximateGeocoder;
    use crate::models::VerificationStatus;
    use chrono::{Duration, TimeZone};

    fn test_state() -> Arc<AppState> {
        let config = AppConfig::default();
        Arc::new(AppState {
            store: EventStore::new(),
            geocoder: Box::new(ApproximateGeocoder::new(
                config.center_lat,
                config.center_lng,
            )),
            config,
        })
    }

    fn submission() -> EventSubmission {
        let start = Utc.with_ymd_and_hms(2025, 11, 1, 18, 0, 0).unwrap();
        EventSubmission {
            title: "Block Party on East Blvd".to_string(),
            description: "A neighborhood gathering with snacks and live music.".to_string(),
            start_datetime: start,
            end_datetime: start + Duration::hours(2),
            timezone: "America/New_York".to_string(),
            location_name: "Freedom Park".to_string(),
            location_address: "1900 East Blvd, Charlotte, NC 28203".to_string(),
            lat: "35.2042".to_string(),
            lng: "-80.8426".to_string(),
            organizer_name: "Friends of Freedom Park".to_string(),
            organizer_website: None,
            organizer_email: None,
            contact_public: false,
            tags: vec![],
            is_free: true,
            is_family_friendly: true,
            is_outdoor: true,
            neighborhood: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let state = test_state();
        let (status, Json(created)) = create_event(State(state.clone()), Json(submission()))
            .await
            .expect("create");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.verification_status, VerificationStatus::Unverified);

        let Json(fetched) = get_event(State(state), Path(created.id))
            .await
            .expect("fetch");
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_with_400() {
        let state = test_state();
        let mut bad = submission();
        bad.title = "Hi".to_string();
        let err = create_event(State(state.clone()), Json(bad))
            .await
            .err()
            .expect("rejection");
        assert!(matches!(err, ApiError::Validation(_)));
        // No partial mutation on rejection.
        let Json(events) = list_events(State(state)).await.expect("list");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn status_update_rejects_out_of_range_confidence() {
        let state = test_state();
        let (_, Json(created)) = create_event(State(state.clone()), Json(submission()))
            .await
            .expect("create");

        let err = update_event_status(
            State(state),
            Path(created.id),
            Json(StatusUpdate {
                verification_status: VerificationStatus::Verified,
                confidence: Some(101),
                moderation_notes: None,
            }),
        )
        .await
        .err()
        .expect("rejection");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_event_maps_to_not_found() {
        let state = test_state();
        let err = get_event(State(state), Path(Uuid::new_v4()))
            .await
            .err()
            .expect("missing");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn nearby_defaults_to_configured_center_and_radius() {
        let state = test_state();
        // Freedom Park is within the 2 mi default; NoDa is beyond it.
        create_event(State(state.clone()), Json(submission()))
            .await
            .expect("create near");
        let mut far = submission();
        far.title = "NoDa Porch Concert Series".to_string();
        far.lat = "35.2451".to_string();
        far.lng = "-80.8098".to_string();
        create_event(State(state.clone()), Json(far))
            .await
            .expect("create far");

        let Json(ranked) = nearby_events(State(state), Query(NearbyQuery::default()))
            .await
            .expect("nearby");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].event.title, "Block Party on East Blvd");
    }

    #[tokio::test]
    async fn flag_body_carries_the_event_id() {
        let state = test_state();
        let (_, Json(created)) = create_event(State(state.clone()), Json(submission()))
            .await
            .expect("create");

        let body: FlagBody = serde_json::from_value(json!({
            "id": created.id,
            "flagReason": "spam",
            "notes": "duplicate listing"
        }))
        .expect("parse flag body");

        let Json(flagged) = flag_event(State(state), Json(body)).await.expect("flag");
        assert_eq!(flagged.verification_status, VerificationStatus::Flagged);
        assert_eq!(flagged.confidence, created.confidence);
    }

    #[tokio::test]
    async fn geocode_requires_an_address() {
        let state = test_state();
        let err = geocode_address(
            State(state),
            Json(GeocodeBody {
                address: String::new(),
            }),
        )
        .await
        .err()
        .expect("rejection");
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
