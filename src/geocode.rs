use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address is required")]
    EmptyAddress,
    #[error("http error: {0}")]
    Http(String),
    #[error("no match for address")]
    NoMatch,
}

/// Coordinates are returned as fixed-precision decimal strings, the same
/// shape events store them in.
#[derive(Debug, Clone, Serialize)]
pub struct GeocodedPoint {
    pub lat: String,
    pub lng: String,
    pub approximation: bool,
}

/// External collaborator that turns a free-text address into coordinates.
/// The core never depends on its accuracy.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError>;
}

/// Offline fallback: the configured city center nudged by an offset derived
/// from a hash of the address, so the same address always lands on the same
/// spot. Results are marked as approximations.
pub struct ApproximateGeocoder {
    center_lat: f64,
    center_lng: f64,
}

impl ApproximateGeocoder {
    pub fn new(center_lat: f64, center_lng: f64) -> Self {
        Self {
            center_lat,
            center_lng,
        }
    }
}

fn hash_offset(address: &str) -> (f64, f64) {
    let digest = Sha256::digest(address.trim().to_lowercase().as_bytes());
    let lat_word = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let lng_word = u32::from_be_bytes([digest[4], digest[5], digest[6], digest[7]]);
    // Map each word into [-0.05, 0.05] degrees, a few blocks either way.
    let scale = |word: u32| (word as f64 / u32::MAX as f64 - 0.5) * 0.1;
    (scale(lat_word), scale(lng_word))
}

#[async_trait]
impl Geocoder for ApproximateGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let (lat_offset, lng_offset) = hash_offset(address);
        Ok(GeocodedPoint {
            lat: format!("{:.6}", self.center_lat + lat_offset),
            lng: format!("{:.6}", self.center_lng + lng_offset),
            approximation: true,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Real geocoding backed by a Nominatim-compatible endpoint.
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("neighborly/0.1 (community events)")
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| GeocodeError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Http(format!("status {status}")));
        }

        let hits: Vec<NominatimHit> = response
            .json()
            .await
            .map_err(|err| GeocodeError::Http(err.to_string()))?;

        let hit = hits.into_iter().next().ok_or(GeocodeError::NoMatch)?;
        Ok(GeocodedPoint {
            lat: hit.lat,
            lng: hit.lon,
            approximation: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHARLOTTE: (f64, f64) = (35.2271, -80.8431);

    #[tokio::test]
    async fn approximate_geocoder_is_deterministic() {
        let geocoder = ApproximateGeocoder::new(CHARLOTTE.0, CHARLOTTE.1);
        let first = geocoder
            .geocode("1900 East Blvd, Charlotte, NC 28203")
            .await
            .expect("geocode");
        let second = geocoder
            .geocode("1900 East Blvd, Charlotte, NC 28203")
            .await
            .expect("geocode");
        assert_eq!(first.lat, second.lat);
        assert_eq!(first.lng, second.lng);
        assert!(first.approximation);
    }

    #[tokio::test]
    async fn approximate_geocoder_stays_near_center() {
        let geocoder = ApproximateGeocoder::new(CHARLOTTE.0, CHARLOTTE.1);
        let point = geocoder
            .geocode("3106 N Davidson St, Charlotte, NC 28205")
            .await
            .expect("geocode");
        let lat: f64 = point.lat.parse().expect("lat parses");
        let lng: f64 = point.lng.parse().expect("lng parses");
        assert!((lat - CHARLOTTE.0).abs() <= 0.05);
        assert!((lng - CHARLOTTE.1).abs() <= 0.05);
    }

    #[tokio::test]
    async fn different_addresses_land_on_different_points() {
        let geocoder = ApproximateGeocoder::new(CHARLOTTE.0, CHARLOTTE.1);
        let a = geocoder.geocode("1900 East Blvd").await.expect("geocode");
        let b = geocoder.geocode("2104 South Blvd").await.expect("geocode");
        assert!(a.lat != b.lat || a.lng != b.lng);
    }

    #[tokio::test]
    async fn empty_address_is_rejected() {
        let geocoder = ApproximateGeocoder::new(CHARLOTTE.0, CHARLOTTE.1);
        let result = geocoder.geocode("   ").await;
        assert!(matches!(result, Err(GeocodeError::EmptyAddress)));
    }
}
