use std::sync::Arc;

use anyhow::Context;

use neighborly::geocode::{ApproximateGeocoder, Geocoder, NominatimGeocoder};
use neighborly::routes::{router, AppState};
use neighborly::{AppConfig, EventStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let store = EventStore::new();
    if config.seed_demo_data {
        store
            .seed_if_empty()
            .map_err(|err| anyhow::anyhow!("seeding demo events: {err}"))?;
    }

    let geocoder: Box<dyn Geocoder> = match config.nominatim_url.as_deref() {
        Some(url) => {
            tracing::info!(url, "using nominatim geocoder");
            Box::new(NominatimGeocoder::new(url))
        }
        None => Box::new(ApproximateGeocoder::new(
            config.center_lat,
            config.center_lng,
        )),
    };

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState {
        store,
        geocoder,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("unable to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "neighborly listening");

    axum::serve(listener, router(state))
        .await
        .context("server error")?;

    Ok(())
}
