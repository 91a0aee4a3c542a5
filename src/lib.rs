pub mod config;
pub mod confidence;
pub mod filter;
pub mod geo;
pub mod geocode;
pub mod models;
pub mod routes;
pub mod store;
pub mod utils;
pub mod validate;

pub use config::AppConfig;
pub use models::{Event, EventSubmission, FlagRequest, StatusUpdate, VerificationStatus};
pub use store::{EventStore, StoreError};
