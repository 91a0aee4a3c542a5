use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::utils;

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

// Uptown Charlotte; the community this instance serves.
fn default_center_lat() -> f64 {
    35.2271
}

fn default_center_lng() -> f64 {
    -80.8431
}

fn default_radius_miles() -> f64 {
    2.0
}

fn default_seed_demo_data() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub default_radius_miles: f64,
    pub seed_demo_data: bool,
    /// When set, geocoding goes to this Nominatim-compatible endpoint
    /// instead of the offline approximation.
    pub nominatim_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            default_radius_miles: default_radius_miles(),
            seed_demo_data: default_seed_demo_data(),
            nominatim_url: None,
        }
    }
}

impl AppConfig {
    /// Loads the config file if it exists; a missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&utils::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config at {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }
}
