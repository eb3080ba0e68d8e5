use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint and geocoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the listing/boundary catalog service
    pub api_base_url: String,
    /// Base URL of the third-party geocode suggest service
    pub geocode_base_url: String,
    /// Access token passed to the geocoder
    pub geocode_access_token: String,
    /// Suggestion language (BCP 47 code)
    pub language: String,
    /// Country filter for suggestions (ISO 3166-1 alpha-2)
    pub country: String,
    /// Place types requested from the geocoder
    pub suggest_types: String,
    /// Quiet period after the last keystroke before a suggest request fires
    pub debounce_ms: u64,
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.lystio.co".to_string(),
            geocode_base_url: "https://api.mapbox.com".to_string(),
            geocode_access_token: String::new(),
            language: "de".to_string(),
            country: "at".to_string(),
            suggest_types: "address,district,place,locality,neighborhood,city,street,poi"
                .to_string(),
            debounce_ms: 250,
        }
    }
}
