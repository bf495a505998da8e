// Client and search configuration
//
// Defaults, then `hotel_search.toml`, then `HOTEL_SEARCH_*` environment
// variables (`HOTEL_SEARCH_CLIENT__BASE_URL=...` for nested keys).

use chrono::{Days, NaiveDate};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::api::ClientError;

pub const CONFIG_FILE: &str = "hotel_search.toml";
pub const ENV_PREFIX: &str = "HOTEL_SEARCH_";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    // No timeout unless configured
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: None,
        }
    }
}

// Fixed parts of every outgoing search, plus the initial date range
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub adults: u32,
    pub rooms: u32,
    pub children: Option<u32>,
    pub country: String,
    pub default_lead_days: u64,
    pub default_stay_nights: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            adults: 2,
            rooms: 1,
            children: None,
            country: "United States".to_string(),
            default_lead_days: 14,
            default_stay_nights: 4,
        }
    }
}

impl SearchConfig {
    // Check-in `default_lead_days` after `today`, staying `default_stay_nights`.
    pub fn default_dates(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let check_in = today.checked_add_days(Days::new(self.default_lead_days))?;
        let check_out = check_in.checked_add_days(Days::new(self.default_stay_nights))?;
        Some((check_in, check_out))
    }
}

impl AppConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, ClientError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ClientError> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| ClientError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ClientError> {
        let base = self.client.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.client.base_url
            )));
        }
        if self.client.timeout_ms == Some(0) {
            return Err(ClientError::ConfigError(
                "timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
