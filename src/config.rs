use std::path::PathBuf;

use chrono_tz::Tz;
use color_eyre::{Result, eyre::Context, eyre::eyre};
use serde::Deserialize;

use crate::market::MarketRegistry;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_schedule_url")]
    pub schedule_url: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_markets_dir")]
    pub markets_dir: PathBuf,
    #[serde(default = "default_time_zone")]
    pub default_time_zone: String,
    /// `slug=Zone` pairs, comma separated in the environment.
    #[serde(default)]
    pub extra_markets: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_schedule_url() -> String {
    "https://drafthouse.com/s/mother/v2/schedule/market".into()
}

fn default_data_dir() -> PathBuf {
    "data".into()
}

fn default_markets_dir() -> PathBuf {
    "markets".into()
}

fn default_time_zone() -> String {
    "America/New_York".into()
}

fn default_user_agent() -> String {
    concat!("showtimes/", env!("CARGO_PKG_VERSION")).into()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().wrap_err("failed to load config")
    }

    pub fn registry(&self) -> Result<MarketRegistry> {
        let mut registry = MarketRegistry::new(parse_zone(&self.default_time_zone)?);
        for entry in &self.extra_markets {
            let (slug, zone) = entry
                .split_once('=')
                .ok_or_else(|| eyre!("expected slug=Zone in EXTRA_MARKETS, got {entry:?}"))?;
            registry = registry.with_market(slug.trim(), parse_zone(zone)?);
        }
        Ok(registry)
    }
}

fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|e| eyre!("unknown time zone {name:?}: {e}"))
}
