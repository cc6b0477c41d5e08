use color_eyre::Result;
use log::{debug, info};

use crate::aggregate::{GroupedScreening, aggregate};
use crate::changelog;
use crate::config::Config;
use crate::diff::compute_diff;
use crate::fetch::Fetcher;
use crate::market::MarketRegistry;
use crate::render;
use crate::storage::Storage;
use crate::time::Timestamp;

/// What changed in one market since the cached snapshot.
#[derive(Debug)]
pub struct MarketReport {
    pub market: String,
    pub new_titles: Vec<String>,
    pub screenings: Vec<GroupedScreening>,
}

impl MarketReport {
    pub fn is_empty(&self) -> bool {
        self.new_titles.is_empty() && self.screenings.is_empty()
    }

    pub fn markdown(&self) -> String {
        render::render_markdown(&self.new_titles, &self.screenings, &self.market)
    }
}

/// Runs the fetch, diff, changelog and cleanup steps. Markets never share
/// state, so each call only touches files of the market it is given.
pub struct Tracker {
    storage: Storage,
    registry: MarketRegistry,
    fetcher: Fetcher,
}

impl Tracker {
    pub fn new(storage: Storage, registry: MarketRegistry, fetcher: Fetcher) -> Self {
        Self {
            storage,
            registry,
            fetcher,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Storage::new(&config.data_dir, &config.markets_dir),
            config.registry()?,
            Fetcher::new(&config.schedule_url, &config.user_agent)?,
        ))
    }

    pub fn registry(&self) -> &MarketRegistry {
        &self.registry
    }

    /// Nothing is written when the fetch fails.
    pub fn fetch(&self, market: &str) -> Result<()> {
        let raw = self.fetcher.fetch_schedule(market)?;
        self.storage.write_temp_snapshot(market, &raw)
    }

    pub fn report(&self, market: &str) -> Result<MarketReport> {
        let new = self.storage.load_temp_snapshot(market)?;
        let old = self.storage.load_cached_snapshot(market);
        let diff = compute_diff(&old, &new);

        info!(
            "{market}: {} movies, {} showings",
            new.presentations().len(),
            new.sessions().len()
        );
        info!(
            "{market}: {} new movies, {} new showings, {} hidden before",
            diff.new_presentations.len(),
            diff.new_sessions.len(),
            old.hidden_session_count()
        );
        if diff.is_empty() {
            debug!("{market}: schedule unchanged");
        }

        Ok(MarketReport {
            market: market.to_owned(),
            new_titles: diff.new_titles(),
            screenings: aggregate(&diff.new_sessions, self.registry.time_zone(market)),
        })
    }

    /// Returns whether a section was written; an empty report writes nothing.
    pub fn update_changelog(&self, market: &str, now: Timestamp) -> Result<bool> {
        let report = self.report(market)?;
        if report.is_empty() {
            info!("{market}: nothing new, changelog left alone");
            return Ok(false);
        }

        let stamp = changelog::section_stamp(now, self.registry.time_zone(market));
        let document = self.storage.load_changelog(market)?;
        let updated = changelog::insert_section(&document, &stamp, &report.markdown());
        self.storage.write_changelog(market, &updated)?;
        info!(
            "{market}: wrote changelog section {stamp} to {}",
            self.storage.changelog_path(market).display()
        );
        Ok(true)
    }

    pub fn cleanup(&self, market: &str) -> Result<()> {
        self.storage.promote_temp_snapshot(market)
    }

    pub fn run(&self, market: &str, now: Timestamp) -> Result<bool> {
        self.fetch(market)?;
        let written = self.update_changelog(market, now)?;
        self.cleanup(market)?;
        Ok(written)
    }
}
