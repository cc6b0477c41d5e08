use color_eyre::{Result, eyre::Context, eyre::eyre};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::render::kebab_to_title;
use crate::time::Timestamp;

/// A market schedule as published by the feed at one point in time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ScheduleData,
}

/// A malformed entry is skipped on its own; it never fails the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleData {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub presentations: Vec<Presentation>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Presentation {
    pub slug: String,
    #[serde(default)]
    pub show: Option<Show>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Show {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub presentation_slug: String,
    /// Only needed for sessions that get rendered.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub show_time_utc: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SessionStatus,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "ONSALE")]
    OnSale,
    #[default]
    #[serde(other)]
    Other,
}

impl Snapshot {
    /// Parses a raw feed document. Missing collections are empty, but the
    /// document itself has to be a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).wrap_err("snapshot is not valid JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(eyre!("snapshot must be a JSON object"));
        }
        serde_json::from_value(value).wrap_err("malformed snapshot")
    }

    pub fn presentations(&self) -> &[Presentation] {
        &self.data.presentations
    }

    pub fn sessions(&self) -> &[Session] {
        &self.data.sessions
    }

    pub fn on_sale_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions().iter().filter(|s| s.is_on_sale())
    }

    pub fn hidden_session_count(&self) -> usize {
        self.sessions().iter().filter(|s| s.is_hidden).count()
    }

    /// Every title in the snapshot, sorted and without duplicates.
    pub fn all_titles(&self) -> Vec<String> {
        let mut titles: Vec<_> = self.presentations().iter().map(Presentation::title).collect();
        titles.sort();
        titles.dedup();
        titles
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed schedule entry: {e}");
                None
            }
        })
        .collect())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!("Ignoring bad show time: {e}");
            None
        }
    }))
}

impl Presentation {
    pub fn title(&self) -> String {
        self.show
            .as_ref()
            .and_then(|show| show.title.clone())
            .unwrap_or_else(|| kebab_to_title(&self.slug))
    }
}

impl Session {
    pub fn is_on_sale(&self) -> bool {
        self.status == SessionStatus::OnSale
    }
}
