use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use log::{debug, warn};
use serde_json::Value;
use strum_macros::Display;

use crate::changelog;
use crate::snapshot::Snapshot;

#[derive(Display, Debug, Clone, Copy)]
pub enum CacheFile {
    /// Freshly fetched, not yet diffed.
    #[strum(to_string = "raw-temp")]
    Temp,
    /// What the previous run saw.
    #[strum(to_string = "raw")]
    Cached,
    #[strum(to_string = "titles")]
    Titles,
}

/// Snapshot caches and changelogs on local disk.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    markets_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>, markets_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            markets_dir: markets_dir.into(),
        }
    }

    pub fn cache_path(&self, market: &str, file: CacheFile) -> PathBuf {
        self.data_dir.join(format!("{market}-{file}.json"))
    }

    pub fn changelog_path(&self, market: &str) -> PathBuf {
        self.markets_dir.join(format!("{market}.md"))
    }

    pub fn write_temp_snapshot(&self, market: &str, raw: &Value) -> Result<()> {
        write_file(
            &self.cache_path(market, CacheFile::Temp),
            &serde_json::to_string(raw)?,
        )
    }

    /// The fetch step has to have run first.
    pub fn load_temp_snapshot(&self, market: &str) -> Result<Snapshot> {
        let path = self.cache_path(market, CacheFile::Temp);
        let json = fs::read_to_string(&path).wrap_err_with(|| {
            format!(
                "can't read {} for {market}. Run `showtimes fetch {market}` first",
                path.display()
            )
        })?;
        let snapshot = Snapshot::from_json(&json)
            .wrap_err_with(|| format!("bad temp snapshot {}", path.display()))?;
        if snapshot.presentations().is_empty() && snapshot.sessions().is_empty() {
            warn!("Temp snapshot for {market} has no presentations or sessions");
        }
        Ok(snapshot)
    }

    /// A missing or broken cache is treated as a first run.
    pub fn load_cached_snapshot(&self, market: &str) -> Snapshot {
        let path = self.cache_path(market, CacheFile::Cached);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cached snapshot for {market}, starting fresh");
                return Snapshot::default();
            }
            Err(e) => {
                warn!("Can't read {}: {e}. Treating as empty", path.display());
                return Snapshot::default();
            }
        };
        Snapshot::from_json(&json).unwrap_or_else(|e| {
            warn!("Can't parse {}: {e:#}. Treating as empty", path.display());
            Snapshot::default()
        })
    }

    /// Makes the temp snapshot the cached one for the next run, records its
    /// titles and removes the temp file.
    pub fn promote_temp_snapshot(&self, market: &str) -> Result<()> {
        let temp_path = self.cache_path(market, CacheFile::Temp);
        let snapshot = self.load_temp_snapshot(market)?;
        let raw = fs::read_to_string(&temp_path)?;

        write_file(&self.cache_path(market, CacheFile::Cached), &raw)?;
        write_file(
            &self.cache_path(market, CacheFile::Titles),
            &serde_json::to_string_pretty(&snapshot.all_titles())?,
        )?;
        match fs::remove_file(&temp_path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).wrap_err_with(|| format!("failed to remove {}", temp_path.display()))
            }
            _ => Ok(()),
        }
    }

    pub fn load_changelog(&self, market: &str) -> Result<String> {
        let path = self.changelog_path(market);
        match fs::read_to_string(&path) {
            Ok(doc) => Ok(doc),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(changelog::new_document(market)),
            Err(e) => Err(e).wrap_err_with(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn write_changelog(&self, market: &str, document: &str) -> Result<()> {
        write_file(&self.changelog_path(market), document)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).wrap_err_with(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> Storage {
        Storage::new(dir.path().join("data"), dir.path().join("markets"))
    }

    fn raw() -> Value {
        json!({
            "data": {
                "presentations": [
                    {"slug": "kung-fu-panda-4", "show": {"title": "Kung Fu Panda 4"}},
                    {"slug": "dune-part-two", "show": {"title": "Dune: Part Two"}}
                ],
                "sessions": []
            }
        })
    }

    #[test]
    fn file_names() {
        let storage = Storage::new("data", "markets");
        assert_eq!(
            storage.cache_path("raleigh", CacheFile::Temp),
            PathBuf::from("data/raleigh-raw-temp.json")
        );
        assert_eq!(
            storage.cache_path("raleigh", CacheFile::Cached),
            PathBuf::from("data/raleigh-raw.json")
        );
        assert_eq!(storage.changelog_path("los-angeles"), PathBuf::from("markets/los-angeles.md"));
    }

    #[test]
    fn missing_temp_snapshot_says_what_to_do() {
        let dir = TempDir::new().unwrap();
        let err = storage(&dir).load_temp_snapshot("raleigh").unwrap_err();
        assert!(format!("{err}").contains("showtimes fetch raleigh"));
    }

    #[test]
    fn missing_or_broken_cache_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert!(storage.load_cached_snapshot("raleigh").presentations().is_empty());

        write_file(&storage.cache_path("raleigh", CacheFile::Cached), "{not json").unwrap();
        assert!(storage.load_cached_snapshot("raleigh").presentations().is_empty());
    }

    #[test]
    fn cache_with_malformed_rows_keeps_the_rest() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let mut cached = raw();
        cached["data"]["sessions"] = json!([
            {"sessionId": "1", "presentationSlug": "kung-fu-panda-4",
             "showTimeUtc": "2024-03-05T23:30:00", "status": "ONSALE"},
            {"sessionId": "2", "presentationSlug": "kung-fu-panda-4",
             "showTimeUtc": null, "status": null},
            {"presentationSlug": "kung-fu-panda-4", "status": "ONSALE"}
        ]);
        write_file(
            &storage.cache_path("raleigh", CacheFile::Cached),
            &cached.to_string(),
        )
        .unwrap();

        let snapshot = storage.load_cached_snapshot("raleigh");
        assert_eq!(snapshot.presentations().len(), 2);
        assert_eq!(snapshot.sessions().len(), 2);
        assert_eq!(snapshot.on_sale_sessions().count(), 1);
    }

    #[test]
    fn promote_moves_temp_to_cache() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        storage.write_temp_snapshot("raleigh", &raw()).unwrap();
        storage.promote_temp_snapshot("raleigh").unwrap();

        assert!(!storage.cache_path("raleigh", CacheFile::Temp).exists());
        assert_eq!(storage.load_cached_snapshot("raleigh").presentations().len(), 2);

        let titles: Vec<String> = serde_json::from_str(
            &fs::read_to_string(storage.cache_path("raleigh", CacheFile::Titles)).unwrap(),
        )
        .unwrap();
        assert_eq!(titles, vec!["Dune: Part Two", "Kung Fu Panda 4"]);
    }

    #[test]
    fn promote_without_temp_fails() {
        let dir = TempDir::new().unwrap();
        assert!(storage(&dir).promote_temp_snapshot("raleigh").is_err());
    }

    #[test]
    fn changelog_defaults_to_new_document() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert_eq!(storage.load_changelog("raleigh").unwrap(), "# raleigh\n## Movie updates");

        storage.write_changelog("raleigh", "# custom\n").unwrap();
        assert_eq!(storage.load_changelog("raleigh").unwrap(), "# custom\n");
    }
}
