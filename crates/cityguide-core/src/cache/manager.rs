use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::Document;

/// Key of the single persisted slot. The file on disk is `<key>.json`.
pub const CACHE_KEY: &str = "cityData";

/// A cached value together with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn with_timestamp(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// The directory is created on first save, so an unusable location only
    /// costs persistence, never the load itself.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn document_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", CACHE_KEY))
    }

    /// Read the persisted document.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet and an error
    /// when the slot exists but cannot be read or parsed.
    pub fn load_document(&self) -> Result<Option<CachedData<Document>>> {
        let path = self.document_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", CACHE_KEY))?;

        let document = Document::from_json(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", CACHE_KEY))?;

        let cached_at = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(e) => {
                debug!(error = %e, "Cache file has no modification time, assuming now");
                Utc::now()
            }
        };

        Ok(Some(CachedData::with_timestamp(document, cached_at)))
    }

    /// Overwrite the persisted document.
    pub fn save_document(&self, document: &Document) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.cache_dir.display())
        })?;
        let contents = document.to_json()?;
        std::fs::write(self.document_path(), contents)
            .with_context(|| format!("Failed to write cache file: {}", CACHE_KEY))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, Place};
    use chrono::Duration;
    use tempfile::TempDir;

    fn brno() -> Document {
        Document {
            cities: vec![City {
                name: "Brno".to_string(),
                description: "Moravian capital".to_string(),
                places: vec![Place {
                    name: "Spilberk".to_string(),
                    description: "Castle on the hill".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::with_timestamp(vec![1, 2, 3], Utc::now());
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_future_timestamp() {
        let cached = CachedData::with_timestamp(1, Utc::now() + Duration::minutes(10));
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_ranges() {
        let minutes = CachedData::with_timestamp(1, Utc::now() - Duration::minutes(5));
        assert_eq!(minutes.age_display(), "5m ago");

        let hours = CachedData::with_timestamp(1, Utc::now() - Duration::minutes(95));
        assert_eq!(hours.age_display(), "2h ago");

        let days = CachedData::with_timestamp(1, Utc::now() - Duration::hours(26));
        assert_eq!(days.age_display(), "1d ago");
    }

    #[test]
    fn test_load_missing_document() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf());
        assert!(cache.load_document().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_document() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf());
        cache.save_document(&brno()).unwrap();

        let cached = cache.load_document().unwrap().unwrap();
        assert_eq!(cached.data, brno());
        assert_eq!(cached.age_display(), "just now");
        assert_eq!(
            std::fs::read_to_string(cache.document_path()).unwrap(),
            brno().to_json().unwrap()
        );
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf());
        cache.save_document(&brno()).unwrap();
        cache.save_document(&Document::default()).unwrap();

        let cached = cache.load_document().unwrap().unwrap();
        assert!(cached.data.is_empty());
    }

    #[test]
    fn test_load_malformed_document_is_error() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf());
        std::fs::write(cache.document_path(), "{not json").unwrap();
        assert!(cache.load_document().is_err());
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = CacheManager::new(nested.clone());
        assert!(!nested.exists());
        assert!(cache.load_document().unwrap().is_none());

        cache.save_document(&brno()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.document_path(), nested.join("cityData.json"));
    }

    #[test]
    fn test_unusable_directory_fails_on_save_only() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, "").unwrap();
        let cache = CacheManager::new(file.join("cityguide"));

        assert!(cache.load_document().unwrap().is_none());
        let err = cache.save_document(&brno()).unwrap_err();
        assert!(err.to_string().contains("Failed to create cache directory"));
    }
}
