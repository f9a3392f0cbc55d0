//! Local persisted state: the map image, the city list and the theme.
//!
//! One small file per key under the data directory. Loading is fail-soft:
//! anything missing or malformed falls back to defaults with a warning.

use crate::map::{CityNode, default_cities};
use crate::statics;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("writing {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("encoding {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Raw stored value. A missing or unreadable entry reads as `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "reading stored value");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, value).map_err(|source| StoreError::Write { path, source })?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    pub fn load_map_image(&self) -> String {
        self.get(statics::KEY_MAP_IMAGE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| statics::DEFAULT_MAP_IMAGE.to_string())
    }

    pub fn load_cities(&self) -> Vec<CityNode> {
        let Some(text) = self.get(statics::KEY_CITIES) else {
            return default_cities();
        };
        match serde_json::from_str(&text) {
            Ok(cities) => cities,
            Err(e) => {
                warn!(error = %e, "stored city list is malformed; using defaults");
                default_cities()
            }
        }
    }

    pub fn load_theme(&self) -> Theme {
        match self.get(statics::KEY_THEME) {
            Some(text) => Theme::parse(&text).unwrap_or_else(|| {
                warn!(value = %text.trim(), "unknown stored theme; using default");
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    pub fn save_map(&self, image: &str, cities: &[CityNode]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(cities).map_err(|source| StoreError::Encode {
            key: statics::KEY_CITIES,
            source,
        })?;
        self.set(statics::KEY_MAP_IMAGE, image)?;
        self.set(statics::KEY_CITIES, &encoded)
    }

    pub fn save_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.set(statics::KEY_THEME, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalStore, Theme};
    use crate::statics;

    #[test]
    fn theme_round_trips_and_unknown_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert_eq!(store.load_theme(), Theme::Dark);

        store.save_theme(Theme::Light).unwrap();
        assert_eq!(store.load_theme(), Theme::Light);

        store.set(statics::KEY_THEME, "sepia").unwrap();
        assert_eq!(store.load_theme(), Theme::Dark);
    }

    #[test]
    fn blank_map_image_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.set(statics::KEY_MAP_IMAGE, "  ").unwrap();
        assert_eq!(store.load_map_image(), statics::DEFAULT_MAP_IMAGE);
    }
}
