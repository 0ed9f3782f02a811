//! Persisted list of favorited locations.
//!
//! Storage is behind the [`FavoritesStore`] trait so the list logic can be
//! tested without touching the filesystem. The file store keeps a JSON array
//! in the platform data directory; a missing file reads as an empty list.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::sync::{Mutex, PoisonError};
use std::{fs, path::PathBuf};

use crate::model::SavedLocation;

const FAVORITES_FILE: &str = "favorites.json";

/// Single-client key-value storage for the favorites list.
pub trait FavoritesStore: Send + Sync {
    fn load(&self) -> Result<Vec<SavedLocation>>;
    fn save(&self, locations: &[SavedLocation]) -> Result<()>;
}

/// JSON file under the platform data directory.
#[derive(Debug)]
pub struct FileFavoritesStore {
    path: PathBuf,
}

impl FileFavoritesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdeck", "weatherdeck")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join(FAVORITES_FILE))
    }
}

impl FavoritesStore for FileFavoritesStore {
    fn load(&self) -> Result<Vec<SavedLocation>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse favorites file: {}", self.path.display()))
    }

    fn save(&self, locations: &[SavedLocation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(locations)
            .context("Failed to serialize favorites to JSON")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryFavoritesStore {
    items: Mutex<Vec<SavedLocation>>,
}

impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> Result<Vec<SavedLocation>> {
        // A poisoned lock still guards a usable list; keep serving it.
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.clone())
    }

    fn save(&self, locations: &[SavedLocation]) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        *items = locations.to_vec();
        Ok(())
    }
}

/// The favorites list: read once at startup, rewritten on every mutation.
pub struct Favorites {
    store: Box<dyn FavoritesStore>,
    items: Vec<SavedLocation>,
}

impl Favorites {
    /// Load the list, seeding the three-city default when the store is empty.
    pub fn open(store: Box<dyn FavoritesStore>) -> Result<Self> {
        let loaded = store.load()?;
        let items = if loaded.is_empty() { default_locations() } else { loaded };
        Ok(Self { store, items })
    }

    pub fn items(&self) -> &[SavedLocation] {
        &self.items
    }

    /// Add a location unless one with the same name (case-insensitive) exists.
    /// Returns whether the list changed.
    pub fn add(&mut self, location: SavedLocation) -> Result<bool> {
        let exists = self
            .items
            .iter()
            .any(|saved| saved.name.eq_ignore_ascii_case(&location.name));
        if exists {
            return Ok(false);
        }

        self.items.push(location);
        self.store.save(&self.items)?;
        Ok(true)
    }

    /// Remove by name (case-insensitive). Returns whether the list changed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|saved| !saved.name.eq_ignore_ascii_case(name));

        if self.items.len() == before {
            return Ok(false);
        }

        self.store.save(&self.items)?;
        Ok(true)
    }
}

/// Hardcoded startup seed shown before the user saves anything.
pub fn default_locations() -> Vec<SavedLocation> {
    vec![
        SavedLocation {
            name: "New York".to_string(),
            country: "United States".to_string(),
            lat: 40.71,
            lon: -74.01,
        },
        SavedLocation {
            name: "London".to_string(),
            country: "United Kingdom".to_string(),
            lat: 51.51,
            lon: -0.13,
        },
        SavedLocation {
            name: "Tokyo".to_string(),
            country: "Japan".to_string(),
            lat: 35.69,
            lon: 139.69,
        },
    ]
}
