use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::models::{Mood, Selection, TimeOfDay, Weather};

/// Storage key for the last mood/weather/time selection
pub const SELECTION_KEY: &str = "lastMood";
/// Storage key for the dark-mode flag
pub const THEME_KEY: &str = "theme";

/// Minimal local key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store kept in memory only
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Key-value store backed by a JSON object on disk.
/// The whole file is rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or corrupt file yields an empty store.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Ignoring unreadable state file '{}': {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at '{}' yet", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read state file '{}': {}", path.display(), e);
                BTreeMap::new()
            }
        };
        FileStore { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// The in-memory entry only changes once the file write succeeded
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.entries.clone();
        updated.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&updated)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write state file '{}'", self.path.display()))?;
        self.entries = updated;
        Ok(())
    }
}

impl Selection {
    /// Serialized form understood by `Selection::restore`
    pub fn persist(&self) -> String {
        serde_json::json!({
            "mood": self.mood,
            "weather": self.weather,
            "time": self.time,
            "intensity": self.intensity,
        })
        .to_string()
    }

    /// Rebuild a selection from its stored form. Missing or malformed data
    /// gives the default selection.
    pub fn restore(stored: Option<&str>) -> Selection {
        let Some(stored) = stored else {
            return Selection::default();
        };
        match serde_json::from_str::<Selection>(stored) {
            Ok(selection) => selection,
            Err(e) => {
                warn!("Discarding malformed saved selection ({e}); using defaults");
                Selection::default()
            }
        }
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }

    pub fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
    }

    pub fn set_intensity(&mut self, intensity: i32) {
        self.intensity = intensity;
    }

    /// Apply the time of day detected from a clock hour
    pub fn detect_time(&mut self, hour: u32) {
        self.time = TimeOfDay::from_hour(hour);
    }
}

pub fn load_selection(store: &dyn KeyValueStore) -> Selection {
    Selection::restore(store.get(SELECTION_KEY).as_deref())
}

pub fn save_selection(store: &mut dyn KeyValueStore, selection: &Selection) -> Result<()> {
    store.set(SELECTION_KEY, &selection.persist())
}

pub fn load_dark_mode(store: &dyn KeyValueStore) -> bool {
    store.get(THEME_KEY).as_deref() == Some("true")
}

pub fn save_dark_mode(store: &mut dyn KeyValueStore, dark_mode: bool) -> Result<()> {
    store.set(THEME_KEY, if dark_mode { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_selection() -> Vec<Selection> {
        let mut all = Vec::new();
        for mood in Mood::ALL {
            for weather in Weather::ALL {
                for time in TimeOfDay::ALL {
                    for intensity in [1, 5, 10] {
                        all.push(Selection {
                            mood,
                            weather,
                            time,
                            intensity,
                        });
                    }
                }
            }
        }
        all
    }

    #[test]
    fn test_default_selection() {
        let selection = Selection::default();
        assert_eq!(selection.mood, Mood::Calm);
        assert_eq!(selection.weather, Weather::Sunny);
        assert_eq!(selection.time, TimeOfDay::Afternoon);
        assert_eq!(selection.intensity, 5);
    }

    #[test]
    fn test_persist_restore_round_trip() {
        for selection in every_selection() {
            let stored = selection.persist();
            assert_eq!(Selection::restore(Some(&stored)), selection);
        }
    }

    #[test]
    fn test_restore_malformed_gives_defaults() {
        let malformed = [
            r#"{"mood":"xyz"}"#,
            r#"{"mood":"xyz","weather":"sunny","time":"night"}"#,
            r#"{"mood":"happy","weather":"foggy","time":"night"}"#,
            r#"{"mood":"happy","weather":"sunny","time":"noon"}"#,
            r#"{"mood":"happy","weather":"sunny","time":"night","intensity":"high"}"#,
            "{}",
            "null",
            "[]",
            "",
            "not json at all",
        ];
        for input in malformed {
            assert_eq!(
                Selection::restore(Some(input)),
                Selection::default(),
                "input {input:?} should restore to defaults"
            );
        }
        assert_eq!(Selection::restore(None), Selection::default());
    }

    #[test]
    fn test_restore_legacy_entry_without_intensity() {
        let restored = Selection::restore(Some(r#"{"mood":"sad","weather":"rainy","time":"latenight"}"#));
        assert_eq!(restored.mood, Mood::Sad);
        assert_eq!(restored.weather, Weather::Rainy);
        assert_eq!(restored.time, TimeOfDay::Night);
        assert_eq!(restored.intensity, 5);
    }

    #[test]
    fn test_restore_tolerates_out_of_range_intensity() {
        let restored = Selection::restore(Some(
            r#"{"mood":"happy","weather":"sunny","time":"morning","intensity":42}"#,
        ));
        assert_eq!(restored.intensity, 42);
    }

    #[test]
    fn test_update_operations() {
        let mut selection = Selection::default();
        selection.set_mood(Mood::Energetic);
        selection.set_weather(Weather::Snowy);
        selection.set_time(TimeOfDay::Evening);
        selection.set_intensity(9);
        assert_eq!(
            selection,
            Selection {
                mood: Mood::Energetic,
                weather: Weather::Snowy,
                time: TimeOfDay::Evening,
                intensity: 9,
            }
        );

        selection.detect_time(23);
        assert_eq!(selection.time, TimeOfDay::Night);
        selection.detect_time(7);
        assert_eq!(selection.time, TimeOfDay::Morning);
    }

    #[test]
    fn test_selection_through_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_selection(&store), Selection::default());

        let selection = Selection {
            mood: Mood::Nostalgic,
            weather: Weather::Windy,
            time: TimeOfDay::Morning,
            intensity: 3,
        };
        save_selection(&mut store, &selection).unwrap();
        assert_eq!(load_selection(&store), selection);

        store.set(SELECTION_KEY, "{broken").unwrap();
        assert_eq!(load_selection(&store), Selection::default());
    }

    #[test]
    fn test_dark_mode_flag() {
        let mut store = MemoryStore::new();
        assert!(!load_dark_mode(&store));

        save_dark_mode(&mut store, true).unwrap();
        assert!(load_dark_mode(&store));
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("true"));

        save_dark_mode(&mut store, false).unwrap();
        assert!(!load_dark_mode(&store));

        store.set(THEME_KEY, "maybe").unwrap();
        assert!(!load_dark_mode(&store));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = MemoryStore::new();
        let selection = Selection {
            intensity: 8,
            ..Selection::default()
        };
        save_selection(&mut store, &selection).unwrap();
        save_dark_mode(&mut store, true).unwrap();
        assert_eq!(load_selection(&store), selection);
        assert!(load_dark_mode(&store));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let selection = Selection {
            mood: Mood::Focused,
            weather: Weather::Cloudy,
            time: TimeOfDay::Evening,
            intensity: 7,
        };
        {
            let mut store = FileStore::open(&path);
            save_selection(&mut store, &selection).unwrap();
            save_dark_mode(&mut store, true).unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.path(), path.as_path());
        assert_eq!(load_selection(&reopened), selection);
        assert!(load_dark_mode(&reopened));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nothing.json"));
        assert_eq!(store.get(SELECTION_KEY), None);
        assert_eq!(load_selection(&store), Selection::default());
    }

    #[test]
    fn test_file_store_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "this is not json").unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(load_selection(&store), Selection::default());

        // Writing replaces the corrupt content
        save_dark_mode(&mut store, true).unwrap();
        assert!(load_dark_mode(&FileStore::open(&path)));
    }

    #[test]
    fn test_file_store_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("state.json");
        let mut store = FileStore::open(&path);
        assert!(save_dark_mode(&mut store, true).is_err());
    }

    #[test]
    fn test_file_store_failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("state.json");
        let mut store = FileStore::open(&path);

        assert!(store.set(THEME_KEY, "true").is_err());
        assert_eq!(store.get(THEME_KEY), None);
        assert!(!load_dark_mode(&store));

        let selection = Selection {
            mood: Mood::Happy,
            ..Selection::default()
        };
        assert!(save_selection(&mut store, &selection).is_err());
        assert_eq!(load_selection(&store), Selection::default());
    }
}
