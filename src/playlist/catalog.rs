use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use lazy_static::lazy_static;

use crate::models::{Mood, MoodProfile};

lazy_static! {
    /// Built-in catalog, parsed once on first use
    pub static ref DEFAULT_CATALOG: Catalog = Catalog::from_json(include_str!("catalog.json"))
        .expect("embedded catalog.json must cover every mood");
}

/// Read-only mapping from every mood to its profile
#[derive(Debug, Clone)]
pub struct Catalog {
    // Indexed by `Mood::index()`
    profiles: Vec<MoodProfile>,
}

impl Catalog {
    /// Parse a catalog from a JSON object keyed by mood name.
    /// Every mood must be present and no unknown moods are allowed.
    pub fn from_json(content: &str) -> Result<Catalog> {
        let raw: BTreeMap<String, MoodProfile> =
            serde_json::from_str(content).context("catalog is not a valid mood table")?;

        let mut slots: Vec<Option<MoodProfile>> = vec![None; Mood::ALL.len()];
        for (key, profile) in raw {
            let mood = key
                .parse::<Mood>()
                .with_context(|| format!("catalog contains an entry for '{key}'"))?;
            let slot = &mut slots[mood.index()];
            if slot.is_some() {
                return Err(anyhow!("catalog has more than one entry for mood '{mood}'"));
            }
            *slot = Some(profile);
        }

        let missing: Vec<&str> = Mood::ALL
            .iter()
            .filter(|mood| slots[mood.index()].is_none())
            .map(|mood| mood.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!(
                "catalog is missing profiles for: {}",
                missing.join(", ")
            ));
        }

        Ok(Catalog {
            profiles: slots.into_iter().flatten().collect(),
        })
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file(path: &str) -> Result<Catalog> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file '{path}'"))?;
        Catalog::from_json(&content).with_context(|| format!("invalid catalog file '{path}'"))
    }

    pub fn lookup(&self, mood: Mood) -> &MoodProfile {
        &self.profiles[mood.index()]
    }
}
