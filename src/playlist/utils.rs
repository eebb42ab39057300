use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{Mood, TimeOfDay, Weather};

/// Playlist naming utilities
pub struct PlaylistNaming;

impl PlaylistNaming {
    /// Pick one of the candidate names at random.
    /// Falls back to "<Mood> Mix" when the profile has no names.
    pub fn pick_name<R: Rng + ?Sized>(names: &[String], mood: Mood, rng: &mut R) -> String {
        names.choose(rng).cloned().unwrap_or_else(|| {
            // Mood labels are non-empty ASCII
            let (first, rest) = mood.as_str().split_at(1);
            format!("{}{} Mix", first.to_uppercase(), rest)
        })
    }

    pub fn weather_suffix(weather: Weather) -> Option<&'static str> {
        match weather {
            Weather::Rainy => Some(" 🌧️"),
            Weather::Snowy => Some(" ❄️"),
            Weather::Cloudy => Some(" ☁️"),
            Weather::Windy => Some(" 💨"),
            Weather::Sunny => None,
        }
    }

    pub fn time_suffix(time: TimeOfDay) -> Option<&'static str> {
        match time {
            TimeOfDay::Night => Some(" (Night Edition)"),
            TimeOfDay::Morning => Some(" (Morning Boost)"),
            TimeOfDay::Evening => Some(" (Evening Chill)"),
            TimeOfDay::Afternoon => None,
        }
    }

    /// Append the weather decoration, then the time decoration
    pub fn decorate(name: &str, weather: Weather, time: TimeOfDay) -> String {
        let mut decorated = name.to_string();
        if let Some(suffix) = Self::weather_suffix(weather) {
            decorated.push_str(suffix);
        }
        if let Some(suffix) = Self::time_suffix(time) {
            decorated.push_str(suffix);
        }
        decorated
    }
}

/// Playlist ordering utilities
pub struct PlaylistOrdering;

impl PlaylistOrdering {
    /// Uniform in-place Fisher-Yates shuffle
    pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
        for i in (1..items.len()).rev() {
            let j = rng.gen_range(0..=i);
            items.swap(i, j);
        }
    }

    /// How many songs to show for a given intensity
    pub fn song_count_for_intensity(intensity: i32) -> usize {
        if intensity > 7 {
            5
        } else if intensity > 4 {
            3
        } else {
            2
        }
    }
}
