use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// The emotional category that drives catalog selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Romantic,
    Focused,
    Nostalgic,
    Adventurous,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Romantic,
        Mood::Focused,
        Mood::Nostalgic,
        Mood::Adventurous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Romantic => "romantic",
            Mood::Focused => "focused",
            Mood::Nostalgic => "nostalgic",
            Mood::Adventurous => "adventurous",
        }
    }

    /// Position of this mood in `Mood::ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Badge shown next to a generated playlist
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Energetic => "⚡",
            Mood::Calm => "😌",
            Mood::Romantic => "💕",
            Mood::Focused => "🎯",
            Mood::Nostalgic => "🌅",
            Mood::Adventurous => "🌍",
        }
    }
}

/// Current weather; only affects the playlist name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Rainy,
    Cloudy,
    Snowy,
    Windy,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Sunny,
        Weather::Rainy,
        Weather::Cloudy,
        Weather::Snowy,
        Weather::Windy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Cloudy => "cloudy",
            Weather::Snowy => "snowy",
            Weather::Windy => "windy",
        }
    }

    /// Map a free-text weather report (e.g. "Light Rain", "Clouds") onto a weather tag.
    /// Anything unrecognised counts as sunny.
    pub fn from_conditions(conditions: &str) -> Weather {
        let conditions = conditions.to_lowercase();
        if conditions.contains("rain") {
            Weather::Rainy
        } else if conditions.contains("cloud") {
            Weather::Cloudy
        } else if conditions.contains("snow") {
            Weather::Snowy
        } else if conditions.contains("wind") {
            Weather::Windy
        } else {
            Weather::Sunny
        }
    }
}

/// Part of the day; only affects the playlist name.
/// The legacy `latenight` tag is read as `Night`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    #[serde(alias = "latenight")]
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }

    /// Classify an hour of the day (0-23). Larger values wrap around the clock.
    pub fn from_hour(hour: u32) -> TimeOfDay {
        match hour % 24 {
            0..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

macro_rules! impl_tag_traits {
    ($tag:ty, $label:literal, [$($alias:literal => $value:expr),*]) => {
        impl fmt::Display for $tag {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $tag {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                $(
                    if wanted == $alias {
                        return Ok($value);
                    }
                )*
                Self::ALL
                    .iter()
                    .copied()
                    .find(|tag| tag.as_str() == wanted)
                    .ok_or_else(|| {
                        let known: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                        anyhow!("unknown {} '{}' (expected one of: {})", $label, s, known.join(", "))
                    })
            }
        }
    };
}

impl_tag_traits!(Mood, "mood", []);
impl_tag_traits!(Weather, "weather", []);
impl_tag_traits!(TimeOfDay, "time of day", ["latenight" => TimeOfDay::Night]);

/// A catalog entry. Identity is the (title, artist) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub genre: String,
}

/// A catalog song together with whatever preview the resolver found for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSong {
    #[serde(flatten)]
    pub song: Song,
    #[serde(rename = "previewUrl")]
    pub preview_url: Option<String>,
}

impl ResolvedSong {
    pub fn new(song: Song, preview_url: Option<String>) -> Self {
        Self { song, preview_url }
    }

    pub fn has_preview(&self) -> bool {
        self.preview_url.is_some()
    }
}

/// Everything the catalog knows about one mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodProfile {
    pub songs: Vec<Song>,
    pub genres: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    pub quote: String,
    #[serde(default)]
    pub names: Vec<String>,
}

/// The user's current mood/weather/time/intensity choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub mood: Mood,
    pub weather: Weather,
    pub time: TimeOfDay,
    /// Slider value, nominally 1-10; any integer is tolerated
    #[serde(default = "default_intensity")]
    pub intensity: i32,
}

pub const DEFAULT_INTENSITY: i32 = 5;

fn default_intensity() -> i32 {
    DEFAULT_INTENSITY
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            mood: Mood::Calm,
            weather: Weather::Sunny,
            time: TimeOfDay::Afternoon,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

/// Output of one playlist generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistResult {
    pub name: String,
    pub description: String,
    pub genres: Vec<String>,
    pub songs: Vec<ResolvedSong>,
}

impl PlaylistResult {
    pub fn preview_count(&self) -> usize {
        self.songs.iter().filter(|s| s.has_preview()).count()
    }
}

/// Response structure for the track search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    pub preview_url: Option<String>,
}

impl SearchResponse {
    /// Preview URL of the first hit, if there is one
    pub fn first_preview(&self) -> Option<String> {
        self.tracks
            .as_ref()
            .and_then(|page| page.items.first())
            .and_then(|track| track.preview_url.clone())
            .filter(|url| !url.is_empty())
    }
}
