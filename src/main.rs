use anyhow::Result;
use chrono::{Local, Timelike};
use clap::{Parser, ValueEnum};
use log::{info, warn};

mod client;
mod config;
mod models;
mod playlist;
mod state;

use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::models::{Mood, PlaylistResult, Selection, TimeOfDay, Weather};
use crate::playlist::{Catalog, DEFAULT_CATALOG, PlaylistGenerator};
use crate::state::{FileStore, load_dark_mode, load_selection, save_dark_mode, save_selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Theme {
    Dark,
    Light,
}

#[derive(Parser)]
#[command(name = "moodtunes")]
#[command(about = "Turn a mood, the weather and the time of day into a themed playlist")]
#[command(version)]
struct Args {
    /// Mood to build the playlist for (happy, sad, energetic, calm, romantic, focused, nostalgic, adventurous)
    #[arg(short = 'm', long = "mood")]
    mood: Option<Mood>,

    /// Current weather (sunny, rainy, cloudy, snowy, windy)
    #[arg(short = 'w', long = "weather", conflicts_with = "conditions")]
    weather: Option<Weather>,

    /// Free-text weather report to map onto a weather tag, e.g. "light rain"
    #[arg(long = "conditions")]
    conditions: Option<String>,

    /// Time of day (morning, afternoon, evening, night)
    #[arg(short = 't', long = "time")]
    time: Option<TimeOfDay>,

    /// How many songs to show, from 1 (fewest) to 10 (most)
    #[arg(short = 'i', long = "intensity", allow_negative_numbers = true)]
    intensity: Option<i32>,

    /// Keep the saved time of day instead of detecting it from the clock
    #[arg(long = "no-auto-time")]
    no_auto_time: bool,

    /// Remember a colour theme preference
    #[arg(long = "theme", value_enum)]
    theme: Option<Theme>,

    /// Path to a custom catalog JSON file
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<String>,

    /// Path to the state file holding the last selection (overrides MOODTUNES_STATE)
    #[arg(short = 's', long = "state")]
    state_file: Option<String>,

    /// Skip preview lookups even when an access token is configured
    #[arg(long = "offline")]
    offline: bool,

    /// Print the playlist as JSON
    #[arg(long = "json")]
    json: bool,

    /// Quiet mode - reduce output verbosity
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet || args.json { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config()?;

    let custom_catalog = match &args.catalog {
        Some(path) => Some(Catalog::load_from_file(path)?),
        None => None,
    };
    let catalog = custom_catalog.as_ref().unwrap_or(&*DEFAULT_CATALOG);

    let state_path = args.state_file.clone().unwrap_or_else(|| config.state_file.clone());
    let mut store = FileStore::open(&state_path);

    if let Some(theme) = args.theme {
        if let Err(e) = save_dark_mode(&mut store, theme == Theme::Dark) {
            warn!("Could not save theme: {e}");
        }
    }
    let dark_mode = load_dark_mode(&store);

    // Defaults, then the saved selection, then the clock, then explicit choices
    let mut selection = load_selection(&store);
    if !args.no_auto_time {
        selection.detect_time(Local::now().hour());
    }
    apply_args(&mut selection, &args);

    if let Err(e) = save_selection(&mut store, &selection) {
        warn!("Could not save selection: {e}");
    }
    info!(
        "Selection: mood={} weather={} time={} intensity={} (state: {})",
        selection.mood,
        selection.weather,
        selection.time,
        selection.intensity,
        store.path().display()
    );

    let client = if args.offline {
        SpotifyClient::with_token(&config.api_base, None)
    } else {
        SpotifyClient::new(&config)
    };
    if !args.offline && config.access_token.is_none() {
        info!("No Spotify access token found. Set SPOTIFY_ACCESS_TOKEN to enable previews.");
    }

    let generator = PlaylistGenerator::new(catalog, &client);
    let playlist = generator.generate(&selection);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&playlist)?);
    } else {
        print_playlist(&playlist, &selection, dark_mode, args.quiet);
    }

    Ok(())
}

/// Apply the selection changes requested on the command line
fn apply_args(selection: &mut Selection, args: &Args) {
    if let Some(mood) = args.mood {
        selection.set_mood(mood);
    }
    if let Some(weather) = args.weather {
        selection.set_weather(weather);
    } else if let Some(conditions) = &args.conditions {
        selection.set_weather(Weather::from_conditions(conditions));
    }
    if let Some(time) = args.time {
        selection.set_time(time);
    }
    if let Some(intensity) = args.intensity {
        selection.set_intensity(intensity);
    }
}

fn print_playlist(playlist: &PlaylistResult, selection: &Selection, dark_mode: bool, quiet: bool) {
    println!("\n{} {}", selection.mood.emoji(), playlist.name);
    println!("{}", "=".repeat(playlist.name.chars().count() + 2));
    println!("{}", playlist.description);

    if !quiet {
        println!("Genres: {}", playlist.genres.join(" · "));
        println!("Theme: {}", if dark_mode { "dark" } else { "light" });
    }

    if playlist.songs.is_empty() {
        println!("\nNo songs available for this mood.");
        return;
    }

    println!();
    for (i, resolved) in playlist.songs.iter().enumerate() {
        let song = &resolved.song;
        println!("  {}. \"{}\" by {} • {}", i + 1, song.title, song.artist, song.genre);
        if let Some(url) = &resolved.preview_url {
            println!("     ▶ {url}");
        } else if !quiet {
            println!("     (no preview available)");
        }
    }

    if !quiet {
        println!(
            "\n{}/{} songs have a preview.",
            playlist.preview_count(),
            playlist.songs.len()
        );
    }
}
