use log::{debug, info};
use rand::Rng;

use super::catalog::Catalog;
use super::utils::{PlaylistNaming, PlaylistOrdering};
use crate::models::{PlaylistResult, ResolvedSong, Selection, Song};

/// Looks up a playable preview for a track.
///
/// Implementations swallow their own failures: "not found", "lookup error"
/// and "no credential" all come back as `None`.
#[cfg_attr(test, mockall::automock)]
pub trait PreviewResolver {
    /// Whether the resolver holds a credential; without one it is never called
    fn has_credential(&self) -> bool;

    fn resolve(&self, title: &str, artist: &str) -> Option<String>;
}

/// Main playlist generator
pub struct PlaylistGenerator<'a> {
    catalog: &'a Catalog,
    resolver: &'a dyn PreviewResolver,
}

impl<'a> PlaylistGenerator<'a> {
    pub fn new(catalog: &'a Catalog, resolver: &'a dyn PreviewResolver) -> Self {
        Self { catalog, resolver }
    }

    /// Generate a playlist using the thread-local random number generator
    pub fn generate(&self, selection: &Selection) -> PlaylistResult {
        self.generate_with_rng(selection, &mut rand::thread_rng())
    }

    /// Generate a playlist for the given selection. Never fails; the worst
    /// case is a playlist with no previews (or no songs for an empty profile).
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        selection: &Selection,
        rng: &mut R,
    ) -> PlaylistResult {
        let profile = self.catalog.lookup(selection.mood);

        let base_name = PlaylistNaming::pick_name(&profile.names, selection.mood, rng);
        let name = PlaylistNaming::decorate(&base_name, selection.weather, selection.time);

        let songs = Self::select_songs(&profile.songs, selection.intensity, rng);
        debug!(
            "Selected {} of {} songs for mood '{}' at intensity {}",
            songs.len(),
            profile.songs.len(),
            selection.mood,
            selection.intensity
        );

        PlaylistResult {
            name,
            description: profile.quote.clone(),
            genres: profile.genres.clone(),
            songs: self.resolve_previews(songs),
        }
    }

    /// Shuffle a copy of the candidates and keep as many as the intensity allows
    pub fn select_songs<R: Rng + ?Sized>(candidates: &[Song], intensity: i32, rng: &mut R) -> Vec<Song> {
        let mut songs = candidates.to_vec();
        PlaylistOrdering::shuffle(&mut songs, rng);
        songs.truncate(PlaylistOrdering::song_count_for_intensity(intensity));
        songs
    }

    /// Resolve previews one song at a time, in order
    fn resolve_previews(&self, songs: Vec<Song>) -> Vec<ResolvedSong> {
        if !self.resolver.has_credential() {
            info!("No preview credential available; skipping preview lookups");
            return songs
                .into_iter()
                .map(|song| ResolvedSong::new(song, None))
                .collect();
        }

        songs
            .into_iter()
            .map(|song| {
                let preview_url = self.resolver.resolve(&song.title, &song.artist);
                debug!(
                    "Preview for '{}' by {}: {}",
                    song.title,
                    song.artist,
                    preview_url.as_deref().unwrap_or("not available")
                );
                ResolvedSong::new(song, preview_url)
            })
            .collect()
    }
}
