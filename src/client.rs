use crate::config::Config;
use crate::models::SearchResponse;
use crate::playlist::PreviewResolver;
use anyhow::Result;
use log::{debug, error, info, warn};
use ureq::Agent;
use urlencoding::encode;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";

/// A small Spotify Web API client that looks up track previews with a bearer token
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    access_token: Option<String>,
}

impl SpotifyClient {
    /// Create a new client with configuration from environment
    pub fn new(config: &Config) -> Self {
        Self::with_token(&config.api_base, config.access_token.clone())
    }

    pub fn with_token(base_url: &str, access_token: Option<String>) -> Self {
        SpotifyClient {
            agent: Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Build the track search URL for a title/artist pair
    pub fn search_url(&self, title: &str, artist: &str) -> String {
        format!(
            "{}/v1/search?q=track:{}%20artist:{}&type=track&limit=1",
            self.base_url,
            encode(title),
            encode(artist)
        )
    }

    /// Search for a track and return the preview URL of the best match, if any
    pub fn search_preview(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let Some(token) = self.access_token.as_deref() else {
            return Err(anyhow::anyhow!("No Spotify access token configured"));
        };

        let url = self.search_url(title, artist);
        debug!("Searching preview: {url}");

        let response = match self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(anyhow::anyhow!(
                    "Spotify API error: status {}, message: {}",
                    status,
                    body
                ));
            }
            Err(e) => return Err(anyhow::anyhow!("HTTP request failed: {}", e)),
        };

        let response_text = response.into_string()?;
        let parsed: SearchResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse search response: {}", e))?;

        Ok(parsed.first_preview())
    }
}

impl PreviewResolver for SpotifyClient {
    fn has_credential(&self) -> bool {
        self.access_token.is_some()
    }

    fn resolve(&self, title: &str, artist: &str) -> Option<String> {
        if !self.has_credential() {
            warn!("No Spotify access token. Log in to enable previews.");
            return None;
        }
        info!("Fetching preview for: {title} by {artist}");
        match self.search_preview(title, artist) {
            Ok(preview) => {
                info!(
                    "Preview URL for {}: {}",
                    title,
                    preview.as_deref().unwrap_or("Not available")
                );
                preview
            }
            Err(e) => {
                error!("Preview lookup for '{title}' by {artist} failed: {e}");
                None
            }
        }
    }
}

/// Extract the `access_token` parameter from an authorization redirect.
/// Accepts a full URL, a bare fragment (`#access_token=...`) or a query-style string.
pub fn parse_access_token(redirect: &str) -> Option<String> {
    let params = match redirect.split_once('#') {
        Some((_, fragment)) => fragment,
        None => redirect.split_once('?').map_or(redirect, |(_, query)| query),
    };

    params
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "access_token")
        .map(|(_, value)| value.to_string())
        .filter(|token| !token.is_empty())
}
