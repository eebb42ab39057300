use anyhow::Result;

use crate::client::{DEFAULT_API_BASE, parse_access_token};

pub const DEFAULT_STATE_FILE: &str = "moodtunes_state.json";

/// Configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub access_token: Option<String>,
    pub api_base: String,
    pub state_file: String,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Ok(config_from_vars(|key| std::env::var(key).ok()))
}

/// Build the configuration from a variable lookup.
/// `SPOTIFY_ACCESS_TOKEN` wins over a token carried in `SPOTIFY_REDIRECT_URL`.
pub fn config_from_vars(var: impl Fn(&str) -> Option<String>) -> Config {
    let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());

    let access_token = non_empty("SPOTIFY_ACCESS_TOKEN").or_else(|| {
        non_empty("SPOTIFY_REDIRECT_URL").and_then(|redirect| parse_access_token(&redirect))
    });

    Config {
        access_token,
        api_base: non_empty("SPOTIFY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        state_file: non_empty("MOODTUNES_STATE").unwrap_or_else(|| DEFAULT_STATE_FILE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from_vars(vars(&[]));
        assert_eq!(config.access_token, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.state_file, DEFAULT_STATE_FILE);
    }

    #[test]
    fn test_token_from_environment() {
        let config = config_from_vars(vars(&[
            ("SPOTIFY_ACCESS_TOKEN", "direct"),
            ("SPOTIFY_REDIRECT_URL", "http://localhost:8000/#access_token=redirected"),
            ("SPOTIFY_API_BASE", "http://localhost:9999"),
            ("MOODTUNES_STATE", "/tmp/state.json"),
        ]));
        assert_eq!(config.access_token.as_deref(), Some("direct"));
        assert_eq!(config.api_base, "http://localhost:9999");
        assert_eq!(config.state_file, "/tmp/state.json");
    }

    #[test]
    fn test_token_from_redirect_url() {
        let config = config_from_vars(vars(&[
            ("SPOTIFY_ACCESS_TOKEN", ""),
            ("SPOTIFY_REDIRECT_URL", "http://localhost:8000/#access_token=redirected&token_type=Bearer"),
        ]));
        assert_eq!(config.access_token.as_deref(), Some("redirected"));
    }
}
