//! Dashboard settings: compiled defaults, optional `curemon.toml` next to
//! the binary, then environment overrides.

use std::{collections::HashMap, fs, time::Duration};

use client_core::DEFAULT_POLL_INTERVAL;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("curemon.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("poll_interval_ms") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.poll_interval = Duration::from_millis(parsed);
                }
            }
        }
    }

    if let Ok(v) = std::env::var("CUREMON__SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("CUREMON__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval = Duration::from_millis(parsed);
        }
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    settings
}

fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().server_url;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_slash_and_whitespace() {
        assert_eq!(
            normalize_server_url(" http://192.168.1.40:5000/ "),
            "http://192.168.1.40:5000"
        );
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        assert_eq!(normalize_server_url("   "), Settings::default().server_url);
    }

    #[test]
    fn default_poll_interval_matches_the_feed() {
        assert_eq!(Settings::default().poll_interval, DEFAULT_POLL_INTERVAL);
    }
}
