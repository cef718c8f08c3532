//! Client configuration

use url::Url;

use crate::animation::MotionConfig;

/// Default game server endpoint
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:5001/ws";

/// Errors from reading configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid server URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} must be a positive number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Client configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server
    pub server_url: Url,
    /// Game to join on connect
    pub game_id: Option<String>,
    /// Local player display name
    pub player_name: Option<String>,
    /// Multiplier applied to every animation duration
    pub animation_speed: f64,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = non_empty("FSF_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let server_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl {
            var: "FSF_SERVER_URL",
            reason: e.to_string(),
        })?;
        if !matches!(server_url.scheme(), "ws" | "wss") {
            return Err(ConfigError::InvalidUrl {
                var: "FSF_SERVER_URL",
                reason: format!("unsupported scheme '{}'", server_url.scheme()),
            });
        }

        let animation_speed = match non_empty("FSF_ANIMATION_SPEED") {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(speed) if speed.is_finite() && speed > 0.0 => speed,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "FSF_ANIMATION_SPEED",
                        value,
                    })
                }
            },
            None => 1.0,
        };

        Ok(Self {
            server_url,
            game_id: non_empty("FSF_GAME_ID"),
            player_name: non_empty("FSF_PLAYER_NAME"),
            animation_speed,
        })
    }

    /// Motion tuning for this configuration
    pub fn motion(&self) -> MotionConfig {
        MotionConfig::with_speed(self.animation_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_url.as_str(), DEFAULT_SERVER_URL);
        assert_eq!(config.game_id, None);
        assert_eq!(config.player_name, None);
        assert_eq!(config.animation_speed, 1.0);
        assert_eq!(config.motion(), MotionConfig::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FSF_SERVER_URL", "wss://fsf.example.com/ws"),
            ("FSF_GAME_ID", "room-1"),
            ("FSF_PLAYER_NAME", "alice"),
            ("FSF_ANIMATION_SPEED", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.server_url.host_str(), Some("fsf.example.com"));
        assert_eq!(config.game_id.as_deref(), Some("room-1"));
        assert_eq!(config.player_name.as_deref(), Some("alice"));
        assert!((config.motion().plain_duration - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("FSF_PLAYER_NAME", "  ")])).unwrap();
        assert_eq!(config.player_name, None);
    }

    #[test]
    fn test_rejects_http_url() {
        let err = ClientConfig::from_lookup(lookup(&[("FSF_SERVER_URL", "http://localhost:5001")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_bad_speed() {
        for bad in ["fast", "0", "-2"] {
            let err = ClientConfig::from_lookup(lookup(&[("FSF_ANIMATION_SPEED", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidNumber { .. }));
        }
    }
}
