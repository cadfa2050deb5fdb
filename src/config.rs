use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Immutable settings read once at process start. Secrets have no defaults;
/// the process refuses to start without them.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    pub uploads_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let weather = WeatherConfig {
            api_key: std::env::var("OPENWEATHER_API_KEY")
                .context("OPENWEATHER_API_KEY must be set")?,
            base_url: std::env::var("WEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5/forecast".into()),
        };
        let uploads_dir = std::env::var("UPLOADS_DIR")
            .unwrap_or_else(|_| "uploads".into())
            .into();
        Ok(Self {
            jwt,
            weather,
            uploads_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race each other.
    #[test]
    fn from_env_requires_secrets_then_parses_defaults() {
        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("OPENWEATHER_API_KEY");
        assert!(AppConfig::from_env().is_err());

        std::env::set_var("JWT_SECRET", "env-secret");
        assert!(AppConfig::from_env().is_err(), "weather key still missing");

        std::env::set_var("OPENWEATHER_API_KEY", "env-key");
        std::env::remove_var("JWT_TTL_MINUTES");
        std::env::remove_var("WEATHER_BASE_URL");
        std::env::remove_var("UPLOADS_DIR");

        let config = AppConfig::from_env().expect("full env should parse");
        assert_eq!(config.jwt.secret, "env-secret");
        assert_eq!(config.jwt.ttl_minutes, 30);
        assert_eq!(config.weather.api_key, "env-key");
        assert!(config.weather.base_url.contains("openweathermap"));
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
    }
}
