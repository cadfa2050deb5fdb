use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::WeatherConfig;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather provider unreachable: {0}")]
    Request(String),
    #[error("weather provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("weather provider returned a non-JSON body")]
    Decode,
}

/// Seam over the forecast upstream so handler tests can run offline.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn forecast_by_city(&self, city: &str) -> Result<Value, WeatherError>;
}

/// OpenWeather forecast client. Single pass-through call, no caching or
/// retries.
pub struct OpenWeather {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeather {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    async fn forecast_by_city(&self, city: &str) -> Result<Value, WeatherError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        if !status.is_success() {
            // Providers usually put the reason in a JSON `message`; fall back
            // to the raw body when they don't.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|_| WeatherError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_render_status_and_message() {
        let err = WeatherError::Upstream {
            status: 404,
            message: "city not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "weather provider returned 404: city not found"
        );
    }
}
