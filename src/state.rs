use std::sync::Arc;

use anyhow::Context;

use crate::auth::store::{MemoryUserStore, UserStore};
use crate::config::{AppConfig, JwtConfig, WeatherConfig};
use crate::storage::{LocalStorage, StorageClient};
use crate::weather::client::{OpenWeather, WeatherProvider};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub storage: Arc<dyn StorageClient>,
    pub weather: Arc<dyn WeatherProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        tokio::fs::create_dir_all(&config.uploads_dir)
            .await
            .with_context(|| format!("create uploads dir {}", config.uploads_dir.display()))?;

        Ok(Self {
            users: Arc::new(MemoryUserStore::default()),
            storage: Arc::new(LocalStorage::new(&config.uploads_dir)),
            weather: Arc::new(OpenWeather::new(&config.weather)),
            config,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        storage: Arc<dyn StorageClient>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            users,
            storage,
            weather,
            config,
        }
    }

    /// Test state: empty in-memory store, no-op storage, canned forecast.
    pub fn fake() -> Self {
        use crate::weather::client::WeatherError;
        use async_trait::async_trait;
        use bytes::Bytes;
        use serde_json::{json, Value};
        use std::path::PathBuf;

        struct NullStorage;
        #[async_trait]
        impl StorageClient for NullStorage {
            async fn put_object(&self, filename: &str, _body: Bytes) -> anyhow::Result<PathBuf> {
                Ok(PathBuf::from(filename))
            }
        }

        struct CannedWeather;
        #[async_trait]
        impl WeatherProvider for CannedWeather {
            async fn forecast_by_city(&self, city: &str) -> Result<Value, WeatherError> {
                Ok(json!({ "city": { "name": city }, "list": [] }))
            }
        }

        let config = Arc::new(AppConfig {
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 5,
            },
            weather: WeatherConfig {
                api_key: "test-key".into(),
                base_url: "http://weather.invalid".into(),
            },
            uploads_dir: std::env::temp_dir().join("leafsense-test-uploads"),
        });

        Self {
            users: Arc::new(MemoryUserStore::default()),
            storage: Arc::new(NullStorage),
            weather: Arc::new(CannedWeather),
            config,
        }
    }
}
