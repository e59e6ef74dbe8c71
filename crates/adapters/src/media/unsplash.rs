//! Unsplash random-photo fetcher

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use trend_poster_domain::{MediaError, MediaFetcher, MediaRef, RandomSource};

use super::{DEFAULT_KEYWORDS, ImageLimits, prepare_jpeg};

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub base_url: String,
    pub keywords: Vec<String>,
    pub limits: ImageLimits,
    pub scratch_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            limits: ImageLimits::default(),
            scratch_dir: std::env::temp_dir(),
            timeout_secs: 30,
        }
    }
}

/// Searches Unsplash for a topical photo and writes a post-ready JPEG
pub struct UnsplashMediaFetcher {
    client: Client,
    access_key: Option<SecretString>,
    config: UnsplashConfig,
    random: Arc<RandomSource>,
}

#[derive(Deserialize)]
struct RandomPhoto {
    urls: Option<PhotoUrls>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

impl UnsplashMediaFetcher {
    pub fn new(
        access_key: Option<SecretString>,
        config: UnsplashConfig,
        random: Arc<RandomSource>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            access_key,
            config,
            random,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    fn pick_keyword(&self) -> &str {
        self.random
            .pick_index(self.config.keywords.len())
            .map(|i| self.config.keywords[i].as_str())
            .unwrap_or("technology")
    }

    async fn search(&self, access_key: &SecretString, keyword: &str) -> Result<String, MediaError> {
        let url = format!(
            "{}/photos/random",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", keyword),
                ("orientation", "landscape"),
                ("client_id", access_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| MediaError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Search(format!(
                "Unsplash returned {}",
                response.status()
            )));
        }

        let photo: RandomPhoto = response
            .json()
            .await
            .map_err(|e| MediaError::Search(format!("Invalid response: {}", e)))?;

        photo
            .urls
            .and_then(|u| u.regular)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MediaError::Search("Photo has no regular URL".to_string()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Download(format!(
                "Download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MediaError::Download(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl MediaFetcher for UnsplashMediaFetcher {
    async fn fetch_media(&self) -> Result<MediaRef, MediaError> {
        let access_key = match &self.access_key {
            Some(key) if !key.expose_secret().trim().is_empty() => key,
            _ => {
                return Err(MediaError::NotConfigured(
                    "No Unsplash access key".to_string(),
                ));
            }
        };

        let keyword = self.pick_keyword().to_string();
        tracing::debug!(keyword = %keyword, "Searching for photo");

        let image_url = self.search(access_key, &keyword).await?;
        let raw = self.download(&image_url).await?;

        let limits = self.config.limits;
        let encoded = tokio::task::spawn_blocking(move || prepare_jpeg(&raw, &limits))
            .await
            .map_err(|e| MediaError::Processing(e.to_string()))??;

        tokio::fs::create_dir_all(&self.config.scratch_dir).await?;
        let path = self
            .config
            .scratch_dir
            .join(format!("trend-poster-{}.jpg", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &encoded.bytes).await?;

        tracing::info!(
            keyword = %keyword,
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            size = encoded.bytes.len(),
            "Prepared media"
        );

        Ok(MediaRef {
            path,
            size_bytes: encoded.bytes.len() as u64,
            width: encoded.width,
            height: encoded.height,
        })
    }
}
