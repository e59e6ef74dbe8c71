//! Outbox poster for dry-run mode.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use trend_poster_domain::{MediaRef, PostReceipt, PublishError, SocialPoster};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct OutboxWriter {
    path: PathBuf,
    file: Arc<Mutex<tokio::fs::File>>,
}

impl OutboxWriter {
    pub async fn new(path: PathBuf) -> Result<Self, OutboxError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, entry: &OutboxEntry<'_>) -> Result<(), OutboxError> {
        let line = serde_json::to_string(entry)?;
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

/// Records would-be posts as JSONL lines instead of calling the API
#[derive(Debug, Clone)]
pub struct OutboxPoster {
    writer: OutboxWriter,
}

impl OutboxPoster {
    pub fn new(writer: OutboxWriter) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct OutboxEntry<'a> {
    text: &'a str,
    media_ids: &'a [String],
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

#[async_trait]
impl SocialPoster for OutboxPoster {
    async fn upload_media(&self, media: &MediaRef) -> Result<String, PublishError> {
        tracing::debug!(path = %media.path.display(), "Dry-run media upload");
        Ok(format!("local-{}", Uuid::new_v4().simple()))
    }

    async fn create_post(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostReceipt, PublishError> {
        let entry = OutboxEntry {
            text,
            media_ids,
            created_at: OffsetDateTime::now_utc(),
        };

        self.writer
            .append(&entry)
            .await
            .map_err(|error| PublishError::Api(format!("Outbox write failed: {}", error)))?;

        Ok(PostReceipt {
            id: Uuid::new_v4().to_string(),
            url: None,
            with_media: !media_ids.is_empty(),
        })
    }

    fn platform(&self) -> &'static str {
        "outbox"
    }
}
