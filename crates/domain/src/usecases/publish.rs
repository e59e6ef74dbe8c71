//! Publishing use case - posts text with optional media, degrading to text-only

use std::path::Path;
use std::sync::Arc;

use crate::{
    model::{MediaRef, PostReceipt},
    ports::{PublishError, SocialPoster},
};

/// Submits posts through a [`SocialPoster`]
#[derive(Clone)]
pub struct PostPublisher {
    poster: Arc<dyn SocialPoster>,
}

impl PostPublisher {
    pub fn new(poster: Arc<dyn SocialPoster>) -> Self {
        Self { poster }
    }

    pub fn platform(&self) -> &'static str {
        self.poster.platform()
    }

    /// Publish `text`, attaching `media` when given.
    ///
    /// Media problems never abort the post: a failed upload or a failed
    /// post-with-media falls back to one text-only post with the same text.
    pub async fn publish(
        &self,
        text: &str,
        media: Option<MediaRef>,
    ) -> Result<PostReceipt, PublishError> {
        let Some(media) = media else {
            return self.poster.create_post(text, &[]).await;
        };

        tracing::debug!(
            path = %media.path.display(),
            size_bytes = media.size_bytes,
            width = media.width,
            height = media.height,
            "Uploading media"
        );
        let upload = self.poster.upload_media(&media).await;
        discard_scratch(&media.path).await;

        match upload {
            Ok(media_id) => {
                tracing::info!(media_id = %media_id, "Uploaded media");
                match self.poster.create_post(text, &[media_id]).await {
                    Ok(receipt) => return Ok(receipt),
                    Err(e) => {
                        tracing::error!(error = %e, "Post with media failed");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Media upload failed");
            }
        }

        tracing::info!("Falling back to text-only post");
        self.poster.create_post(text, &[]).await
    }
}

async fn discard_scratch(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed scratch media"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch media");
        }
    }
}
