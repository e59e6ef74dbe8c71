//! X API write adapter: media upload and post creation

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trend_poster_domain::{MediaRef, PostReceipt, PublishError, SocialPoster};

use super::oauth::{OAuthSigner, XCredentials};

/// Endpoint and limit settings for [`XPoster`]
#[derive(Debug, Clone)]
pub struct XConfig {
    pub api_base_url: String,
    pub upload_base_url: String,
    pub max_chars: usize,
    pub timeout_secs: u64,
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.twitter.com".to_string(),
            upload_base_url: "https://upload.twitter.com".to_string(),
            max_chars: 280,
            timeout_secs: 30,
        }
    }
}

/// Posts to X with OAuth 1.0a user-context signing
pub struct XPoster {
    client: Client,
    signer: OAuthSigner,
    api_base_url: String,
    upload_base_url: String,
    max_chars: usize,
}

impl XPoster {
    pub fn new(credentials: XCredentials, config: XConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            signer: OAuthSigner::new(credentials),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
            max_chars: config.max_chars,
        }
    }

    /// Check the credentials, returning the account's handle
    pub async fn verify_credentials(&self) -> Result<String, PublishError> {
        let url = format!(
            "{}/1.1/account/verify_credentials.json",
            self.api_base_url
        );
        let auth = self.signer.authorization_header("GET", &url, &[])?;

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;
        let response = check_status(response, "verify credentials").await?;

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        Ok(account.screen_name)
    }
}

#[derive(Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<MediaAttachment<'a>>,
}

#[derive(Serialize)]
struct MediaAttachment<'a> {
    media_ids: &'a [String],
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    media_id_string: String,
}

#[derive(Deserialize)]
struct AccountResponse {
    screen_name: String,
}

async fn check_status(response: Response, action: &str) -> Result<Response, PublishError> {
    let status = response.status();

    if status == 401 {
        return Err(PublishError::Auth("Invalid or expired credentials".to_string()));
    }

    if status == 429 {
        return Err(PublishError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PublishError::Api(format!(
            "Failed to {} ({}): {}",
            action, status, body
        )));
    }

    Ok(response)
}

#[async_trait]
impl SocialPoster for XPoster {
    async fn upload_media(&self, media: &MediaRef) -> Result<String, PublishError> {
        let bytes = tokio::fs::read(&media.path)
            .await
            .map_err(|e| PublishError::Media(format!("Failed to read media file: {}", e)))?;

        let file_name = media
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media.jpg".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| PublishError::Media(e.to_string()))?;
        let form = Form::new().part("media", part);

        let url = format!("{}/1.1/media/upload.json", self.upload_base_url);
        let auth = self.signer.authorization_header("POST", &url, &[])?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::Media(e.to_string()))?;

        let response = match check_status(response, "upload media").await {
            Err(PublishError::Api(msg)) => return Err(PublishError::Media(msg)),
            other => other?,
        };

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Media(format!("Invalid upload response: {}", e)))?;

        tracing::debug!(media_id = %upload.media_id_string, "Uploaded media");

        Ok(upload.media_id_string)
    }

    async fn create_post(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<PostReceipt, PublishError> {
        let len = text.chars().count();
        if len > self.max_chars {
            return Err(PublishError::ContentTooLong {
                len,
                max: self.max_chars,
            });
        }

        let request = CreateTweetRequest {
            text,
            media: (!media_ids.is_empty()).then_some(MediaAttachment { media_ids }),
        };

        let url = format!("{}/2/tweets", self.api_base_url);
        let auth = self.signer.authorization_header("POST", &url, &[])?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;
        let response = check_status(response, "create tweet").await?;

        let tweet_response: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        Ok(PostReceipt {
            url: Some(format!("https://x.com/i/status/{}", tweet_response.data.id)),
            id: tweet_response.data.id,
            with_media: !media_ids.is_empty(),
        })
    }

    fn platform(&self) -> &'static str {
        "x"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::path::PathBuf;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn credentials() -> XCredentials {
        XCredentials {
            api_key: SecretString::new("key".into()),
            api_secret: SecretString::new("secret".into()),
            access_token: SecretString::new("token".into()),
            access_token_secret: SecretString::new("token-secret".into()),
        }
    }

    fn poster(server: &MockServer, max_chars: usize) -> XPoster {
        XPoster::new(
            credentials(),
            XConfig {
                api_base_url: server.uri(),
                upload_base_url: server.uri(),
                max_chars,
                timeout_secs: 5,
            },
        )
    }

    fn is_oauth(request: &Request) -> bool {
        request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("OAuth ") && v.contains("oauth_signature="))
    }

    #[tokio::test]
    async fn test_create_text_post() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(is_oauth)
            .and(body_json(serde_json::json!({"text": "Hello world"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "1800000000000000000", "text": "Hello world"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = poster(&server, 280)
            .create_post("Hello world", &[])
            .await
            .unwrap();

        assert_eq!(receipt.id, "1800000000000000000");
        assert_eq!(
            receipt.url.as_deref(),
            Some("https://x.com/i/status/1800000000000000000")
        );
        assert!(!receipt.with_media);
    }

    #[tokio::test]
    async fn test_create_post_with_media() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(body_json(serde_json::json!({
                "text": "With a photo",
                "media": {"media_ids": ["710511363345354753"]}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "42"}
            })))
            .mount(&server)
            .await;

        let receipt = poster(&server, 280)
            .create_post("With a photo", &["710511363345354753".to_string()])
            .await
            .unwrap();

        assert!(receipt.with_media);
    }

    #[tokio::test]
    async fn test_upload_media() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "media_id": 710511363345354753_u64,
                "media_id_string": "710511363345354753",
                "size": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = MediaRef {
            path: file,
            size_bytes: 4,
            width: 1,
            height: 1,
        };

        let id = poster(&server, 280).upload_media(&media).await.unwrap();

        assert_eq!(id, "710511363345354753");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let server = MockServer::start().await;

        let media = MediaRef {
            path: PathBuf::from("/nonexistent/trend-poster/photo.jpg"),
            size_bytes: 0,
            width: 0,
            height: 0,
        };

        let result = poster(&server, 280).upload_media(&media).await;

        assert!(matches!(result, Err(PublishError::Media(_))));
    }

    #[tokio::test]
    async fn test_upload_server_error_is_media_error() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, [0xFF, 0xD8]).unwrap();

        Mock::given(method("POST"))
            .and(path("/1.1/media/upload.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let media = MediaRef {
            path: file,
            size_bytes: 2,
            width: 1,
            height: 1,
        };

        let result = poster(&server, 280).upload_media(&media).await;

        assert!(matches!(result, Err(PublishError::Media(_))));
    }

    #[tokio::test]
    async fn test_content_too_long() {
        let server = MockServer::start().await;

        let result = poster(&server, 10)
            .create_post("This is far longer than ten", &[])
            .await;

        assert!(matches!(
            result,
            Err(PublishError::ContentTooLong { len: 27, max: 10 })
        ));
    }

    #[tokio::test]
    async fn test_length_counts_characters() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": {"id": "7"}
            })))
            .mount(&server)
            .await;

        // 5 characters, 15 bytes
        let result = poster(&server, 5).create_post("🔥🔥🔥🔥🔥", &[]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = poster(&server, 280).create_post("hi", &[]).await;

        assert!(matches!(result, Err(PublishError::Auth(_))));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = poster(&server, 280).create_post("hi", &[]).await;

        assert!(matches!(result, Err(PublishError::RateLimited)));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/account/verify_credentials.json"))
            .and(is_oauth)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id_str": "1",
                "screen_name": "nexoxa"
            })))
            .mount(&server)
            .await;

        let handle = poster(&server, 280).verify_credentials().await.unwrap();

        assert_eq!(handle, "nexoxa");
    }
}
