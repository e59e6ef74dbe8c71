//! OAuth 1.0a request signing (HMAC-SHA1)

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use trend_poster_domain::PublishError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE).to_string()
}

/// The four user-context credentials
#[derive(Clone)]
pub struct XCredentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    pub access_token: SecretString,
    pub access_token_secret: SecretString,
}

/// Produces `Authorization` headers for signed requests
#[derive(Clone)]
pub struct OAuthSigner {
    credentials: XCredentials,
}

impl OAuthSigner {
    pub fn new(credentials: XCredentials) -> Self {
        Self { credentials }
    }

    /// Header for a request with a fresh nonce and the current time.
    ///
    /// `params` must hold the query-string and form-encoded body parameters;
    /// JSON and multipart bodies are not part of the signature.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    pub(crate) fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, PublishError> {
        let oauth_params = self.oauth_params(nonce, timestamp);
        let signature = self.signature(method, url, params, &oauth_params)?;

        let mut header_params: Vec<(&str, String)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        header_params.push(("oauth_signature", signature));
        header_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", fields))
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> Vec<(&'static str, String)> {
        vec![
            (
                "oauth_consumer_key",
                self.credentials.api_key.expose_secret().to_string(),
            ),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            (
                "oauth_token",
                self.credentials.access_token.expose_secret().to_string(),
            ),
            ("oauth_version", "1.0".to_string()),
        ]
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        oauth_params: &[(&'static str, String)],
    ) -> Result<String, PublishError> {
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        encoded.sort();

        let parameter_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            encode(url),
            encode(&parameter_string)
        );

        let signing_key = format!(
            "{}&{}",
            encode(self.credentials.api_secret.expose_secret()),
            encode(self.credentials.access_token_secret.expose_secret())
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| PublishError::Auth(format!("HMAC error: {}", e)))?;
        mac.update(base_string.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_signer() -> OAuthSigner {
        OAuthSigner::new(XCredentials {
            api_key: SecretString::new("xvz1evFS4wEEPTGEFPHBog".into()),
            api_secret: SecretString::new("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into()),
            access_token: SecretString::new(
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            ),
            access_token_secret: SecretString::new(
                "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
            ),
        })
    }

    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: &str = "1318622958";
    const URL: &str = "https://api.twitter.com/1.1/statuses/update.json";

    fn params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("include_entities", "true"),
            (
                "status",
                "Hello Ladies + Gentlemen, a signed OAuth request!",
            ),
        ]
    }

    #[test]
    fn test_signature_matches_reference_vector() {
        let signer = reference_signer();
        let oauth_params = signer.oauth_params(NONCE, TIMESTAMP);

        let signature = signer
            .signature("POST", URL, &params(), &oauth_params)
            .unwrap();

        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_header_contains_encoded_signature() {
        let header = reference_signer()
            .authorization_header_with("POST", URL, &params(), NONCE, TIMESTAMP)
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("!"), "%21");
    }

    #[test]
    fn test_fresh_headers_differ() {
        let signer = reference_signer();

        let a = signer.authorization_header("GET", URL, &[]).unwrap();
        let b = signer.authorization_header("GET", URL, &[]).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_secrets_still_sign() {
        let signer = OAuthSigner::new(XCredentials {
            api_key: SecretString::new("key".into()),
            api_secret: SecretString::new("".into()),
            access_token: SecretString::new("token".into()),
            access_token_secret: SecretString::new("".into()),
        });

        let header = signer.authorization_header("POST", URL, &params()).unwrap();

        assert!(header.contains("oauth_signature=\""));
        assert!(header.contains("oauth_token=\"token\""));
    }
}
