//! X (Twitter) API adapters

mod oauth;
mod write;

pub use oauth::{OAuthSigner, XCredentials};
pub use write::{XConfig, XPoster};
