//! trend-poster domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Aggregation, formatting, posting, and scheduling
//! - `templates`: Fallback post templates keyed by content kind
//! - `random`: Seedable random source for selection and delays

pub mod model;
pub mod ports;
pub mod random;
pub mod templates;
pub mod usecases;

pub use model::*;
pub use ports::*;
pub use random::RandomSource;

/// Default post length limit for the posting platform
pub const MAX_POST_CHARS: usize = 280;

/// Truncate `text` to at most `max_chars` characters, ending in "..." when cut
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}
