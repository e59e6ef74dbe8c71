//! Stock photo fetching and image preparation

pub mod process;
pub mod unsplash;

pub use process::{EncodedImage, ImageLimits, prepare_jpeg};
pub use unsplash::{UnsplashConfig, UnsplashMediaFetcher};

/// Topical keywords used for photo searches
pub const DEFAULT_KEYWORDS: [&str; 9] = [
    "technology",
    "programming",
    "coding",
    "software",
    "computer",
    "ai",
    "tech",
    "startup",
    "business",
];
