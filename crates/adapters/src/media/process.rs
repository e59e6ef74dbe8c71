//! Resize and JPEG-encode downloaded photos

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView};
use trend_poster_domain::MediaError;

const MIN_JPEG_QUALITY: u8 = 40;
const QUALITY_STEP: u8 = 15;

/// Output bounds for a prepared image
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
    pub max_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 675,
            jpeg_quality: 85,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// Decode `raw`, shrink it to fit `limits` and encode it as JPEG.
///
/// Aspect ratio is preserved and smaller images are never upscaled. When the
/// encoding is over `max_bytes` the quality drops by 15 per attempt, down to 40.
pub fn prepare_jpeg(raw: &[u8], limits: &ImageLimits) -> Result<EncodedImage, MediaError> {
    let img = image::load_from_memory(raw)
        .map_err(|e| MediaError::Processing(format!("Failed to decode image: {}", e)))?;

    let img = fit_within(img, limits.max_width, limits.max_height);
    let (width, height) = img.dimensions();
    let rgb = img.to_rgb8();

    let mut quality = limits.jpeg_quality.clamp(1, 100);
    loop {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
            .map_err(|e| MediaError::Processing(format!("Failed to encode JPEG: {}", e)))?;

        if bytes.len() as u64 <= limits.max_bytes {
            return Ok(EncodedImage {
                bytes,
                width,
                height,
                quality,
            });
        }

        if quality <= MIN_JPEG_QUALITY {
            return Err(MediaError::Processing(format!(
                "Image is {} bytes at quality {}, limit is {}",
                bytes.len(),
                quality,
                limits.max_bytes
            )));
        }

        tracing::debug!(size = bytes.len(), quality = quality, "Image over size limit");
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_JPEG_QUALITY);
    }
}

fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_width && height <= max_height {
        return img;
    }

    img.resize(max_width, max_height, FilterType::Lanczos3)
}
