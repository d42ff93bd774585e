use crate::error::{BoothError, ImageLimit, Result};
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;

/// Default maximum photo payload: 10 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
/// Default maximum width or height in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Formats accepted by the vision model.
const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Size limits applied to submitted photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub max_image_bytes: usize,
    pub max_dimension: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

/// A photo that passed validation.
///
/// Holds the original, untouched bytes so later stages can decode or forward
/// them again. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    bytes: Arc<[u8]>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl ValidatedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the photo again from the retained bytes.
    pub fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory_with_format(&self.bytes, self.format)
            .map_err(|e| BoothError::InvalidImageFormat(e.to_string()))
    }
}

/// Checks photo payloads against [`ImageLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator {
    limits: ImageLimits,
}

impl ImageValidator {
    pub fn new(limits: ImageLimits) -> Self {
        Self { limits }
    }

    /// Rejects an upload from its declared size alone, before reading the body.
    pub fn check_declared_size(&self, declared: usize) -> Result<()> {
        if declared > self.limits.max_image_bytes {
            return Err(BoothError::ImageTooLarge(ImageLimit::Bytes {
                size: declared,
                max: self.limits.max_image_bytes,
            }));
        }
        Ok(())
    }

    /// Validates a photo payload.
    ///
    /// Checks run cheapest first: byte length, format sniffing, header
    /// dimensions, and finally a full decode so truncated or corrupt bodies
    /// are rejected as well.
    ///
    /// # Errors
    ///
    /// - `ImageTooLarge` (bytes) when the payload exceeds `max_image_bytes`
    /// - `InvalidImageFormat` when the bytes are not a decodable PNG, JPEG,
    ///   GIF or WebP image
    /// - `ImageTooLarge` (dimensions) when width or height exceeds `max_dimension`
    pub fn validate(&self, bytes: impl Into<Arc<[u8]>>) -> Result<ValidatedImage> {
        let bytes: Arc<[u8]> = bytes.into();
        self.check_declared_size(bytes.len())?;

        if bytes.is_empty() {
            return Err(BoothError::InvalidImageFormat("image is empty".to_string()));
        }

        let reader = ImageReader::new(Cursor::new(&bytes[..]))
            .with_guessed_format()
            .map_err(|e| BoothError::InvalidImageFormat(e.to_string()))?;
        let format = reader.format().ok_or_else(|| {
            BoothError::InvalidImageFormat("unrecognized image format".to_string())
        })?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(BoothError::InvalidImageFormat(format!(
                "unsupported image format: {}",
                format.to_mime_type()
            )));
        }

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| BoothError::InvalidImageFormat(e.to_string()))?;

        let max = self.limits.max_dimension;
        if width > max || height > max {
            return Err(BoothError::ImageTooLarge(ImageLimit::Dimensions {
                width,
                height,
                max,
            }));
        }

        image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| BoothError::InvalidImageFormat(e.to_string()))?;

        tracing::debug!(
            "[ImageValidator] Accepted {:?} image {}x{} ({} bytes)",
            format,
            width,
            height,
            bytes.len()
        );

        Ok(ValidatedImage {
            bytes,
            format,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode(
            DynamicImage::ImageLuma8(GrayImage::new(width, height)),
            ImageFormat::Png,
        )
    }

    #[test]
    fn test_accepts_payload_of_exactly_max_bytes() {
        let bytes = png(8, 8);
        let validator = ImageValidator::new(ImageLimits {
            max_image_bytes: bytes.len(),
            max_dimension: DEFAULT_MAX_DIMENSION,
        });

        let validated = validator.validate(bytes.clone()).unwrap();
        assert_eq!(validated.bytes(), &bytes[..]);
        assert_eq!(validated.dimensions(), (8, 8));
        assert_eq!(validated.format(), ImageFormat::Png);
    }

    #[test]
    fn test_rejects_payload_one_byte_over_max() {
        let bytes = png(8, 8);
        let validator = ImageValidator::new(ImageLimits {
            max_image_bytes: bytes.len() - 1,
            max_dimension: DEFAULT_MAX_DIMENSION,
        });

        let err = validator.validate(bytes.clone()).unwrap_err();
        assert_eq!(
            err,
            BoothError::ImageTooLarge(ImageLimit::Bytes {
                size: bytes.len(),
                max: bytes.len() - 1,
            })
        );
    }

    #[test]
    fn test_rejects_wide_image_with_dimension_variant() {
        let validator = ImageValidator::default();
        let err = validator.validate(png(4097, 100)).unwrap_err();
        assert_eq!(
            err,
            BoothError::ImageTooLarge(ImageLimit::Dimensions {
                width: 4097,
                height: 100,
                max: 4096,
            })
        );
    }

    #[test]
    fn test_accepts_image_at_max_dimension() {
        let validator = ImageValidator::default();
        let validated = validator.validate(png(4096, 4096)).unwrap();
        assert_eq!(validated.dimensions(), (4096, 4096));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let validator = ImageValidator::default();
        let err = validator
            .validate(b"definitely not a picture".to_vec())
            .unwrap_err();
        assert!(matches!(err, BoothError::InvalidImageFormat(_)));
    }

    #[test]
    fn test_rejects_recognized_but_unsupported_format() {
        let mut bitmap = b"BM".to_vec();
        bitmap.resize(64, 0);

        let err = ImageValidator::default().validate(bitmap).unwrap_err();
        assert_eq!(
            err,
            BoothError::InvalidImageFormat("unsupported image format: image/bmp".to_string())
        );
    }

    #[test]
    fn test_rejects_truncated_image() {
        let mut bytes = encode(
            DynamicImage::ImageRgb8(RgbImage::new(64, 64)),
            ImageFormat::Png,
        );
        bytes.truncate(bytes.len() / 2);

        let err = ImageValidator::default().validate(bytes).unwrap_err();
        assert!(matches!(err, BoothError::InvalidImageFormat(_)));
    }

    #[test]
    fn test_rejects_empty_payload() {
        let err = ImageValidator::default().validate(Vec::new()).unwrap_err();
        assert!(matches!(err, BoothError::InvalidImageFormat(_)));
    }

    #[test]
    fn test_validated_image_can_be_decoded_again() {
        let jpeg = encode(
            DynamicImage::ImageRgb8(RgbImage::new(500, 500)),
            ImageFormat::Jpeg,
        );
        let validated = ImageValidator::default().validate(jpeg).unwrap();
        assert_eq!(validated.mime_type(), "image/jpeg");

        let decoded = validated.decode().unwrap();
        assert_eq!(decoded.width(), 500);
    }
}
