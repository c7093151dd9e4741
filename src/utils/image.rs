//! Photo resizing.

use std::future::Future;
use std::io::Cursor;
use std::pin::Pin;

use image::{DynamicImage, ImageFormat, imageops::FilterType};

pub const PHOTO_WIDTH: u32 = 150;
pub const PHOTO_HEIGHT: u32 = 97;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Could not process image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type ImageFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, ImageError>> + Send>>;

pub trait ImageProcessor: Send + Sync {
    /// Resizes `bytes` and re-encodes them as `format`.
    fn resize(&self, bytes: Vec<u8>, format: ImageFormat) -> ImageFuture;
}

/// Crops to fill a fixed box. Runs on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self {
            width: PHOTO_WIDTH,
            height: PHOTO_HEIGHT,
        }
    }
}

impl ImageResizer {
    fn resize_blocking(
        bytes: &[u8],
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> Result<Vec<u8>, ImageError> {
        let resized = image::load_from_memory(bytes)?.resize_to_fill(width, height, FilterType::Lanczos3);

        // JPEG has no alpha channel.
        let resized = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
            _ => resized,
        };

        let mut out = Cursor::new(Vec::new());
        resized.write_to(&mut out, format)?;
        Ok(out.into_inner())
    }
}

impl ImageProcessor for ImageResizer {
    fn resize(&self, bytes: Vec<u8>, format: ImageFormat) -> ImageFuture {
        let (width, height) = (self.width, self.height);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                Self::resize_blocking(&bytes, width, height, format)
            })
            .await?
        })
    }
}

/// Output format and file extension for an upload, from its original
/// file name. Anything the encoder does not handle becomes JPEG.
pub fn output_format(file_name: Option<&str>) -> (ImageFormat, &'static str) {
    let format = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension);

    match format {
        Some(ImageFormat::Png) => (ImageFormat::Png, "png"),
        Some(ImageFormat::Gif) => (ImageFormat::Gif, "gif"),
        Some(ImageFormat::WebP) => (ImageFormat::WebP, "webp"),
        _ => (ImageFormat::Jpeg, "jpg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([200u8, 30, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_resize_to_photo_box() {
        let resized = ImageResizer::default()
            .resize(png_fixture(600, 400), ImageFormat::Jpeg)
            .await
            .unwrap();

        let decoded = image::load_from_memory(&resized).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (PHOTO_WIDTH, PHOTO_HEIGHT));
        assert_eq!(image::guess_format(&resized).unwrap(), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_rejected() {
        let err = ImageResizer::default()
            .resize(b"definitely not an image".to_vec(), ImageFormat::Png)
            .await
            .unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Some("campus.PNG")), (ImageFormat::Png, "png"));
        assert_eq!(output_format(Some("campus.jpeg")), (ImageFormat::Jpeg, "jpg"));
        assert_eq!(output_format(Some("campus.tiff")), (ImageFormat::Jpeg, "jpg"));
        assert_eq!(output_format(None), (ImageFormat::Jpeg, "jpg"));
    }
}
