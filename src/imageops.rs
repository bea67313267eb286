//! the codec boundary. images are decoded into the `image` crate's RGB(A) channel order and stay
//! in that order for all in-memory processing; PNG output is written in the same order, so no
//! channel swapping happens anywhere in the crate.

use std::{fs, path::Path};

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// decodes the image at `path`, guessing the format from its content.
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

/// number of channels the image was decoded with, alpha included.
pub fn channel_count(image: &DynamicImage) -> u8 {
    image.color().channel_count()
}

/// encodes `image` as PNG at `path`, creating missing parent directories. an existing file is
/// overwritten.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        // create_dir_all tolerates another worker creating the same directory concurrently
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn saves_into_missing_directories_and_decodes_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.png");

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        save_png(&image, &path).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.to_rgb8(), image.to_rgb8());
        assert_eq!(channel_count(&decoded), 3);
    }

    #[test]
    fn channel_counts_follow_the_decoded_color_type() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([0])));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert_eq!(channel_count(&gray), 1);
        assert_eq!(channel_count(&rgba), 4);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn writing_under_a_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let image = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        let err = save_png(&image, &blocker.join("out.png")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!err.is_recoverable());
    }
}
