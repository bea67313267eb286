use image::DynamicImage;

use crate::{
    error::Result,
    mask::{Mask, MaskGenerator},
};

/// selects every pixel whose 8-bit luminance is strictly greater than `threshold`. color images
/// are converted to luminance first.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub threshold: u8,
}

impl Default for Threshold {
    fn default() -> Self {
        Self { threshold: 127 }
    }
}

impl MaskGenerator for Threshold {
    fn mask(&self, image: &DynamicImage) -> Result<Mask> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        let mask = Mask::from_fn(width, height, |x, y| {
            gray.get_pixel(x, y)[0] > self.threshold
        });

        log::debug!(
            "{} of {} pixels above threshold {}",
            mask.count(),
            width * height,
            self.threshold
        );

        Ok(mask)
    }
}
