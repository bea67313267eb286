use image::{DynamicImage, GenericImageView, Rgb};

use crate::{
    color::within_tolerance,
    error::{Error, Result},
    imageops::channel_count,
    mask::{Mask, MaskGenerator},
};

pub const DEFAULT_TOLERANCE: u8 = 10;

/// selects every pixel whose color is within `tolerance` of `reference` on each channel
/// (Chebyshev distance, inclusive).
///
/// a fourth (alpha) channel is ignored. images with fewer than three channels are rejected rather
/// than expanded, since a grayscale image cannot carry the reference color.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatch {
    pub reference: Rgb<u8>,
    pub tolerance: u8,
}

impl ColorMatch {
    pub fn new(reference: Rgb<u8>) -> Self {
        Self {
            reference,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl MaskGenerator for ColorMatch {
    fn mask(&self, image: &DynamicImage) -> Result<Mask> {
        let channels = channel_count(image);
        if channels < 3 {
            return Err(Error::ChannelDepth { channels });
        }

        let rgb = image.to_rgb8();
        let (width, height) = image.dimensions();
        let mask = Mask::from_fn(width, height, |x, y| {
            within_tolerance(rgb.get_pixel(x, y), &self.reference, self.tolerance)
        });

        log::debug!(
            "{} of {} pixels match {:?} (tolerance {})",
            mask.count(),
            width * height,
            self.reference.0,
            self.tolerance
        );

        Ok(mask)
    }
}
