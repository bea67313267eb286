//! mask generation algorithms

pub mod color;
pub mod threshold;

use image::{DynamicImage, GrayImage, Luma};
use ndarray::Array2;

use crate::error::Result;

pub use color::ColorMatch;
pub use threshold::Threshold;

pub const MASK_MIN: u8 = 0;
pub const MASK_MAX: u8 = u8::MAX;

pub trait MaskGenerator {
    fn mask(&self, image: &DynamicImage) -> Result<Mask>;
}

/// a boolean membership grid with the same width and height as the image it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    // indexed as [[y, x]]
    cells: Array2<bool>,
}

impl Mask {
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let cells = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            f(x as u32, y as u32)
        });
        Self { cells }
    }

    /// (width, height), matching `image::GenericImageView::dimensions`.
    pub fn dimensions(&self) -> (u32, u32) {
        let (rows, cols) = self.cells.dim();
        (cols as u32, rows as u32)
    }

    /// # Panics
    ///
    /// if `(x, y)` lies outside [`Mask::dimensions`].
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells[[y as usize, x as usize]]
    }

    /// number of pixels inside the mask.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&inside| inside).count()
    }

    /// renders the mask as a binary grayscale image, `MASK_MAX` inside and `MASK_MIN` outside.
    pub fn to_gray_image(&self) -> GrayImage {
        let (width, height) = self.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            Luma([if self.get(x, y) { MASK_MAX } else { MASK_MIN }])
        })
    }
}
