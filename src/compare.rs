//! per-pixel agreement between a Source-A mask and a Source-B mask.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::{
    batch::{self, Outcome, Summary},
    color::{BLACK, CYAN, MAGENTA, WHITE},
    error::{Error, Result},
    imageops,
    locate::{PairLocator, PathPair},
    mask::{ColorMatch, Mask, MaskGenerator, color::DEFAULT_TOLERANCE},
};

/// the four mutually exclusive classes a pixel can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Agreement {
    Both,
    OnlyA,
    OnlyB,
    Neither,
}

impl Agreement {
    pub fn classify(in_a: bool, in_b: bool) -> Self {
        match (in_a, in_b) {
            (true, true) => Agreement::Both,
            (true, false) => Agreement::OnlyA,
            (false, true) => Agreement::OnlyB,
            (false, false) => Agreement::Neither,
        }
    }

    pub fn color(self, palette: &Palette) -> Rgb<u8> {
        match self {
            Agreement::Both => WHITE,
            Agreement::OnlyA => palette.source_a,
            Agreement::OnlyB => palette.source_b,
            Agreement::Neither => BLACK,
        }
    }
}

/// the reference colors of both sources. each source's mask is extracted with its own color and
/// pixels found only in that source are painted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub source_a: Rgb<u8>,
    pub source_b: Rgb<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            source_a: CYAN,
            source_b: MAGENTA,
        }
    }
}

impl Palette {
    /// true iff the four output colors are pairwise distinct, so a diff image can be read back
    /// unambiguously.
    pub fn is_distinct(&self) -> bool {
        let colors = [WHITE, self.source_a, self.source_b, BLACK];
        colors
            .iter()
            .enumerate()
            .all(|(i, c)| !colors[i + 1..].contains(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub palette: Palette,
    pub tolerance: u8,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// paints every pixel with the color of its [`Agreement`] class.
pub fn classify(mask_a: &Mask, mask_b: &Mask, palette: &Palette) -> Result<RgbImage> {
    if mask_a.dimensions() != mask_b.dimensions() {
        return Err(Error::ShapeMismatch {
            left: mask_a.dimensions(),
            right: mask_b.dimensions(),
        });
    }

    let (width, height) = mask_a.dimensions();
    Ok(RgbImage::from_fn(width, height, |x, y| {
        Agreement::classify(mask_a.get(x, y), mask_b.get(x, y)).color(palette)
    }))
}

/// builds the diff image of two decoded images. `image_a` is matched against the palette's
/// Source-A color and `image_b` against its Source-B color.
pub fn compare(
    image_a: &DynamicImage,
    image_b: &DynamicImage,
    options: &CompareOptions,
) -> Result<RgbImage> {
    if image_a.dimensions() != image_b.dimensions() {
        return Err(Error::ShapeMismatch {
            left: image_a.dimensions(),
            right: image_b.dimensions(),
        });
    }

    let mask_a = ColorMatch {
        reference: options.palette.source_a,
        tolerance: options.tolerance,
    }
    .mask(image_a)?;
    let mask_b = ColorMatch {
        reference: options.palette.source_b,
        tolerance: options.tolerance,
    }
    .mask(image_b)?;

    classify(&mask_a, &mask_b, &options.palette)
}

/// decodes both sides of `pair`, compares them, and writes the diff image to
/// `out_root / pair.relative`. returns the written path.
pub fn compare_pair(pair: &PathPair, out_root: &Path, options: &CompareOptions) -> Result<PathBuf> {
    let image_a = imageops::decode(&pair.a)?;
    let image_b = imageops::decode(&pair.b)?;

    let diff = compare(&image_a, &image_b, options)?;

    let output = out_root.join(&pair.relative);
    imageops::save_png(&DynamicImage::ImageRgb8(diff), &output)?;
    Ok(output)
}

/// compares every image under `a_root` with its same-relative-path counterpart under `b_root`,
/// mirroring the diff images under `out_root`.
///
/// missing roots fail before anything is written. missing counterparts, undecodable files and
/// mismatched sizes skip the pair. failing to write an output aborts the batch.
pub fn compare_all(
    a_root: &Path,
    b_root: &Path,
    out_root: &Path,
    options: &CompareOptions,
) -> Result<Summary> {
    let locator = PairLocator::new(a_root, b_root)?;

    if !options.palette.is_distinct() {
        log::warn!(
            "Palette colors {:?} and {:?} collide with each other or with white/black",
            options.palette.source_a.0,
            options.palette.source_b.0
        );
    }

    let located = locator.locate();
    log::info!(
        "Comparing {} pairs from {:?} against {:?}",
        located.pairs.len(),
        a_root,
        b_root
    );

    let mut outcomes = located
        .unmatched
        .into_iter()
        .map(|pair| {
            Outcome::settle(
                pair.relative,
                Err(Error::NotFound { path: pair.b }),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    outcomes.extend(batch::process_all(
        &located.pairs,
        |pair| pair.relative.as_path(),
        |pair| compare_pair(pair, out_root, options),
    )?);

    let summary = Summary { outcomes };
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn solid(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
    }

    #[test]
    fn classification_is_an_exact_partition() {
        let cases = [
            ((true, true), Agreement::Both),
            ((true, false), Agreement::OnlyA),
            ((false, true), Agreement::OnlyB),
            ((false, false), Agreement::Neither),
        ];
        for ((a, b), expected) in cases {
            assert_eq!(Agreement::classify(a, b), expected);
        }

        let palette = Palette::default();
        assert_eq!(Agreement::Both.color(&palette), WHITE);
        assert_eq!(Agreement::OnlyA.color(&palette), CYAN);
        assert_eq!(Agreement::OnlyB.color(&palette), MAGENTA);
        assert_eq!(Agreement::Neither.color(&palette), BLACK);
    }

    #[test]
    fn cyan_against_magenta_is_white() {
        let diff = compare(
            &solid(1, 1, CYAN),
            &solid(1, 1, MAGENTA),
            &CompareOptions::default(),
        )
        .unwrap();
        assert_eq!(*diff.get_pixel(0, 0), WHITE);

        let diff = compare(
            &solid(4, 4, CYAN),
            &solid(4, 4, MAGENTA),
            &CompareOptions::default(),
        )
        .unwrap();
        assert!(diff.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn each_quadrant_gets_its_own_class() {
        // A is annotated where x < 2, B where y < 2
        let image_a = DynamicImage::ImageRgb8(RgbImage::from_fn(4, 4, |x, _| {
            if x < 2 { CYAN } else { BLACK }
        }));
        let image_b = DynamicImage::ImageRgb8(RgbImage::from_fn(4, 4, |_, y| {
            if y < 2 { MAGENTA } else { Rgb([40, 40, 40]) }
        }));

        let diff = compare(&image_a, &image_b, &CompareOptions::default()).unwrap();
        assert_eq!(*diff.get_pixel(0, 0), WHITE);
        assert_eq!(*diff.get_pixel(0, 3), CYAN);
        assert_eq!(*diff.get_pixel(3, 0), MAGENTA);
        assert_eq!(*diff.get_pixel(3, 3), BLACK);

        let palette = Palette::default();
        let admissible = [WHITE, palette.source_a, palette.source_b, BLACK];
        assert!(diff.pixels().all(|p| admissible.contains(p)));
    }

    #[test]
    fn source_colors_are_not_swapped() {
        // magenta in A and cyan in B match neither reference
        let diff = compare(
            &solid(2, 2, MAGENTA),
            &solid(2, 2, CYAN),
            &CompareOptions::default(),
        )
        .unwrap();
        assert!(diff.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn tolerance_applies_to_both_sources() {
        let options = CompareOptions::default();
        let diff = compare(
            &solid(1, 1, Rgb([10, 245, 255])),
            &solid(1, 1, Rgb([255, 11, 255])),
            &options,
        )
        .unwrap();
        assert_eq!(*diff.get_pixel(0, 0), CYAN);
    }

    #[test]
    fn custom_palette_colors_the_exclusive_regions() {
        let options = CompareOptions {
            palette: Palette {
                source_a: Rgb([255, 0, 0]),
                source_b: Rgb([0, 0, 255]),
            },
            tolerance: 0,
        };
        let diff = compare(
            &solid(1, 1, Rgb([255, 0, 0])),
            &solid(1, 1, BLACK),
            &options,
        )
        .unwrap();
        assert_eq!(*diff.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn alpha_does_not_break_matching() {
        let image_a = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 255, 255, 7])));
        let diff = compare(&image_a, &solid(1, 1, BLACK), &CompareOptions::default()).unwrap();
        assert_eq!(*diff.get_pixel(0, 0), CYAN);
    }

    #[test]
    fn different_sizes_are_rejected() {
        let err = compare(
            &solid(10, 10, CYAN),
            &solid(11, 10, MAGENTA),
            &CompareOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                left: (10, 10),
                right: (11, 10)
            }
        ));
    }

    #[test]
    fn default_palette_is_distinct() {
        assert!(Palette::default().is_distinct());
        assert!(
            !Palette {
                source_a: CYAN,
                source_b: CYAN
            }
            .is_distinct()
        );
        assert!(
            !Palette {
                source_a: WHITE,
                source_b: MAGENTA
            }
            .is_distinct()
        );
    }
}
