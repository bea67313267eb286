//! thresholding grayscale predictions into binary masks.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::{
    batch::{self, Summary},
    error::Result,
    imageops,
    locate::{ensure_root, png_files},
    mask::{MaskGenerator, Threshold},
};

/// writes `output` as a single-channel PNG that is white where the luminance of
/// `input` exceeds the threshold and black elsewhere.
pub fn binarize_file(
    input: &Path,
    output: &Path,
    threshold: &Threshold,
) -> Result<PathBuf> {
    let image = imageops::decode(input)?;
    let mask = threshold.mask(&image)?;
    imageops::save_png(&DynamicImage::ImageLuma8(mask.to_gray_image()), output)?;
    Ok(output.to_path_buf())
}

/// binarizes every PNG under `input_root`, mirroring the directory layout under `out_root`.
pub fn binarize_all(input_root: &Path, out_root: &Path, threshold: &Threshold) -> Result<Summary> {
    ensure_root(input_root)?;

    let relatives: Vec<PathBuf> = png_files(input_root)
        .filter_map(|path| Some(path.strip_prefix(input_root).ok()?.to_path_buf()))
        .collect();
    log::info!(
        "Binarizing {} images from {:?} at threshold {}",
        relatives.len(),
        input_root,
        threshold.threshold
    );

    let outcomes = batch::process_all(&relatives, |relative| relative.as_path(), |relative| {
        binarize_file(
            &input_root.join(relative),
            &out_root.join(relative),
            threshold,
        )
    })?;

    let summary: Summary = outcomes.into_iter().collect();
    summary.log();
    Ok(summary)
}
