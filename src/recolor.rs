//! painting the foreground of binary masks with a source's reference color.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use image::{DynamicImage, Rgb};

use crate::{
    batch::{self, Summary},
    color::{CYAN, WHITE, within_tolerance},
    error::{Error, Result},
    imageops,
    locate::{ensure_root, png_files},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecolorOptions {
    /// the color to replace.
    pub target: Rgb<u8>,
    pub replacement: Rgb<u8>,
    pub tolerance: u8,
    /// when set, outputs are placed under the last `n` components of the input path instead of
    /// the path relative to the input root.
    pub tail: Option<usize>,
}

impl Default for RecolorOptions {
    fn default() -> Self {
        Self {
            target: WHITE,
            replacement: CYAN,
            tolerance: 0,
            tail: None,
        }
    }
}

/// the last `n` normal components of `path`.
fn path_tail(path: &Path, n: usize) -> PathBuf {
    let normal: Vec<_> = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    normal[normal.len().saturating_sub(n)..].iter().collect()
}

/// replaces every pixel within tolerance of `target` with `replacement`. alpha is dropped.
pub fn recolor_image(image: &DynamicImage, options: &RecolorOptions) -> DynamicImage {
    let mut rgb = image.to_rgb8();
    let mut replaced = 0usize;

    for pixel in rgb.pixels_mut() {
        if within_tolerance(pixel, &options.target, options.tolerance) {
            *pixel = options.replacement;
            replaced += 1;
        }
    }
    log::debug!("Replaced {} pixels", replaced);

    DynamicImage::ImageRgb8(rgb)
}

pub fn recolor_file(input: &Path, output: &Path, options: &RecolorOptions) -> Result<PathBuf> {
    let image = imageops::decode(input)?;
    imageops::save_png(&recolor_image(&image, options), output)?;
    Ok(output.to_path_buf())
}

struct Job {
    input: PathBuf,
    relative: PathBuf,
    output: PathBuf,
    /// the earlier input that already claimed `output`.
    claimed_by: Option<PathBuf>,
}

/// assigns every input its output path. when several inputs map to the same output (possible
/// with `tail`), the first in discovery order keeps it and the rest are marked.
fn plan(inputs: Vec<(PathBuf, PathBuf)>, out_root: &Path, tail: Option<usize>) -> Vec<Job> {
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::new();

    inputs
        .into_iter()
        .map(|(input, relative)| {
            let output = out_root.join(match tail {
                Some(n) => path_tail(&input, n),
                None => relative.clone(),
            });
            let claimed_by = owners.get(&output).cloned();
            if claimed_by.is_none() {
                owners.insert(output.clone(), input.clone());
            }
            Job {
                input,
                relative,
                output,
                claimed_by,
            }
        })
        .collect()
}

/// recolors every PNG under `input_root` into `out_root`. inputs whose output path was already
/// claimed by an earlier input are skipped.
pub fn recolor_all(input_root: &Path, out_root: &Path, options: &RecolorOptions) -> Result<Summary> {
    ensure_root(input_root)?;

    let inputs: Vec<(PathBuf, PathBuf)> = png_files(input_root)
        .filter_map(|path| {
            let relative = path.strip_prefix(input_root).ok()?.to_path_buf();
            Some((path, relative))
        })
        .collect();
    log::info!("Recoloring {} images from {:?}", inputs.len(), input_root);

    let jobs = plan(inputs, out_root, options.tail);
    let outcomes = batch::process_all(&jobs, |job| job.relative.as_path(), |job| {
        match &job.claimed_by {
            Some(first) => Err(Error::OutputCollision {
                path: job.output.clone(),
                first: first.clone(),
            }),
            None => recolor_file(&job.input, &job.output, options),
        }
    })?;

    let summary: Summary = outcomes.into_iter().collect();
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, RgbImage};
    use tempfile::TempDir;

    use super::*;
    use crate::color::{BLACK, MAGENTA};

    #[test]
    fn only_target_pixels_change() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(3, 1, |x, _| match x {
            0 => WHITE,
            1 => Rgb([250, 250, 250]),
            _ => BLACK,
        }));

        let recolored = recolor_image(&image, &RecolorOptions::default()).to_rgb8();
        assert_eq!(*recolored.get_pixel(0, 0), CYAN);
        assert_eq!(*recolored.get_pixel(1, 0), Rgb([250, 250, 250]));
        assert_eq!(*recolored.get_pixel(2, 0), BLACK);
    }

    #[test]
    fn grayscale_masks_are_expanded_before_recoloring() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([255])));
        let options = RecolorOptions {
            replacement: MAGENTA,
            ..Default::default()
        };
        assert_eq!(*recolor_image(&gray, &options).to_rgb8().get_pixel(0, 0), MAGENTA);
    }

    #[test]
    fn tail_keeps_the_last_components() {
        let path = Path::new("/data/compare/membrane/exp0001/cell/epoch05/img.png");
        assert_eq!(
            path_tail(path, 3),
            PathBuf::from("cell/epoch05/img.png")
        );
        assert_eq!(
            path_tail(Path::new("/img.png"), 5),
            PathBuf::from("img.png")
        );
    }

    #[test]
    fn recolor_all_mirrors_or_tails_paths() {
        let (input, output) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, WHITE));
        imageops::save_png(&image, &input.path().join("a/b/c.png")).unwrap();

        let summary = recolor_all(input.path(), output.path(), &RecolorOptions::default()).unwrap();
        assert_eq!(summary.processed(), 1);
        let written = imageops::decode(&output.path().join("a/b/c.png")).unwrap();
        assert!(written.to_rgb8().pixels().all(|p| *p == CYAN));

        let tailed = TempDir::new().unwrap();
        let options = RecolorOptions {
            tail: Some(2),
            ..Default::default()
        };
        recolor_all(input.path(), tailed.path(), &options).unwrap();
        assert!(tailed.path().join("b/c.png").is_file());
    }

    #[test]
    fn colliding_tails_keep_the_first_input() {
        let (input, output) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let dirs = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for (i, dir) in dirs.iter().enumerate() {
            // each input is recognisable by its red channel
            let image = RgbImage::from_pixel(1, 1, Rgb([i as u8, 0, 0]));
            imageops::save_png(
                &DynamicImage::ImageRgb8(image),
                &input.path().join(dir).join("x.png"),
            )
            .unwrap();
        }

        let options = RecolorOptions {
            tail: Some(1),
            ..Default::default()
        };
        for _ in 0..2 {
            let summary = recolor_all(input.path(), output.path(), &options).unwrap();
            assert_eq!(summary.processed(), 1);
            assert_eq!(summary.skipped(), dirs.len() - 1);
            assert!(
                summary
                    .skipped_reasons()
                    .all(|(_, reason)| matches!(reason, Error::OutputCollision { .. }))
            );

            let written = imageops::decode(&output.path().join("x.png")).unwrap().to_rgb8();
            assert_eq!(*written.get_pixel(0, 0), Rgb([0, 0, 0]));
        }
    }
}
