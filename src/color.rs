//! reference colors used to tag and classify masks.
//!
//! all colors are in RGB channel order, which is the only order used in memory.

use image::Rgb;

use crate::error::{Error, Result};

/// tags Source-A's mask.
pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);
/// tags Source-B's mask.
pub const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const NAMED: &[(&str, Rgb<u8>)] = &[
    ("cyan", CYAN),
    ("magenta", MAGENTA),
    ("white", WHITE),
    ("black", BLACK),
    ("red", Rgb([255, 0, 0])),
    ("green", Rgb([0, 255, 0])),
    ("blue", Rgb([0, 0, 255])),
];

/// parses either a color name or a decimal `R,G,B` triple.
pub fn parse_color(s: &str) -> Result<Rgb<u8>> {
    let s = s.trim();

    if let Some((_, color)) = NAMED.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
        return Ok(*color);
    }

    let channels: Vec<u8> = s
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidColor(s.to_string()))?;

    match channels[..] {
        [r, g, b] => Ok(Rgb([r, g, b])),
        _ => Err(Error::InvalidColor(s.to_string())),
    }
}

/// true iff every channel of `pixel` is within `tolerance` of `reference` (inclusive).
#[inline]
pub fn within_tolerance(pixel: &Rgb<u8>, reference: &Rgb<u8>, tolerance: u8) -> bool {
    pixel
        .0
        .iter()
        .zip(reference.0.iter())
        .all(|(p, r)| p.abs_diff(*r) <= tolerance)
}
