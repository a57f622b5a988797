use image::{GenericImageView, RgbaImage, imageops::FilterType};
use log::debug;
use rand::Rng;

use crate::config::{ExtractOptions, WORKING_WIDTH};
use crate::error::PaletteError;
use crate::extract::{PaletteColor, PalettePair, extract_palette_with_rng, extract_palettes_with_rng};

/// Decode an encoded image (PNG, JPEG, ...) into RGBA, shrunk so it is at most
/// [`WORKING_WIDTH`] pixels wide. Aspect ratio is kept; narrower images are left alone.
pub fn decode_working_rgba(encoded: &[u8]) -> Result<RgbaImage, PaletteError> {
    let img = image::load_from_memory(encoded)?;
    let (w, h) = img.dimensions();

    let working = if w > WORKING_WIDTH {
        let ratio = WORKING_WIDTH as f32 / w as f32;
        let new_h = ((h as f32) * ratio).round().max(1.0) as u32;
        debug!("downscaling {w}x{h} to {WORKING_WIDTH}x{new_h}");
        img.resize_exact(WORKING_WIDTH, new_h, FilterType::Triangle)
    } else {
        img
    };

    Ok(working.to_rgba8())
}

/// Decode `encoded` and extract a palette from it.
pub fn extract_palette_bytes_with_rng<R: Rng + ?Sized>(
    encoded: &[u8],
    options: &ExtractOptions,
    rng: &mut R,
) -> Result<Vec<PaletteColor>, PaletteError> {
    let rgba = decode_working_rgba(encoded)?;
    let (w, h) = rgba.dimensions();
    extract_palette_with_rng(rgba.as_raw(), w, h, options, rng)
}

pub fn extract_palette_bytes(encoded: &[u8], options: &ExtractOptions) -> Result<Vec<PaletteColor>, PaletteError> {
    extract_palette_bytes_with_rng(encoded, options, &mut rand::rng())
}

/// Decode once, then extract both the natural and the artwork palette.
pub fn extract_palettes_bytes_with_rng<R: Rng + ?Sized>(
    encoded: &[u8],
    color_count: u32,
    rng: &mut R,
) -> Result<PalettePair, PaletteError> {
    let rgba = decode_working_rgba(encoded)?;
    let (w, h) = rgba.dimensions();
    extract_palettes_with_rng(rgba.as_raw(), w, h, color_count, rng)
}

pub fn extract_palettes_bytes(encoded: &[u8], color_count: u32) -> Result<PalettePair, PaletteError> {
    extract_palettes_bytes_with_rng(encoded, color_count, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba(px));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn wide_images_are_downscaled() {
        let rgba = decode_working_rgba(&png(360, 90, [10, 20, 30, 255])).unwrap();
        assert_eq!(rgba.dimensions(), (180, 45));
    }

    #[test]
    fn narrow_images_keep_their_size() {
        let rgba = decode_working_rgba(&png(40, 30, [10, 20, 30, 255])).unwrap();
        assert_eq!(rgba.dimensions(), (40, 30));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let err = decode_working_rgba(b"not an image").unwrap_err();
        assert!(matches!(err, PaletteError::Image(_)));
    }
}
