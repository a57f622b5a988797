use thiserror::Error;

/// Why a raw pixel buffer could not be read as RGBA.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("pixel buffer is empty")]
    Empty,

    #[error("pixel buffer length {len} is not a multiple of 4 (RGBA)")]
    NotRgba { len: usize },

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch { len: usize, width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("color count must be at least 1, got {0}")]
    InvalidColorCount(u32),

    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),
}
