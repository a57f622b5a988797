use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod kmeans;
pub mod merge;
pub mod sampler;
pub mod select;

pub use config::{ExtractOptions, ModePreset, PaletteMode};
pub use decode::{
    decode_working_rgba, extract_palette_bytes, extract_palette_bytes_with_rng, extract_palettes_bytes,
    extract_palettes_bytes_with_rng,
};
pub use error::{DecodeError, PaletteError};
pub use extract::{
    PaletteColor, PalettePair, extract_palette, extract_palette_with_rng, extract_palettes_with_rng, validate_rgba,
};

// ------------------------------------------------------------
// JS bindings
// ------------------------------------------------------------

fn js_options(color_count: u32, mode: &str) -> Result<ExtractOptions, JsValue> {
    let mode: PaletteMode = mode.parse().map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(ExtractOptions::new(color_count, mode))
}

fn palette_to_js(palette: &[PaletteColor]) -> Result<Array, JsValue> {
    let out = Array::new();
    for c in palette {
        let rgb = Array::new();
        for ch in c.rgb {
            rgb.push(&JsValue::from(ch));
        }

        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("rgb"), &rgb)?;
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&c.hex))?;
        Reflect::set(&entry, &JsValue::from_str("weight"), &JsValue::from_f64(c.weight))?;
        out.push(&entry);
    }
    Ok(out)
}

/// Extract a palette from an encoded photo (PNG, JPEG, ...).
///
/// The image is decoded and reduced to the 180 px working width first.
/// `mode` is `"natural"` or `"artwork"`. Returns an array of
/// `{ rgb: [r, g, b], hex: "#RRGGBB", weight }` objects, most important first.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, color_count: u32, mode: &str) -> Result<Array, JsValue> {
    let options = js_options(color_count, mode)?;
    let palette = extract_palette_bytes(&input, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    palette_to_js(&palette)
}

/// Extract a palette from an already decoded RGBA buffer of `width × height` pixels.
#[wasm_bindgen(js_name = extractPaletteRgba)]
pub fn extract_palette_rgba_js(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    color_count: u32,
    mode: &str,
) -> Result<Array, JsValue> {
    let options = js_options(color_count, mode)?;
    let palette =
        extract_palette(&pixels, width, height, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    palette_to_js(&palette)
}
