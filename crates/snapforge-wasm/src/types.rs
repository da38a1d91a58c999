//! WASM-compatible wrapper types for raster data.
//!
//! This module provides JavaScript-friendly types that wrap the core Snapforge
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use snapforge_core::decode::{FilterType, Raster};
use snapforge_core::encode::TargetFormat;
use wasm_bindgen::prelude::*;

/// An RGBA raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`; the same layout can be fed
/// straight into `new ImageData(...)`.
#[wasm_bindgen]
pub struct JsRaster {
    inner: Raster,
}

#[wasm_bindgen]
impl JsRaster {
    /// Create a raster from dimensions and RGBA pixel data.
    ///
    /// Fails if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(JsRaster {
            inner: Raster::new(width, height, pixels),
        })
    }

    /// Get the raster width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the raster height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRaster {
    pub(crate) fn from_raster(raster: Raster) -> Self {
        Self { inner: raster }
    }

    pub(crate) fn raster(&self) -> &Raster {
        &self.inner
    }
}

/// Convert a u8 filter value to the core FilterType enum.
///
/// 0 = Nearest, 1 = Bilinear, 2 = Lanczos3; anything else is Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

/// Parse a format name or MIME type (`"png"`, `"image/png"`, `"jpg"`, ...).
pub(crate) fn parse_format(name: &str) -> Option<TargetFormat> {
    let name = name.trim().to_ascii_lowercase();
    let short = name.strip_prefix("image/").unwrap_or(&name);
    match short {
        "jpeg" | "jpg" => Some(TargetFormat::Jpeg),
        "png" => Some(TargetFormat::Png),
        "webp" => Some(TargetFormat::Webp),
        "bmp" => Some(TargetFormat::Bmp),
        "ico" | "x-icon" | "vnd.microsoft.icon" => Some(TargetFormat::Ico),
        _ => None,
    }
}

/// Convert any displayable error to a JS string value.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
