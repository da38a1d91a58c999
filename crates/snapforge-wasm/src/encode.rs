//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode a raster as JPEG, PNG, WebP, BMP or ICO
//! - [`encode_ico`] - Encode a raster as a single-image icon
//! - [`wrap_icon`] - Wrap an already-encoded PNG payload as an icon
//!
//! # Example
//!
//! ```typescript
//! const jpeg = encode_image(raster, 'image/jpeg', 0.92);
//! const ico = encode_ico(raster);
//! ```

use crate::types::{parse_format, to_js_error, JsRaster};
use snapforge_core::encode;
use wasm_bindgen::prelude::*;

/// Encode a raster.
///
/// `format` is a name or MIME type; `quality` in (0, 1] is used by JPEG only.
///
/// # Errors
///
/// Returns an error for unknown formats, quality outside (0, 1], or codec
/// failures.
#[wasm_bindgen]
pub fn encode_image(image: &JsRaster, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let target = parse_format(format)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown output format: {format}")))?;
    encode::encode_raster(image.raster(), target, quality).map_err(to_js_error)
}

/// Encode a raster as an icon with an embedded PNG.
#[wasm_bindgen]
pub fn encode_ico(image: &JsRaster) -> Result<Vec<u8>, JsValue> {
    encode::encode_ico(image.raster()).map_err(to_js_error)
}

/// Wrap an encoded PNG payload (e.g. from `canvas.toBlob`) as an icon.
#[wasm_bindgen]
pub fn wrap_icon(payload: &[u8], width: u32, height: u32) -> Vec<u8> {
    encode::wrap_icon(payload, width, height)
}
