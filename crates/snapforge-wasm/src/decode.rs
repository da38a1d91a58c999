//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, 1280, 1);
//! ```

use crate::types::{filter_from_u8, to_js_error, JsRaster};
use snapforge_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG, PNG, WebP or BMP bytes into an RGBA raster.
///
/// EXIF orientation is applied, matching what an `<img>` element shows.
///
/// # Errors
///
/// Returns an error if the format is not recognized, the data is corrupted,
/// or the image has zero size.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRaster, JsValue> {
    decode::decode_image(bytes)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}

/// Resize a raster to exact dimensions.
///
/// `filter`: 0=Nearest, 1=Bilinear, 2=Lanczos3.
#[wasm_bindgen]
pub fn resize(image: &JsRaster, width: u32, height: u32, filter: u8) -> Result<JsRaster, JsValue> {
    decode::resize(image.raster(), width, height, filter_from_u8(filter))
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}

/// Resize a raster so its longest edge is at most `max_edge`, keeping the
/// aspect ratio. Smaller rasters are returned unchanged.
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsRaster, max_edge: u32, filter: u8) -> Result<JsRaster, JsValue> {
    decode::resize_to_fit(image.raster(), max_edge, filter_from_u8(filter))
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}
