//! Background segmentation bindings.
//!
//! The segmentation model runs in JavaScript (it is asynchronous and may
//! call out to the network). These bindings provide the single-flight gate
//! and the compositing step around it:
//!
//! ```typescript
//! gate.try_begin(file.name);
//! try {
//!   const subject = decode_image(await removeBackground(bytes));
//!   const out = composite_segmentation(original, subject, 'portrait');
//!   download(encode_image(out, 'png', 1), segmentation_filename(file.name, 'portrait'));
//! } finally {
//!   gate.finish(file.name);
//! }
//! ```

use snapforge_core::segment::{self, BackgroundEffect, SingleFlight};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsRaster};

fn parse_effect(effect: &str) -> Result<BackgroundEffect, String> {
    match effect.trim().to_ascii_lowercase().as_str() {
        "remove" | "nobg" => Ok(BackgroundEffect::Remove),
        "portrait" => Ok(BackgroundEffect::Portrait),
        other => Err(format!("Unknown background effect: {other}")),
    }
}

/// Refuses to start a second segmentation for the same image.
#[wasm_bindgen]
pub struct JsSegmentationGate {
    inner: SingleFlight,
}

#[wasm_bindgen]
impl JsSegmentationGate {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsSegmentationGate {
        JsSegmentationGate {
            inner: SingleFlight::new(),
        }
    }

    /// Claim `name`; throws if a run for it is already outstanding.
    pub fn try_begin(&mut self, name: &str) -> Result<(), JsValue> {
        self.inner.try_begin(name).map_err(to_js_error)
    }

    /// Release `name`.
    pub fn finish(&mut self, name: &str) {
        self.inner.finish(name);
    }

    pub fn is_in_flight(&self, name: &str) -> bool {
        self.inner.is_in_flight(name)
    }
}

impl Default for JsSegmentationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine the original raster with the segmented subject.
///
/// `effect` is `"remove"` (transparent background) or `"portrait"`
/// (blurred, darkened original behind the subject).
#[wasm_bindgen]
pub fn composite_segmentation(
    original: &JsRaster,
    subject: &JsRaster,
    effect: &str,
) -> Result<JsRaster, JsValue> {
    let effect = parse_effect(effect).map_err(to_js_error)?;
    segment::composite_segmentation(original.raster(), subject.raster(), effect)
        .map(JsRaster::from_raster)
        .map_err(to_js_error)
}

/// Download name for a segmentation result: `nobg_<name>` or `portrait_<name>`.
#[wasm_bindgen]
pub fn segmentation_filename(name: &str, effect: &str) -> Result<String, JsValue> {
    let effect = parse_effect(effect).map_err(to_js_error)?;
    Ok(format!("{}{name}", effect.filename_prefix()))
}
