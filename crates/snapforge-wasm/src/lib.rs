//! Snapforge WASM - WebAssembly bindings for Snapforge
//!
//! This crate exposes the snapforge-core transform pipeline to a browser
//! front end.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible raster wrapper and argument parsing
//! - `decode` - Image decoding and resampling
//! - `encode` - Raster and icon encoding
//! - `pipeline` - Single-image transforms and batch runs with a delivery callback
//! - `preview` - Debounced live-preview state
//! - `segment` - Background segmentation compositing and single-flight gate
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPipeline } from '@snapforge/wasm';
//!
//! await init();
//!
//! const pipeline = new JsPipeline();
//! const files = await Promise.all(inputs.map(async (f) => ({
//!   name: f.name,
//!   bytes: new Uint8Array(await f.arrayBuffer()),
//! })));
//! const report = pipeline.run_batch(
//!   files,
//!   { mode: 'resize', width: 800, maintainRatio: true, format: 'jpeg' },
//!   (bytes, filename) => download(bytes, filename),
//! );
//! console.log(`${report.succeeded} done, ${report.failed} failed`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod pipeline;
mod preview;
mod segment;
mod types;

// Re-export public types
pub use decode::{decode_image, resize, resize_to_fit};
pub use encode::{encode_ico, encode_image, wrap_icon};
pub use pipeline::{JsEncodedOutput, JsPipeline};
pub use preview::JsPreviewState;
pub use segment::{composite_segmentation, segmentation_filename, JsSegmentationGate};
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
