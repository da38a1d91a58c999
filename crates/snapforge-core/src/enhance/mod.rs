//! Enhance stage: colour filters, sharpening, vignette.
//!
//! ## Stage Order
//! 1. Preset + slider colour operations ([`crate::filter`])
//! 2. Convolution sharpen (if `sharpen > 0`)
//! 3. Vignette (if `vignette > 0`), always last
//!
//! Each stage takes ownership of the previous stage's raster and hands a
//! new one on, so no stage ever reads a buffer another stage is writing.

mod sharpen;
mod vignette;

pub use sharpen::sharpen;
pub use vignette::{apply_vignette, vignette_radii};

use crate::decode::Raster;
use crate::filter::{apply_color_ops, compose_filters, Preset};
use crate::AdjustmentSet;

/// Run the full enhance stage on `source`.
pub fn enhance(source: Raster, preset: Preset, adjustments: &AdjustmentSet) -> Raster {
    let adj = adjustments.clamped();

    let ops = compose_filters(preset, &adj);
    let filtered = apply_color_ops(source, &ops);

    let sharpened = if adj.sharpen > 0.0 {
        sharpen(&filtered, adj.sharpen / 100.0)
    } else {
        filtered
    };

    apply_vignette(sharpened, adj.vignette)
}
