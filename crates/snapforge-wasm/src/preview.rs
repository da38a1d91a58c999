//! Debounced live-preview bindings.
//!
//! The front end pushes every slider change with `performance.now()` and
//! polls on each animation frame; only a settled value triggers a preview
//! recompute. Export reads the committed value, never the live one.
//!
//! ```typescript
//! const state = new JsPreviewState(100);
//! slider.oninput = () => state.push({ preset, adjustments }, performance.now());
//! function frame(now) {
//!   if (state.poll(now) !== undefined) show(state.render(previewRaster));
//!   requestAnimationFrame(frame);
//! }
//! ```

use serde::{Deserialize, Serialize};
use snapforge_core::enhance::enhance;
use snapforge_core::{AdjustmentSet, Debouncer, Preset};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsRaster};

/// Preset plus sliders, as edited in the enhance panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PreviewSettings {
    pub preset: Preset,
    pub adjustments: AdjustmentSet,
}

/// Debounced enhance settings.
#[wasm_bindgen]
pub struct JsPreviewState {
    debouncer: Debouncer<PreviewSettings>,
}

#[wasm_bindgen]
impl JsPreviewState {
    /// Create a state with neutral settings and a `window_ms` quiescence window.
    #[wasm_bindgen(constructor)]
    pub fn new(window_ms: f64) -> JsPreviewState {
        JsPreviewState {
            debouncer: Debouncer::new(PreviewSettings::default(), window_ms),
        }
    }

    /// Record new settings (`{ preset, adjustments }`) at `now_ms`.
    pub fn push(&mut self, settings: JsValue, now_ms: f64) -> Result<(), JsValue> {
        let settings: PreviewSettings =
            serde_wasm_bindgen::from_value(settings).map_err(to_js_error)?;
        self.debouncer.push(settings, now_ms);
        Ok(())
    }

    /// Returns the newly committed settings once the window has elapsed,
    /// otherwise `undefined`.
    pub fn poll(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        match self.debouncer.poll(now_ms) {
            Some(settings) => serde_wasm_bindgen::to_value(settings).map_err(to_js_error),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Settled settings used for export.
    pub fn committed(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.debouncer.committed()).map_err(to_js_error)
    }

    /// When the pending value settles, if one is pending.
    pub fn deadline(&self) -> Option<f64> {
        self.debouncer.deadline()
    }

    /// Apply the committed settings to a (preview-sized) raster.
    pub fn render(&self, image: &JsRaster) -> JsRaster {
        JsRaster::from_raster(self.render_settings(image))
    }
}

impl JsPreviewState {
    fn render_settings(&self, image: &JsRaster) -> snapforge_core::Raster {
        let settings = self.debouncer.committed();
        enhance(image.raster().clone(), settings.preset, &settings.adjustments)
    }
}
