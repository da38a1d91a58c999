//! Pipeline WASM bindings.
//!
//! Descriptors and configuration cross the boundary as plain JS objects and
//! are deserialized with `serde-wasm-bindgen`:
//!
//! ```typescript
//! const pipeline = new JsPipeline({ exportQuality: 0.92 });
//! const out = pipeline.process('photo.jpg', bytes, {
//!   mode: 'social',
//!   template: 'story',
//!   style: { paddingPercent: 10, background: 'solid-black' },
//!   fit: 'contain',
//!   format: 'png',
//! });
//! download(out.bytes, out.filename);
//! ```

use js_sys::{Array, Function, Reflect, Uint8Array};
use serde::Serialize;
use snapforge_core::pipeline::{
    BatchReport, Delivery, EncodedOutput, Operation, OperationDescriptor, Pipeline, SourceFile,
};
use snapforge_core::PipelineConfig;
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsRaster};

/// An encoded output handed back to JavaScript.
#[wasm_bindgen]
pub struct JsEncodedOutput {
    inner: EncodedOutput,
}

#[wasm_bindgen]
impl JsEncodedOutput {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.inner.filename.clone()
    }

    /// Encoded bytes (copied into a `Uint8Array`).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

/// Per-image entry of the batch summary returned to JavaScript.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeSummary {
    name: String,
    filename: Option<String>,
    stage: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    succeeded: usize,
    failed: usize,
    outcomes: Vec<OutcomeSummary>,
}

impl From<&BatchReport> for BatchSummary {
    fn from(report: &BatchReport) -> Self {
        let outcomes = report
            .outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(filename) => OutcomeSummary {
                    name: o.name.clone(),
                    filename: Some(filename.clone()),
                    stage: None,
                    error: None,
                },
                Err(err) => OutcomeSummary {
                    name: o.name.clone(),
                    filename: None,
                    stage: Some(err.stage().to_string()),
                    error: Some(err.to_string()),
                },
            })
            .collect();
        Self {
            succeeded: report.succeeded(),
            failed: report.failed(),
            outcomes,
        }
    }
}

/// Delivery through a JS callback `(bytes: Uint8Array, filename: string) => void`.
struct CallbackDelivery<'a> {
    callback: &'a Function,
}

impl Delivery for CallbackDelivery<'_> {
    fn deliver(&mut self, output: EncodedOutput) -> Result<(), String> {
        let bytes = Uint8Array::from(output.bytes.as_slice());
        self.callback
            .call2(&JsValue::NULL, &bytes, &JsValue::from_str(&output.filename))
            .map(|_| ())
            .map_err(|e| {
                e.as_string()
                    .unwrap_or_else(|| "delivery callback threw".to_string())
            })
    }
}

/// The transform pipeline.
#[wasm_bindgen]
pub struct JsPipeline {
    inner: Pipeline,
}

#[wasm_bindgen]
impl JsPipeline {
    /// Create a pipeline. `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsPipeline, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        Ok(JsPipeline {
            inner: Pipeline::new(config),
        })
    }

    /// Apply an operation (`{ mode: ..., ... }`) to a decoded raster.
    pub fn transform(&self, image: &JsRaster, operation: JsValue) -> Result<JsRaster, JsValue> {
        let operation: Operation = serde_wasm_bindgen::from_value(operation).map_err(to_js_error)?;
        self.inner
            .transform(image.raster().clone(), &operation)
            .map(JsRaster::from_raster)
            .map_err(to_js_error)
    }

    /// Decode, transform and encode one file.
    pub fn process(
        &self,
        name: &str,
        bytes: &[u8],
        descriptor: JsValue,
    ) -> Result<JsEncodedOutput, JsValue> {
        let descriptor: OperationDescriptor =
            serde_wasm_bindgen::from_value(descriptor).map_err(to_js_error)?;
        let file = SourceFile::new(name, bytes.to_vec());
        self.inner
            .process(&file, &descriptor)
            .map(|inner| JsEncodedOutput { inner })
            .map_err(to_js_error)
    }

    /// Process `files` (`{ name, bytes }[]`) one after another, calling
    /// `deliver(bytes, filename)` for each success.
    ///
    /// Returns `{ succeeded, failed, outcomes }`. Failures are also logged
    /// to the browser console.
    pub fn run_batch(
        &self,
        files: Array,
        descriptor: JsValue,
        deliver: &Function,
    ) -> Result<JsValue, JsValue> {
        let descriptor: OperationDescriptor =
            serde_wasm_bindgen::from_value(descriptor).map_err(to_js_error)?;

        let inputs = files
            .iter()
            .map(|entry| source_file_from_js(&entry))
            .collect::<Result<Vec<_>, _>>()?;

        let mut delivery = CallbackDelivery { callback: deliver };
        let report = self.inner.run_batch(&inputs, &descriptor, &mut delivery);

        for (name, err) in report.failures() {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "{name}: {} failed: {err}",
                err.stage()
            )));
        }

        serde_wasm_bindgen::to_value(&BatchSummary::from(&report)).map_err(to_js_error)
    }
}

fn source_file_from_js(entry: &JsValue) -> Result<SourceFile, JsValue> {
    let name = Reflect::get(entry, &JsValue::from_str("name"))?
        .as_string()
        .ok_or_else(|| JsValue::from_str("file entry is missing a string `name`"))?;
    let bytes = Reflect::get(entry, &JsValue::from_str("bytes"))?;
    if !bytes.is_instance_of::<Uint8Array>() {
        return Err(JsValue::from_str(&format!(
            "file entry `{name}` is missing a Uint8Array `bytes`"
        )));
    }
    Ok(SourceFile::new(name, Uint8Array::new(&bytes).to_vec()))
}
