//! Background segmentation compositing.
//!
//! The segmentation model itself is an external service behind the
//! [`Segmenter`] trait. It returns a same-size raster in which background
//! pixels are transparent; this module composites that subject either on
//! its own (background removal) or over a blurred, darkened copy of the
//! original (portrait mode).
//!
//! Segmentation is slow, so a [`SingleFlight`] gate refuses to start a
//! second run for an image that already has one outstanding.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composite::composite_layer;
use crate::decode::{decode_image, Raster};
use crate::encode::encode_png;
use crate::filter::{scale_brightness, wide_blur};
use crate::pipeline::{EncodedOutput, PipelineError};

const PORTRAIT_SIGMA: f32 = 15.0;
const PORTRAIT_BRIGHTNESS: f32 = 0.9;

/// Errors from the segmentation step.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// The external service failed or was unreachable.
    #[error("Segmentation service failed: {0}")]
    Service(String),

    /// The service returned a raster of the wrong size.
    #[error("Segmentation result is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// A segmentation for this image is already running.
    #[error("Segmentation already in progress for {0}")]
    InFlight(String),
}

/// External background segmentation.
pub trait Segmenter {
    /// Return `source` with its background made transparent.
    fn segment(&mut self, source: &Raster) -> Result<Raster, SegmentError>;
}

/// What to put behind the segmented subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundEffect {
    /// Transparent background.
    Remove,
    /// Original image blurred and darkened behind the subject.
    Portrait,
}

impl BackgroundEffect {
    /// Prefix added to the source file name of the output.
    pub fn filename_prefix(self) -> &'static str {
        match self {
            BackgroundEffect::Remove => "nobg_",
            BackgroundEffect::Portrait => "portrait_",
        }
    }
}

/// Combine a segmented `subject` with its `original`.
///
/// # Errors
///
/// Returns `SegmentError::DimensionMismatch` if the two differ in size.
pub fn composite_segmentation(
    original: &Raster,
    subject: &Raster,
    effect: BackgroundEffect,
) -> Result<Raster, SegmentError> {
    if (original.width, original.height) != (subject.width, subject.height) {
        return Err(SegmentError::DimensionMismatch {
            width: original.width,
            height: original.height,
            actual_width: subject.width,
            actual_height: subject.height,
        });
    }

    match effect {
        BackgroundEffect::Remove => Ok(subject.clone()),
        BackgroundEffect::Portrait => {
            let mut backdrop = wide_blur(original.clone(), PORTRAIT_SIGMA);
            scale_brightness(&mut backdrop, PORTRAIT_BRIGHTNESS);
            composite_layer(&mut backdrop, subject);
            Ok(backdrop)
        }
    }
}

/// Tracks which images have a segmentation outstanding.
#[derive(Debug, Default)]
pub struct SingleFlight {
    in_flight: HashSet<String>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as running.
    ///
    /// # Errors
    ///
    /// Returns `SegmentError::InFlight` if `key` is already running.
    pub fn try_begin(&mut self, key: &str) -> Result<(), SegmentError> {
        if !self.in_flight.insert(key.to_string()) {
            return Err(SegmentError::InFlight(key.to_string()));
        }
        Ok(())
    }

    /// Mark `key` as finished. Unknown keys are ignored.
    pub fn finish(&mut self, key: &str) {
        self.in_flight.remove(key);
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }
}

/// Decode, segment, composite and encode one image as PNG.
///
/// The gate entry for `name` is released whether or not the run succeeds.
#[tracing::instrument(skip(segmenter, gate, bytes), fields(bytes = bytes.len()))]
pub fn run_segmentation<S: Segmenter>(
    segmenter: &mut S,
    gate: &mut SingleFlight,
    name: &str,
    bytes: &[u8],
    effect: BackgroundEffect,
) -> Result<EncodedOutput, PipelineError> {
    gate.try_begin(name)?;
    let result = segment_and_encode(segmenter, name, bytes, effect);
    gate.finish(name);

    if let Err(err) = &result {
        tracing::warn!(name, stage = %err.stage(), error = %err, "segmentation failed");
    }
    result
}

fn segment_and_encode<S: Segmenter>(
    segmenter: &mut S,
    name: &str,
    bytes: &[u8],
    effect: BackgroundEffect,
) -> Result<EncodedOutput, PipelineError> {
    let original = decode_image(bytes)?;
    let subject = segmenter.segment(&original)?;
    let composed = composite_segmentation(&original, &subject, effect)?;
    tracing::debug!(?effect, "segmentation composited");

    Ok(EncodedOutput {
        filename: format!("{}{name}", effect.filename_prefix()),
        bytes: encode_png(&composed)?,
        width: composed.width,
        height: composed.height,
    })
}
