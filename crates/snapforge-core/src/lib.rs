//! Snapforge Core - Image transform pipeline
//!
//! This crate provides the computational core of Snapforge: decoding,
//! geometric mapping, colour filters, sharpening, vignette, social card
//! composition, icon container encoding and the batch orchestrator that
//! sequences them.

pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod enhance;
pub mod filter;
pub mod pipeline;
pub mod preview;
pub mod segment;
pub mod social;
pub mod transform;

pub use config::PipelineConfig;
pub use decode::{decode_image, DecodeError, FilterType, Raster};
pub use encode::{encode_ico, encode_raster, wrap_icon, EncodeError, TargetFormat};
pub use filter::{compose_filters, ColorOp, Preset};
pub use pipeline::{
    output_filename, BatchReport, Delivery, EncodedOutput, Mode, Operation,
    OperationDescriptor, Pipeline, PipelineError, SourceFile, Stage,
};
pub use preview::Debouncer;
pub use social::{SocialBackground, SocialCard, SocialFit, SocialStyle, SocialTemplate};
pub use transform::{CropRegion, GeometryError, ResizeSpec};

/// Colour and detail sliders of the enhance mode.
///
/// Brightness, contrast and saturation are percentages where 100 is
/// neutral; sharpen and vignette are strengths where 0 is off.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentSet {
    /// Brightness (0 to 200)
    pub brightness: f32,
    /// Contrast (0 to 200)
    pub contrast: f32,
    /// Saturation (0 to 200)
    pub saturation: f32,
    /// Sharpen strength (0 to 100)
    pub sharpen: f32,
    /// Vignette opacity (0 to 100)
    pub vignette: f32,
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            sharpen: 0.0,
            vignette: 0.0,
        }
    }
}

impl AdjustmentSet {
    /// Create a new AdjustmentSet with neutral values
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy with every field clamped to its range. NaN maps to the
    /// field's neutral value.
    pub fn clamped(&self) -> Self {
        fn clamp(v: f32, max: f32, neutral: f32) -> f32 {
            if v.is_nan() {
                neutral
            } else {
                v.clamp(0.0, max)
            }
        }
        Self {
            brightness: clamp(self.brightness, 200.0, 100.0),
            contrast: clamp(self.contrast, 200.0, 100.0),
            saturation: clamp(self.saturation, 200.0, 100.0),
            sharpen: clamp(self.sharpen, 100.0, 0.0),
            vignette: clamp(self.vignette, 100.0, 0.0),
        }
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
