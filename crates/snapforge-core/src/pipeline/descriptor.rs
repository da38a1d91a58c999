//! Operation descriptors and output naming.

use serde::{Deserialize, Serialize};

use crate::encode::TargetFormat;
use crate::filter::Preset;
use crate::social::SocialCard;
use crate::transform::{CropRegion, ResizeSpec};
use crate::AdjustmentSet;

/// Transform mode, used for stage selection and output naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Convert,
    Compress,
    Enhance,
    Resize,
    Crop,
    Social,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Convert => "convert",
            Mode::Compress => "compress",
            Mode::Enhance => "enhance",
            Mode::Resize => "resize",
            Mode::Crop => "crop",
            Mode::Social => "social",
        }
    }

    /// Suffix appended to the file stem of outputs.
    pub fn suffix(self) -> &'static str {
        match self {
            Mode::Convert => "_converted",
            Mode::Compress => "_compressed",
            Mode::Enhance => "_enhanced",
            Mode::Resize => "_resized",
            Mode::Crop => "_cropped",
            Mode::Social => "_social",
        }
    }
}

/// Mode-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Operation {
    Convert,
    Compress {
        quality: f32,
    },
    /// The only mode that applies the preset and colour sliders; the other
    /// modes leave colour untouched.
    Enhance {
        #[serde(default)]
        preset: Preset,
        #[serde(default)]
        adjustments: AdjustmentSet,
    },
    Resize(ResizeSpec),
    Crop {
        #[serde(default)]
        region: Option<CropRegion>,
    },
    Social(SocialCard),
}

impl Operation {
    pub fn mode(&self) -> Mode {
        match self {
            Operation::Convert => Mode::Convert,
            Operation::Compress { .. } => Mode::Compress,
            Operation::Enhance { .. } => Mode::Enhance,
            Operation::Resize(_) => Mode::Resize,
            Operation::Crop { .. } => Mode::Crop,
            Operation::Social(_) => Mode::Social,
        }
    }
}

/// One operation plus the output format, shared by every image of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    #[serde(flatten)]
    pub operation: Operation,
    #[serde(default)]
    pub format: TargetFormat,
}

impl OperationDescriptor {
    pub fn new(operation: Operation, format: TargetFormat) -> Self {
        Self { operation, format }
    }

    pub fn mode(&self) -> Mode {
        self.operation.mode()
    }
}

/// Suggested download name for an output.
///
/// `<stem><suffix>.<ext>`, where the stem is `name` up to its last `.` (or
/// the whole name when it has none). Icons get `<stem>.ico` with no suffix.
pub fn output_filename(name: &str, mode: Mode, format: TargetFormat) -> String {
    let stem = name.rfind('.').map_or(name, |dot| &name[..dot]);
    match format {
        TargetFormat::Ico => format!("{stem}.ico"),
        _ => format!("{stem}{}.{}", mode.suffix(), format.extension()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filename_suffixes() {
        let cases = [
            (Mode::Convert, "photo_converted.png"),
            (Mode::Compress, "photo_compressed.png"),
            (Mode::Enhance, "photo_enhanced.png"),
            (Mode::Resize, "photo_resized.png"),
            (Mode::Crop, "photo_cropped.png"),
            (Mode::Social, "photo_social.png"),
        ];
        for (mode, expected) in cases {
            assert_eq!(output_filename("photo.jpg", mode, TargetFormat::Png), expected);
        }
    }

    #[test]
    fn test_output_filename_uses_last_dot() {
        assert_eq!(
            output_filename("holiday.final.jpeg", Mode::Resize, TargetFormat::Webp),
            "holiday.final_resized.webp"
        );
    }

    #[test]
    fn test_output_filename_without_extension() {
        assert_eq!(
            output_filename("scan", Mode::Compress, TargetFormat::Jpeg),
            "scan_compressed.jpeg"
        );
    }

    #[test]
    fn test_icon_filename_has_no_suffix() {
        assert_eq!(
            output_filename("logo.png", Mode::Convert, TargetFormat::Ico),
            "logo.ico"
        );
    }

    #[test]
    fn test_operation_modes() {
        assert_eq!(Operation::Convert.mode(), Mode::Convert);
        assert_eq!(Operation::Compress { quality: 0.5 }.mode(), Mode::Compress);
        assert_eq!(Operation::Resize(ResizeSpec::width(10)).mode(), Mode::Resize);
        assert_eq!(Operation::Crop { region: None }.mode(), Mode::Crop);
        assert_eq!(Operation::Social(SocialCard::default()).mode(), Mode::Social);
    }
}
