//! Per-image pipeline errors.

use std::fmt;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::segment::SegmentError;
use crate::transform::GeometryError;

/// Stage of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Geometry,
    Encode,
    Segment,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Geometry => "geometry",
            Stage::Encode => "encode",
            Stage::Segment => "segment",
            Stage::Deliver => "deliver",
        };
        f.write_str(name)
    }
}

/// Any failure while processing a single image.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// The delivery collaborator rejected the output.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode(_) => Stage::Decode,
            PipelineError::Geometry(_) => Stage::Geometry,
            PipelineError::Encode(_) => Stage::Encode,
            PipelineError::Segment(_) => Stage::Segment,
            PipelineError::Delivery(_) => Stage::Deliver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_attribution() {
        let err: PipelineError = DecodeError::InvalidFormat.into();
        assert_eq!(err.stage(), Stage::Decode);

        let err: PipelineError = GeometryError::EmptyRegion {
            width: 0,
            height: 4,
        }
        .into();
        assert_eq!(err.stage(), Stage::Geometry);

        let err: PipelineError = EncodeError::InvalidQuality(2.0).into();
        assert_eq!(err.stage(), Stage::Encode);

        let err = PipelineError::Delivery("disk full".into());
        assert_eq!(err.stage(), Stage::Deliver);
        assert_eq!(err.to_string(), "Delivery failed: disk full");
    }

    #[test]
    fn test_transparent_messages() {
        let err: PipelineError = DecodeError::InvalidFormat.into();
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
        assert_eq!(Stage::Geometry.to_string(), "geometry");
    }
}
