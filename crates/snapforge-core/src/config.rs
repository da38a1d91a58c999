//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Tunables shared by every stage of a [`crate::Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Quality (0.0-1.0] used by every mode except compress.
    pub export_quality: f32,
    /// Resampling filter for resize and for scaling the social card image.
    pub resize_filter: FilterType,
    /// Resampling filter for the blurred social backdrop.
    pub background_filter: FilterType,
    /// Quiescence window of the live-preview debouncer, in milliseconds.
    pub debounce_ms: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            export_quality: 0.92,
            resize_filter: FilterType::Lanczos3,
            background_filter: FilterType::Bilinear,
            debounce_ms: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.export_quality, 0.92);
        assert_eq!(config.resize_filter, FilterType::Lanczos3);
        assert_eq!(config.background_filter, FilterType::Bilinear);
        assert_eq!(config.debounce_ms, 100.0);
    }
}
