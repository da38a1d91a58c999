//! Pipeline orchestrator.
//!
//! Sequences the stages for each source image according to its
//! [`Operation`]:
//!
//! | mode | stages |
//! |---|---|
//! | convert | identity geometry, encode in the target format |
//! | compress | identity geometry, encode at the requested quality |
//! | enhance | filters, sharpen, vignette, encode |
//! | resize | geometry (resize), encode |
//! | crop | geometry (crop), encode |
//! | social | social card compositor, encode |
//!
//! Batches run strictly one image at a time. A failure aborts only the
//! image it belongs to and is recorded in the [`BatchReport`].

mod descriptor;
mod error;


pub use descriptor::{output_filename, Mode, Operation, OperationDescriptor};
pub use error::{PipelineError, Stage};

use crate::config::PipelineConfig;
use crate::decode::{decode_image, Raster};
use crate::encode::{encode_raster, EncodeError, TargetFormat};
use crate::enhance::enhance;
use crate::social::compose_social_card;
use crate::transform::{plan_geometry, render_geometry, GeometryPlan};

/// A source file as handed over by the intake collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// An encoded result ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    /// Suggested download name.
    pub filename: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Receives finished outputs (download, disk, upload...).
pub trait Delivery {
    /// Accept one output. An `Err` marks that image as failed.
    fn deliver(&mut self, output: EncodedOutput) -> Result<(), String>;
}

/// Collects outputs in memory.
impl Delivery for Vec<EncodedOutput> {
    fn deliver(&mut self, output: EncodedOutput) -> Result<(), String> {
        self.push(output);
        Ok(())
    }
}

/// Result for one input of a batch.
#[derive(Debug)]
pub struct ImageOutcome {
    pub name: String,
    /// Delivered filename, or the error that stopped this image.
    pub result: Result<String, PipelineError>,
}

/// Per-image outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ImageOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Failures as `(name, error)` pairs.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }
}

/// Stateless orchestrator; holds only configuration.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reject descriptors that cannot succeed for any image, before decoding.
    pub fn validate(&self, descriptor: &OperationDescriptor) -> Result<(), PipelineError> {
        let mode = descriptor.mode();
        if descriptor.format == TargetFormat::Ico && mode != Mode::Convert {
            return Err(EncodeError::UnsupportedFormat {
                format: TargetFormat::Ico,
                context: mode.as_str(),
            }
            .into());
        }
        if let Operation::Crop {
            region: Some(region),
        } = &descriptor.operation
        {
            region.validate_size()?;
        }
        Ok(())
    }

    /// Build the destination raster for `operation`.
    ///
    /// Takes ownership of the source; modes that do not touch pixels hand
    /// it straight through.
    pub fn transform(&self, source: Raster, operation: &Operation) -> Result<Raster, PipelineError> {
        let raster = match operation {
            Operation::Convert | Operation::Compress { .. } => {
                let plan = plan_geometry(source.width, source.height, None, None)?;
                render_owned(source, &plan, &self.config)?
            }
            Operation::Enhance {
                preset,
                adjustments,
            } => enhance(source, *preset, adjustments),
            Operation::Resize(spec) => {
                let plan = plan_geometry(source.width, source.height, None, Some(spec))?;
                render_owned(source, &plan, &self.config)?
            }
            Operation::Crop { region } => {
                let plan = plan_geometry(source.width, source.height, region.as_ref(), None)?;
                render_owned(source, &plan, &self.config)?
            }
            Operation::Social(card) => compose_social_card(&source, card, &self.config)?,
        };
        tracing::debug!(
            mode = operation.mode().as_str(),
            width = raster.width,
            height = raster.height,
            "transformed"
        );
        Ok(raster)
    }

    /// Encode a destination raster per the descriptor's format and mode.
    pub fn encode(
        &self,
        raster: &Raster,
        descriptor: &OperationDescriptor,
    ) -> Result<Vec<u8>, PipelineError> {
        self.validate(descriptor)?;
        let quality = match descriptor.operation {
            Operation::Compress { quality } => quality,
            _ => self.config.export_quality,
        };
        let bytes = encode_raster(raster, descriptor.format, quality)?;
        tracing::debug!(format = ?descriptor.format, quality, len = bytes.len(), "encoded");
        Ok(bytes)
    }

    /// Decode, transform and encode one file.
    #[tracing::instrument(skip_all, fields(name = %file.name, mode = descriptor.mode().as_str()))]
    pub fn process(
        &self,
        file: &SourceFile,
        descriptor: &OperationDescriptor,
    ) -> Result<EncodedOutput, PipelineError> {
        self.validate(descriptor)?;

        let source = decode_image(&file.bytes)?;
        tracing::debug!(width = source.width, height = source.height, "decoded");

        let raster = self.transform(source, &descriptor.operation)?;
        let bytes = self.encode(&raster, descriptor)?;

        Ok(EncodedOutput {
            filename: output_filename(&file.name, descriptor.mode(), descriptor.format),
            bytes,
            width: raster.width,
            height: raster.height,
        })
    }

    /// Process every input in order and hand each output to `delivery`.
    ///
    /// Never fails as a whole: every input gets an [`ImageOutcome`].
    pub fn run_batch<D: Delivery + ?Sized>(
        &self,
        inputs: &[SourceFile],
        descriptor: &OperationDescriptor,
        delivery: &mut D,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for file in inputs {
            let result = self.process(file, descriptor).and_then(|output| {
                let filename = output.filename.clone();
                delivery
                    .deliver(output)
                    .map(|()| filename)
                    .map_err(PipelineError::Delivery)
            });

            if let Err(err) = &result {
                tracing::warn!(
                    name = %file.name,
                    stage = %err.stage(),
                    error = %err,
                    "image failed"
                );
            }
            report.outcomes.push(ImageOutcome {
                name: file.name.clone(),
                result,
            });
        }

        tracing::debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }
}

fn render_owned(
    source: Raster,
    plan: &GeometryPlan,
    config: &PipelineConfig,
) -> Result<Raster, PipelineError> {
    if plan.is_identity(source.width, source.height) {
        return Ok(source);
    }
    Ok(render_geometry(&source, plan, config.resize_filter)?)
}
