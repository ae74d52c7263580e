use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::detection::annotate::draw_markers;
use crate::detection::mask::EdgeMask;
use crate::error::{Result, VertexError};
use crate::export;
use crate::models::Point;

const MARKER_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);
const MARKER_RADIUS: i32 = 3;

/// Data that flows through the pipeline: a point batch plus the image it came from
#[derive(Clone)]
pub struct PipelineData {
    pub points: Vec<Point>,

    /// Source raster (shared, never modified)
    pub original: Arc<RgbaImage>,

    /// Step annotations (e.g., "merge_rounds", "merge_converged")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
}

impl PipelineData {
    pub fn new(points: Vec<Point>, original: Arc<RgbaImage>) -> Self {
        Self {
            points,
            original,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetadataValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Use `output_dir`, which must be empty or not exist yet
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(VertexError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        Ok(Self { output_dir })
    }

    fn step_dir(&self, index: usize, step_name: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(format!(
            "{:02}_{}",
            index,
            step_name.to_lowercase().replace(' ', "_")
        ));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Save the raw stage inputs: ink mask and candidate overlay
    pub fn save_inputs(
        &self,
        original: &RgbaImage,
        mask: &EdgeMask,
        candidates: &[Point],
    ) -> Result<()> {
        let dir = self.step_dir(0, "input")?;
        save_image(&dir.join("mask.png"), mask.as_gray())?;
        let overlay = draw_markers(original, candidates, MARKER_RADIUS, MARKER_COLOR);
        save_image(&dir.join("candidates.png"), &overlay)?;
        tracing::debug!(dir = %dir.display(), "saved detection inputs");
        Ok(())
    }

    fn save_points(&self, index: usize, step_name: &str, data: &PipelineData) -> Result<()> {
        let dir = self.step_dir(index, step_name)?;
        let overlay = draw_markers(&data.original, &data.points, MARKER_RADIUS, MARKER_COLOR);
        save_image(&dir.join("points.png"), &overlay)?;
        std::fs::write(dir.join("points.csv"), export::to_csv_string(&data.points))?;
        tracing::debug!(dir = %dir.display(), points = data.points.len(), "saved step output");
        Ok(())
    }
}

fn save_image<P>(path: &Path, img: &image::ImageBuffer<P, Vec<u8>>) -> Result<()>
where
    P: image::Pixel<Subpixel = u8> + image::PixelWithColorType,
{
    img.save(path).map_err(|source| VertexError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Transform a point batch; steps may only merge or drop points
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Composable point pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
    /// Offset applied to debug directory numbering
    first_index: usize,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
            first_index: 1,
        }
    }

    /// Write per-step debug outputs under an existing debug configuration
    pub fn with_debug_config(mut self, debug: Option<DebugConfig>) -> Self {
        self.context.debug = debug;
        self
    }

    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent.
    pub fn with_debug(self, output_dir: PathBuf) -> Result<Self> {
        let debug = DebugConfig::new(output_dir)?;
        Ok(self.with_debug_config(Some(debug)))
    }

    /// Number debug directories starting at `index`
    pub fn starting_at(mut self, index: usize) -> Self {
        self.first_index = index;
        self
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order
    pub fn run(&self, input: PipelineData) -> Result<PipelineData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: PipelineData, num_steps: usize) -> Result<PipelineData> {
        let mut data = input;

        for (i, step) in self.steps.iter().take(num_steps).enumerate() {
            let before = data.points.len();
            tracing::info!(step = step.name(), points = before, "running step");

            data = step.process(data, &self.context)?;

            if let Some(debug) = &self.context.debug {
                debug.save_points(self.first_index + i, step.name(), &data)?;
            }
            tracing::info!(step = step.name(), before, after = data.points.len(), "step done");
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
