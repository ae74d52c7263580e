use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};

use crate::config::{DetectionParams, RenderParams};
use crate::detection::annotate::{LabelStyle, draw_numbers};
use crate::detection::clustering::MergeOutcome;
use crate::detection::corners::{CornerDetector, detector_for};
use crate::detection::mask::extract_edge_mask;
use crate::detection::ordering::order_grid;
use crate::detection::steps::{MERGE_CONVERGED, MERGE_ROUNDS};
use crate::detection::{build_merge_pipeline, build_refine_pipeline};
use crate::detection::topology::{Classification, classify_vertices};
use crate::error::{Result, VertexError};
use crate::models::{Point, Subset};
use crate::pipeline::{DebugConfig, PipelineData};

/// Read any supported raster and normalize it to RGBA8
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let reader = ImageReader::open(path)
        .map_err(|source| VertexError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| VertexError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;
    let img = reader.decode().map_err(|source| VertexError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Per-class counts of the current detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub junctions: usize,
    pub edge_centers: usize,
    pub cell_centers: usize,
    pub total: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Junctions:    {}", self.junctions)?;
        writeln!(f, "Edge centers: {}", self.edge_centers)?;
        writeln!(f, "Cell centers: {}", self.cell_centers)?;
        write!(f, "Total:        {}", self.total)
    }
}

/// Ordered and labelled output for one subset
#[derive(Debug, Clone)]
pub struct Rendering {
    pub subset: Subset,
    /// Points in reading order; label `i + 1` belongs to `ordered[i]`
    pub ordered: Vec<Point>,
    /// Annotated copy of the source, or the plain source when `ordered` is empty
    pub image: RgbaImage,
}

impl Rendering {
    pub fn count(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Everything derived from one source image, owned in one place.
///
/// Detection state is only replaced by `detect*` and `refine`; `render`
/// reads it and never writes it back.
pub struct Session {
    source_path: PathBuf,
    image: Arc<RgbaImage>,
    merged: Option<MergeOutcome>,
    points: Vec<Point>,
    classification: Option<Classification>,
    rendering: Option<Rendering>,
    debug: Option<DebugConfig>,
}

impl Session {
    /// Load an image from disk; resets all derived state
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = load_image(path)?;
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "image loaded"
        );
        Ok(Self::from_image(path, image))
    }

    /// Start a session from an already-decoded raster
    pub fn from_image(path: impl Into<PathBuf>, image: RgbaImage) -> Self {
        Self {
            source_path: path.into(),
            image: Arc::new(image),
            merged: None,
            points: Vec::new(),
            classification: None,
            rendering: None,
            debug: None,
        }
    }

    /// Write intermediate stage outputs to `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: PathBuf) -> Result<Self> {
        self.debug = Some(DebugConfig::new(dir)?);
        Ok(self)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Deduplicated points from the last detect/refine
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn merge_outcome(&self) -> Option<&MergeOutcome> {
        self.merged.as_ref()
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    pub fn rendering(&self) -> Option<&Rendering> {
        self.rendering.as_ref()
    }

    pub fn has_detection(&self) -> bool {
        self.classification.is_some()
    }

    /// Run the full detect action with the configured corner detector
    pub fn detect(&mut self, params: &DetectionParams) -> Result<&Classification> {
        let detector = detector_for(params);
        self.detect_with(detector.as_ref(), params)
    }

    /// Run the full detect action with an injected corner detector
    pub fn detect_with(
        &mut self,
        detector: &dyn CornerDetector,
        params: &DetectionParams,
    ) -> Result<&Classification> {
        params.validate()?;

        tracing::info!("extracting edge mask");
        let mask = extract_edge_mask(&self.image);
        tracing::info!(ink = mask.ink_count(), detector = detector.name(), "detecting corners");
        let candidates = detector.detect(&mask);

        if let Some(debug) = &self.debug {
            debug.save_inputs(&self.image, &mask, &candidates)?;
        }

        self.detect_from_points(candidates, params)
    }

    /// Cluster, deduplicate and classify injected candidate points
    pub fn detect_from_points(
        &mut self,
        candidates: Vec<Point>,
        params: &DetectionParams,
    ) -> Result<&Classification> {
        params.validate()?;
        if candidates.is_empty() {
            return Err(VertexError::NoCorners);
        }
        tracing::info!(candidates = candidates.len(), "clustering candidates");

        let merged = build_merge_pipeline(params)
            .with_debug_config(self.debug.clone())
            .run(PipelineData::new(candidates, self.image.clone()))?;

        let rounds = merged.get_int(MERGE_ROUNDS).unwrap_or(0) as usize;
        let converged = merged.get_bool(MERGE_CONVERGED).unwrap_or(true);
        self.merged = Some(MergeOutcome {
            centroids: merged.points,
            rounds,
            converged,
        });

        self.refine(params)
    }

    /// Re-run duplicate suppression and classification from cached centroids
    pub fn refine(&mut self, params: &DetectionParams) -> Result<&Classification> {
        params.validate()?;
        let Some(merged) = &self.merged else {
            return Err(VertexError::NotDetected);
        };

        let refined = build_refine_pipeline(params)
            .with_debug_config(self.debug.clone())
            .starting_at(2)
            .run(PipelineData::new(merged.centroids.clone(), self.image.clone()))?;

        self.points = refined.points;
        self.rendering = None;

        let classification = classify_vertices(&self.points, params.junction_threshold, None);
        tracing::info!(
            junctions = classification.junctions.len(),
            edge_centers = classification.edge_centers.len(),
            cell_centers = classification.cell_centers.len(),
            radius = classification.neighbor_radius,
            "classified vertices"
        );
        Ok(self.classification.insert(classification))
    }

    /// Points belonging to `subset`, or empty before detection
    pub fn select(&self, subset: Subset) -> &[Point] {
        let Some(classification) = &self.classification else {
            return &[];
        };
        match subset.class() {
            None => &self.points,
            Some(class) => classification.points_of(class),
        }
    }

    /// Order and label the selected subset.
    ///
    /// An empty subset is not an error: the result has zero points and the
    /// unannotated source image.
    pub fn render(&mut self, params: &RenderParams) -> Result<&Rendering> {
        params.validate()?;
        let selected = self.select(params.subset);

        let rendering = if selected.is_empty() {
            tracing::warn!(subset = params.subset.label(), "no points of the selected kind");
            Rendering {
                subset: params.subset,
                ordered: Vec::new(),
                image: (*self.image).clone(),
            }
        } else {
            let ordered = order_grid(selected, params.row_tolerance);
            let image = draw_numbers(&self.image, &ordered, &LabelStyle::from(params));
            tracing::info!(
                count = ordered.len(),
                subset = params.subset.label(),
                "labelled points"
            );
            Rendering {
                subset: params.subset,
                ordered,
                image,
            }
        };

        Ok(self.rendering.insert(rendering))
    }

    /// Drop the labels but keep the detection
    pub fn clear(&mut self) {
        self.rendering = None;
    }

    pub fn summary(&self) -> Summary {
        let (junctions, edge_centers, cell_centers) = match &self.classification {
            Some(c) => (c.junctions.len(), c.edge_centers.len(), c.cell_centers.len()),
            None => (0, 0, 0),
        };
        Summary {
            junctions,
            edge_centers,
            cell_centers,
            total: self.points.len(),
        }
    }

    /// `<stem>_<subset>.<ext>` derived from the source file name
    pub fn default_output_name(&self, subset: Subset, extension: &str) -> String {
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        format!("{}_{}.{}", stem, subset.file_suffix(), extension)
    }
}
