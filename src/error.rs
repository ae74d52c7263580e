use std::path::PathBuf;

/// Errors surfaced by the detection and export pipeline
#[derive(Debug, thiserror::Error)]
pub enum VertexError {
    /// The input file could not be opened (missing, permissions, ...).
    #[error("could not open image {path}: {source}")]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file was readable but not a supported image.
    #[error("could not decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Corner detection found nothing to cluster.
    #[error("no corners detected")]
    NoCorners,

    /// Refinement or rendering requested before a detect action.
    #[error("nothing detected yet; run detection first")]
    NotDetected,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed CSV at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("debug directory is not empty: {0}")]
    DebugDirNotEmpty(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VertexError>;
