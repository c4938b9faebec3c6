/// Error types for mesh import and scene setup
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::material::LightingModel;

/// Fatal mesh import failures. Aborts the whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not open mesh file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no valid vertices or faces found in {source_name}")]
    Empty { source_name: String },
}

/// Problems with a single face record. The importer logs these and skips the face.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FaceError {
    #[error("face has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),

    #[error("malformed face token `{0}`")]
    MalformedToken(String),

    #[error("invalid {attribute} index {index} (only {len} parsed)")]
    IndexOutOfRange {
        attribute: &'static str,
        index: usize,
        len: usize,
    },

    #[error("vertex {0} does not fit a 32-bit index buffer")]
    IndexOverflow(usize),
}

/// Fatal errors raised while building or rendering a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to import {what}: {source}")]
    Import {
        what: String,
        #[source]
        source: ImportError,
    },

    #[error("no shading program registered for the {0:?} lighting model")]
    ShaderUnavailable(LightingModel),

    #[error("unknown geometry handle {0}")]
    UnknownGeometry(usize),

    #[error("unknown material handle {0}")]
    UnknownMaterial(usize),
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
