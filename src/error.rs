use std::path::PathBuf;

use thiserror::Error;

/// Rejected scene parameters. Raised while a scene is being assembled, never
/// while it is being rendered.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere radius must be finite and non-zero, got {0}")]
    InvalidRadius(f64),

    #[error("refractive index must be finite and positive, got {0}")]
    InvalidRefractiveIndex(f64),

    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build render thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write image to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image stream")]
    Stream(#[from] std::io::Error),
}
