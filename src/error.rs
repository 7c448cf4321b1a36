use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("grid must be at least 1x1, got {width}x{depth}")]
    EmptyGrid { width: usize, depth: usize },

    #[error("a {width}x{depth} grid needs {expected} points, got {actual}")]
    PointCountMismatch {
        width: usize,
        depth: usize,
        expected: usize,
        actual: usize,
    },

    #[error("sampling needs at least 2 samples per axis, got {x_samples}x{z_samples}")]
    TooFewSamples { x_samples: usize, z_samples: usize },

    #[error("sampling range ({start}, {end}) is not finite")]
    InvalidRange { start: f32, end: f32 },

    #[error("expression error: {0}")]
    Expression(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
