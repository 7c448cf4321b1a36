pub mod config;
pub mod error;
pub mod playback;
pub mod renderer;
pub mod surface;
pub mod ui;

pub use error::{SurfaceError, SurfaceResult};
