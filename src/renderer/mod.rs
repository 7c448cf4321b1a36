pub mod camera;
pub mod gpu;
pub mod surface_mesh;

pub use camera::{CameraUniform, OrbitCamera};
pub use gpu::GpuState;
pub use surface_mesh::GpuSurfaceMesh;
