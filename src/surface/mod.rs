pub mod controller;
pub mod grid;
pub mod mesh;
pub mod normals;
pub mod presets;
pub mod sampler;
pub mod store;
pub mod topology;
pub mod transform;
pub mod transition;
pub mod writer;

pub use controller::{ControllerPhase, SurfaceMeshController};
pub use grid::HeightGrid;
pub use mesh::{CpuMesh, MeshBackend, MeshView, TriangleMesh};
pub use normals::BoundaryNormals;
pub use presets::{KEYFRAME_PRESETS, KeyframePreset};
pub use sampler::{KeyframeSampler, SampleRequest, SampleResult, compile_height_fn};
pub use store::{ResolvedState, StateStore};
pub use topology::TopologyCache;
pub use transform::{CoordinateTransform, Identity, ScaleTransform};
pub use transition::Transition;
pub use writer::GeometryWriter;
