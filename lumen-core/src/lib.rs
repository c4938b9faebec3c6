/// Lumen Core Library - mesh import, transforms, lights and scene coordination
///
/// This library holds the renderer-independent part of the scene viewer:
/// parsing the text mesh format, composing model/view/projection matrices
/// and marshalling light and material state into the per-frame uniform
/// contract consumed by a shading program.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod light;
pub mod material;
pub mod obj;
pub mod object;
pub mod scene;
pub mod setup;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, CameraMovement, CameraSettings};
pub use error::{FaceError, ImportError, Result, SceneError};
pub use geometry::{Geometry, Vertex};
pub use light::{Attenuation, Light, LightKind};
pub use material::{LightingModel, Material};
pub use object::ObjectTransform;
pub use scene::{GeometryId, LightId, MaterialId, ObjectId, Scene, SceneObject};
pub use shading::{ShaderLibrary, ShadingProgram, UniformStore, UniformValue};
pub use transform::Transform;
