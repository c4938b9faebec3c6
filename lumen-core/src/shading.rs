/// The per-frame shading contract
///
/// A [`ShadingProgram`] receives named uniforms (`model`, `view`,
/// `projection`, `viewPos`, `dirLight.*`, `pointLights[i].*`,
/// `spotLights[i].*`, `numPointLights`, `numSpotLights`, `material.*`)
/// and then draws geometry into its render target.
use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Result, SceneError};
use crate::geometry::Geometry;
use crate::material::LightingModel;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
    Vec3([f32; 3]),
    Float(f32),
    Int(i32),
}

pub trait ShadingProgram {
    /// Whatever `draw` renders into
    type Target;

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn draw(&mut self, geometry: &Geometry, target: &mut Self::Target);

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(Transform::to_column_major(value)));
    }

    fn set_vec3(&mut self, name: &str, value: &Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3([value.x, value.y, value.z]));
    }

    fn set_point3(&mut self, name: &str, value: &Point3<f32>) {
        self.set_vec3(name, &value.coords);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }
}

/// Name to value map holding the last value written to each uniform
#[derive(Debug, Clone, Default)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: UniformValue) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mat4(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.get(name)? {
            UniformValue::Mat4(m) => Some(Transform::from_column_major(&m)),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vector3<f32>> {
        match self.get(name)? {
            UniformValue::Vec3([x, y, z]) => Some(Vector3::new(x, y, z)),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

/// One shading program per lighting model
pub struct ShaderLibrary<P> {
    programs: HashMap<LightingModel, P>,
}

impl<P: ShadingProgram> ShaderLibrary<P> {
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, model: LightingModel, program: P) -> Option<P> {
        self.programs.insert(model, program)
    }

    pub fn program_mut(&mut self, model: LightingModel) -> Result<&mut P> {
        self.programs
            .get_mut(&model)
            .ok_or(SceneError::ShaderUnavailable(model))
    }
}

impl<P: ShadingProgram> Default for ShaderLibrary<P> {
    fn default() -> Self {
        Self::new()
    }
}
