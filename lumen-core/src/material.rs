/// Surface parameters and lighting model selection
use nalgebra::Vector3;

use crate::shading::ShadingProgram;

/// Which shading program renders a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingModel {
    Phong,
    Toon,
    Custom,
}

impl LightingModel {
    pub const ALL: [LightingModel; 3] = [LightingModel::Phong, LightingModel::Toon, LightingModel::Custom];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
    /// Texture unit sampled as `material.texture_diffuse1`
    pub diffuse_texture_unit: i32,
    pub lighting_model: LightingModel,
}

impl Material {
    pub fn new(
        ambient: Vector3<f32>,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
        shininess: f32,
        lighting_model: LightingModel,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            diffuse_texture_unit: 0,
            lighting_model,
        }
    }

    /// Push the `material.*` uniforms
    pub fn apply<P: ShadingProgram>(&self, program: &mut P) {
        program.set_vec3("material.ambient", &self.ambient);
        program.set_vec3("material.diffuse", &self.diffuse);
        program.set_vec3("material.specular", &self.specular);
        program.set_float("material.shininess", self.shininess);
        program.set_int("material.texture_diffuse1", self.diffuse_texture_unit);
    }
}
