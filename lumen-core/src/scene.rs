/// Scene coordinator: objects, lights and per-frame uniform marshalling
use log::{debug, info};
use nalgebra::Vector3;

use crate::camera::Camera;
use crate::error::{Result, SceneError};
use crate::geometry::Geometry;
use crate::light::{Light, LightKind};
use crate::material::Material;
use crate::object::ObjectTransform;
use crate::shading::{ShaderLibrary, ShadingProgram};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

/// Narrowest and widest inner cone half-angle, in degrees
const MIN_CONE_DEGREES: f32 = 1.0;
const MAX_CONE_DEGREES: f32 = 89.0;
/// Outer cone is always this much wider than the inner one after an adjustment
const OUTER_CONE_OFFSET_DEGREES: f32 = 10.0;

/// A drawable entity. Geometry and material are shared through arena handles.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: ObjectTransform,
    /// Angular velocity in degrees per second applied by [`Scene::update`]
    pub spin: Option<Vector3<f32>>,
}

#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    active_spot: Option<usize>,
    active_point: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_object(
        &mut self,
        geometry: GeometryId,
        material: MaterialId,
        transform: ObjectTransform,
    ) -> Result<ObjectId> {
        if geometry.0 >= self.geometries.len() {
            return Err(SceneError::UnknownGeometry(geometry.0));
        }
        if material.0 >= self.materials.len() {
            return Err(SceneError::UnknownMaterial(material.0));
        }

        self.objects.push(SceneObject {
            geometry,
            material,
            transform,
            spin: None,
        });
        Ok(ObjectId(self.objects.len() - 1))
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    /// Designate the light that follows the camera and reacts to cone adjustments
    pub fn set_active_spot_light(&mut self, light: Option<LightId>) {
        self.active_spot = light.map(|id| id.0);
    }

    pub fn set_active_point_light(&mut self, light: Option<LightId>) {
        self.active_point = light.map(|id| id.0);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Advance spinning objects by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        for object in &mut self.objects {
            if let Some(spin) = object.spin {
                object.transform.rotate(spin * delta_time);
            }
        }
    }

    /// Push every light into the program.
    ///
    /// Point and spot lights get sequential per-kind slots in scene order,
    /// followed by the `numPointLights` and `numSpotLights` counts.
    pub fn upload_lights<P: ShadingProgram>(&self, program: &mut P) {
        let mut point_count = 0;
        let mut spot_count = 0;

        for light in &self.lights {
            match &light.kind {
                LightKind::Directional(dir) => {
                    program.set_vec3("dirLight.direction", &dir.direction);
                    program.set_vec3("dirLight.color", &light.color);
                    program.set_float("dirLight.ambientIntensity", dir.ambient_intensity);
                }
                LightKind::Point(point) => {
                    let base = format!("pointLights[{}].", point_count);
                    point_count += 1;
                    program.set_point3(&format!("{base}position"), &point.position);
                    program.set_vec3(&format!("{base}color"), &light.color);
                    program.set_float(&format!("{base}constant"), point.attenuation.constant);
                    program.set_float(&format!("{base}linear"), point.attenuation.linear);
                    program.set_float(&format!("{base}quadratic"), point.attenuation.quadratic);
                }
                LightKind::Spot(spot) => {
                    let base = format!("spotLights[{}].", spot_count);
                    spot_count += 1;
                    program.set_point3(&format!("{base}position"), &spot.position);
                    program.set_vec3(&format!("{base}direction"), &spot.direction);
                    program.set_vec3(&format!("{base}color"), &light.color);
                    program.set_float(&format!("{base}cutOff"), spot.cut_off);
                    program.set_float(&format!("{base}outerCutOff"), spot.outer_cut_off);
                    program.set_float(&format!("{base}constant"), spot.attenuation.constant);
                    program.set_float(&format!("{base}linear"), spot.attenuation.linear);
                    program.set_float(&format!("{base}quadratic"), spot.attenuation.quadratic);
                }
            }
        }

        program.set_int("numPointLights", point_count);
        program.set_int("numSpotLights", spot_count);
    }

    /// Draw every object with the program its material asks for
    pub fn render<P: ShadingProgram>(
        &self,
        camera: &Camera,
        library: &mut ShaderLibrary<P>,
        target: &mut P::Target,
    ) -> Result<()> {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        for object in &self.objects {
            let material = self
                .material(object.material)
                .ok_or(SceneError::UnknownMaterial(object.material.0))?;
            let geometry = self
                .geometry(object.geometry)
                .ok_or(SceneError::UnknownGeometry(object.geometry.0))?;

            let program = library.program_mut(material.lighting_model)?;
            program.set_mat4("view", &view);
            program.set_mat4("projection", &projection);
            program.set_point3("viewPos", &camera.eye());
            self.upload_lights(program);

            program.set_mat4("model", object.transform.model_matrix());
            material.apply(program);
            program.draw(geometry, target);
        }

        Ok(())
    }

    /// Move the active spot light to the camera eye and aim it along the view
    pub fn sync_spot_light_with_camera(&mut self, camera: &Camera) {
        let Some(spot) = self.active_spot_mut() else {
            return;
        };

        spot.position = camera.eye();
        spot.direction = camera.forward();
        debug!(
            "Spot light synced to camera at ({:.2}, {:.2}, {:.2})",
            spot.position.x, spot.position.y, spot.position.z
        );
    }

    /// Move the active point light to the camera eye
    pub fn sync_point_light_with_camera(&mut self, camera: &Camera) {
        let Some(point) = self
            .active_point
            .and_then(|index| self.lights.get_mut(index))
            .and_then(Light::as_point_mut)
        else {
            return;
        };

        point.position = camera.eye();
        debug!(
            "Point light synced to camera at ({:.2}, {:.2}, {:.2})",
            point.position.x, point.position.y, point.position.z
        );
    }

    /// Widen the active spot cone by `delta_degrees`.
    ///
    /// The inner angle is clamped to [1, 89] degrees and the outer angle is
    /// reset to the inner angle plus 10 degrees, clamped the same way.
    pub fn increase_spot_light_inner_cut_off(&mut self, delta_degrees: f32) {
        let Some(spot) = self.active_spot_mut() else {
            return;
        };

        let inner = (spot.inner_cut_off_degrees() + delta_degrees).clamp(MIN_CONE_DEGREES, MAX_CONE_DEGREES);
        let outer = (inner + OUTER_CONE_OFFSET_DEGREES).clamp(MIN_CONE_DEGREES, MAX_CONE_DEGREES);

        spot.cut_off = inner.to_radians().cos();
        spot.outer_cut_off = outer.to_radians().cos();
        info!("Spot light inner cut-off changed to {:.1} degrees", inner);
    }

    pub fn decrease_spot_light_inner_cut_off(&mut self, delta_degrees: f32) {
        self.increase_spot_light_inner_cut_off(-delta_degrees);
    }

    /// Inner cone half-angle of the active spot light, or -1 when there is none
    pub fn spot_light_inner_cut_off_degrees(&self) -> f32 {
        self.active_spot
            .and_then(|index| self.lights.get(index))
            .and_then(Light::as_spot)
            .map_or(-1.0, |spot| spot.inner_cut_off_degrees())
    }

    fn active_spot_mut(&mut self) -> Option<&mut crate::light::SpotLight> {
        self.active_spot
            .and_then(|index| self.lights.get_mut(index))
            .and_then(Light::as_spot_mut)
    }
}
