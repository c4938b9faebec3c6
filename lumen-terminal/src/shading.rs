/// CPU shading programs that read the uniform contract and shade per triangle
use lumen_core::geometry::face_normal;
use lumen_core::{
    Geometry, LightingModel, ShadingProgram, Transform, UniformStore, UniformValue,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::renderer::{Cell, Framebuffer, ScreenPoint};

/// Number of diffuse bands used by the toon model
const TOON_BANDS: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

/// Light arriving at a surface point
#[derive(Debug, Clone, PartialEq)]
pub struct Incoming {
    /// Unit vector from the surface towards the light
    pub to_light: Vector3<f32>,
    pub radiance: Vector3<f32>,
}

/// Every light read back from the uniform contract
#[derive(Debug, Clone, Default)]
pub struct LightUniforms {
    pub directional: Option<(Vector3<f32>, Vector3<f32>, f32)>,
    pub points: Vec<PointUniform>,
    pub spots: Vec<SpotUniform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointUniform {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    pub attenuation: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotUniform {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub attenuation: [f32; 3],
}

fn attenuate([constant, linear, quadratic]: [f32; 3], distance: f32) -> f32 {
    let denom = constant + linear * distance + quadratic * distance * distance;
    if denom > 0.0 {
        1.0 / denom
    } else {
        0.0
    }
}

/// Soft cone edge: 1 inside the inner cone, 0 outside the outer one
pub fn spot_intensity(theta: f32, cut_off: f32, outer_cut_off: f32) -> f32 {
    let epsilon = cut_off - outer_cut_off;
    if epsilon.abs() < 1e-6 {
        return if theta >= cut_off { 1.0 } else { 0.0 };
    }
    ((theta - outer_cut_off) / epsilon).clamp(0.0, 1.0)
}

impl LightUniforms {
    pub fn read(uniforms: &UniformStore) -> Self {
        let vec3 = |name: &str| uniforms.vec3(name).unwrap_or_else(Vector3::zeros);
        let float = |name: &str| uniforms.float(name).unwrap_or(0.0);
        let count = |name: &str| uniforms.int(name).unwrap_or(0).max(0) as usize;

        let directional = uniforms.vec3("dirLight.direction").map(|direction| {
            (
                direction,
                vec3("dirLight.color"),
                float("dirLight.ambientIntensity"),
            )
        });

        let points = (0..count("numPointLights"))
            .map(|i| {
                let field = |f: &str| format!("pointLights[{i}].{f}");
                PointUniform {
                    position: Point3::from(vec3(&field("position"))),
                    color: vec3(&field("color")),
                    attenuation: [
                        float(&field("constant")),
                        float(&field("linear")),
                        float(&field("quadratic")),
                    ],
                }
            })
            .collect();

        let spots = (0..count("numSpotLights"))
            .map(|i| {
                let field = |f: &str| format!("spotLights[{i}].{f}");
                SpotUniform {
                    position: Point3::from(vec3(&field("position"))),
                    direction: vec3(&field("direction")),
                    color: vec3(&field("color")),
                    cut_off: float(&field("cutOff")),
                    outer_cut_off: float(&field("outerCutOff")),
                    attenuation: [
                        float(&field("constant")),
                        float(&field("linear")),
                        float(&field("quadratic")),
                    ],
                }
            })
            .collect();

        Self {
            directional,
            points,
            spots,
        }
    }

    /// Ambient light from the directional light
    pub fn ambient(&self) -> Vector3<f32> {
        self.directional
            .as_ref()
            .map_or_else(Vector3::zeros, |(_, color, ambient)| color * *ambient)
    }

    /// Direct light reaching `point`
    pub fn incoming(&self, point: &Point3<f32>) -> Vec<Incoming> {
        let mut lights = Vec::with_capacity(1 + self.points.len() + self.spots.len());

        if let Some((direction, color, _)) = &self.directional {
            if let Some(to_light) = (-direction).try_normalize(0.0) {
                lights.push(Incoming {
                    to_light,
                    radiance: *color,
                });
            }
        }

        for light in &self.points {
            let offset = light.position - point;
            let distance = offset.norm();
            if let Some(to_light) = offset.try_normalize(0.0) {
                lights.push(Incoming {
                    to_light,
                    radiance: light.color * attenuate(light.attenuation, distance),
                });
            }
        }

        for light in &self.spots {
            let offset = light.position - point;
            let distance = offset.norm();
            let (Some(to_light), Some(axis)) = (offset.try_normalize(0.0), light.direction.try_normalize(0.0)) else {
                continue;
            };
            let theta = to_light.dot(&-axis);
            let cone = spot_intensity(theta, light.cut_off, light.outer_cut_off);
            lights.push(Incoming {
                to_light,
                radiance: light.color * attenuate(light.attenuation, distance) * cone,
            });
        }

        lights
    }
}

/// Resolve the colour of a surface point under one lighting model
pub fn shade(
    model: LightingModel,
    material: &SurfaceMaterial,
    ambient: &Vector3<f32>,
    incoming: &[Incoming],
    normal: &Vector3<f32>,
    to_eye: &Vector3<f32>,
) -> Vector3<f32> {
    let mut color = material.ambient.component_mul(ambient);

    for light in incoming {
        let lambert = normal.dot(&light.to_light);
        let diffuse = match model {
            LightingModel::Phong => lambert.max(0.0),
            LightingModel::Toon => (lambert.max(0.0) * TOON_BANDS).ceil() / TOON_BANDS,
            LightingModel::Custom => {
                let wrapped = lambert * 0.5 + 0.5;
                wrapped * wrapped
            }
        };
        color += material.diffuse.component_mul(&light.radiance) * diffuse;

        if model == LightingModel::Phong && material.shininess > 0.0 && lambert > 0.0 {
            let reflected = 2.0 * lambert * normal - light.to_light;
            let spec = reflected.dot(to_eye).max(0.0).powf(material.shininess);
            color += material.specular.component_mul(&light.radiance) * spec;
        }
    }

    color.map(|c| c.clamp(0.0, 1.0))
}

/// One shading program: uniforms in, shaded characters out
pub struct AsciiProgram {
    model: LightingModel,
    uniforms: UniformStore,
}

impl AsciiProgram {
    pub fn new(model: LightingModel) -> Self {
        Self {
            model,
            uniforms: UniformStore::new(),
        }
    }

    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    fn material(&self) -> SurfaceMaterial {
        let vec3 = |name: &str| self.uniforms.vec3(name).unwrap_or_else(Vector3::zeros);
        SurfaceMaterial {
            ambient: vec3("material.ambient"),
            diffuse: vec3("material.diffuse"),
            specular: vec3("material.specular"),
            shininess: self.uniforms.float("material.shininess").unwrap_or(0.0),
        }
    }
}

impl ShadingProgram for AsciiProgram {
    type Target = Framebuffer;

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set(name, value);
    }

    fn draw(&mut self, geometry: &Geometry, target: &mut Framebuffer) {
        let mat = |name: &str| self.uniforms.mat4(name).unwrap_or_else(Matrix4::identity);
        let model_matrix = mat("model");
        let clip_matrix = Transform::mvp_matrix(&model_matrix, &mat("view"), &mat("projection"));
        let normal_matrix: Matrix3<f32> = model_matrix
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix3::identity);
        let view_pos = Point3::from(self.uniforms.vec3("viewPos").unwrap_or_else(Vector3::zeros));

        let lights = LightUniforms::read(&self.uniforms);
        let ambient = lights.ambient();
        let material = self.material();

        for triangle in geometry.triangles() {
            let mut screen: [ScreenPoint; 3] = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, vertex) in screen.iter_mut().zip(&triangle) {
                match target.to_screen(&(clip_matrix * vertex.position.to_homogeneous())) {
                    Some(point) => *slot = point,
                    None => visible = false,
                }
            }
            if !visible {
                continue;
            }

            let world: Vec<Point3<f32>> = triangle
                .iter()
                .map(|v| model_matrix.transform_point(&v.position))
                .collect();
            let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);

            let averaged: Vector3<f32> = triangle.iter().map(|v| v.normal).sum();
            let normal = (normal_matrix * averaged)
                .try_normalize(1e-6)
                .or_else(|| face_normal(&triangle).map(|n| normal_matrix * n))
                .and_then(|n| n.try_normalize(1e-6));
            let Some(normal) = normal else {
                continue;
            };

            let to_eye = (view_pos - centroid).try_normalize(0.0).unwrap_or_else(Vector3::z);
            let incoming = lights.incoming(&centroid);
            let color = shade(self.model, &material, &ambient, &incoming, &normal, &to_eye);

            target.fill_triangle(&screen, Cell::from_rgb(color.x, color.y, color.z));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::obj::parse_obj;

    fn white() -> SurfaceMaterial {
        SurfaceMaterial {
            ambient: Vector3::repeat(0.1),
            diffuse: Vector3::repeat(1.0),
            specular: Vector3::repeat(1.0),
            shininess: 32.0,
        }
    }

    fn overhead() -> Vec<Incoming> {
        vec![Incoming {
            to_light: Vector3::y(),
            radiance: Vector3::repeat(1.0),
        }]
    }

    #[test]
    fn test_spot_intensity_edges() {
        let inner = 15f32.to_radians().cos();
        let outer = 25f32.to_radians().cos();

        assert_eq!(spot_intensity(1.0, inner, outer), 1.0);
        assert_eq!(spot_intensity(30f32.to_radians().cos(), inner, outer), 0.0);
        let mid = spot_intensity(20f32.to_radians().cos(), inner, outer);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_ambient_only_without_direct_light() {
        let color = shade(
            LightingModel::Phong,
            &white(),
            &Vector3::repeat(0.5),
            &[],
            &Vector3::y(),
            &Vector3::y(),
        );
        assert!((color - Vector3::repeat(0.05)).norm() < 1e-6);
    }

    #[test]
    fn test_phong_adds_specular_highlight() {
        let lit = shade(LightingModel::Phong, &white(), &Vector3::zeros(), &overhead(), &Vector3::y(), &Vector3::y());
        assert_eq!(lit, Vector3::repeat(1.0));

        let grazing = shade(
            LightingModel::Phong,
            &white(),
            &Vector3::zeros(),
            &overhead(),
            &Vector3::new(1.0, 1.0, 0.0).normalize(),
            &Vector3::z(),
        );
        assert!(grazing.x > 0.6 && grazing.x < 0.8);
    }

    #[test]
    fn test_toon_bands() {
        let mut material = white();
        material.specular = Vector3::zeros();
        material.ambient = Vector3::zeros();
        let normal = Vector3::new(0.3f32.acos().sin(), 0.3, 0.0);

        let color = shade(LightingModel::Toon, &material, &Vector3::zeros(), &overhead(), &normal, &Vector3::y());
        assert!((color.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_custom_wraps_past_terminator() {
        let color = shade(
            LightingModel::Custom,
            &white(),
            &Vector3::zeros(),
            &overhead(),
            &Vector3::x(),
            &Vector3::x(),
        );
        assert!((color.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_reads_light_contract() {
        let mut program = AsciiProgram::new(LightingModel::Phong);
        program.set_vec3("dirLight.direction", &-Vector3::y());
        program.set_vec3("dirLight.color", &Vector3::repeat(1.0));
        program.set_float("dirLight.ambientIntensity", 0.5);
        program.set_vec3("pointLights[0].position", &Vector3::new(0.0, 2.0, 0.0));
        program.set_vec3("pointLights[0].color", &Vector3::repeat(1.0));
        program.set_float("pointLights[0].constant", 1.0);
        program.set_int("numPointLights", 1);
        program.set_int("numSpotLights", 0);

        let lights = LightUniforms::read(program.uniforms());
        assert_eq!(lights.points.len(), 1);
        assert!(lights.spots.is_empty());
        assert_eq!(lights.ambient(), Vector3::repeat(0.5));

        let incoming = lights.incoming(&Point3::origin());
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[1].to_light, Vector3::y());
        assert_eq!(incoming[1].radiance, Vector3::repeat(1.0));
    }

    #[test]
    fn test_draw_fills_framebuffer() {
        let quad = parse_obj(
            "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n",
        )
        .unwrap();

        let mut program = AsciiProgram::new(LightingModel::Phong);
        let eye = Point3::new(0.0, 0.0, 3.0);
        program.set_mat4("model", &Matrix4::identity());
        program.set_mat4("view", &Transform::look_at(&eye, &Point3::origin(), &Vector3::y()));
        program.set_mat4("projection", &Transform::perspective(45.0, 1.0, 0.1, 100.0));
        program.set_point3("viewPos", &eye);
        program.set_vec3("dirLight.direction", &-Vector3::z());
        program.set_vec3("dirLight.color", &Vector3::repeat(1.0));
        program.set_float("dirLight.ambientIntensity", 0.1);
        program.set_vec3("material.diffuse", &Vector3::repeat(1.0));

        let mut fb = Framebuffer::new(20, 20);
        program.draw(&quad, &mut fb);

        let center = fb.cell(10, 10).unwrap();
        assert_ne!(center, Cell::EMPTY);
        assert_eq!(center.ch, '@');
        assert_eq!(fb.cell(0, 0), Some(Cell::EMPTY));
    }
}
