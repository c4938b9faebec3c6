/// The default demo scene: three lights, three materials, five objects
use std::path::{Path, PathBuf};

use log::{error, info};
use nalgebra::{Point3, Vector3};

use crate::error::{Result, SceneError};
use crate::geometry::Geometry;
use crate::light::{Attenuation, Light};
use crate::material::{LightingModel, Material};
use crate::obj::{load_obj, load_obj_scaled};
use crate::object::ObjectTransform;
use crate::scene::Scene;

/// Platform proportions applied to the plane mesh (a unit cube) on import
pub const PLATFORM_SCALE: Vector3<f32> = Vector3::new(5.0, 0.2, 3.0);

/// Object scale of the floor, applied on top of [`PLATFORM_SCALE`]
pub const FLOOR_SCALE: Vector3<f32> = Vector3::new(10.0, 1.0, 10.0);

/// Locations of the model files used by the default scene
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub cube: PathBuf,
    pub sphere: PathBuf,
    pub plane: PathBuf,
}

impl SceneAssets {
    /// `cube.obj`, `sphere.obj` and `plane.obj` under `<dir>/models`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let models = dir.as_ref().join("models");
        Self {
            cube: models.join("cube.obj"),
            sphere: models.join("sphere.obj"),
            plane: models.join("plane.obj"),
        }
    }
}

/// Build the default scene. Any failure is logged with context and returned.
pub fn build_default_scene(assets: &SceneAssets) -> Result<Scene> {
    let mut scene = Scene::new();

    setup_lights(&mut scene);
    if let Err(e) = setup_objects(&mut scene, assets) {
        error!("Scene setup failed: {}", e);
        return Err(e);
    }

    info!(
        "Scene initialized with {} objects and {} lights (spot cone {:.1} degrees)",
        scene.objects().len(),
        scene.lights().len(),
        scene.spot_light_inner_cut_off_degrees()
    );
    Ok(scene)
}

/// Scene for viewing a single mesh: sun, a camera-following spot light and one Phong material
pub fn build_model_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let mut scene = Scene::new();

    let geometry = import(&path.display().to_string(), path, None).map_err(|e| {
        error!("Scene setup failed: {}", e);
        e
    })?;
    let geometry = scene.add_geometry(geometry);
    let material = scene.add_material(Material::new(
        Vector3::new(0.3, 0.3, 0.3),
        Vector3::new(0.8, 0.8, 0.8),
        Vector3::new(0.5, 0.5, 0.5),
        32.0,
        LightingModel::Phong,
    ));
    scene.add_object(geometry, material, ObjectTransform::new())?;

    scene.add_light(Light::directional(
        Vector3::new(-0.5, -1.0, -0.3),
        Vector3::new(1.0, 1.0, 0.95),
        0.3,
    ));
    let headlight = scene.add_light(Light::spot(
        Point3::new(0.0, 0.0, 3.0),
        -Vector3::z(),
        Vector3::repeat(1.0),
        12.5,
        17.5,
        Attenuation::default(),
    ));
    scene.set_active_spot_light(Some(headlight));

    info!(
        "Viewing {} ({} triangles)",
        path.display(),
        scene.geometry(geometry).map_or(0, Geometry::triangle_count)
    );
    Ok(scene)
}

fn setup_lights(scene: &mut Scene) {
    // Sun
    scene.add_light(Light::directional(
        Vector3::new(-0.5, -1.0, -0.3),
        Vector3::new(1.0, 1.0, 0.95),
        0.5,
    ));

    // Bluish bulb high up behind the scene
    let point = scene.add_light(Light::point(
        Point3::new(-5.0, 6.0, 3.0),
        Vector3::new(0.5, 0.7, 1.0),
        Attenuation::new(1.0, 0.05, 0.01),
    ));

    // Orange spot aimed down at the cubes
    let spot = scene.add_light(Light::spot(
        Point3::new(1.0, 5.0, -3.0),
        Vector3::new(0.0, -1.0, 0.3),
        Vector3::new(1.0, 0.8, 0.5),
        15.0,
        25.0,
        Attenuation::default(),
    ));

    scene.set_active_point_light(Some(point));
    scene.set_active_spot_light(Some(spot));
}

fn import(what: &str, path: &Path, scale: Option<Vector3<f32>>) -> Result<Geometry> {
    let geometry = match scale {
        Some(scale) => load_obj_scaled(path, scale),
        None => load_obj(path),
    };
    geometry.map_err(|source| SceneError::Import {
        what: what.to_string(),
        source,
    })
}

fn setup_objects(scene: &mut Scene, assets: &SceneAssets) -> Result<()> {
    let cube = scene.add_geometry(import("cube mesh", &assets.cube, None)?);
    let sphere = scene.add_geometry(import("sphere mesh", &assets.sphere, None)?);
    let platform = scene.add_geometry(import("platform mesh", &assets.plane, Some(PLATFORM_SCALE))?);

    let phong = scene.add_material(Material::new(
        Vector3::new(0.3, 0.3, 0.3),
        Vector3::new(0.8, 0.6, 0.3),
        Vector3::new(1.0, 1.0, 1.0),
        64.0,
        LightingModel::Phong,
    ));
    let toon = scene.add_material(Material::new(
        Vector3::new(0.2, 0.2, 0.2),
        Vector3::new(0.3, 0.8, 0.3),
        Vector3::zeros(),
        0.0,
        LightingModel::Toon,
    ));
    let matte = scene.add_material(Material::new(
        Vector3::new(0.2, 0.2, 0.2),
        Vector3::new(0.9, 0.1, 0.1),
        Vector3::zeros(),
        1.0,
        LightingModel::Custom,
    ));

    let at = |x: f32, y: f32, z: f32| {
        ObjectTransform::from_parts(Vector3::new(x, y, z), Vector3::zeros(), Vector3::repeat(1.0))
    };

    let mut floor = ObjectTransform::new();
    floor.set_scale(FLOOR_SCALE);
    scene.add_object(platform, phong, floor)?;

    scene.add_object(sphere, phong, at(-2.0, 1.0, 0.0))?;

    let spinning = scene.add_object(cube, toon, at(0.0, 1.0, 0.0))?;
    if let Some(object) = scene.object_mut(spinning) {
        object.spin = Some(Vector3::new(0.0, 45.0, 0.0));
    }

    scene.add_object(cube, matte, at(2.0, 1.0, 0.0))?;

    let mut small = at(4.0, 1.0, -2.0);
    small.set_scale(Vector3::repeat(0.5));
    scene.add_object(sphere, toon, small)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CUBE: &str = "\
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
vn 0 0 1
vn 0 0 -1
vn 0 1 0
vn 0 -1 0
vn 1 0 0
vn -1 0 0
f 1//1 2//1 3//1 4//1
f 6//2 5//2 8//2 7//2
f 4//3 3//3 7//3 8//3
f 5//4 6//4 2//4 1//4
f 2//5 6//5 7//5 3//5
f 5//6 1//6 4//6 8//6
";

    fn write_assets(name: &str, with_sphere: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-{}-{}", name, std::process::id()));
        fs::create_dir_all(dir.join("models")).unwrap();
        fs::write(dir.join("models/cube.obj"), CUBE).unwrap();
        fs::write(dir.join("models/plane.obj"), CUBE).unwrap();
        if with_sphere {
            fs::write(dir.join("models/sphere.obj"), CUBE).unwrap();
        }
        dir
    }

    #[test]
    fn test_default_scene() {
        let dir = write_assets("scene-ok", true);
        let scene = build_default_scene(&SceneAssets::in_dir(&dir)).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(scene.objects().len(), 5);
        assert_eq!(scene.lights().len(), 3);
        assert!((scene.spot_light_inner_cut_off_degrees() - 15.0).abs() < 1e-3);

        let floor = &scene.objects()[0];
        let platform = scene.geometry(floor.geometry).unwrap();
        let max_x = platform
            .vertices()
            .iter()
            .map(|v| v.position.x)
            .fold(f32::MIN, f32::max);
        assert!((max_x - 2.5).abs() < 1e-5);
        assert_eq!(floor.transform.scale(), FLOOR_SCALE);
        let corner = floor.transform.model_matrix().transform_point(&Point3::new(max_x, 0.0, 0.0));
        assert!((corner.x - 25.0).abs() < 1e-4);
        assert!(scene.objects()[2].spin.is_some());
    }

    #[test]
    fn test_shipped_assets() {
        let assets = SceneAssets::in_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets"));
        let scene = build_default_scene(&assets).unwrap();

        let sphere = scene.geometry(scene.objects()[1].geometry).unwrap();
        assert!(sphere
            .vertices()
            .iter()
            .all(|v| (v.position.coords.norm() - 0.5).abs() < 1e-4));
        assert!(sphere.indices().iter().all(|&i| (i as usize) < sphere.vertices().len()));
    }

    #[test]
    fn test_model_scene() {
        let dir = write_assets("scene-model", false);
        let scene = build_model_scene(dir.join("models/cube.obj")).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(scene.objects().len(), 1);
        assert!((scene.spot_light_inner_cut_off_degrees() - 12.5).abs() < 1e-3);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = write_assets("scene-missing", false);
        let result = build_default_scene(&SceneAssets::in_dir(&dir));
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(SceneError::Import { what, .. }) => assert_eq!(what, "sphere mesh"),
            other => panic!("expected an import error, got {:?}", other.map(|_| ())),
        }
    }
}
