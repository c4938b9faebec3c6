/// Light sources: directional, point and spot
use log::warn;
use nalgebra::{Point3, Vector3};

/// Inverse-distance falloff `1 / (constant + linear*d + quadratic*d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl Default for Attenuation {
    /// Roughly a 50 unit range
    fn default() -> Self {
        Self::new(1.0, 0.09, 0.032)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient_intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub attenuation: Attenuation,
}

/// Cone light. Cutoffs are stored as cosines of the half-angles.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub attenuation: Attenuation,
}

impl SpotLight {
    pub fn inner_cut_off_degrees(&self) -> f32 {
        self.cut_off.clamp(-1.0, 1.0).acos().to_degrees()
    }

    pub fn outer_cut_off_degrees(&self) -> f32 {
        self.outer_cut_off.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

/// A light with its shared RGB intensity
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vector3<f32>,
    pub kind: LightKind,
}

impl Light {
    /// A zero direction falls back to straight down.
    pub fn directional(direction: Vector3<f32>, color: Vector3<f32>, ambient_intensity: f32) -> Self {
        let direction = direction.try_normalize(0.0).unwrap_or_else(|| {
            warn!("Directional light has a zero direction, using (0, -1, 0)");
            -Vector3::y()
        });

        Self {
            color,
            kind: LightKind::Directional(DirectionalLight {
                direction,
                ambient_intensity,
            }),
        }
    }

    pub fn point(position: Point3<f32>, color: Vector3<f32>, attenuation: Attenuation) -> Self {
        Self {
            color,
            kind: LightKind::Point(PointLight {
                position,
                attenuation,
            }),
        }
    }

    /// Cone angles are given in degrees and stored as cosines
    pub fn spot(
        position: Point3<f32>,
        direction: Vector3<f32>,
        color: Vector3<f32>,
        inner_degrees: f32,
        outer_degrees: f32,
        attenuation: Attenuation,
    ) -> Self {
        Self {
            color,
            kind: LightKind::Spot(SpotLight {
                position,
                direction: direction.try_normalize(0.0).unwrap_or(direction),
                cut_off: inner_degrees.to_radians().cos(),
                outer_cut_off: outer_degrees.to_radians().cos(),
                attenuation,
            }),
        }
    }

    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match &mut self.kind {
            LightKind::Spot(spot) => Some(spot),
            _ => None,
        }
    }

    pub fn as_spot(&self) -> Option<&SpotLight> {
        match &self.kind {
            LightKind::Spot(spot) => Some(spot),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointLight> {
        match &mut self.kind {
            LightKind::Point(point) => Some(point),
            _ => None,
        }
    }
}
