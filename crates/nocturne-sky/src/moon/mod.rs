//! The moon: a sphere shaded by a static two-color gradient over its
//! vertical texture coordinate.

use glam::Vec3;
use nocturne_config::{MoonConfig, rgb};

use crate::scene::{NodeKind, SceneNode, Transform};

mod mesh;
mod renderer;

pub use mesh::{SphereMesh, uv_sphere};
pub use renderer::{GradientUniforms, MOON_SHADER, MoonRenderer};

/// Lower edge of the gradient band in `v`.
pub const BAND_LOW: f32 = 0.39;
/// Upper edge of the gradient band in `v`.
pub const BAND_HIGH: f32 = 0.44;

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Two fixed colors blended across the `[BAND_LOW, BAND_HIGH]` band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientMaterial {
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
}

impl GradientMaterial {
    /// Shaded color at vertical texture coordinate `v`.
    pub fn color_at(&self, v: f32) -> [f32; 3] {
        let pct = smoothstep(BAND_LOW, BAND_HIGH, v);
        let a = Vec3::from_array(self.color_a);
        let b = Vec3::from_array(self.color_b);
        a.lerp(b, pct).to_array()
    }
}

/// Opaque moon scene node.
pub struct Moon {
    transform: Transform,
    pub material: GradientMaterial,
    pub mesh: SphereMesh,
}

impl Moon {
    pub fn from_config(config: &MoonConfig) -> Self {
        let mesh = uv_sphere(config.radius, config.width_segments, config.height_segments);
        log::debug!(
            "Moon mesh: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.indices.len() / 3
        );

        Self {
            transform: Transform {
                position: Vec3::from_array(config.position),
                rotation: Vec3::from_array(config.rotation),
                ..Transform::default()
            },
            material: GradientMaterial {
                color_a: rgb(config.color_a),
                color_b: rgb(config.color_b),
            },
            mesh,
        }
    }
}

impl SceneNode for Moon {
    fn kind(&self) -> NodeKind {
        NodeKind::Moon
    }

    fn label(&self) -> &str {
        "moon"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}
