//! Twinkling star field: generated points, a circular sprite mask, and the
//! animated additive material that draws them.

use glam::Vec3;
use nocturne_config::{StarsConfig, rgb};

use crate::scene::{NodeKind, SceneNode, Transform};

mod field;
mod material;
mod renderer;
mod sprite;

pub use field::{PointField, StarInstance};
pub use material::{
    AnimationUniforms, STAR_SHADER, StarMaterial, StarUniforms, camera_distance, sprite_size,
    twinkle_alpha,
};
pub use renderer::StarRenderer;
pub use sprite::{DEFAULT_SPRITE_SIDE, SpriteMask};

/// Options recognized when building a star field.
#[derive(Clone, Debug, PartialEq)]
pub struct StarFieldOptions {
    /// Base tint as `0xRRGGBB`.
    pub color: u32,
    pub size: f32,
    pub point_count: u32,
    pub range: Vec3,
    pub sprite_resolution: u32,
    pub seed: Option<u64>,
}

impl Default for StarFieldOptions {
    fn default() -> Self {
        Self {
            color: 0x333333,
            size: 1.0,
            point_count: 40,
            range: Vec3::splat(2.0),
            sprite_resolution: DEFAULT_SPRITE_SIDE,
            seed: None,
        }
    }
}

impl From<&StarsConfig> for StarFieldOptions {
    fn from(config: &StarsConfig) -> Self {
        Self {
            color: config.color,
            size: config.size,
            point_count: config.point_count,
            range: Vec3::from_array(config.range),
            sprite_resolution: config.sprite_resolution,
            seed: config.seed,
        }
    }
}

/// Star field scene node. Drawn in the transparent pass after opaque
/// geometry.
pub struct Stars {
    transform: Transform,
    field: PointField,
    pub material: StarMaterial,
}

impl Stars {
    /// Render order of the star points within the transparent pass.
    pub const RENDER_ORDER: i32 = 1;

    pub fn new(options: StarFieldOptions) -> Self {
        let field = PointField::generate(options.point_count, options.range, options.seed);
        let mask = SpriteMask::circle(options.sprite_resolution);
        let uniforms = AnimationUniforms::new(rgb(options.color), options.size);

        log::debug!(
            "Generated {} stars (range {:?}, seed {:?})",
            field.len(),
            options.range.to_array(),
            options.seed
        );

        Self {
            transform: Transform::default(),
            field,
            material: StarMaterial::new(uniforms, mask),
        }
    }

    pub fn field(&self) -> &PointField {
        &self.field
    }

    /// Alpha of star `index` at the material's current elapsed time.
    pub fn alpha(&self, index: usize) -> Option<f32> {
        self.field
            .phase_offsets()
            .get(index)
            .map(|&phase| self.material.alpha(phase))
    }
}

impl Default for Stars {
    fn default() -> Self {
        Self::new(StarFieldOptions::default())
    }
}

impl SceneNode for Stars {
    fn kind(&self) -> NodeKind {
        NodeKind::Stars
    }

    fn label(&self) -> &str {
        "stars"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn render_order(&self) -> i32 {
        Self::RENDER_ORDER
    }

    fn is_transparent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let stars = Stars::default();
        assert_eq!(stars.field().len(), 40);
        assert_eq!(stars.field().range(), Vec3::splat(2.0));
        assert_eq!(stars.material.uniforms.point_size, 1.0);
        assert!((stars.material.uniforms.base_color[0] - 0.2).abs() < 1e-6);
        assert_eq!(stars.material.mask().side(), 128);
    }

    #[test]
    fn test_options_from_config() {
        let options = StarFieldOptions::from(&StarsConfig::default());
        assert_eq!(options.point_count, 400);
        assert_eq!(options.range, Vec3::new(110.0, 60.0, 30.0));
        assert_eq!(options.size, 700.0);
        assert_eq!(options.color, 0xffffff);
    }

    #[test]
    fn test_stars_are_transparent_with_render_order_one() {
        let stars = Stars::default();
        assert!(stars.is_transparent());
        assert_eq!(stars.render_order(), 1);
        assert_eq!(stars.kind(), NodeKind::Stars);
    }

    #[test]
    fn test_first_star_alpha_at_time_zero() {
        let stars = Stars::new(StarFieldOptions {
            point_count: 400,
            range: Vec3::new(110.0, 60.0, 30.0),
            size: 700.0,
            ..StarFieldOptions::default()
        });
        assert_eq!(stars.alpha(0), Some(0.5));
        assert_eq!(stars.alpha(400), None);
    }

    #[test]
    fn test_set_position_moves_group() {
        let mut stars = Stars::default();
        stars.set_position(Vec3::new(0.0, 0.0, -50.0));
        let origin = stars.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, 0.0, -50.0));
    }
}
