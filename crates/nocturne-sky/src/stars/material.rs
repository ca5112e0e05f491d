//! Twinkling point-sprite material: uniforms, WGSL, and blend policy.
//!
//! The vertex stage computes a per-star alpha from its phase offset and the
//! elapsed time, and sizes the sprite inversely to its distance from the
//! camera. The CPU functions below mirror that math for tests and logging.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use nocturne_render::DepthBuffer;

use super::sprite::SpriteMask;

/// WGSL for instanced star billboards.
///
/// `mv_position` keeps `w = 1`, so the camera distance measured against the
/// zero vector is `sqrt(|xyz|^2 + 1)`.
pub const STAR_SHADER: &str = r#"
struct ObjectUniform {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct StarUniforms {
    color: vec3<f32>,
    time: f32,
    size: f32,
    padding: f32,
    viewport: vec2<f32>,
};

@group(0) @binding(0) var<uniform> transforms: ObjectUniform;
@group(0) @binding(1) var<uniform> stars: StarUniforms;
@group(0) @binding(2) var mask_texture: texture_2d<f32>;
@group(0) @binding(3) var mask_sampler: sampler;

struct VertexInput {
    @location(0) quad_pos: vec2<f32>,
    @location(1) position: vec3<f32>,
    @location(2) phase: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) alpha: f32,
};

@vertex
fn vs_star(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.alpha = 0.5 * (1.0 + sin(in.phase + stars.time));

    let mv_position = transforms.model_view * vec4<f32>(in.position, 1.0);
    let point_size = stars.size / length(mv_position);
    let clip = transforms.projection * mv_position;

    // quad_pos spans [-1, 1], so the quad is point_size pixels across.
    let offset = in.quad_pos * point_size / stars.viewport;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.zw);
    out.uv = vec2<f32>(in.quad_pos.x, -in.quad_pos.y) * 0.5 + 0.5;
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    let tint = vec4<f32>(stars.color, in.alpha);
    return tint * textureSample(mask_texture, mask_sampler, in.uv);
}
"#;

/// Per-frame animation state for the star material. Only `elapsed_time`
/// changes after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationUniforms {
    pub base_color: [f32; 3],
    /// Seconds since the clock started.
    pub elapsed_time: f32,
    /// Sprite size numerator; on-screen pixels are `point_size / distance`.
    pub point_size: f32,
}

/// GPU layout of [`AnimationUniforms`] plus the viewport in physical pixels.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarUniforms {
    pub color: [f32; 3],
    pub time: f32,
    pub size: f32,
    pub _padding: f32,
    pub viewport: [f32; 2],
}

impl AnimationUniforms {
    pub fn new(base_color: [f32; 3], point_size: f32) -> Self {
        Self {
            base_color,
            elapsed_time: 0.0,
            point_size,
        }
    }

    pub fn to_gpu(&self, viewport_width: u32, viewport_height: u32) -> StarUniforms {
        StarUniforms {
            color: self.base_color,
            time: self.elapsed_time,
            size: self.point_size,
            _padding: 0.0,
            viewport: [viewport_width.max(1) as f32, viewport_height.max(1) as f32],
        }
    }
}

/// The star material: animation uniforms and the sprite mask it samples.
#[derive(Clone, Debug)]
pub struct StarMaterial {
    pub uniforms: AnimationUniforms,
    mask: SpriteMask,
}

impl StarMaterial {
    pub fn new(uniforms: AnimationUniforms, mask: SpriteMask) -> Self {
        Self { uniforms, mask }
    }

    pub fn mask(&self) -> &SpriteMask {
        &self.mask
    }

    /// Alpha of star `phase` at the current elapsed time.
    pub fn alpha(&self, phase: f32) -> f32 {
        twinkle_alpha(phase, self.uniforms.elapsed_time)
    }

    /// Additive blending: `src * src_alpha + dst`.
    pub fn blend_state() -> wgpu::BlendState {
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        wgpu::BlendState {
            color: additive,
            alpha: additive,
        }
    }

    /// Stars neither write depth nor test against the scene.
    pub fn depth_state() -> wgpu::DepthStencilState {
        DepthBuffer::overlay_state()
    }
}

/// `0.5 * (1 + sin(phase + time))`, always within `[0, 1]`.
pub fn twinkle_alpha(phase: f32, time: f32) -> f32 {
    0.5 * (1.0 + (phase + time).sin())
}

/// Distance from a view-space point (with `w = 1`) to the zero vector.
pub fn camera_distance(view_position: Vec3) -> f32 {
    view_position.extend(1.0).length()
}

/// On-screen sprite size in pixels.
pub fn sprite_size(point_size: f32, camera_distance: f32) -> f32 {
    point_size / camera_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_alpha_at_zero_phase_and_time() {
        assert_eq!(twinkle_alpha(0.0, 0.0), 0.5);
    }

    #[test]
    fn test_alpha_is_periodic() {
        for phase in [0.0, 1.0, 17.0, 399.0] {
            for t in [0.0, 0.25, 3.0, 120.0] {
                let a = twinkle_alpha(phase, t);
                let b = twinkle_alpha(phase, t + TAU);
                assert!((a - b).abs() < 1e-3, "phase {phase} t {t}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_alpha_stays_in_unit_range() {
        for i in 0..1000 {
            let a = twinkle_alpha(i as f32, i as f32 * 0.37);
            assert!((0.0..=1.0).contains(&a));
        }
        assert!((twinkle_alpha(FRAC_PI_2, 0.0) - 1.0).abs() < 1e-6);
        assert!(twinkle_alpha(-FRAC_PI_2, 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_sprite_shrinks_with_distance() {
        let near = sprite_size(700.0, camera_distance(Vec3::new(0.0, 0.0, -10.0)));
        let far = sprite_size(700.0, camera_distance(Vec3::new(0.0, 0.0, -60.0)));
        assert!(near > far);

        let mut previous = f32::INFINITY;
        for d in [0.5, 1.0, 5.0, 20.0, 100.0] {
            let size = sprite_size(700.0, d);
            assert!(size < previous);
            previous = size;
        }
    }

    #[test]
    fn test_camera_distance_includes_homogeneous_w() {
        assert_eq!(camera_distance(Vec3::ZERO), 1.0);
        let d = camera_distance(Vec3::new(0.0, 0.0, -54.0));
        assert!((d - (54.0f32 * 54.0 + 1.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_gpu_uniform_layout() {
        assert_eq!(std::mem::size_of::<StarUniforms>(), 32);
        let mut uniforms = AnimationUniforms::new([1.0, 1.0, 1.0], 700.0);
        uniforms.elapsed_time = 2.5;
        let gpu = uniforms.to_gpu(1280, 720);
        assert_eq!(gpu.time, 2.5);
        assert_eq!(gpu.size, 700.0);
        assert_eq!(gpu.viewport, [1280.0, 720.0]);
    }

    #[test]
    fn test_additive_blend_ignores_depth() {
        let blend = StarMaterial::blend_state();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);

        let depth = StarMaterial::depth_state();
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Always);
    }

    #[test]
    fn test_star_shader_validates() {
        let module = crate::validate_wgsl(STAR_SHADER);
        assert_eq!(
            crate::entry_points(&module),
            vec![
                ("vs_star", naga::ShaderStage::Vertex),
                ("fs_star", naga::ShaderStage::Fragment),
            ]
        );
    }
}
