//! The night sky: a twinkling star field, a gradient-shaded moon, scene
//! lights, and the scene graph that orders them for drawing.

pub mod lights;
pub mod moon;
pub mod renderer;
pub mod scene;
pub mod stars;

pub use lights::{AmbientLight, DirectionalLight, SceneLights};
pub use moon::{GradientMaterial, Moon, MoonRenderer, smoothstep, uv_sphere};
pub use renderer::SkyRenderer;
pub use scene::{NIGHT_SKY, NodeKind, SceneNode, SkyScene, Transform, render_queue};
pub use stars::{
    AnimationUniforms, PointField, SpriteMask, StarFieldOptions, StarMaterial, StarRenderer,
    StarUniforms, Stars, camera_distance, sprite_size, twinkle_alpha,
};

/// Parse and validate WGSL with naga, the same front end wgpu uses.
#[cfg(test)]
pub(crate) fn validate_wgsl(source: &str) -> naga::Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(module) => module,
        Err(err) => panic!("WGSL parse error:\n{}", err.emit_to_string(source)),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    if let Err(err) = validator.validate(&module) {
        panic!("WGSL validation error:\n{}", err.emit_to_string(source));
    }
    module
}

#[cfg(test)]
pub(crate) fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}
