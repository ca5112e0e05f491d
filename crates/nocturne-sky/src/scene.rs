//! Scene composition: node transforms, the [`SceneNode`] trait, draw
//! ordering, and the assembled [`SkyScene`].

use glam::{Mat4, Quat, Vec3};
use nocturne_config::Config;
use nocturne_render::Camera;

use crate::lights::SceneLights;
use crate::moon::Moon;
use crate::stars::{StarFieldOptions, Stars};

/// Position, Euler rotation (XYZ order, radians) and scale of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation applied X first in the parent frame, i.e. `Rx * Ry * Rz`.
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// Object-to-world matrix: scale, then rotate, then translate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}

/// Identifies which renderer draws a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Moon,
    Stars,
}

/// A positionable node that can be added to the sky scene.
pub trait SceneNode {
    fn kind(&self) -> NodeKind;

    fn label(&self) -> &str;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Lower values draw first within the transparent pass.
    fn render_order(&self) -> i32 {
        0
    }

    /// Transparent nodes draw after all opaque ones.
    fn is_transparent(&self) -> bool {
        false
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform_mut().position = position;
    }

    fn model_matrix(&self) -> Mat4 {
        self.transform().model_matrix()
    }
}

/// Draw order for `nodes` as indices: opaque nodes in insertion order, then
/// transparent nodes by ascending render order and back-to-front.
pub fn render_queue(nodes: &[&dyn SceneNode], camera: &Camera) -> Vec<usize> {
    let (mut transparent, opaque): (Vec<usize>, Vec<usize>) =
        (0..nodes.len()).partition(|&i| nodes[i].is_transparent());

    transparent.sort_by(|&a, &b| {
        let depth_a = camera.view_depth(nodes[a].transform().position);
        let depth_b = camera.view_depth(nodes[b].transform().position);
        nodes[a]
            .render_order()
            .cmp(&nodes[b].render_order())
            .then(depth_b.total_cmp(&depth_a))
    });

    opaque.into_iter().chain(transparent).collect()
}

/// Background color of the sky.
pub const NIGHT_SKY: [f32; 3] = [0.0, 0.0, 0.0];

/// Everything drawn in the night sky.
pub struct SkyScene {
    /// Clear color.
    pub background: [f32; 3],
    pub moon: Option<Moon>,
    pub stars: Stars,
    pub lights: SceneLights,
}

impl SkyScene {
    /// Assemble the scene from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut stars = Stars::new(StarFieldOptions::from(&config.stars));
        stars.set_position(Vec3::from_array(config.stars.position));

        let moon = config.moon.enabled.then(|| Moon::from_config(&config.moon));
        let moon_position = Vec3::from_array(config.moon.position);
        let lights = SceneLights::from_config(&config.lights, moon_position);

        let scene = Self {
            background: NIGHT_SKY,
            moon,
            stars,
            lights,
        };
        scene.log_summary();
        scene
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<&dyn SceneNode> {
        let mut nodes: Vec<&dyn SceneNode> = Vec::with_capacity(2);
        if let Some(moon) = &self.moon {
            nodes.push(moon);
        }
        nodes.push(&self.stars);
        nodes
    }

    /// Node kinds in draw order for the given camera.
    pub fn draw_order(&self, camera: &Camera) -> Vec<NodeKind> {
        let nodes = self.nodes();
        render_queue(&nodes, camera)
            .into_iter()
            .map(|i| nodes[i].kind())
            .collect()
    }

    /// Write the clock reading into the star material.
    pub fn set_elapsed_time(&mut self, seconds: f32) {
        self.stars.material.uniforms.elapsed_time = seconds;
    }

    pub fn elapsed_time(&self) -> f32 {
        self.stars.material.uniforms.elapsed_time
    }

    fn log_summary(&self) {
        let field = self.stars.field();
        log::info!(
            "Sky scene: {} stars in {:?} box at {:?}, sprite {}px ({:.1}% coverage), moon {}",
            field.len(),
            field.range().to_array(),
            self.stars.transform().position.to_array(),
            self.stars.material.mask().side(),
            self.stars.material.mask().coverage() * 100.0,
            if self.moon.is_some() { "on" } else { "off" },
        );
        self.lights.log_summary();
    }
}
