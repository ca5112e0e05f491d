//! Perspective camera producing view and reverse-Z projection matrices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A perspective camera in world space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

/// Per-object transform block uploaded next to each draw.
///
/// `model_view` takes object space to view space, where the camera sits at
/// the origin looking down -Z.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl Camera {
    /// Creates a camera at the origin from a vertical FOV in degrees.
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Moves the camera, keeping its orientation.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Compute the view matrix (inverse of the camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Compute the projection matrix with reverse-Z: near maps to depth 1,
    /// far maps to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Current width / height ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Update the aspect ratio from surface dimensions. A zero height is
    /// ignored so the projection never degenerates.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// View-space depth of a world-space point (positive in front).
    pub fn view_depth(&self, world: Vec3) -> f32 {
        -self.view_matrix().transform_point3(world).z
    }

    /// Builds the transform block for an object with the given model matrix.
    pub fn object_uniform(&self, model: Mat4) -> ObjectUniform {
        ObjectUniform {
            model_view: (self.view_matrix() * model).to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(40.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
