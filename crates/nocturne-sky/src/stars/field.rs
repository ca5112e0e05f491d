//! Procedural point placement: uniform scatter inside an axis-aligned box.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Star positions scattered in a box centered on the local origin, each with
/// a twinkle phase offset.
///
/// `phase_offsets[i] == i`: neighbouring stars are one radian apart in their
/// twinkle cycle.
#[derive(Clone, Debug)]
pub struct PointField {
    positions: Vec<Vec3>,
    phase_offsets: Vec<f32>,
    range: Vec3,
}

/// Per-star attributes uploaded once as an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub phase: f32,
}

impl StarInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &Self::ATTRIBUTES,
    };
}

impl PointField {
    /// Scatter `point_count` points. A `seed` makes the layout reproducible;
    /// otherwise the generator is seeded from the thread-local RNG.
    pub fn generate(point_count: u32, range: Vec3, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self::generate_with(&mut rng, point_count, range)
    }

    /// Scatter points using the supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, point_count: u32, range: Vec3) -> Self {
        let count = point_count as usize;
        let mut positions = Vec::with_capacity(count);
        let mut phase_offsets = Vec::with_capacity(count);

        for i in 0..count {
            positions.push(Vec3::new(
                spread(rng, range.x),
                spread(rng, range.y),
                spread(rng, range.z),
            ));
            phase_offsets.push(i as f32);
        }

        Self {
            positions,
            phase_offsets,
            range,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn phase_offsets(&self) -> &[f32] {
        &self.phase_offsets
    }

    /// Full box extent per axis.
    pub fn range(&self) -> Vec3 {
        self.range
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether `point` lies inside the generation box.
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.range.abs() * 0.5;
        point.abs().cmple(half).all()
    }

    /// Interleave positions and phases for GPU upload.
    pub fn instances(&self) -> Vec<StarInstance> {
        self.positions
            .iter()
            .zip(&self.phase_offsets)
            .map(|(position, &phase)| StarInstance {
                position: position.to_array(),
                phase,
            })
            .collect()
    }
}

/// Uniform value in `[-range/2, range/2]`.
fn spread<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    range * (rng.random::<f32>() - 0.5)
}
