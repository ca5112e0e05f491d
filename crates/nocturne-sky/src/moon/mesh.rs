//! Latitude/longitude sphere with per-vertex UVs.

use glam::Vec3;
use nocturne_render::VertexPositionNormalUv;
use std::f32::consts::{PI, TAU};

/// CPU-side sphere geometry.
pub struct SphereMesh {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

/// Generate a UV sphere of `radius`.
///
/// Rows run from the north pole (`v = 1`) to the south pole (`v = 0`);
/// `u` wraps once around the Y axis. Segment counts are clamped to at least
/// 3 around and 2 from pole to pole.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row_len = width_segments + 1;

    let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(VertexPositionNormalUv {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, 1.0 - v],
            });
        }
    }

    // The pole rows collapse to a point, so they contribute one triangle per quad.
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row_len + ix + 1;
            let b = iy * row_len + ix;
            let c = (iy + 1) * row_len + ix;
            let d = (iy + 1) * row_len + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_index_counts() {
        let mesh = uv_sphere(2.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), 32 * (2 * 32 - 2) * 3);
    }

    #[test]
    fn test_vertices_on_sphere() {
        let mesh = uv_sphere(2.0, 32, 32);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 2.0).abs() < 1e-5, "vertex not on sphere: length = {len}");
        }
    }

    #[test]
    fn test_indices_valid() {
        let mesh = uv_sphere(1.0, 12, 8);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_north_pole_has_top_v() {
        let mesh = uv_sphere(2.0, 16, 16);
        let top = &mesh.vertices[0];
        assert!((top.position[1] - 2.0).abs() < 1e-5);
        assert_eq!(top.uv[1], 1.0);
        let bottom = mesh.vertices.last().unwrap();
        assert!((bottom.position[1] + 2.0).abs() < 1e-5);
        assert_eq!(bottom.uv[1], 0.0);
    }

    #[test]
    fn test_uvs_in_range() {
        let mesh = uv_sphere(1.0, 32, 32);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_outward_winding() {
        let mesh = uv_sphere(1.0, 16, 16);
        for tri in mesh.indices.chunks_exact(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_degenerate_segments_clamped() {
        let mesh = uv_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }
}
