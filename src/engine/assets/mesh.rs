// CPU-side triangle meshes and the built-in primitives

use glam::Vec3;
use serde::Deserialize;
use std::f32::consts::{PI, TAU};

/// Indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when there is nothing to draw or hit
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3 || self.positions.is_empty()
    }

    /// Indices grouped into triangles, trailing partial triangles dropped
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Replace normals with area-weighted smooth normals computed from the faces
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len() {
                continue;
            }
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        self.normals = accumulated
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
    }
}

/// Built-in primitive shapes, sized like the demo defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// 1 x 1 x 1 box
    Box,
    /// Sphere of radius 0.5
    Sphere,
    /// Cone of radius 0.5 and height 1
    Cone,
    /// Cylinder of radius 0.5 and height 1
    Cylinder,
    /// Torus with ring radius 0.5 and tube radius 0.2
    Torus,
    /// 1 x 1 plane facing +Z
    Plane,
}

impl Primitive {
    /// Name used to register the generated mesh
    pub fn asset_name(&self) -> &'static str {
        match self {
            Primitive::Box => "primitive:box",
            Primitive::Sphere => "primitive:sphere",
            Primitive::Cone => "primitive:cone",
            Primitive::Cylinder => "primitive:cylinder",
            Primitive::Torus => "primitive:torus",
            Primitive::Plane => "primitive:plane",
        }
    }

    /// Generate the mesh for this primitive
    pub fn build(&self) -> MeshData {
        match self {
            Primitive::Box => box_mesh(1.0),
            Primitive::Sphere => sphere_mesh(0.5, 32, 16),
            Primitive::Cone => cylinder_mesh(0.0, 0.5, 1.0, 32),
            Primitive::Cylinder => cylinder_mesh(0.5, 0.5, 1.0, 32),
            Primitive::Torus => torus_mesh(0.5, 0.2, 12, 48),
            Primitive::Plane => plane_mesh(1.0),
        }
    }
}

fn box_mesh(size: f32) -> MeshData {
    let h = size / 2.0;
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.positions.len() as u32;
        let center = normal * h;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.push_vertex(center + u * (su * h) + v * (sv * h), normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push_vertex(normal * radius, normal.try_normalize().unwrap_or(Vec3::Y));
        }
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    // Side: row 0 is the top edge, row 1 the bottom edge
    for (row, radius) in [radius_top, radius_bottom].into_iter().enumerate() {
        let y = if row == 0 { half } else { -half };
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
    }

    let row = radial_segments + 1;
    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // Caps
    for (top, radius) in [(true, radius_top), (false, radius_bottom)] {
        if radius <= 0.0 {
            continue;
        }
        let y = if top { half } else { -half };
        let normal = if top { Vec3::Y } else { Vec3::NEG_Y };

        let center = mesh.positions.len() as u32;
        mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
        for x in 0..radial_segments {
            let i = center + 1 + x;
            if top {
                mesh.indices.extend_from_slice(&[i, i + 1, center]);
            } else {
                mesh.indices.extend_from_slice(&[i + 1, i, center]);
            }
        }
    }

    mesh
}

fn torus_mesh(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push_vertex(position, (position - center).normalize());
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

fn plane_mesh(size: f32) -> MeshData {
    let h = size / 2.0;
    let mut mesh = MeshData::default();
    for (x, y) in [(-h, -h), (h, -h), (h, h), (-h, h)] {
        mesh.push_vertex(Vec3::new(x, y, 0.0), Vec3::Z);
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Primitive; 6] = [
        Primitive::Box,
        Primitive::Sphere,
        Primitive::Cone,
        Primitive::Cylinder,
        Primitive::Torus,
        Primitive::Plane,
    ];

    #[test]
    fn test_primitives_are_well_formed() {
        for primitive in ALL {
            let mesh = primitive.build();
            assert!(!mesh.is_empty(), "{:?} is empty", primitive);
            assert_eq!(mesh.indices.len() % 3, 0, "{:?} has partial triangles", primitive);
            assert_eq!(mesh.positions.len(), mesh.normals.len());
            assert!(
                mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()),
                "{:?} has out-of-range indices",
                primitive
            );
            for n in &mesh.normals {
                let len = Vec3::from(*n).length();
                assert!((len - 1.0).abs() < 1e-4, "{:?} has non-unit normal", primitive);
            }
        }
    }

    #[test]
    fn test_box_extent() {
        let mesh = Primitive::Box.build();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for p in &mesh.positions {
            assert!(p.iter().all(|c| c.abs() <= 0.5 + 1e-6));
        }
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = Primitive::Sphere.build();
        for p in &mesh.positions {
            assert!((Vec3::from(*p).length() - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cone_has_single_cap() {
        let cone = Primitive::Cone.build();
        let cylinder = Primitive::Cylinder.build();
        assert!(cone.triangle_count() < cylinder.triangle_count());
    }

    #[test]
    fn test_primitive_names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|p| p.asset_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_compute_normals_for_flat_triangle() {
        let mut mesh = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: Vec::new(),
            indices: vec![0, 1, 2],
        };
        mesh.compute_normals();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }
}
