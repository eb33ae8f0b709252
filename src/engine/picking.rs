// Ray picking against scene meshes
//
// Rays are built in world space, moved into each part's local space and tested
// against the part's triangles with parry3d. Moving the ray instead of the
// mesh keeps colliders shareable between anchors and lets the hit parameter be
// compared across parts directly.

use crate::engine::assets::{AssetManager, MeshData};
use crate::engine::scene::{AnchorId, Scene};
use glam::Vec3;
use parry3d::math::{Point, Vector};
use parry3d::query::{Ray as ParryRay, RayCast};
use parry3d::shape::TriMesh;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Triangle shape used for ray tests in a mesh's local space
pub struct MeshCollider {
    shape: TriMesh,
}

impl MeshCollider {
    /// Build a collider; `None` if the mesh has no valid triangles
    pub fn from_mesh(mesh: &MeshData) -> Option<Self> {
        let vertex_count = mesh.positions.len() as u32;
        let triangles: Vec<[u32; 3]> = mesh
            .triangles()
            .filter(|tri| tri.iter().all(|&i| i < vertex_count))
            .collect();

        if triangles.is_empty() {
            return None;
        }

        let vertices = mesh
            .positions
            .iter()
            .map(|p| Point::new(p[0], p[1], p[2]))
            .collect();

        Some(Self {
            shape: TriMesh::new(vertices, triangles),
        })
    }

    /// Ray parameter of the first hit, with origin and direction given in local space
    ///
    /// The direction does not need to be normalized; the returned parameter is
    /// expressed in multiples of it.
    pub fn cast_local(&self, origin: Vec3, direction: Vec3, max_t: f32) -> Option<f32> {
        let ray = ParryRay::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );
        self.shape.cast_local_ray(&ray, max_t, true)
    }
}

/// The nearest thing under a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub anchor: AnchorId,
    /// Index into the anchor's parts
    pub part: usize,
    /// World-space distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
}

/// Find the nearest anchor part hit by `ray`
///
/// Parts whose mesh has no collider, and anchors still waiting for their
/// geometry, are skipped.
pub fn pick(scene: &Scene, assets: &AssetManager, ray: &Ray) -> Option<PickHit> {
    let mut nearest: Option<PickHit> = None;

    for (id, anchor) in scene.anchors() {
        if !anchor.is_populated() {
            continue;
        }

        let to_local = anchor.part_matrix().inverse();
        if !to_local.is_finite() {
            continue;
        }
        let local_origin = to_local.transform_point3(ray.origin);
        let local_direction = to_local.transform_vector3(ray.direction);

        for (index, part) in anchor.parts.iter().enumerate() {
            let Some(collider) = assets
                .get_mesh(part.mesh)
                .and_then(|mesh| mesh.collider.as_ref())
            else {
                continue;
            };

            let max_t = nearest.map(|hit| hit.distance).unwrap_or(f32::MAX);
            if let Some(t) = collider.cast_local(local_origin, local_direction, max_t) {
                if nearest.map_or(true, |hit| t < hit.distance) {
                    nearest = Some(PickHit {
                        anchor: id,
                        part: index,
                        distance: t,
                        point: ray.at(t),
                    });
                }
            }
        }
    }

    nearest
}
