// Scene graph: anchors holding meshes, plus lights and the ground grid
//
// Anchors are the only top-level objects that move. Lights and the grid are
// stored separately so the per-frame spin never touches them.

mod grid;
mod light;
mod transform;

pub use grid::{GridHelper, GridLine};
pub use light::{AmbientLight, DirectionalLight};
pub use transform::Transform;

use crate::engine::assets::MeshHandle;
use glam::{Mat4, Vec3};

/// Stable index of an anchor within its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub(crate) usize);

/// A mesh drawn inside an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub mesh: MeshHandle,
    /// Color the part returns to after a flash (sRGB)
    pub base_color: Vec3,
    /// Color currently drawn (sRGB)
    pub color: Vec3,
    flash_remaining: Option<f32>,
}

impl MeshInstance {
    pub fn new(mesh: MeshHandle, color: Vec3) -> Self {
        Self {
            mesh,
            base_color: color,
            color,
            flash_remaining: None,
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_remaining.is_some()
    }
}

/// Positioned container that receives geometry once it is available
#[derive(Debug, Clone)]
pub struct Anchor {
    pub name: String,
    pub transform: Transform,
    /// Uniform scale applied to the meshes, not to the anchor itself
    pub model_scale: f32,
    /// Resource key of the sound played when the anchor is picked
    pub sound_key: Option<String>,
    pub parts: Vec<MeshInstance>,
}

impl Anchor {
    /// World matrix of the meshes inside this anchor
    pub fn part_matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(Vec3::splat(self.model_scale))
    }

    /// True once geometry has been attached
    pub fn is_populated(&self) -> bool {
        !self.parts.is_empty()
    }
}

/// What to create with [`Scene::create_anchor`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDesc {
    pub name: String,
    pub position: Vec3,
    pub scale: f32,
    pub sound_key: Option<String>,
}

pub struct Scene {
    anchors: Vec<Anchor>,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub grid: Option<GridHelper>,
}

impl Scene {
    pub fn new(ambient: AmbientLight, directional: DirectionalLight, grid: Option<GridHelper>) -> Self {
        Self {
            anchors: Vec::new(),
            ambient,
            directional,
            grid,
        }
    }

    /// Add an empty anchor at the given position
    pub fn create_anchor(&mut self, desc: AnchorDesc) -> AnchorId {
        let id = AnchorId(self.anchors.len());
        self.anchors.push(Anchor {
            name: desc.name,
            transform: Transform::from_position(desc.position),
            model_scale: desc.scale,
            sound_key: desc.sound_key,
            parts: Vec::new(),
        });
        id
    }

    /// Put a mesh into an anchor; returns false if the anchor does not exist
    pub fn attach_mesh(&mut self, anchor: AnchorId, mesh: MeshHandle, color: Vec3) -> bool {
        match self.anchors.get_mut(anchor.0) {
            Some(a) => {
                a.parts.push(MeshInstance::new(mesh, color));
                true
            }
            None => false,
        }
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.0)
    }

    /// All anchors with their ids, in creation order
    pub fn anchors(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors.iter().enumerate().map(|(i, a)| (AnchorId(i), a))
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Spin every anchor around Y by `step` radians; grid and lights stay put
    pub fn rotate_anchors(&mut self, step: f32) {
        for anchor in &mut self.anchors {
            anchor.transform.rotate_y(step);
        }
    }

    /// Tint one part with `color` for `duration` seconds
    ///
    /// Flashing a part that is already flashing restarts its timer.
    pub fn flash_part(&mut self, anchor: AnchorId, part: usize, color: Vec3, duration: f32) {
        let Some(instance) = self
            .anchors
            .get_mut(anchor.0)
            .and_then(|a| a.parts.get_mut(part))
        else {
            return;
        };

        instance.color = color;
        instance.flash_remaining = Some(duration.max(0.0));
    }

    /// Advance flash timers, restoring base colors when they run out
    pub fn update_flashes(&mut self, dt: f32) {
        for instance in self.anchors.iter_mut().flat_map(|a| a.parts.iter_mut()) {
            if let Some(remaining) = instance.flash_remaining {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    instance.flash_remaining = None;
                    instance.color = instance.base_color;
                } else {
                    instance.flash_remaining = Some(remaining);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::assets::{AssetManager, Primitive};
    use approx::assert_relative_eq;

    pub(crate) fn empty_scene() -> Scene {
        Scene::new(
            AmbientLight {
                color: Vec3::ONE,
                intensity: 0.6,
            },
            DirectionalLight {
                color: Vec3::ONE,
                intensity: 1.0,
                position: Vec3::new(5.0, 10.0, 7.0),
                target: Vec3::ZERO,
            },
            Some(GridHelper {
                size: 50.0,
                divisions: 50,
                center_color: Vec3::X,
                color: Vec3::Y,
            }),
        )
    }

    fn desc(name: &str, position: Vec3) -> AnchorDesc {
        AnchorDesc {
            name: name.into(),
            position,
            scale: 1.0,
            sound_key: None,
        }
    }

    #[test]
    fn test_create_anchor_is_empty_until_attached() {
        let mut assets = AssetManager::new(".");
        let mut scene = empty_scene();

        let id = scene.create_anchor(desc("santa", Vec3::ZERO));
        assert!(!scene.anchor(id).unwrap().is_populated());

        let mesh = assets.get_or_add_mesh("box", || Primitive::Box.build());
        assert!(scene.attach_mesh(id, mesh, Vec3::ONE));
        assert!(scene.anchor(id).unwrap().is_populated());
    }

    #[test]
    fn test_attach_to_unknown_anchor() {
        let mut assets = AssetManager::new(".");
        let mut scene = empty_scene();
        let mesh = assets.get_or_add_mesh("box", || Primitive::Box.build());
        assert!(!scene.attach_mesh(AnchorId(9), mesh, Vec3::ONE));
    }

    #[test]
    fn test_rotation_skips_grid_and_lights() {
        let mut scene = empty_scene();
        let a = scene.create_anchor(desc("a", Vec3::ZERO));
        let b = scene.create_anchor(desc("b", Vec3::X));
        let grid_before = scene.grid;
        let light_before = scene.directional;

        for _ in 0..10 {
            scene.rotate_anchors(0.01);
        }

        assert_relative_eq!(scene.anchor(a).unwrap().transform.rotation.y, 0.1, epsilon = 1e-5);
        assert_relative_eq!(scene.anchor(b).unwrap().transform.rotation.y, 0.1, epsilon = 1e-5);
        assert_eq!(scene.grid, grid_before);
        assert_eq!(scene.directional, light_before);
    }

    #[test]
    fn test_part_matrix_applies_model_scale() {
        let mut scene = empty_scene();
        let id = scene.create_anchor(AnchorDesc {
            scale: 2.0,
            ..desc("big", Vec3::new(0.0, 1.0, 0.0))
        });
        let p = scene.anchor(id).unwrap().part_matrix().transform_point3(Vec3::X);
        assert_eq!(p, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_flash_restores_after_delay() {
        let mut assets = AssetManager::new(".");
        let mut scene = empty_scene();
        let id = scene.create_anchor(desc("a", Vec3::ZERO));
        let mesh = assets.get_or_add_mesh("box", || Primitive::Box.build());
        scene.attach_mesh(id, mesh, Vec3::new(0.2, 0.4, 0.6));

        scene.flash_part(id, 0, Vec3::ONE, 0.5);
        let part = &scene.anchor(id).unwrap().parts[0];
        assert_eq!(part.color, Vec3::ONE);
        assert!(part.is_flashing());

        scene.update_flashes(0.3);
        assert_eq!(scene.anchor(id).unwrap().parts[0].color, Vec3::ONE);

        scene.update_flashes(0.3);
        let part = &scene.anchor(id).unwrap().parts[0];
        assert_eq!(part.color, Vec3::new(0.2, 0.4, 0.6));
        assert!(!part.is_flashing());
    }

    #[test]
    fn test_flash_missing_part_is_ignored() {
        let mut scene = empty_scene();
        let id = scene.create_anchor(desc("a", Vec3::ZERO));
        scene.flash_part(id, 3, Vec3::ONE, 0.5);
        scene.update_flashes(1.0);
        assert!(!scene.anchor(id).unwrap().is_populated());
    }
}
