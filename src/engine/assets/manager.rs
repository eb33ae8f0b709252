// Central registry of meshes shared by rendering and picking

use super::mesh::MeshData;
use super::{AssetHandle, AssetId, AssetLoader, MeshHandle};
use crate::engine::picking::MeshCollider;
use std::collections::HashMap;
use std::path::Path;

/// A registered mesh together with its ray-cast shape
pub struct Mesh {
    pub data: MeshData,
    /// `None` when the mesh has no usable triangles
    pub collider: Option<MeshCollider>,
}

/// Owns the asset loader and every mesh in the scene
///
/// Meshes are registered once by name; the GPU side uploads them lazily
/// by handle.
pub struct AssetManager {
    loader: AssetLoader,

    meshes: HashMap<AssetId, Mesh>,

    /// Name to ID mapping for meshes
    mesh_names: HashMap<String, AssetId>,
}

impl AssetManager {
    /// Create a new asset manager rooted at `asset_path`
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            meshes: HashMap::new(),
            mesh_names: HashMap::new(),
        }
    }

    /// Return the existing handle for `name`, or build and register the mesh
    pub fn get_or_add_mesh(&mut self, name: &str, build: impl FnOnce() -> MeshData) -> MeshHandle {
        if let Some(handle) = self.mesh_handle(name) {
            return handle;
        }

        let data = build();
        let collider = MeshCollider::from_mesh(&data);
        let id = AssetId::from_name(name);
        self.meshes.insert(id, Mesh { data, collider });
        self.mesh_names.insert(name.to_string(), id);
        AssetHandle::new(id)
    }

    /// Look up a mesh handle by name
    pub fn mesh_handle(&self, name: &str) -> Option<MeshHandle> {
        self.mesh_names.get(name).map(|&id| AssetHandle::new(id))
    }

    /// Get a mesh by handle
    pub fn get_mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(&handle.id())
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Get statistics about registered assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            mesh_count: self.meshes.len(),
            triangle_count: self.meshes.values().map(|m| m.data.triangle_count()).sum(),
        }
    }
}

/// Statistics about registered assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub mesh_count: usize,
    pub triangle_count: usize,
}
