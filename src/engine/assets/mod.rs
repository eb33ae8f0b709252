// Asset management system
//
// Provides asset lookup on disk, background preloading, and a registry of
// meshes shared by the renderer and the picking code.

mod handle;
mod loader;
mod manager;
pub mod mesh;
pub mod model;
pub mod preload;

pub use handle::{AssetHandle, AssetId, MeshHandle};
pub use loader::{AssetLoader, AssetType};
pub use manager::AssetManager;
pub use mesh::{MeshData, Primitive};
pub use model::ModelPart;
pub use preload::{LoadEvent, LoadQueue, LoadRequest};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Unsupported asset format: {0}")]
    Unsupported(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("Failed to decode audio: {0}")]
    Audio(#[from] crate::engine::audio::AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("sounds/santa.mp3".to_string());
        assert_eq!(err.to_string(), "Asset not found: sounds/santa.mp3");
    }
}
