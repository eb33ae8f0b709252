// Asset file lookup and reading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Model,
    Sound,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Model => "models",
            AssetType::Sound => "sounds",
        }
    }

    /// Get supported file extensions for this asset type, lowercase
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Model => &["gltf", "glb", "obj"],
            AssetType::Sound => &["wav", "ogg", "mp3", "flac"],
        }
    }

    /// The supported extension of `name`, if it has one
    pub fn extension_of(&self, name: &str) -> Option<&'static str> {
        let ext = Path::new(name).extension()?.to_string_lossy().to_lowercase();
        self.extensions().iter().copied().find(|e| *e == ext)
    }
}

/// Resolves asset names against the asset root and reads them from disk
///
/// Cheap to clone so each load worker can own one.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Resolve an asset that must exist and carry a supported extension
    pub fn locate(&self, asset_type: AssetType, name: &str) -> Result<PathBuf, AssetError> {
        if asset_type.extension_of(name).is_none() {
            return Err(AssetError::Unsupported(name.to_string()));
        }

        let path = self.resolve_path(asset_type, name);
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }
        Ok(path)
    }

    /// Read an asset's bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.locate(asset_type, name)?;

        std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tapstage-loader-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_asset_type_directories() {
        assert_eq!(AssetType::Model.default_directory(), "models");
        assert_eq!(AssetType::Sound.default_directory(), "sounds");
    }

    #[test]
    fn test_asset_type_extensions() {
        assert!(AssetType::Model.extensions().contains(&"obj"));
        assert!(AssetType::Model.extensions().contains(&"glb"));
        assert!(AssetType::Sound.extensions().contains(&"mp3"));
        assert!(AssetType::Sound.extensions().contains(&"wav"));
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/demo/assets");
        let path = loader.resolve_path(AssetType::Sound, "xmasmusic.mp3");

        assert_eq!(path, PathBuf::from("/demo/assets/sounds/xmasmusic.mp3"));
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let loader = AssetLoader::new(scratch_dir("missing"));
        let err = loader.load_bytes(AssetType::Sound, "nope.wav").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let root = scratch_dir("unsupported");
        std::fs::create_dir_all(root.join("models")).unwrap();
        std::fs::write(root.join("models/scene.fbx"), b"x").unwrap();

        let loader = AssetLoader::new(&root);
        let err = loader.locate(AssetType::Model, "scene.fbx").unwrap_err();
        assert!(matches!(err, AssetError::Unsupported(name) if name == "scene.fbx"));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_extension_matching_ignores_case() {
        assert_eq!(AssetType::Model.extension_of("Santa.GLB"), Some("glb"));
        assert_eq!(AssetType::Model.extension_of("elf.obj"), Some("obj"));
        assert_eq!(AssetType::Sound.extension_of("xmasmusic.mp3"), Some("mp3"));
        assert_eq!(AssetType::Sound.extension_of("noext"), None);
        assert_eq!(AssetType::Sound.extension_of("song.mid"), None);
    }
}
