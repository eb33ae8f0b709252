// Scene description loaded from TOML
//
// Every section is optional; missing values fall back to the built-in
// primitive-shape scene.

use crate::core::math::hex_to_rgb;
use crate::engine::assets::Primitive;
use crate::engine::renderer::Camera;
use crate::engine::scene::{AmbientLight, DirectionalLight, GridHelper};
use glam::Vec3;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    /// Clear color as `0xRRGGBB`
    pub background: u32,
    pub lights: LightsConfig,
    pub grid: GridConfig,
    /// Radians added to every anchor's Y rotation per tick
    pub rotation_speed: f32,
    pub audio: AudioConfig,
    pub flash: FlashConfig,
    pub objects: Vec<ObjectConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightsConfig {
    pub ambient: AmbientConfig,
    pub directional: DirectionalConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectionalConfig {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub enabled: bool,
    pub size: f32,
    pub divisions: u32,
    pub center_color: u32,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub volume: f32,
    /// Resource key to sound file, relative to `<assets>/sounds`
    pub sounds: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlashConfig {
    pub enabled: bool,
    pub color: u32,
    pub duration_ms: u64,
}

/// One anchor in the scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectConfig {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub shape: Option<Primitive>,
    /// OBJ file relative to `<assets>/models`
    pub model: Option<String>,
    /// Used for primitives and for model parts without a material color
    #[serde(default = "default_object_color")]
    pub color: u32,
    /// Key into `[audio.sounds]`
    pub sound: Option<String>,
}

fn default_scale() -> f32 {
    1.0
}

fn default_object_color() -> u32 {
    0xcccccc
}

/// Sound table of the built-in shape scene
fn default_sounds() -> BTreeMap<String, String> {
    [
        ("drum", "drum.wav"),
        ("bell", "bell.wav"),
        ("pluck", "pluck.wav"),
        ("chime", "chime.wav"),
    ]
    .into_iter()
    .map(|(key, file)| (key.to_string(), file.to_string()))
    .collect()
}

impl Default for SceneConfig {
    fn default() -> Self {
        let objects = [
            ("box", Primitive::Box, [0.0, 1.0, 0.0], 0xe74c3c, "drum"),
            ("sphere", Primitive::Sphere, [5.0, 1.0, 5.0], 0x3498db, "bell"),
            ("cone", Primitive::Cone, [-5.0, 1.0, -5.0], 0xf1c40f, "pluck"),
            ("torus", Primitive::Torus, [0.0, 1.0, 10.0], 0x9b59b6, "chime"),
        ]
        .into_iter()
        .map(|(name, shape, position, color, sound)| ObjectConfig {
            name: name.to_string(),
            position,
            scale: 2.0,
            shape: Some(shape),
            model: None,
            color,
            sound: Some(sound.to_string()),
        })
        .collect();

        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            background: 0x222222,
            lights: LightsConfig::default(),
            grid: GridConfig::default(),
            rotation_speed: 0.01,
            audio: AudioConfig::default(),
            flash: FlashConfig::default(),
            objects,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tapstage".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [10.0, 15.0, 20.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient: AmbientConfig::default(),
            directional: DirectionalConfig::default(),
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 0.6,
        }
    }
}

impl Default for DirectionalConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 1.0,
            position: [5.0, 10.0, 7.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 50.0,
            divisions: 50,
            center_color: 0xff0000,
            color: 0x00ff00,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            sounds: default_sounds(),
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: 0xffff00,
            duration_ms: 500,
        }
    }
}

impl SceneConfig {
    /// Read, parse and validate a scene file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject scenes that could never behave as written
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Invalid(format!(
                "audio volume {} is outside 0..=1",
                self.audio.volume
            )));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera clip range {}..{} is empty",
                self.camera.near, self.camera.far
            )));
        }

        for object in &self.objects {
            match (&object.shape, &object.model) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Invalid(format!(
                        "object '{}' has both a shape and a model",
                        object.name
                    )))
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(format!(
                        "object '{}' needs a shape or a model",
                        object.name
                    )))
                }
                _ => {}
            }

            if !(object.scale > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "object '{}' has non-positive scale {}",
                    object.name, object.scale
                )));
            }

            if let Some(key) = &object.sound {
                if !self.audio.sounds.contains_key(key) {
                    return Err(ConfigError::Invalid(format!(
                        "object '{}' uses undeclared sound '{key}'",
                        object.name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from(self.camera.position),
            Vec3::from(self.camera.target),
            self.camera.fov,
            self.camera.near,
            self.camera.far,
        )
    }

    pub fn ambient_light(&self) -> AmbientLight {
        AmbientLight {
            color: hex_to_rgb(self.lights.ambient.color),
            intensity: self.lights.ambient.intensity,
        }
    }

    pub fn directional_light(&self) -> DirectionalLight {
        let light = &self.lights.directional;
        DirectionalLight {
            color: hex_to_rgb(light.color),
            intensity: light.intensity,
            position: Vec3::from(light.position),
            target: Vec3::from(light.target),
        }
    }

    /// `None` when the grid is disabled
    pub fn grid_helper(&self) -> Option<GridHelper> {
        self.grid.enabled.then(|| GridHelper {
            size: self.grid.size,
            divisions: self.grid.divisions,
            center_color: hex_to_rgb(self.grid.center_color),
            color: hex_to_rgb(self.grid.color),
        })
    }

    /// Flash tint and duration in seconds, if flashing is on
    pub fn flash(&self) -> Option<(Vec3, f32)> {
        self.flash.enabled.then(|| {
            (
                hex_to_rgb(self.flash.color),
                self.flash.duration_ms as f32 / 1000.0,
            )
        })
    }
}
