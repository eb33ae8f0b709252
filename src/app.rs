// Application state: wires the scene, loads, input and audio together
//
// Everything here runs on the main thread. Background loads only reach the
// scene through `poll_loads`.

use crate::config::{ObjectConfig, SceneConfig};
use crate::core::math::hex_to_rgb;
use crate::engine::assets::{AssetManager, LoadEvent, LoadQueue, LoadRequest, ModelPart};
use crate::engine::audio::{AudioBackend, AudioCache, PlayOutcome, SoundPlayer};
use crate::engine::game_loop::{FrameTicks, GameLoop};
use crate::engine::input::{Action, InputManager, PointerPress};
use crate::engine::picking::{self, PickHit};
use crate::engine::renderer::Camera;
use crate::engine::scene::{AnchorDesc, AnchorId, Scene};
use glam::Vec3;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Whether the event loop should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct App {
    config: SceneConfig,
    scene: Scene,
    assets: AssetManager,
    loads: LoadQueue,
    sounds: AudioCache,
    player: SoundPlayer<AnchorId>,
    camera: Camera,
    game_loop: GameLoop,
    input: InputManager,
    /// Color for model parts that come without a material color
    fallback_colors: HashMap<AnchorId, Vec3>,
}

impl App {
    /// Build the scene and start every background load
    ///
    /// `backend` is `None` when no audio device is available; picks then
    /// still resolve but stay silent.
    pub fn new(
        config: SceneConfig,
        asset_root: impl AsRef<Path>,
        backend: Option<Box<dyn AudioBackend>>,
    ) -> Self {
        let assets = AssetManager::new(asset_root);
        let loads = LoadQueue::new(assets.loader().clone());

        let mut camera = config.camera();
        camera.resize(config.window.width as f32, config.window.height as f32);

        let scene = Scene::new(
            config.ambient_light(),
            config.directional_light(),
            config.grid_helper(),
        );

        let mut app = Self {
            player: SoundPlayer::new(backend, config.audio.volume),
            scene,
            assets,
            loads,
            sounds: AudioCache::new(),
            camera,
            game_loop: GameLoop::new(),
            input: InputManager::new(),
            fallback_colors: HashMap::new(),
            config,
        };

        for (key, file) in &app.config.audio.sounds {
            app.loads.request(LoadRequest::Sound {
                key: key.clone(),
                file: file.clone(),
            });
        }

        let objects = app.config.objects.clone();
        for object in &objects {
            app.spawn_object(object);
        }

        info!(
            "Scene ready: {} objects, {} loads in flight",
            app.scene.anchor_count(),
            app.loads.pending()
        );

        app
    }

    /// Create the anchor for one object; primitives are filled in immediately
    fn spawn_object(&mut self, object: &ObjectConfig) -> AnchorId {
        let id = self.scene.create_anchor(AnchorDesc {
            name: object.name.clone(),
            position: Vec3::from(object.position),
            scale: object.scale,
            sound_key: object.sound.clone(),
        });
        let color = hex_to_rgb(object.color);

        if let Some(shape) = object.shape {
            let mesh = self.assets.get_or_add_mesh(shape.asset_name(), || shape.build());
            self.scene.attach_mesh(id, mesh, color);
        } else if let Some(file) = &object.model {
            self.fallback_colors.insert(id, color);
            self.loads.request(LoadRequest::Model {
                anchor: id,
                file: file.clone(),
            });
        }

        id
    }

    /// Apply every finished background load; returns how many arrived
    pub fn poll_loads(&mut self) -> usize {
        let events = self.loads.poll();
        let count = events.len();
        for event in events {
            self.apply_load_event(event);
        }
        count
    }

    fn apply_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::SoundLoaded { key, clip } => {
                if let Err(e) = self.sounds.insert(key, clip) {
                    warn!("{}", e);
                }
            }
            LoadEvent::ModelLoaded {
                anchor,
                file,
                parts,
            } => self.attach_model(anchor, &file, parts),
            // Already logged by the queue; the key or anchor simply stays empty
            LoadEvent::SoundFailed { .. } | LoadEvent::ModelFailed { .. } => {}
        }
    }

    fn attach_model(&mut self, anchor: AnchorId, file: &str, parts: Vec<ModelPart>) {
        let fallback = self
            .fallback_colors
            .get(&anchor)
            .copied()
            .unwrap_or(Vec3::ONE);

        for (index, part) in parts.into_iter().enumerate() {
            let ModelPart { mesh, color, .. } = part;
            let handle = self
                .assets
                .get_or_add_mesh(&format!("{}#{}", file, index), move || mesh);
            self.scene
                .attach_mesh(anchor, handle, color.unwrap_or(fallback));
        }
    }

    /// Pick under a press and play the hit anchor's sound
    ///
    /// Returns the hit, whether or not anything was played.
    pub fn handle_press(&mut self, press: PointerPress) -> Option<PickHit> {
        let ray = self.camera.ray_from_screen(press.position);
        let Some(hit) = picking::pick(&self.scene, &self.assets, &ray) else {
            debug!("Press at {} hit nothing", press.position);
            return None;
        };

        let (name, sound_key) = match self.scene.anchor(hit.anchor) {
            Some(anchor) => (anchor.name.clone(), anchor.sound_key.clone()),
            None => return Some(hit),
        };
        debug!("Picked '{}' at distance {:.2}", name, hit.distance);

        if let Some(key) = sound_key {
            match self.sounds.get(&key) {
                Some(clip) => match self.player.play_once(hit.anchor, clip) {
                    PlayOutcome::Started => info!("Audio playing for {}", name),
                    PlayOutcome::AlreadyPlaying => debug!("'{}' is still playing", name),
                    PlayOutcome::NoOutput => debug!("No audio output, '{}' stays silent", name),
                    PlayOutcome::Failed => {}
                },
                None => debug!("Sound '{}' for '{}' is not loaded", key, name),
            }
        }

        if let Some((color, duration)) = self.config.flash() {
            self.scene.flash_part(hit.anchor, hit.part, color, duration);
        }

        Some(hit)
    }

    /// Run one frame of logic against the wall clock
    pub fn frame(&mut self) -> FrameOutcome {
        self.poll_loads();

        for action in self.input.drain_actions() {
            match action {
                Action::Quit => return FrameOutcome::Quit,
                Action::TogglePause => self.game_loop.toggle_pause(),
            }
        }

        for press in self.input.drain_presses() {
            self.handle_press(press);
        }

        let frame = self.game_loop.begin_frame();
        self.step(frame);

        FrameOutcome::Continue
    }

    /// Advance rotation by the frame's ticks and timers by its wall time
    pub fn step(&mut self, frame: FrameTicks) {
        for _ in 0..frame.ticks {
            self.scene.rotate_anchors(self.config.rotation_speed);
        }
        self.scene.update_flashes(frame.delta);
        self.player.update();
    }

    /// Track the window size for picking and projection
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width as f32, height as f32);
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn sounds(&self) -> &AudioCache {
        &self.sounds
    }

    pub fn loads(&self) -> &LoadQueue {
        &self.loads
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    pub fn is_paused(&self) -> bool {
        self.game_loop.is_paused()
    }

    pub fn frame_count(&self) -> u64 {
        self.game_loop.frame_count()
    }

    /// One-line summary for periodic debug logging
    pub fn status(&self) -> String {
        let stats = self.assets.stats();
        format!(
            "{:.0} fps, {} ticks, {} meshes ({} triangles), {}/{} sounds, {} voices{}, {} loads pending",
            self.game_loop.fps(),
            self.game_loop.tick_count(),
            stats.mesh_count,
            stats.triangle_count,
            self.sounds.len(),
            self.config.audio.sounds.len(),
            self.player.active_voices(),
            if self.player.has_output() { "" } else { " (muted)" },
            self.loads.pending(),
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.player.stop_all();
    }
}
