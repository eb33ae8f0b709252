// Background asset preloading
//
// Every request runs on its own worker thread. Completed loads are handed back
// over a channel and applied by the main loop when it polls, so nothing outside
// this module ever touches a worker thread.

use super::model::{self, ModelPart};
use super::{AssetError, AssetLoader, AssetType};
use crate::engine::audio::AudioClip;
use crate::engine::scene::AnchorId;
use std::sync::mpsc::{self, Receiver, Sender};

/// Something to load in the background
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Decode a sound file and cache it under `key`
    Sound { key: String, file: String },
    /// Parse a model file and attach it to `anchor`
    Model { anchor: AnchorId, file: String },
}

/// Outcome of one [`LoadRequest`]
#[derive(Debug)]
pub enum LoadEvent {
    SoundLoaded {
        key: String,
        clip: AudioClip,
    },
    SoundFailed {
        key: String,
        error: AssetError,
    },
    ModelLoaded {
        anchor: AnchorId,
        file: String,
        parts: Vec<ModelPart>,
    },
    ModelFailed {
        anchor: AnchorId,
        file: String,
        error: AssetError,
    },
}

/// Fire-and-forget loader with results collected on the main thread
pub struct LoadQueue {
    loader: AssetLoader,
    sender: Sender<LoadEvent>,
    receiver: Receiver<LoadEvent>,
    requested: usize,
    completed: usize,
}

impl LoadQueue {
    pub fn new(loader: AssetLoader) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            loader,
            sender,
            receiver,
            requested: 0,
            completed: 0,
        }
    }

    /// Start loading in the background; the result arrives through [`poll`](Self::poll)
    pub fn request(&mut self, request: LoadRequest) {
        self.requested += 1;

        let loader = self.loader.clone();
        let sender = self.sender.clone();
        let thread_name = match &request {
            LoadRequest::Sound { key, .. } => format!("load-sound-{}", key),
            LoadRequest::Model { file, .. } => format!("load-model-{}", file),
        };

        let spawned = std::thread::Builder::new()
            .name(thread_name)
            .spawn({
                let request = request.clone();
                move || {
                    // The receiver only disappears on shutdown; nothing to report to then.
                    let _ = sender.send(run_request(&loader, request));
                }
            });

        if let Err(e) = spawned {
            let error = AssetError::Io(e);
            let event = match request {
                LoadRequest::Sound { key, .. } => LoadEvent::SoundFailed { key, error },
                LoadRequest::Model { anchor, file } => LoadEvent::ModelFailed {
                    anchor,
                    file,
                    error,
                },
            };
            let _ = self.sender.send(event);
        }
    }

    /// Collect every load that finished since the last poll, logging each outcome
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.receiver.try_iter().collect();
        self.completed += events.len();

        for event in &events {
            match event {
                LoadEvent::SoundLoaded { key, clip } => {
                    log::info!(
                        "Audio loaded for {} ({:.1}s, {} Hz, {} ch)",
                        key,
                        clip.duration().as_secs_f32(),
                        clip.sample_rate(),
                        clip.channels()
                    );
                }
                LoadEvent::SoundFailed { key, error } => {
                    log::error!("Error loading audio file for {}: {}", key, error);
                }
                LoadEvent::ModelLoaded { file, parts, .. } => {
                    log::info!("Model loaded: {} ({} parts)", file, parts.len());
                }
                LoadEvent::ModelFailed { file, error, .. } => {
                    log::error!("Error loading model file {}: {}", file, error);
                }
            }
        }

        events
    }

    /// Requests that have not reported back yet
    pub fn pending(&self) -> usize {
        self.requested - self.completed
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

fn run_request(loader: &AssetLoader, request: LoadRequest) -> LoadEvent {
    match request {
        LoadRequest::Sound { key, file } => {
            let result = loader
                .load_bytes(AssetType::Sound, &file)
                .and_then(|bytes| AudioClip::decode(bytes).map_err(AssetError::from));
            match result {
                Ok(clip) => LoadEvent::SoundLoaded { key, clip },
                Err(error) => LoadEvent::SoundFailed { key, error },
            }
        }
        LoadRequest::Model { anchor, file } => {
            match model::load_model(loader, &file) {
                Ok(parts) => LoadEvent::ModelLoaded {
                    anchor,
                    file,
                    parts,
                },
                Err(error) => LoadEvent::ModelFailed {
                    anchor,
                    file,
                    error,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::model::tests::triangle_glb;
    use crate::engine::audio::clip::tests::wav_bytes;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn scratch_assets(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("tapstage-preload-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("sounds")).unwrap();
        std::fs::create_dir_all(root.join("models")).unwrap();
        root
    }

    fn drain(queue: &mut LoadQueue) -> Vec<LoadEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while !queue.is_idle() && Instant::now() < deadline {
            events.extend(queue.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_loads_and_failures_are_independent() {
        let root = scratch_assets("mixed");
        std::fs::write(root.join("sounds/ok.wav"), wav_bytes(1, 8000, &[0; 800])).unwrap();
        std::fs::write(root.join("sounds/broken.wav"), b"garbage").unwrap();

        let mut queue = LoadQueue::new(AssetLoader::new(&root));
        for (key, file) in [("ok", "ok.wav"), ("broken", "broken.wav"), ("missing", "missing.wav")] {
            queue.request(LoadRequest::Sound {
                key: key.into(),
                file: file.into(),
            });
        }
        assert_eq!(queue.pending(), 3);

        let events = drain(&mut queue);
        assert!(queue.is_idle());
        assert_eq!(events.len(), 3);

        let loaded: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                LoadEvent::SoundLoaded { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(loaded, vec!["ok"]);

        let mut failed: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                LoadEvent::SoundFailed { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        failed.sort();
        assert_eq!(failed, vec!["broken", "missing"]);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_model_request_reports_parts() {
        let root = scratch_assets("model");
        std::fs::write(
            root.join("models/quad.obj"),
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mut queue = LoadQueue::new(AssetLoader::new(&root));
        queue.request(LoadRequest::Model {
            anchor: AnchorId(3),
            file: "quad.obj".into(),
        });
        queue.request(LoadRequest::Model {
            anchor: AnchorId(4),
            file: "absent.obj".into(),
        });

        let events = drain(&mut queue);
        assert_eq!(events.len(), 2);
        for event in events {
            match event {
                LoadEvent::ModelLoaded { anchor, parts, .. } => {
                    assert_eq!(anchor, AnchorId(3));
                    assert_eq!(parts[0].mesh.triangle_count(), 2);
                }
                LoadEvent::ModelFailed { anchor, .. } => assert_eq!(anchor, AnchorId(4)),
                other => panic!("unexpected event {:?}", other),
            }
        }

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_glb_model_request() {
        let root = scratch_assets("glb");
        std::fs::write(root.join("models/tri.glb"), triangle_glb()).unwrap();

        let mut queue = LoadQueue::new(AssetLoader::new(&root));
        queue.request(LoadRequest::Model {
            anchor: AnchorId(0),
            file: "tri.glb".into(),
        });

        match drain(&mut queue).pop() {
            Some(LoadEvent::ModelLoaded { parts, file, .. }) => {
                assert_eq!(file, "tri.glb");
                assert_eq!(parts.len(), 1);
                assert!(parts[0].color.is_some());
            }
            other => panic!("unexpected event {:?}", other),
        }

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_poll_without_requests_is_empty() {
        let mut queue = LoadQueue::new(AssetLoader::new("."));
        assert!(queue.poll().is_empty());
        assert!(queue.is_idle());
    }
}
