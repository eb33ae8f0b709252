use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod app;
mod config;
mod core;
mod engine;

use app::{App, FrameOutcome};
use config::SceneConfig;
use engine::audio::{AudioBackend, RodioBackend};
use engine::renderer::Renderer;

/// Frames between debug status lines
const STATUS_INTERVAL: u64 = 600;

#[derive(Parser)]
#[command(name = "tapstage")]
#[command(about = "Tap or click the objects in a 3D scene to hear them")]
struct Args {
    /// Scene description (TOML); the built-in shape scene is used when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Asset root containing `sounds/` and `models/`
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let config = match &args.scene {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => SceneConfig::default(),
    };

    info!("Starting Tapstage...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    renderer.set_clear_color(config.background);
    renderer.set_grid(config.grid_helper().as_ref());

    let backend: Option<Box<dyn AudioBackend>> = match RodioBackend::try_default() {
        Ok(backend) => Some(Box::new(backend)),
        Err(e) => {
            warn!("{}; running without sound", e);
            None
        }
    };

    if !args.assets.is_dir() {
        warn!(
            "Asset directory {} does not exist; every load will fail",
            args.assets.display()
        );
    }

    let mut app = App::new(config, &args.assets, backend);
    let size = window.inner_size();
    app.resize(size.width, size.height);

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                    app.resize(physical_size.width, physical_size.height);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    app.input_mut().process_keyboard_event(&event);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.input_mut()
                        .pointer_mut()
                        .on_cursor_moved(position.x, position.y);
                }
                WindowEvent::CursorLeft { .. } => {
                    app.input_mut().pointer_mut().on_cursor_left();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    app.input_mut().pointer_mut().on_mouse_input(state, button);
                }
                WindowEvent::Touch(touch) => {
                    app.input_mut().pointer_mut().on_touch(
                        touch.phase,
                        touch.location.x,
                        touch.location.y,
                    );
                }
                WindowEvent::RedrawRequested => {
                    if app.frame() == FrameOutcome::Quit {
                        info!("Quit requested, shutting down...");
                        elwt.exit();
                        return;
                    }

                    if app.frame_count() % STATUS_INTERVAL == 0 {
                        debug!(
                            "{}, {} meshes on GPU",
                            app.status(),
                            renderer.uploaded_meshes()
                        );
                    }

                    match renderer.render(app.scene(), app.assets(), app.camera()) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("GPU out of memory, shutting down");
                            elwt.exit();
                        }
                        Err(e) => warn!("Dropped frame: {}", e),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
