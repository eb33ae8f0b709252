// Engine modules: assets, audio, scene, picking, input, renderer

pub mod assets;
pub mod audio;
pub mod game_loop;
pub mod input;
pub mod picking;
pub mod renderer;
pub mod scene;
