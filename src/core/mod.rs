// Core helpers shared by the engine and the application

pub mod math;
