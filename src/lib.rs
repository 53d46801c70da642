//! Seaswell library - animated ocean-wave surface with a live tuning panel

pub mod animation;
pub mod bindings;
pub mod camera;
pub mod cli;
pub mod color;
pub mod ocean;
pub mod orbit;
pub mod panel;
pub mod params;
pub mod rendering;
pub mod session;
pub mod shader;
pub mod uniforms;
pub mod viewport;
