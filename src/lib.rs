//! Emberglow library - animated ambient backgrounds

pub mod background;
pub mod cluster;
pub mod color;
pub mod error;
pub mod frame;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod surface;
pub mod wave;
