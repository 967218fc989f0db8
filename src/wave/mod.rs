//! Painterly wave canvas: blurred, translucent noise strokes.

mod canvas;
mod system;

// Re-export public types
pub use canvas::{CoverageMask, WaveCanvas};
pub use system::{ColorWaveField, WaveFrame, WaveState};
