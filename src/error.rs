//! Error types for setup and configuration.
//!
//! Frame ticks never fail; only mounting a background (GPU setup, parsing
//! configuration) can.

use thiserror::Error;

/// Errors raised while bringing up the GPU pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("GPU is out of memory")]
    OutOfMemory,
}

/// Errors raised while validating static configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid hex color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("wave palette must contain at least one color")]
    EmptyPalette,

    #[error("wave opacity {0} is outside 0..=1")]
    OpacityOutOfRange(f32),

    #[error("unknown background '{0}', expected surface, cluster or wave")]
    UnknownBackground(String),

    #[error("unknown speed preset '{0}', expected slow or fast")]
    UnknownSpeed(String),
}

/// Top-level error for the binary
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
