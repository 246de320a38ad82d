//! Renderer crate for waveshade.
//!
//! The crate animates a GPU-shaded wave plane and eases two light parameters
//! (brightness, falloff range) toward targets driven by a boolean "enhanced"
//! signal. The overall flow is:
//!
//! ```text
//!   CLI / waveshade
//!          │ RendererConfig
//!          ▼
//!   renderer::run ──▶ winit event loop ──▶ RenderLoop::frame()
//!          ▲               │                      │ FrameUpdate
//!          │               │ hover / resize       ▼
//!          │               └─▶ SignalBridge   GpuState::render() ─▶ GPU UBO
//!          │                   ViewportController
//! ```
//!
//! `GpuState` owns the camera, the wave mesh, and all GPU resources; the
//! `RenderLoop` owns the clock and the smoothing state and is the only code
//! that steps it. The hover signal and resize notifications mutate shared
//! state synchronously between frames; there is no cross-thread rendering
//! state and therefore no locking.

mod compile;
mod gpu;
mod scene;
mod signal;
mod smoothing;
mod viewport;
mod window;

pub mod runtime;
pub mod types;

pub use scene::Camera;
pub use signal::SignalBridge;
pub use smoothing::{LightSmoothing, SmoothedParameter};
pub use types::{Antialiasing, RendererConfig};
pub use viewport::ViewportController;
pub use window::run;

/// Errors that are fatal while mounting the surface.
///
/// Nothing in steady-state per-frame execution produces errors; after a
/// successful mount the only recoverable conditions are swapchain hiccups
/// handled inside the windowed host.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A shader stage failed to parse or validate.
    #[error("{stage} shader failed to compile: {message}")]
    ShaderCompile {
        stage: &'static str,
        message: String,
    },
    /// The graphics stack could not be brought up (surface, adapter, device).
    #[error("graphics setup failed: {0}")]
    Graphics(#[source] anyhow::Error),
}
