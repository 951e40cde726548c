//! Renderer crate for the Seascape demo.
//!
//! The module glues the preview window, the `wgpu` compute/render pipelines,
//! and the frame pacing machinery together. The overall flow is:
//!
//! ```text
//!   CLI / seascape
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ winit event loop ──▶ FrameEngine::render_frame()
//!                                                │
//!              admission gate ◀── GPU completion ┘
//! ```
//!
//! Each redraw tick acquires a slot from a counting admission gate sized to
//! the texture ring depth, steps simulated time by a fixed 1/60 s, encodes a
//! compute pass that writes the next ring texture, rotates the ring, and
//! draws the freshly written texture onto a fullscreen quad. The slot is
//! handed back when the GPU reports the submission complete, so the CPU can
//! never run more than the buffering depth ahead of the GPU.

mod clock;
mod compile;
mod gpu;
mod types;
mod window;

pub use clock::{FixedStepClock, TimeSample, TIME_STEP};
pub use gpu::{FrameError, FrameStatus, GateError, RING_DEPTH};
pub use types::{AdapterProfile, GpuPowerPreference, RendererConfig};

use anyhow::Result;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the frame engine; `Renderer` simply spins
/// up the window runtime and forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the demo window and drives the `winit` event loop until the
    /// window is closed or a fatal GPU error occurs.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
