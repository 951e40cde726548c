//! GPU orchestration for the triple-buffered compute→render loop.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `mesh` holds the immutable fullscreen quad vertex buffer.
//! - `ring` manages the rotating set of compute target textures (arena of
//!   textures plus a pure-index FIFO so rotation stays unit-testable).
//! - `uniforms` keeps one `FrameInput` buffer per in-flight slot so a CPU
//!   write can never race a GPU read of an earlier frame.
//! - `gate` is the counting admission gate bounding frames in flight.
//! - `compute` and `render` wrap the two pipelines and their encoders.
//! - `frame` glues everything together and exposes the per-tick API used by
//!   `window`.

mod compute;
mod context;
mod frame;
mod gate;
mod mesh;
mod render;
mod ring;
mod uniforms;

pub use frame::{FrameError, FrameStatus};
pub use gate::GateError;
pub use ring::RING_DEPTH;

pub(crate) use frame::FrameEngine;
