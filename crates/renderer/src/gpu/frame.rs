use std::fmt;

use anyhow::{Context as AnyhowContext, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use crate::clock::FixedStepClock;
use crate::types::{AdapterProfile, RendererConfig};

use super::compute::ComputeStage;
use super::context::GpuContext;
use super::gate::{AdmissionGate, GateError};
use super::mesh::ScreenMesh;
use super::render::RenderStage;
use super::ring::{TextureRing, RING_DEPTH};
use super::uniforms::{FrameInput, UniformSlots};

/// Outcome of one frame tick.
#[derive(Debug)]
pub enum FrameStatus {
    /// Compute and render both ran; the frame was handed to the compositor.
    Presented,
    /// The surface had no frame to offer this tick. The compute pass was
    /// still submitted and its slot will be released; only presentation was
    /// skipped.
    ComputeOnly(wgpu::SurfaceError),
}

/// Errors that stop the frame loop (as opposed to the soft surface tier).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("device poll failed while waiting for in-flight frames: {0}")]
    Poll(#[from] wgpu::PollError),
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameStatus::Presented => f.write_str("presented"),
            FrameStatus::ComputeOnly(err) => write!(f, "compute only ({err:?})"),
        }
    }
}

/// Orchestrates the per-frame ordering: wait for a buffering slot, update
/// uniforms, encode compute then render, submit, and recycle the slot on GPU
/// completion.
pub(crate) struct FrameEngine {
    context: GpuContext,
    mesh: ScreenMesh,
    ring: TextureRing,
    uniforms: UniformSlots,
    compute: ComputeStage,
    render: RenderStage,
    gate: AdmissionGate,
    clock: FixedStepClock,
}

impl FrameEngine {
    pub(crate) fn new<T>(target: &T, config: &RendererConfig) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let initial_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
        let context = GpuContext::new(target, initial_size, config.gpu_power)?;

        let mesh = ScreenMesh::new(&context.device);
        let ring = TextureRing::new(&context.device, &context.queue, context.size);
        let uniforms = UniformSlots::new(&context.device, RING_DEPTH);
        let compute = ComputeStage::new(&context.device, &context.limits)
            .context("failed to build the compute pipeline")?;
        let render = RenderStage::new(&context.device, context.surface_format)
            .context("failed to build the present pipeline")?;

        Ok(Self {
            context,
            mesh,
            ring,
            uniforms,
            compute,
            render,
            gate: AdmissionGate::new(RING_DEPTH),
            clock: FixedStepClock::default(),
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    /// Produces one frame.
    ///
    /// Waits on the admission gate until fewer than `RING_DEPTH` frames are
    /// in flight, polling the device between attempts so the completion
    /// callbacks that free slots get delivered, then advances simulated time
    /// by one fixed step, writes the
    /// slot's uniform buffer, encodes compute + ring rotation, and — when
    /// the surface can provide a frame — the present pass. The slot returns
    /// to the gate from the GPU completion callback.
    pub(crate) fn render_frame(&mut self, mouse: [f32; 2]) -> Result<FrameStatus, FrameError> {
        let device = &self.context.device;
        let slot = self
            .gate
            .acquire_with(|| device_pump(device))?;
        let sample = self.clock.tick();
        self.uniforms.write(
            &self.context.queue,
            slot,
            &FrameInput {
                mouse,
                reserved: 0.0,
                time: sample.seconds,
            },
        );

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        self.compute.encode(
            &self.context.device,
            &mut encoder,
            self.ring.read_view(),
            self.ring.write_view(),
            self.uniforms.buffer(slot),
            self.ring.extent(),
        );
        self.ring.advance();

        // Presentation is best-effort: a missing surface frame must not stop
        // the compute pass or leak the slot.
        let (frame, status) = match self.context.surface.get_current_texture() {
            Ok(frame) => (Some(frame), FrameStatus::Presented),
            Err(err) => {
                debug!(error = ?err, "surface frame unavailable; skipping present");
                (None, FrameStatus::ComputeOnly(err))
            }
        };

        if let Some(frame) = &frame {
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            self.render.encode(
                &self.context.device,
                &mut encoder,
                &view,
                &self.mesh,
                self.ring.read_view(),
            );
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        self.context
            .queue
            .on_submitted_work_done(self.gate.releaser(slot));

        if let Some(frame) = frame {
            frame.present();
        }

        Ok(status)
    }

    /// Rebuilds the swapchain and the texture ring at the new dimensions.
    ///
    /// Drains the admission gate first, polling the device until every
    /// in-flight frame's completion callback has handed its slot back, so no
    /// GPU work can still reference the old textures when they are dropped.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) -> Result<(), FrameError> {
        let device = &self.context.device;
        let held = self.gate.drain_with(|| device_pump(device))?;
        debug!(
            width = new_size.width,
            height = new_size.height,
            "resizing with all frame slots quiesced"
        );

        self.context.resize(new_size);
        self.ring
            .resize(&self.context.device, &self.context.queue, self.context.size);
        debug_assert_eq!(self.ring.len(), self.gate.capacity());

        for slot in held {
            self.gate.release(slot);
        }
        Ok(())
    }

    /// Handles a surface error reported by a previous tick.
    pub(crate) fn recover_surface(&mut self, err: &wgpu::SurfaceError) -> Result<(), FrameError> {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                warn!(error = ?err, "surface lost; reconfiguring at current size");
                self.resize(self.context.size)
            }
            _ => Ok(()),
        }
    }
}

/// Blocks until the device has made progress and delivered queued completion
/// callbacks. Slot releases ride on those callbacks, so every wait on the
/// admission gate interleaves this with its acquire attempts.
fn device_pump(device: &wgpu::Device) -> Result<(), FrameError> {
    device.poll(wgpu::PollType::Wait)?;
    Ok(())
}
