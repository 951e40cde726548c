use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::gpu::{FrameEngine, FrameStatus};
use crate::types::RendererConfig;

/// Opens the demo window and drives the `winit` event loop.
///
/// The window is the surface adapter of the core: it delivers one
/// `RedrawRequested` per produced frame, reports resizes, and samples the
/// pointer with last-value semantics. Requesting the next redraw right after
/// presenting lets the Fifo swapchain pace the loop at the display refresh.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create demo window")?;
    let window = Arc::new(window);

    let mut engine = FrameEngine::new(window.as_ref(), config)
        .context("failed to initialise the frame engine")?;
    info!(
        adapter = %engine.adapter_profile().name,
        backend = ?engine.adapter_profile().backend,
        width = engine.size().width,
        height = engine.size().height,
        "seascape renderer ready"
    );

    let mut mouse = MouseState::default();
    window.request_redraw();

    let mut result = Ok(());
    let run_result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    mouse.handle_cursor_moved(position);
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = engine.resize(new_size) {
                        error!(error = %err, "resize failed; shutting down");
                        elwt.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged {
                    mut inner_size_writer,
                    ..
                } => {
                    let _ = inner_size_writer.request_inner_size(engine.size());
                }
                WindowEvent::RedrawRequested => {
                    let input = mouse.as_input(engine.size().height.max(1) as f32);
                    match engine.render_frame(input) {
                        Ok(FrameStatus::Presented) => {
                            window.request_redraw();
                        }
                        Ok(FrameStatus::ComputeOnly(surface_err)) => match surface_err {
                            wgpu::SurfaceError::OutOfMemory => {
                                error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            other => {
                                if let Err(err) = engine.recover_surface(&other) {
                                    error!(error = %err, "surface recovery failed");
                                    elwt.exit();
                                } else {
                                    window.request_redraw();
                                }
                            }
                        },
                        Err(err) => {
                            error!(error = %err, "frame production failed");
                            elwt.exit();
                        }
                    }
                }
                _ => {}
            },
            _ => {}
        }
    });

    if let Err(err) = run_result {
        result = Err(anyhow::anyhow!("window event loop error: {err}"));
    }

    result
}

/// Last-value pointer sampling; no event queue.
#[derive(Default)]
struct MouseState {
    position: Option<PhysicalPosition<f64>>,
}

impl MouseState {
    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.position = Some(position);
    }

    /// Pointer position with the Y axis flipped to the shader's bottom-left
    /// origin.
    fn as_input(&self, height: f32) -> [f32; 2] {
        match self.position {
            Some(pos) => [pos.x as f32, height - pos.y as f32],
            None => [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_defaults_to_origin() {
        let mouse = MouseState::default();
        assert_eq!(mouse.as_input(720.0), [0.0, 0.0]);
    }

    #[test]
    fn mouse_flips_y_to_shader_orientation() {
        let mut mouse = MouseState::default();
        mouse.handle_cursor_moved(PhysicalPosition::new(100.0, 20.0));
        assert_eq!(mouse.as_input(720.0), [100.0, 700.0]);
    }
}
