use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{error, info, trace, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{RenderLoop, SystemTimeSource};
use crate::signal::SignalBridge;
use crate::smoothing::LightSmoothing;
use crate::types::RendererConfig;
use crate::viewport::ViewportController;
use crate::SetupError;

/// Aggregates the mounted surface, the render loop, and the event bridges.
///
/// Everything here lives and dies together: the runtime is created when the
/// surface mounts and [`dispose`](WaveRuntime::dispose) tears it down in
/// order (loop first, GPU resources second, surface last). The resize and
/// signal handlers are match arms on the event loop that owns the runtime,
/// so neither can outlive the resources it mutates.
struct WaveRuntime {
    window: Arc<Window>,
    gpu: Option<GpuState>,
    render_loop: RenderLoop,
    viewport: ViewportController,
    bridge: SignalBridge,
}

impl WaveRuntime {
    fn mount(window: Arc<Window>, config: &RendererConfig) -> Result<Self, SetupError> {
        let inner = window.inner_size();
        let size = if inner.width == 0 || inner.height == 0 {
            PhysicalSize::new(config.surface_size.0, config.surface_size.1)
        } else {
            inner
        };
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        let render_loop = RenderLoop::new(
            Box::new(SystemTimeSource::new()),
            LightSmoothing::new(config.enhanced_at_start),
        );
        Ok(Self {
            window,
            gpu: Some(gpu),
            render_loop,
            viewport: ViewportController::new(size),
            bridge: SignalBridge::new(),
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.viewport.size()
    }

    fn is_animating(&self) -> bool {
        self.render_loop.is_running() && self.gpu.is_some()
    }

    fn set_enhanced(&mut self, enhanced: bool) {
        self.bridge.apply(enhanced, self.render_loop.lights_mut());
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(accepted) = self.viewport.accept(new_size) {
            if let Some(gpu) = self.gpu.as_mut() {
                gpu.resize(accepted);
            }
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) {
        let Some(update) = self.render_loop.frame() else {
            return;
        };
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(&update) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = gpu.size();
                gpu.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory; shutting down");
                self.dispose();
                elwt.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                trace!("surface timeout; retrying next frame");
            }
            Err(other) => {
                warn!("surface error: {other:?}; retrying next frame");
            }
        }
    }

    /// Ordered teardown; the second and later calls are no-ops.
    fn dispose(&mut self) {
        self.render_loop.stop();
        if let Some(gpu) = self.gpu.take() {
            gpu.dispose();
        }
    }
}

impl Drop for WaveRuntime {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Opens a desktop window and animates the wave surface in it until closed.
///
/// Hover drives the enhancement signal: the cursor entering the window raises
/// it, leaving lowers it.
pub fn run(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window = WindowBuilder::new()
        .with_title("waveshade")
        .with_inner_size(PhysicalSize::new(config.surface_size.0, config.surface_size.1))
        .with_transparent(true)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;

    let mut runtime = WaveRuntime::mount(Arc::new(window), &config)?;
    runtime.render_loop.start();
    info!("wave surface mounted; hover the window to enhance the lights");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == runtime.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        runtime.dispose();
                        elwt.exit();
                    }
                    WindowEvent::CursorEntered { .. } => runtime.set_enhanced(true),
                    WindowEvent::CursorLeft { .. } => runtime.set_enhanced(false),
                    WindowEvent::Resized(new_size) => runtime.handle_resize(new_size),
                    WindowEvent::ScaleFactorChanged {
                        mut inner_size_writer,
                        ..
                    } => {
                        let _ = inner_size_writer.request_inner_size(runtime.size());
                    }
                    WindowEvent::RedrawRequested => runtime.redraw(elwt),
                    _ => {}
                }
            }
            Event::AboutToWait => {
                if runtime.is_animating() {
                    runtime.window().request_redraw();
                }
                elwt.set_control_flow(ControlFlow::Wait);
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
