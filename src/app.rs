use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    animation::Stage,
    config::AppConfig,
    error::{PinwheelError, Result},
    gfx::{camera::OrbitControls, rendering::RenderEngine},
};

/// Hosts one [`Stage`] in a window and redraws it continuously
pub struct PinwheelApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    stage: Stage,
    controls: OrbitControls,
    error: Option<PinwheelError>,
}

impl PinwheelApp {
    /// Creates the event loop; the window and GPU context follow on resume
    pub fn new(config: AppConfig, stage: Stage) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                stage,
                controls: OrbitControls::new(),
                error: None,
            },
        })
    }

    /// Replaces the default orbit controls
    pub fn with_controls(mut self, controls: OrbitControls) -> Self {
        self.app_state.controls = controls;
        self
    }

    /// Runs until the window closes or setup fails
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        if let Some(error) = self.app_state.error.take() {
            return Err(error);
        }
        if self.app_state.render_engine.is_none() {
            return Err(PinwheelError::NotInitialised);
        }
        log::info!(
            "Exited after {} frames",
            self.app_state.stage.frame_loop.frame_count()
        );
        Ok(())
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                )),
        )?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let PhysicalSize { width, height } = window_handle.inner_size();
        self.stage.scene.camera.resize(width, height);
        self.controls.resize(width, height);

        let renderer = pollster::block_on(RenderEngine::new(
            window_handle,
            width,
            height,
            self.config.vsync,
        ))?;
        renderer.init_scene(&mut self.stage.scene);

        self.render_engine = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if self.stage.scene.camera.resize(width, height) {
                    self.controls.resize(width, height);
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.stage.step(&mut self.controls);
                render_engine.render(&mut self.stage.scene);
            }
            other => {
                self.controls.process_window_event(&other);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }
        self.controls.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
