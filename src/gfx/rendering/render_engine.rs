//! WGPU-based rendering engine
//!
//! Owns the surface, device and pipelines, and draws a [`Scene`] once per
//! call to [`RenderEngine::render`] with Blinn-Phong lighting.

use std::sync::Arc;
use wgpu::Device;

use crate::{
    error::{PinwheelError, Result},
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::create_material_layout,
            texture_resource::TextureResource,
        },
        scene::{light::LightSet, mesh::DrawGeometry, scene::Scene},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const PHONG_PIPELINE: &str = "Phong";

/// Bind group layouts shared between the engine and scene resources
pub struct SceneLayouts {
    /// Group 1: per-mesh model and normal matrices
    pub transform: BindGroupLayoutWithDesc,
    /// Group 2: material uniform, color map and sampler
    pub material: BindGroupLayoutWithDesc,
    /// Bound in place of a color map by materials without one
    pub fallback_texture: TextureResource,
}

impl SceneLayouts {
    pub fn new(device: &Device, queue: &wgpu::Queue) -> Self {
        Self {
            transform: BindGroupLayoutBuilder::new()
                .next_binding_vertex(binding_types::uniform())
                .create(device, "Transform Bind Group Layout"),
            material: create_material_layout(device),
            fallback_texture: TextureResource::white(device, queue),
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    layouts: SceneLayouts,
}

impl RenderEngine {
    /// Creates a new render engine drawing into `window`
    ///
    /// Fails when no adapter or device can drive the surface, or when the
    /// shading pipeline cannot be built.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(PinwheelError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let layouts = SceneLayouts::new(&device, &queue);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("phong", include_str!("shader.wgsl"));
        pipeline_manager.register_pipeline(
            PHONG_PIPELINE,
            PipelineConfig::default()
                .with_label(PHONG_PIPELINE)
                .with_shader("phong")
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    layouts.transform.layout.clone(),
                    layouts.material.layout.clone(),
                ]),
        );

        pipeline_setup(pipeline_manager.create_all_pipelines())?;

        Ok(RenderEngine {
            device: device_handle,
            config,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_bindings,
            global_ubo,
            layouts,
        })
    }

    /// Uploads any scene resources created since the last call
    pub fn init_scene(&self, scene: &mut Scene) {
        scene.sync_gpu_resources(&self.device, &self.queue, &self.layouts);
        log::debug!("Scene ready: {:?}", scene.get_statistics());
    }

    /// Draws one frame of `scene`
    ///
    /// Surface errors skip the frame instead of failing; a lost or outdated
    /// surface is reconfigured for the next one.
    pub fn render(&mut self, scene: &mut Scene) {
        scene.sync_gpu_resources(&self.device, &self.queue, &self.layouts);

        let lights = LightSet::gather(&scene.graph);
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera.uniform(),
            &lights,
        );

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(PHONG_PIPELINE) {
                render_pass.set_pipeline(pipeline);

                for (_, node) in scene.graph.iter() {
                    let Some(mesh) = node.as_mesh() else {
                        continue;
                    };
                    let (Some(transform), Some(geometry)) =
                        (mesh.gpu.as_ref(), scene.geometry(mesh.geometry))
                    else {
                        continue;
                    };

                    let material = scene.material_manager.get_material_or_default(&mesh.material);
                    let Some(material_bind_group) = material.get_bind_group() else {
                        log::trace!(
                            "Skipping '{}' - material '{}' has no GPU resources",
                            node.name,
                            material.name
                        );
                        continue;
                    };

                    render_pass.set_bind_group(1, &transform.bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.draw_geometry(geometry);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Reconfigures the surface and depth buffer for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}

/// Turns pipeline creation failures into a startup error
fn pipeline_setup(result: std::result::Result<(), Vec<String>>) -> Result<()> {
    result.map_err(|errors| {
        for error in &errors {
            log::error!("{}", error);
        }
        PinwheelError::Pipeline(errors.join("; "))
    })
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_failures_abort_startup() {
        let result = pipeline_setup(Err(vec![
            "Pipeline 'Phong': Shader 'phong' not found".to_string(),
        ]));

        match result {
            Err(PinwheelError::Pipeline(message)) => assert!(message.contains("Phong")),
            other => panic!("expected a pipeline error, got {other:?}"),
        }
        assert!(pipeline_setup(Ok(())).is_ok());
    }

    #[test]
    fn vsync_selects_present_mode() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}
