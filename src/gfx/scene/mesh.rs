use std::ops::Range;

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::{util::DeviceExt, Device};

use crate::gfx::geometry::GeometryData;
use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer};

use super::vertex::Vertex3D;

/// Handle to a geometry stored in a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub(crate) usize);

struct GeometryBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

/// Vertex data shared by any number of mesh nodes
pub struct Geometry {
    pub name: String,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    index_count: u32,
    buffers: Option<GeometryBuffers>,
}

impl Geometry {
    pub fn new(name: &str, data: &GeometryData) -> Self {
        Self {
            name: name.to_string(),
            vertices: data.to_vertices(),
            indices: data.indices.clone(),
            index_count: data.indices.len() as u32,
            buffers: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        if self.buffers.is_some() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded geometry '{}': {} vertices, {} triangles",
            self.name,
            self.vertices.len(),
            self.index_count / 3
        );

        self.buffers = Some(GeometryBuffers {
            vertex_buffer,
            index_buffer,
        });
    }
}

/// Per-mesh model and normal matrices
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from_world(world: Matrix4<f32>) -> Self {
        // Singular matrices (zero scale) fall back to the model matrix
        let normal = world.invert().map(|inv| inv.transpose()).unwrap_or(world);
        Self {
            model: world.into(),
            normal: normal.into(),
        }
    }
}

pub(crate) struct TransformGpu {
    ubo: UniformBuffer<TransformUniform>,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl TransformGpu {
    pub(crate) fn new(
        device: &Device,
        layout: &BindGroupLayoutWithDesc,
        world: Matrix4<f32>,
    ) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &TransformUniform::from_world(world));
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, "Transform Bind Group");

        Self { ubo, bind_group }
    }

    pub(crate) fn write(&mut self, queue: &wgpu::Queue, world: Matrix4<f32>) {
        self.ubo
            .update_content(queue, TransformUniform::from_world(world));
    }
}

pub trait DrawGeometry<'a> {
    fn draw_geometry(&mut self, geometry: &'a Geometry);
    fn draw_geometry_instanced(&mut self, geometry: &'a Geometry, instances: Range<u32>);
}

impl<'a, 'b> DrawGeometry<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_geometry(&mut self, geometry: &'b Geometry) {
        self.draw_geometry_instanced(geometry, 0..1);
    }

    fn draw_geometry_instanced(&mut self, geometry: &'b Geometry, instances: Range<u32>) {
        let Some(buffers) = &geometry.buffers else {
            return; // Not uploaded yet
        };

        self.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..geometry.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::Vector3;

    #[test]
    fn geometry_keeps_every_index() {
        let geometry = Geometry::new("box", &generate_box(1.0, 1.0, 1.0));
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.index_count(), 36);
        assert!(!geometry.has_gpu_resources());
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0);
        let uniform = TransformUniform::from_world(world);
        assert_eq!(uniform.model[0][0], 2.0);
        assert_eq!(uniform.normal[0][0], 0.5);
        assert_eq!(uniform.normal[1][1], 1.0);

        let translated = TransformUniform::from_world(Matrix4::from_translation(Vector3::new(
            1.0, 2.0, 3.0,
        )));
        assert_eq!(translated.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
