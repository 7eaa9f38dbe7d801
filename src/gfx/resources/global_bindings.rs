//! Global uniform bindings for camera and light data
//!
//! Everything the shaders need once per frame lives in one uniform buffer
//! bound at slot 0 of every pipeline.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::light::{LightSet, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS},
    },
    wgpu_utils::{
        binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
        UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub ambient: [f32; 4],
    pub directional_direction: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub directional_color: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// xyz: world position, w: range
    pub point_position: [[f32; 4]; MAX_POINT_LIGHTS],
    /// rgb: radiance, w: decay exponent
    pub point_color: [[f32; 4]; MAX_POINT_LIGHTS],
    /// x: directional count, y: point count
    pub counts: [u32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: &LightSet) -> Self {
        let mut content = Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            ambient: lights.ambient.map(|c| c.to_rgba(1.0)).unwrap_or([0.0; 4]),
            directional_direction: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            directional_color: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            point_position: [[0.0; 4]; MAX_POINT_LIGHTS],
            point_color: [[0.0; 4]; MAX_POINT_LIGHTS],
            counts: [0; 4],
        };

        for (i, light) in lights.directional.iter().take(MAX_DIRECTIONAL_LIGHTS).enumerate() {
            content.directional_direction[i] = light.direction.extend(0.0).into();
            content.directional_color[i] = light.radiance.to_rgba(1.0);
        }

        for (i, light) in lights.point.iter().take(MAX_POINT_LIGHTS).enumerate() {
            content.point_position[i] = light.position.extend(light.range).into();
            content.point_color[i] = light.radiance.to_rgba(light.decay);
        }

        content.counts[0] = lights.directional.len().min(MAX_DIRECTIONAL_LIGHTS) as u32;
        content.counts[1] = lights.point.len().min(MAX_POINT_LIGHTS) as u32;
        content
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes this frame's camera and light data
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightSet,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::color::Color;
    use crate::gfx::scene::light::{DirectionalLightData, PointLightData};
    use cgmath::Vector3;

    #[test]
    fn uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 64 + 16 * 2 + 32 * 2 + 64 * 2 + 16);
    }

    #[test]
    fn lights_are_packed_with_range_and_decay() {
        let lights = LightSet {
            ambient: Some(Color::rgb(0.2, 0.2, 0.2)),
            directional: vec![DirectionalLightData {
                direction: Vector3::new(0.0, 1.0, 0.0),
                radiance: Color::WHITE,
            }],
            point: vec![PointLightData {
                position: Vector3::new(1.0, 2.0, 3.0),
                radiance: Color::rgb(3.0, 3.0, 3.0),
                range: 60.0,
                decay: 2.0,
            }],
        };
        let camera = CameraUniform {
            view_position: [0.0; 4],
            view_proj: [[0.0; 4]; 4],
        };

        let content = GlobalUBOContent::new(camera, &lights);
        assert_eq!(content.counts, [1, 1, 0, 0]);
        assert_eq!(content.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(content.directional_direction[0], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(content.point_position[0], [1.0, 2.0, 3.0, 60.0]);
        assert_eq!(content.point_color[0], [3.0, 3.0, 3.0, 2.0]);
    }
}
