//! Material system for Phong rendering
//!
//! Materials are stored in [`MaterialManager`] under a name and mesh nodes
//! reference them by that name, so one material's GPU resources are shared
//! by every mesh using it.

use std::collections::HashMap;
use wgpu::Device;

use crate::gfx::color::Color;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

use super::texture_resource::{TextureId, TextureResource};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// x: shininess, y: specular strength, z: unlit flag, w: color map flag
    pub params: [f32; 4],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the layout every material bind group follows
///
/// Binding 0 is the material uniform, 1 the color map, 2 its sampler.
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    bound_map: Option<TextureId>,
}

/// Surface appearance of a mesh
///
/// Lit materials use Blinn-Phong shading. Unlit materials ignore every light
/// and output their color directly.
pub struct Material {
    pub name: String,
    pub color: Color,
    pub alpha: f32,
    pub emissive: Color,
    pub shininess: f32,
    pub specular: f32,
    pub unlit: bool,
    pub map: Option<TextureId>,

    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            color: Color::WHITE,
            alpha: 1.0,
            emissive: Color::BLACK,
            shininess: 30.0,
            specular: 0.067,
            unlit: false,
            map: None,
            gpu: None,
        }
    }
}

impl Material {
    /// Creates a lit material
    pub fn new(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
            ..Default::default()
        }
    }

    /// Creates a material that ignores lighting
    pub fn unlit(name: &str, color: Color) -> Self {
        Self {
            unlit: true,
            ..Self::new(name, color)
        }
    }

    pub fn with_map(mut self, texture: TextureId) -> Self {
        self.map = Some(texture);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_emission(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color: self.color.to_rgba(self.alpha),
            emissive: self.emissive.to_rgba(1.0),
            params: [
                self.shininess,
                self.specular,
                if self.unlit { 1.0 } else { 0.0 },
                if self.map.is_some() { 1.0 } else { 0.0 },
            ],
        }
    }

    /// Creates or refreshes the uniform buffer and bind group
    ///
    /// `textures` is the scene texture store; a map that is not in it falls
    /// back to `fallback` and is logged.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        textures: &[TextureResource],
        fallback: &TextureResource,
    ) {
        let needs_bind_group = match &self.gpu {
            Some(gpu) => gpu.bound_map != self.map,
            None => true,
        };

        if needs_bind_group {
            let texture = match self.map {
                Some(id) => textures.get(id.0).unwrap_or_else(|| {
                    log::warn!(
                        "Material '{}' references missing texture {:?}",
                        self.name,
                        id
                    );
                    fallback
                }),
                None => fallback,
            };

            let ubo = match self.gpu.take() {
                Some(gpu) => gpu.ubo,
                None => MaterialUBO::new(device),
            };
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .texture(&texture.view)
                .sampler(&texture.sampler)
                .create(device, &format!("{} Material Bind Group", self.name));

            self.gpu = Some(MaterialGpu {
                ubo,
                bind_group,
                bound_map: self.map,
            });
        }

        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials of a scene
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let mut materials = HashMap::new();
        materials.insert("default".to_string(), Material::default());

        Self {
            materials,
            default_material_id: "default".to_string(),
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Looks up a material, falling back to the default one
    pub fn get_material_or_default(&self, id: &str) -> &Material {
        self.get_material(id)
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
        textures: &[TextureResource],
        fallback: &TextureResource,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout, textures, fallback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("box/0", Color::from_hex(0x4550DE)));

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get_material_or_default("box/0").name, "box/0");
        assert_eq!(manager.get_material_or_default("missing").name, "default");
    }

    #[test]
    fn uniform_flags_unlit_and_mapped_materials() {
        let plain = Material::new("plain", Color::WHITE).uniform();
        assert_eq!(plain.params[2], 0.0);
        assert_eq!(plain.params[3], 0.0);

        let marker = Material::unlit("marker", Color::rgb(1.0, 0.5, 0.0))
            .with_map(TextureId(0))
            .uniform();
        assert_eq!(marker.color, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(marker.params[2], 1.0);
        assert_eq!(marker.params[3], 1.0);
    }
}
