use wgpu::Device;

use crate::gfx::{
    camera::Camera,
    color::Color,
    geometry::GeometryData,
    rendering::SceneLayouts,
    resources::{Material, MaterialManager, TextureData, TextureId, TextureResource},
};

use super::{
    graph::{Node, NodeId, NodeKind, SceneGraph},
    light::Light,
    mesh::{Geometry, GeometryId, TransformGpu},
    transform::Transform,
};

/// Main scene containing the node graph, shared assets and the camera
pub struct Scene {
    pub graph: SceneGraph,
    pub camera: Camera,
    pub clear_color: Color,
    pub material_manager: MaterialManager,
    geometries: Vec<Geometry>,
    textures: Vec<TextureData>,
    gpu_textures: Vec<TextureResource>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            graph: SceneGraph::new(),
            camera,
            clear_color: Color::BLACK,
            material_manager: MaterialManager::new(),
            geometries: Vec::new(),
            textures: Vec::new(),
            gpu_textures: Vec::new(),
        }
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    /// Stores geometry that any number of meshes can share
    pub fn add_geometry(&mut self, name: &str, data: &GeometryData) -> GeometryId {
        self.geometries.push(Geometry::new(name, data));
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn add_texture(&mut self, texture: TextureData) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id.0)
    }

    /// Registers a material, replacing one with the same name
    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn add_group(&mut self, parent: NodeId, name: &str, transform: Transform) -> NodeId {
        self.graph
            .add(parent, Node::group(name).with_transform(transform))
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        geometry: GeometryId,
        material: &str,
        transform: Transform,
    ) -> NodeId {
        if !self.material_manager.contains(material) {
            log::warn!("Mesh '{}' uses unknown material '{}'", name, material);
        }
        self.graph
            .add(parent, Node::mesh(name, geometry, material).with_transform(transform))
    }

    pub fn add_light(
        &mut self,
        parent: NodeId,
        name: &str,
        light: Light,
        transform: Transform,
    ) -> NodeId {
        self.graph
            .add(parent, Node::light(name, light).with_transform(transform))
    }

    /// Mesh nodes currently attached to the root
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.graph.iter().filter(|(_, node)| node.is_mesh())
    }

    /// Lights currently attached to the root
    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light)> {
        self.graph.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Light(light) => Some((id, light)),
            _ => None,
        })
    }

    /// Uploads anything not yet on the GPU and refreshes per-frame data
    ///
    /// Recomputes world matrices, so transforms changed since the previous
    /// call are picked up. Safe to call every frame.
    pub fn sync_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &SceneLayouts,
    ) {
        for geometry in &mut self.geometries {
            geometry.init_gpu_resources(device);
        }

        for texture in &self.textures[self.gpu_textures.len()..] {
            self.gpu_textures
                .push(TextureResource::from_texture_data(device, queue, texture));
        }

        self.material_manager.update_all_gpu_resources(
            device,
            queue,
            &layouts.material,
            &self.gpu_textures,
            &layouts.fallback_texture,
        );

        self.update_all_transforms(device, queue, layouts);
    }

    /// Updates world transforms and syncs them to the GPU
    pub fn update_all_transforms(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &SceneLayouts,
    ) {
        self.graph.update_world_transforms();

        for (mesh, world) in self.graph.meshes_mut() {
            match &mut mesh.gpu {
                Some(gpu) => gpu.write(queue, world),
                None => mesh.gpu = Some(TransformGpu::new(device, &layouts.transform, world)),
            }
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (mut mesh_count, mut total_triangles) = (0, 0);
        for (_, node) in self.meshes() {
            mesh_count += 1;
            if let Some(geometry) = node.as_mesh().and_then(|m| self.geometry(m.geometry)) {
                total_triangles += geometry.index_count() / 3;
            }
        }

        SceneStatistics {
            node_count: self.graph.iter().count(),
            mesh_count,
            light_count: self.lights().count(),
            material_count: self.material_manager.len(),
            total_triangles,
        }
    }
}

/// Scene statistics for debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
}
