//! Two counter-rotating groups of randomly placed cubes around a spinning
//! point light

use cgmath::{Deg, Point3, Vector3};
use rand::Rng;

use crate::{
    animation::{Spin, Stage},
    error::Result,
    gfx::{
        camera::{Camera, Projection},
        color::Color,
        geometry::generate_box,
        resources::Material,
        scene::{GeometryId, Light, Node, NodeId, Scene, Transform},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct BoxFieldConfig {
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Point3<f32>,
    /// Cubes in each of the two groups
    pub box_count: usize,
    /// Cube coordinates are drawn from `[-spread, spread]`; must not be negative
    pub spread: f32,
    pub box_size: f32,
    pub palette: Vec<Color>,
    /// Yaw per frame of the first group
    pub right_spin: f32,
    /// Yaw per frame of the second group
    pub left_spin: f32,
    pub light_intensity: f32,
    pub light_range: f32,
    /// Euler increment per frame of the point light and its marker
    pub light_spin: Vector3<f32>,
    pub marker_size: f32,
}

impl Default for BoxFieldConfig {
    fn default() -> Self {
        Self {
            fovy: 50.0,
            near: 0.1,
            far: 100.0,
            camera_position: Point3::new(25.0, -8.0, 22.0),
            box_count: 50,
            spread: 20.0,
            box_size: 0.6,
            palette: vec![
                Color::from_hex(0x4550DE),
                Color::from_hex(0x7757F5),
                Color::from_hex(0x8D45DE),
            ],
            right_spin: -0.001,
            left_spin: 0.003,
            light_intensity: 3.0,
            light_range: 60.0,
            light_spin: Vector3::new(0.01, 0.01, 0.0),
            marker_size: 6.0,
        }
    }
}

impl BoxFieldConfig {
    pub fn with_box_count(mut self, count: usize) -> Self {
        self.box_count = count;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }
}

/// The built cube field and the nodes its animation drives
pub struct BoxField {
    pub scene: Scene,
    pub right_group: NodeId,
    pub left_group: NodeId,
    pub point_light: NodeId,
    config: BoxFieldConfig,
}

impl BoxField {
    /// Builds the scene for a viewport of the given aspect ratio
    ///
    /// All placement and color choices are drawn from `rng`.
    pub fn build(config: BoxFieldConfig, aspect: f32, rng: &mut impl Rng) -> Result<Self> {
        let p = config.camera_position;
        let camera = Camera::new(Projection::perspective(
            Deg(config.fovy),
            aspect,
            config.near,
            config.far,
        ))
        .with_position(p.x, p.y, p.z)
        .looking_at(0.0, 0.0, 0.0);

        let mut scene = Scene::new(camera).with_clear_color(Color::BLACK);
        let root = scene.root();

        scene.add_light(
            root,
            "directional",
            Light::directional(Color::WHITE, 1.0, Vector3::new(1.0, 1.0, 1.0)),
            Transform::default(),
        );
        scene.add_light(
            root,
            "ambient",
            Light::ambient(Color::WHITE, 0.2),
            Transform::default(),
        );

        let point_light = scene.add_light(
            root,
            "point_light",
            Light::point(Color::WHITE, config.light_intensity, config.light_range),
            Transform::default(),
        );
        let s = config.marker_size;
        let marker = scene.add_geometry("light_marker", &generate_box(s, s, s));
        scene.add_material(Material::unlit(
            "light_marker",
            Color::WHITE.scaled(config.light_intensity).clamped(),
        ));
        scene.add_mesh(point_light, "marker", marker, "light_marker", Transform::default());

        let palette = if config.palette.is_empty() {
            vec![Color::WHITE]
        } else {
            config.palette.clone()
        };
        for (i, color) in palette.iter().enumerate() {
            scene.add_material(Material::new(&box_material(i), *color));
        }

        let s = config.box_size;
        let cube = scene.add_geometry("box", &generate_box(s, s, s));

        let colors = palette.len();
        let right_group = populate_group(&mut scene, "rotate_right", cube, &config, colors, rng);
        let left_group = populate_group(&mut scene, "rotate_left", cube, &config, colors, rng);
        scene.graph.attach(root, right_group)?;
        scene.graph.attach(root, left_group)?;

        log::info!(
            "Box field ready: {} cubes, {} colors",
            2 * config.box_count,
            palette.len()
        );

        Ok(Self {
            scene,
            right_group,
            left_group,
            point_light,
            config,
        })
    }

    /// Box meshes currently in the scene
    pub fn box_count(&self) -> usize {
        self.scene
            .meshes()
            .filter(|(_, node)| node.name == "box")
            .count()
    }
}

impl From<BoxField> for Stage {
    fn from(field: BoxField) -> Self {
        let config = field.config;
        Stage::new(field.scene)
            .with_animated(Spin::new(field.point_light, config.light_spin))
            .with_animated(Spin::around_y(field.right_group, config.right_spin))
            .with_animated(Spin::around_y(field.left_group, config.left_spin))
    }
}

fn box_material(index: usize) -> String {
    format!("box/{index}")
}

/// Fills a detached group with randomly placed cubes
///
/// The caller attaches the group once it is complete.
fn populate_group(
    scene: &mut Scene,
    name: &str,
    cube: GeometryId,
    config: &BoxFieldConfig,
    colors: usize,
    rng: &mut impl Rng,
) -> NodeId {
    let group = scene.graph.add_detached(Node::group(name));
    let spread = config.spread;

    for _ in 0..config.box_count {
        let material = box_material(rng.random_range(0..colors));
        let position = Transform::from_position(
            rng.random_range(-spread..=spread),
            rng.random_range(-spread..=spread),
            rng.random_range(-spread..=spread),
        );
        scene.add_mesh(group, "box", cube, &material, position);
    }

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn field(seed: u64) -> BoxField {
        let mut rng = StdRng::seed_from_u64(seed);
        BoxField::build(BoxFieldConfig::default(), 1.5, &mut rng).unwrap()
    }

    #[test]
    fn two_groups_of_fifty_boxes() {
        let field = field(7);
        assert_eq!(field.box_count(), 100);

        for group in [field.right_group, field.left_group] {
            assert!(field.scene.graph.is_attached(group));
            let boxes = field
                .scene
                .graph
                .iter_from(group)
                .filter(|(_, node)| node.is_mesh())
                .count();
            assert_eq!(boxes, 50);
        }
    }

    #[test]
    fn box_positions_stay_within_spread() {
        let field = field(42);
        for (id, _) in field.scene.meshes().filter(|(_, n)| n.name == "box") {
            let position = field.scene.graph.transform(id).position;
            for c in [position.x, position.y, position.z] {
                assert!((-20.0..=20.0).contains(&c), "{c} out of range");
            }
        }
    }

    #[test]
    fn zero_spread_stacks_boxes_at_origin() {
        let config = BoxFieldConfig {
            spread: 0.0,
            ..BoxFieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let field = BoxField::build(config, 1.5, &mut rng).unwrap();

        assert_eq!(field.box_count(), 100);
        for (id, _) in field.scene.meshes().filter(|(_, n)| n.name == "box") {
            assert_eq!(field.scene.graph.transform(id).position, Vector3::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn box_colors_come_from_palette() {
        let field = field(3);
        let palette = BoxFieldConfig::default().palette;

        for (_, node) in field.scene.meshes().filter(|(_, n)| n.name == "box") {
            let mesh = node.as_mesh().unwrap();
            let material = field.scene.material_manager.get_material(&mesh.material).unwrap();
            assert!(palette.contains(&material.color));
        }
    }

    #[test]
    fn same_seed_builds_same_field() {
        let positions = |field: &BoxField| -> Vec<_> {
            field
                .scene
                .meshes()
                .map(|(id, _)| field.scene.graph.transform(id).position)
                .collect()
        };
        assert_eq!(positions(&field(11)), positions(&field(11)));
    }

    #[test]
    fn point_light_carries_unlit_marker() {
        let field = field(1);
        let marker = field
            .scene
            .graph
            .iter_from(field.point_light)
            .find(|(_, n)| n.name == "marker")
            .and_then(|(_, n)| n.as_mesh())
            .unwrap();
        let material = field.scene.material_manager.get_material(&marker.material).unwrap();

        assert!(material.unlit);
        assert_eq!(material.color, Color::WHITE);
    }

    #[test]
    fn stage_spins_light_and_groups() {
        let field = field(5);
        let (right, left, light) = (field.right_group, field.left_group, field.point_light);
        let mut stage = Stage::from(field);
        let mut controls = crate::gfx::camera::OrbitControls::new();

        for _ in 0..10 {
            stage.step(&mut controls);
        }

        let graph = &stage.scene.graph;
        assert!((graph.transform(right).rotation.y + 0.01).abs() < 1e-6);
        assert!((graph.transform(left).rotation.y - 0.03).abs() < 1e-6);
        assert!((graph.transform(light).rotation.x - 0.1).abs() < 1e-6);
        assert!((graph.transform(light).rotation.y - 0.1).abs() < 1e-6);
        assert_eq!(stage.frame_loop.len(), 3);
    }
}
