//! A desk fan built from cylinders and a sphere cap
//!
//! The fan is a small node hierarchy under one root group:
//!
//! ```text
//! root (x, 0, z), yaw 45°
//! ├── pipe
//! ├── leaf × leaf_count
//! └── head            <- yaw oscillates
//!     ├── motor shaft
//!     ├── shaft cap
//!     └── blades      <- spins about z
//!         ├── hub
//!         ├── hub shaft
//!         └── blade × 4
//! ```

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::Vector3;

use crate::{
    animation::Animated,
    gfx::{
        color::Color,
        geometry::{generate_cylinder, generate_sphere, CylinderParams, SphereParams},
        resources::{Material, TextureId},
        scene::{NodeId, Scene, SceneGraph, Transform},
    },
};

/// Everything below the pipe is measured from this floor height
const BASE_Y: f32 = -3.0;

const HUB_THETA_START: f32 = 4.662_123_5;
const HUB_THETA_LENGTH: f32 = 2.959_380_3;

/// Blade (x, y) offsets around the hub, in blade order
const BLADE_OFFSETS: [(f32, f32); 4] = [(0.5, 0.0), (0.0, 0.5), (-0.5, 0.0), (0.0, -0.5)];

/// Per-fan appearance, placement and animation speeds
#[derive(Debug, Clone, PartialEq)]
pub struct FanConfig {
    pub fan_color: Color,
    pub leaf_color: Color,
    pub point_color: Color,
    pub wing_color: Color,
    pub position_x: f32,
    pub position_z: f32,
    pub pipe_height: f32,
    pub leaf_count: u32,
    /// Apply the blade texture, when one is available
    pub textured: bool,
    /// Blade spin per tick, radians
    pub wing_speed: f32,
    /// Ticks per radian of head swing phase; larger is slower
    pub head_speed: f32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            fan_color: Color::from_hex(0x31AE61),
            leaf_color: Color::from_hex(0x31AE61),
            point_color: Color::from_hex(0xF2CB05),
            wing_color: Color::WHITE,
            position_x: 0.0,
            position_z: 0.0,
            pipe_height: 2.2,
            leaf_count: 2,
            textured: false,
            wing_speed: 0.6,
            head_speed: 200.0,
        }
    }
}

impl FanConfig {
    pub fn with_colors(mut self, fan: u32, leaf: u32, point: u32, wing: u32) -> Self {
        self.fan_color = Color::from_hex(fan);
        self.leaf_color = Color::from_hex(leaf);
        self.point_color = Color::from_hex(point);
        self.wing_color = Color::from_hex(wing);
        self
    }

    pub fn with_position(mut self, x: f32, z: f32) -> Self {
        self.position_x = x;
        self.position_z = z;
        self
    }

    pub fn with_pipe(mut self, height: f32, leaf_count: u32) -> Self {
        self.pipe_height = height;
        self.leaf_count = leaf_count;
        self
    }

    pub fn with_speeds(mut self, wing_speed: f32, head_speed: f32) -> Self {
        self.wing_speed = wing_speed;
        self.head_speed = head_speed;
        self
    }

    pub fn with_texture(mut self, textured: bool) -> Self {
        self.textured = textured;
        self
    }
}

/// One fan in a scene, animated by [`Animated::tick`]
#[derive(Debug, Clone)]
pub struct Fan {
    name: String,
    root: NodeId,
    head: NodeId,
    blades: NodeId,
    leaves: Vec<NodeId>,
    wing_speed: f32,
    head_speed: f32,
    swing_count: u64,
}

impl Fan {
    /// Adds a fan below `parent`
    ///
    /// `wing_texture` is used only when `config.textured` is set.
    pub fn build(
        scene: &mut Scene,
        parent: NodeId,
        name: &str,
        config: &FanConfig,
        wing_texture: Option<TextureId>,
    ) -> Self {
        let body = format!("{name}/body");
        let leaf = format!("{name}/leaf");
        let point = format!("{name}/point");
        let wing = format!("{name}/wing");

        scene.add_material(Material::new(&body, config.fan_color));
        scene.add_material(Material::new(&leaf, config.leaf_color));
        scene.add_material(Material::new(&point, config.point_color));
        let mut wing_material = Material::new(&wing, config.wing_color);
        if let (true, Some(texture)) = (config.textured, wing_texture) {
            wing_material = wing_material.with_map(texture);
        }
        scene.add_material(wing_material);

        let pipe_geometry = scene.add_geometry(
            &format!("{name}/pipe"),
            &generate_cylinder(&CylinderParams::new(0.12, 0.12, config.pipe_height, 30)),
        );
        let leaf_geometry = scene.add_geometry(
            &format!("{name}/leaf"),
            &generate_cylinder(&CylinderParams::new(0.4, 0.4, 0.1, 32)),
        );
        let shaft_geometry = scene.add_geometry(
            &format!("{name}/shaft"),
            &generate_cylinder(&CylinderParams::new(0.3, 0.3, 0.7, 30)),
        );
        let cap_geometry = scene.add_geometry(
            &format!("{name}/cap"),
            &generate_cylinder(&CylinderParams::new(0.05, 0.05, 0.4, 30)),
        );
        let hub_geometry = scene.add_geometry(
            &format!("{name}/hub"),
            &generate_sphere(
                &SphereParams::new(0.2, 30, 30)
                    .with_phi(0.0, 2.0 * PI)
                    .with_theta(HUB_THETA_START, HUB_THETA_LENGTH),
            ),
        );
        let hub_shaft_geometry = scene.add_geometry(
            &format!("{name}/hub_shaft"),
            &generate_cylinder(&CylinderParams::new(0.2, 0.2, 0.1, 30)),
        );
        let blade_geometry = scene.add_geometry(
            &format!("{name}/blade"),
            &generate_cylinder(&CylinderParams::new(0.5, 0.5, 0.05, 32).with_theta(0.0, PI)),
        );

        let root = scene.add_group(
            parent,
            name,
            Transform::from_position(config.position_x, 0.0, config.position_z)
                .with_rotation_y(45f32.to_radians()),
        );

        let pipe_y = config.pipe_height / 2.0 + BASE_Y;
        let pipe_top = pipe_y + config.pipe_height / 2.0;
        scene.add_mesh(
            root,
            "pipe",
            pipe_geometry,
            &body,
            Transform::from_position(0.0, pipe_y, 0.0),
        );

        let leaves = (1..=config.leaf_count)
            .map(|i| {
                let x = if i % 2 == 0 { 0.4 } else { -0.4 };
                let y = BASE_Y + if i > 2 { 1.4 } else { 0.4 };
                scene.add_mesh(
                    root,
                    "leaf",
                    leaf_geometry,
                    &leaf,
                    Transform::from_position(x, y, 0.0).with_rotation_x(FRAC_PI_2),
                )
            })
            .collect();

        let head = scene.add_group(root, "head", Transform::default());

        let shaft_z = 0.1;
        let cap_z = shaft_z + 0.4;
        scene.add_mesh(
            head,
            "motor_shaft",
            shaft_geometry,
            &body,
            Transform::from_position(0.0, pipe_top, shaft_z).with_rotation_x(FRAC_PI_2),
        );
        scene.add_mesh(
            head,
            "shaft_cap",
            cap_geometry,
            &point,
            Transform::from_position(0.0, pipe_top, cap_z).with_rotation_x(FRAC_PI_2),
        );

        let blades = scene.add_group(head, "blades", Transform::from_position(0.0, pipe_top, 0.0));

        let hub_z = cap_z + 0.08;
        scene.add_mesh(
            blades,
            "hub",
            hub_geometry,
            &point,
            Transform::from_position(0.0, 0.0, hub_z).with_rotation_x(FRAC_PI_2),
        );
        scene.add_mesh(
            blades,
            "hub_shaft",
            hub_shaft_geometry,
            &point,
            Transform::from_position(0.0, 0.0, cap_z + 0.1).with_rotation_x(FRAC_PI_2),
        );

        for (i, (x, y)) in BLADE_OFFSETS.into_iter().enumerate() {
            scene.add_mesh(
                blades,
                "blade",
                blade_geometry,
                &wing,
                Transform::from_position(x, y, hub_z)
                    .with_rotation(FRAC_PI_2, FRAC_PI_2 * (i + 1) as f32, 0.0),
            );
        }

        log::debug!(
            "Built fan '{}' with {} leaves (textured: {})",
            name,
            config.leaf_count,
            config.textured && wing_texture.is_some()
        );

        Self {
            name: name.to_string(),
            root,
            head,
            blades,
            leaves,
            wing_speed: config.wing_speed,
            head_speed: config.head_speed,
            swing_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn blades(&self) -> NodeId {
        self.blades
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn swing_count(&self) -> u64 {
        self.swing_count
    }
}

impl Animated for Fan {
    fn tick(&mut self, graph: &mut SceneGraph) {
        graph
            .transform_mut(self.blades)
            .rotate(Vector3::new(0.0, 0.0, self.wing_speed));

        // Phase in f64; an f32 count stops advancing past 2^24
        self.swing_count += 1;
        graph.transform_mut(self.head).rotation.y =
            (self.swing_count as f64 / self.head_speed as f64).sin() as f32;
    }
}
