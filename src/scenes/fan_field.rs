//! Three desk fans standing on a cylindrical ground block, seen through an
//! orthographic camera

use std::future::Future;
use std::path::PathBuf;

use cgmath::{Point3, Vector3};

use crate::{
    animation::Stage,
    error::Result,
    gfx::{
        camera::{Camera, Projection},
        color::Color,
        geometry::{generate_cylinder, CylinderParams},
        resources::{Material, TextureData, TextureLoader},
        scene::{Light, NodeId, Scene, Transform},
    },
};

use super::fan::{Fan, FanConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct FanFieldConfig {
    /// Half the visible height of the orthographic view
    pub view_half_height: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Point3<f32>,
    pub clear_color: Color,
    pub ground_color: Color,
    pub ground_radius: f32,
    pub ground_height: f32,
    pub fans: Vec<FanConfig>,
    /// Blade texture, loaded before the scene is built
    pub texture_path: PathBuf,
}

impl Default for FanFieldConfig {
    fn default() -> Self {
        Self {
            view_half_height: 5.0,
            near: 0.1,
            far: 30.0,
            camera_position: Point3::new(10.0, 3.0, 8.0),
            clear_color: Color::from_hex(0xD0FAFA),
            ground_color: Color::from_hex(0xFFFFBF),
            ground_radius: 5.0,
            ground_height: 10.0,
            fans: vec![
                FanConfig::default()
                    .with_colors(0x31AE61, 0x31AE61, 0xF2CB05, 0xFFFFFF)
                    .with_position(0.8, 0.8)
                    .with_pipe(2.2, 2)
                    .with_speeds(0.6, 200.0)
                    .with_texture(true),
                FanConfig::default()
                    .with_colors(0x277A44, 0x277A44, 0xF2CB05, 0x4B6AFA)
                    .with_position(1.0, -2.5)
                    .with_pipe(3.2, 4)
                    .with_speeds(0.3, 180.0),
                FanConfig::default()
                    .with_colors(0x22AE40, 0x22AE40, 0xF2CB05, 0xDE2361)
                    .with_position(-2.0, 1.0)
                    .with_pipe(3.0, 4)
                    .with_speeds(0.4, 220.0),
            ],
            texture_path: PathBuf::from("assets/wing_texture02.png"),
        }
    }
}

impl FanFieldConfig {
    pub fn with_texture_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_path = path.into();
        self
    }

    pub fn with_fans(mut self, fans: Vec<FanConfig>) -> Self {
        self.fans = fans;
        self
    }
}

/// The built fan scene and its fans
pub struct FanField {
    pub scene: Scene,
    pub fans: Vec<Fan>,
    pub ground: NodeId,
}

impl FanField {
    /// Loads the blade texture from `config.texture_path`, then builds the
    /// scene
    pub async fn load(config: FanFieldConfig, aspect: f32) -> Result<Self> {
        let texture = TextureLoader::load(config.texture_path.clone());
        Self::prepare(config, aspect, texture).await
    }

    /// Waits for the blade texture, then builds the scene
    ///
    /// Nothing is constructed until `texture` resolves; a failed load is
    /// returned unchanged.
    pub async fn prepare(
        config: FanFieldConfig,
        aspect: f32,
        texture: impl Future<Output = Result<TextureData>>,
    ) -> Result<Self> {
        let texture = texture.await?;
        Ok(Self::build(config, aspect, Some(texture)))
    }

    /// Builds the scene for a viewport of the given aspect ratio
    pub fn build(config: FanFieldConfig, aspect: f32, wing_texture: Option<TextureData>) -> Self {
        let p = config.camera_position;
        let camera = Camera::new(Projection::orthographic(
            config.view_half_height,
            aspect,
            config.near,
            config.far,
        ))
        .with_position(p.x, p.y, p.z)
        .looking_at(0.0, 0.0, 0.0);

        let mut scene = Scene::new(camera).with_clear_color(config.clear_color);
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

        let ground_geometry = scene.add_geometry(
            "ground",
            &generate_cylinder(&CylinderParams::new(
                config.ground_radius,
                config.ground_radius,
                config.ground_height,
                32,
            )),
        );
        scene.add_material(Material::new("ground", config.ground_color));
        let ground = scene.add_mesh(
            root,
            "ground",
            ground_geometry,
            "ground",
            Transform::from_position(0.0, -config.ground_height / 2.0 - 3.0, 0.0),
        );

        let wing_texture = wing_texture.map(|texture| scene.add_texture(texture));
        let fans = config
            .fans
            .iter()
            .enumerate()
            .map(|(i, fan)| {
                let name = format!("fan{:02}", i + 1);
                Fan::build(&mut scene, root, &name, fan, wing_texture)
            })
            .collect::<Vec<_>>();

        log::info!("Fan field ready: {} fans", fans.len());

        Self {
            scene,
            fans,
            ground,
        }
    }
}

impl From<FanField> for Stage {
    fn from(field: FanField) -> Self {
        field
            .fans
            .into_iter()
            .fold(Stage::new(field.scene), |stage, fan| stage.with_animated(fan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PinwheelError;
    use futures::channel::oneshot;
    use std::pin::pin;
    use std::task::{Context, Poll};

    fn texture() -> TextureData {
        TextureData {
            label: "wing".into(),
            width: 2,
            height: 2,
            rgba: vec![200; 16],
        }
    }

    fn count_named(field: &FanField, name: &str) -> usize {
        field
            .scene
            .graph
            .iter()
            .filter(|(_, node)| node.name == name)
            .count()
    }

    #[test]
    fn builds_three_fans_and_one_ground() {
        let field = FanField::build(FanFieldConfig::default(), 1.5, Some(texture()));

        assert_eq!(field.fans.len(), 3);
        assert_eq!(count_named(&field, "ground"), 1);
        assert_eq!(count_named(&field, "pipe"), 3);
        assert_eq!(field.scene.graph.transform(field.ground).position.y, -8.0);
    }

    #[test]
    fn leaf_counts_follow_configuration() {
        let config = FanFieldConfig::default();
        let field = FanField::build(config.clone(), 1.5, None);

        for (fan, fan_config) in field.fans.iter().zip(&config.fans) {
            let leaves = field
                .scene
                .graph
                .iter_from(fan.root())
                .filter(|(_, node)| node.name == "leaf")
                .count();
            assert_eq!(leaves, fan_config.leaf_count as usize, "{}", fan.name());
        }
        assert_eq!(count_named(&field, "leaf"), 10);
    }

    #[test]
    fn only_first_fan_gets_the_texture() {
        let field = FanField::build(FanFieldConfig::default(), 1.5, Some(texture()));
        let materials = &field.scene.material_manager;

        assert!(materials.get_material("fan01/wing").and_then(|m| m.map).is_some());
        assert!(materials.get_material("fan02/wing").and_then(|m| m.map).is_none());
        assert!(materials.get_material("fan03/wing").and_then(|m| m.map).is_none());
    }

    #[test]
    fn resize_recomputes_orthographic_extents() {
        let mut field = FanField::build(FanFieldConfig::default(), 1.0, None);
        assert!(field.scene.camera.resize(1600, 800));

        match field.scene.camera.projection {
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                znear,
                zfar,
                ..
            } => {
                assert_eq!((left, right), (-10.0, 10.0));
                assert_eq!((top, bottom), (5.0, -5.0));
                assert_eq!((znear, zfar), (0.1, 30.0));
            }
            other => panic!("expected an orthographic camera, got {other:?}"),
        }
    }

    #[test]
    fn construction_waits_for_texture() {
        let (tx, rx) = oneshot::channel::<Result<TextureData>>();
        let texture = async move {
            rx.await
                .map_err(|_| PinwheelError::TextureLoadCancelled("wing".into()))?
        };

        let mut prepared = pin!(FanField::prepare(FanFieldConfig::default(), 1.5, texture));
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        for _ in 0..3 {
            assert!(prepared.as_mut().poll(&mut cx).is_pending());
        }

        tx.send(Ok(self::texture())).unwrap();
        match prepared.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(field)) => assert_eq!(field.fans.len(), 3),
            Poll::Ready(Err(e)) => panic!("preparation failed: {e}"),
            Poll::Pending => panic!("still waiting after the texture arrived"),
        }
    }

    #[test]
    fn failed_texture_load_builds_nothing() {
        let texture = async { Err(PinwheelError::TextureLoadCancelled("wing".into())) };
        let result = futures::executor::block_on(FanField::prepare(
            FanFieldConfig::default(),
            1.5,
            texture,
        ));
        assert!(matches!(result, Err(PinwheelError::TextureLoadCancelled(_))));
    }

    #[test]
    fn load_reads_the_configured_texture() {
        let path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/wing_texture02.png");
        let config = FanFieldConfig::default().with_texture_path(path);
        let field = futures::executor::block_on(FanField::load(config, 1.5)).unwrap();

        let wing = field.scene.material_manager.get_material("fan01/wing").unwrap();
        assert!(wing.map.is_some());
    }

    #[test]
    fn load_fails_for_a_missing_texture() {
        let config = FanFieldConfig::default().with_texture_path("assets/no_such_texture.png");
        let result = futures::executor::block_on(FanField::load(config, 1.5));
        assert!(matches!(result, Err(PinwheelError::TextureIo { .. })));
    }

    #[test]
    fn stage_animates_every_fan() {
        let field = FanField::build(FanFieldConfig::default(), 1.5, None);
        let blades: Vec<_> = field.fans.iter().map(Fan::blades).collect();
        let mut stage = Stage::from(field);
        let mut controls = crate::gfx::camera::OrbitControls::new();

        stage.step(&mut controls);

        let spins: Vec<f32> = blades
            .iter()
            .map(|&id| stage.scene.graph.transform(id).rotation.z)
            .collect();
        assert_eq!(spins, vec![0.6, 0.3, 0.4]);
        assert_eq!(stage.frame_loop.len(), 3);
    }
}
