//! Per-frame animation
//!
//! Animated objects own the ids of the nodes they move and mutate only those
//! nodes' rotations. The [`FrameLoop`] ticks each of them once per frame, in
//! registration order, then lets the orbit controls move the camera.

use cgmath::Vector3;

use crate::gfx::{
    camera::OrbitControls,
    scene::{NodeId, Scene, SceneGraph},
};

/// Something that advances by one fixed step per rendered frame
///
/// There is no time delta: animation speed follows the display refresh rate.
pub trait Animated {
    fn tick(&mut self, graph: &mut SceneGraph);
}

/// Adds a constant Euler increment to one node every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub node: NodeId,
    /// Radians added to the x, y and z rotation per tick
    pub step: Vector3<f32>,
}

impl Spin {
    pub fn new(node: NodeId, step: Vector3<f32>) -> Self {
        Self { node, step }
    }

    pub fn around_y(node: NodeId, step: f32) -> Self {
        Self::new(node, Vector3::new(0.0, step, 0.0))
    }
}

impl Animated for Spin {
    fn tick(&mut self, graph: &mut SceneGraph) {
        graph.transform_mut(self.node).rotate(self.step);
    }
}

/// Owns the animated objects of a scene and runs the per-frame sequence
#[derive(Default)]
pub struct FrameLoop {
    animated: Vec<Box<dyn Animated>>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, object: impl Animated + 'static) {
        self.animated.push(Box::new(object));
    }

    pub fn len(&self) -> usize {
        self.animated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animated.is_empty()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Ticks every animated object once, then applies pending camera input
    ///
    /// The caller renders exactly once after this returns.
    pub fn step(&mut self, scene: &mut Scene, controls: &mut OrbitControls) {
        for object in &mut self.animated {
            object.tick(&mut scene.graph);
        }
        controls.refresh(&mut scene.camera);

        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!("Frame {}: {} animated objects", self.frames, self.animated.len());
        }
    }
}

/// A built scene together with the objects that animate it
pub struct Stage {
    pub scene: Scene,
    pub frame_loop: FrameLoop,
}

impl Stage {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            frame_loop: FrameLoop::new(),
        }
    }

    pub fn with_animated(mut self, object: impl Animated + 'static) -> Self {
        self.frame_loop.register(object);
        self
    }

    /// Advances one frame; see [`FrameLoop::step`]
    pub fn step(&mut self, controls: &mut OrbitControls) {
        self.frame_loop.step(&mut self.scene, controls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{Camera, Projection};
    use crate::gfx::scene::Transform;
    use cgmath::{Deg, InnerSpace};
    use std::{cell::RefCell, rc::Rc};

    fn empty_scene() -> Scene {
        Scene::new(
            Camera::new(Projection::perspective(Deg(50.0), 1.0, 0.1, 100.0))
                .with_position(0.0, 0.0, 10.0),
        )
    }

    struct Recorder {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Animated for Recorder {
        fn tick(&mut self, _graph: &mut SceneGraph) {
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn spin_accumulates_per_tick() {
        let mut scene = empty_scene();
        let root = scene.root();
        let node = scene.add_group(root, "spinner", Transform::default());
        let mut spin = Spin::new(node, Vector3::new(0.01, 0.01, 0.0));

        for _ in 0..100 {
            spin.tick(&mut scene.graph);
        }

        let rotation = scene.graph.transform(node).rotation;
        assert!((rotation.x - 1.0).abs() < 1e-4);
        assert!((rotation.y - 1.0).abs() < 1e-4);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn step_ticks_each_object_once_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut frame_loop = FrameLoop::new();
        for id in 0..3 {
            frame_loop.register(Recorder {
                id,
                log: log.clone(),
            });
        }

        let mut scene = empty_scene();
        let mut controls = OrbitControls::new();
        frame_loop.step(&mut scene, &mut controls);
        frame_loop.step(&mut scene, &mut controls);

        assert_eq!(*log.borrow(), vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(frame_loop.frame_count(), 2);
        assert_eq!(frame_loop.len(), 3);
    }

    #[test]
    fn step_applies_pending_camera_input() {
        let mut stage = Stage::new(empty_scene());
        let mut controls = OrbitControls::new();
        controls.resize(800, 600);
        controls.rotate_by_pixels(100.0, 0.0);

        let before = stage.scene.camera.eye;
        stage.step(&mut controls);
        let after = stage.scene.camera.eye;

        assert!((after - before).magnitude() > 1e-3);
        assert!((stage.scene.camera.distance() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn stage_registers_animated_objects() {
        let mut scene = empty_scene();
        let root = scene.root();
        let node = scene.add_group(root, "spinner", Transform::default());

        let mut stage = Stage::new(scene).with_animated(Spin::around_y(node, 0.5));
        let mut controls = OrbitControls::new();
        stage.step(&mut controls);
        stage.step(&mut controls);

        assert_eq!(stage.scene.graph.transform(node).rotation.y, 1.0);
        assert!(!stage.frame_loop.is_empty());
    }
}
