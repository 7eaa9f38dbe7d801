use std::f32::consts::TAU;

use cgmath::{Matrix4, Rad, Vector3, Zero};

/// Local transform of a scene node
///
/// Rotation is stored as Euler angles in radians, applied in X, Y, Z order
/// (the composed matrix is `Rx * Ry * Rz`). [`Transform::rotate`] keeps each
/// angle within one turn so that small per-frame steps never round away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation_x(mut self, angle: f32) -> Self {
        self.rotation.x = angle;
        self
    }

    pub fn with_rotation_y(mut self, angle: f32) -> Self {
        self.rotation.y = angle;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Adds `delta` to the current Euler angles, wrapped to `(-TAU, TAU)`
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        let r = self.rotation + delta;
        self.rotation = Vector3::new(r.x % TAU, r.y % TAU, r.z % TAU);
    }

    /// Builds the local matrix: translation, then rotation, then scale
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }
}
