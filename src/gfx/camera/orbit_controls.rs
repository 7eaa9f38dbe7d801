//! Mouse-driven orbit controls
//!
//! Input handlers only accumulate deltas; [`OrbitControls::refresh`] applies
//! them to a [`Camera`] once per frame. Left drag orbits around the target,
//! right or middle drag (or shift + left drag) pans, and the wheel dollies a
//! perspective camera or zooms an orthographic one.

use std::f32::consts::PI;

use cgmath::*;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::camera_utils::{Camera, Projection};

/// Keeps the polar angle away from the poles where the view flips
const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around +Y, measured from +Z towards +X
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pending_pan: Vector2<f32>,
    pan_offset: Vector3<f32>,
    viewport: Vector2<f32>,

    is_rotating: bool,
    is_panning: bool,
    is_shift_held: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitControls {
    /// Creates controls with a 1x1 viewport
    ///
    /// Call [`OrbitControls::resize`] with the real viewport size before
    /// feeding input.
    pub fn new() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_zoom: 0.0,
            max_zoom: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pending_pan: Vector2::zero(),
            pan_offset: Vector3::zero(),
            viewport: Vector2::new(1.0, 1.0),
            is_rotating: false,
            is_panning: false,
            is_shift_held: false,
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vector2::new(width as f32, height as f32);
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// Orbits by a mouse movement in physical pixels
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32) {
        let full_turn = 2.0 * PI * self.rotate_speed / self.viewport.y;
        self.delta_theta -= full_turn * dx;
        self.delta_phi -= full_turn * dy;
    }

    /// Moves towards the target (or magnifies an orthographic view)
    pub fn dolly_in(&mut self) {
        self.scale *= self.zoom_scale();
    }

    pub fn dolly_out(&mut self) {
        self.scale /= self.zoom_scale();
    }

    /// Pans by a mouse movement in physical pixels
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32) {
        self.pending_pan += Vector2::new(dx, dy) * self.pan_speed;
    }

    /// Converts accumulated pan pixels into a world-space target offset
    fn resolve_pan(&mut self, camera: &Camera) {
        if self.pending_pan == Vector2::zero() {
            return;
        }

        let forward = (camera.target - camera.eye).normalize();
        let camera_right = forward.cross(camera.up).normalize();
        let camera_up = camera_right.cross(forward);

        let (horizontal, vertical) = match camera.projection {
            Projection::Perspective { fovy, .. } => {
                let target_distance = camera.distance() * (Rad::from(fovy).0 / 2.0).tan();
                (
                    2.0 * self.pending_pan.x * target_distance / self.viewport.y,
                    2.0 * self.pending_pan.y * target_distance / self.viewport.y,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom,
                ..
            } => (
                self.pending_pan.x * (right - left) / zoom / self.viewport.x,
                self.pending_pan.y * (top - bottom) / zoom / self.viewport.y,
            ),
        };

        self.pan_offset += camera_up * vertical - camera_right * horizontal;
        self.pending_pan = Vector2::zero();
    }

    /// Applies accumulated input to `camera`
    ///
    /// With damping enabled the remaining motion decays over the following
    /// frames, so this must be called every frame.
    pub fn refresh(&mut self, camera: &mut Camera) {
        self.resolve_pan(camera);

        let mut spherical = Spherical::from_offset(camera.eye - camera.target);
        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.delta_theta * step;
        spherical.phi =
            (spherical.phi + self.delta_phi * step).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        match &mut camera.projection {
            Projection::Perspective { .. } => {
                spherical.radius =
                    (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
            }
            Projection::Orthographic { zoom, .. } => {
                *zoom = (*zoom / self.scale).clamp(self.min_zoom, self.max_zoom);
            }
        }

        camera.target += self.pan_offset * step;
        camera.eye = camera.target + spherical.to_offset();

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    pub fn is_panning(&self) -> bool {
        self.is_panning
    }

    /// Tracks buttons, modifiers and the wheel
    ///
    /// Returns `true` when the event was consumed.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_shift_held = modifiers.state().shift_key();
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left if pressed && self.is_shift_held => self.is_panning = true,
                    MouseButton::Left => {
                        self.is_rotating = pressed;
                        if !pressed {
                            self.is_panning = false;
                        }
                    }
                    MouseButton::Right | MouseButton::Middle => self.is_panning = pressed,
                    _ => return false,
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                if scroll > 0.0 {
                    self.dolly_in();
                } else if scroll < 0.0 {
                    self.dolly_out();
                }
                true
            }
            _ => false,
        }
    }

    /// Turns raw mouse motion into rotation or panning while a button is held
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            let (dx, dy) = (delta.0 as f32, delta.1 as f32);
            if self.is_panning {
                self.pan_by_pixels(dx, dy);
            } else if self.is_rotating {
                self.rotate_by_pixels(dx, dy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perspective_camera() -> Camera {
        Camera::new(Projection::perspective(Deg(50.0), 1.0, 0.1, 100.0)).with_position(0.0, 0.0, 10.0)
    }

    fn assert_close(actual: Point3<f32>, expected: Point3<f32>) {
        assert!(
            (actual - expected).magnitude() < 1e-4,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn refresh_without_input_keeps_camera() {
        let mut camera = Camera::new(Projection::orthographic(5.0, 1.0, 0.1, 30.0))
            .with_position(10.0, 3.0, 8.0);
        let mut controls = OrbitControls::new();

        controls.refresh(&mut camera);
        assert_close(camera.eye, Point3::new(10.0, 3.0, 8.0));
    }

    #[test]
    fn horizontal_drag_orbits_around_target() {
        let mut camera = perspective_camera();
        let mut controls = OrbitControls::new();
        controls.resize(800, 800);

        // A quarter of the viewport height is a quarter turn
        controls.rotate_by_pixels(200.0, 0.0);
        controls.refresh(&mut camera);

        assert_close(camera.eye, Point3::new(-10.0, 0.0, 0.0));
        assert_close(camera.target, Point3::origin());
    }

    #[test]
    fn polar_angle_is_clamped_at_the_pole() {
        let mut camera = perspective_camera();
        let mut controls = OrbitControls::new();
        controls.resize(800, 800);

        controls.rotate_by_pixels(0.0, 10_000.0);
        controls.refresh(&mut camera);

        assert!((camera.eye.y - 10.0).abs() < 1e-3);
        assert!(camera.eye.x.abs() < 1e-3 && camera.eye.z.abs() < 1e-3);
    }

    #[test]
    fn dolly_scales_distance_or_zoom() {
        let mut camera = perspective_camera();
        let mut controls = OrbitControls::new();
        controls.dolly_in();
        controls.refresh(&mut camera);
        assert!((camera.distance() - 9.5).abs() < 1e-4);

        let mut ortho = Camera::new(Projection::orthographic(5.0, 1.0, 0.1, 30.0))
            .with_position(0.0, 0.0, 10.0);
        controls.dolly_out();
        controls.refresh(&mut ortho);
        match ortho.projection {
            Projection::Orthographic { zoom, .. } => assert!((zoom - 0.95).abs() < 1e-6),
            _ => unreachable!(),
        }
        assert!((ortho.distance() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn orthographic_pan_moves_eye_and_target_together() {
        let mut camera = Camera::new(Projection::orthographic(5.0, 2.0, 0.1, 30.0))
            .with_position(0.0, 0.0, 10.0);
        let mut controls = OrbitControls::new();
        controls.resize(200, 100);

        // Half the viewport width spans half of the 20 unit wide frustum
        controls.pan_by_pixels(100.0, 0.0);
        controls.refresh(&mut camera);

        assert_close(camera.target, Point3::new(-10.0, 0.0, 0.0));
        assert_close(camera.eye, Point3::new(-10.0, 0.0, 10.0));
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut camera = perspective_camera();
        let mut controls = OrbitControls::new().with_damping(0.5);
        controls.resize(800, 800);

        controls.rotate_by_pixels(200.0, 0.0);
        controls.refresh(&mut camera);
        let after_first = camera.eye;
        controls.refresh(&mut camera);

        assert!(after_first.x < 0.0);
        assert!(camera.eye.x < after_first.x);
        assert!(camera.eye.x > -10.0);
    }

    #[test]
    fn motion_only_applies_while_a_button_is_held() {
        let mut camera = perspective_camera();
        let mut controls = OrbitControls::new();
        controls.resize(800, 800);

        controls.process_device_event(&DeviceEvent::MouseMotion { delta: (200.0, 0.0) });
        controls.refresh(&mut camera);
        assert_close(camera.eye, Point3::new(0.0, 0.0, 10.0));

        controls.is_rotating = true;
        controls.process_device_event(&DeviceEvent::MouseMotion { delta: (200.0, 0.0) });
        controls.refresh(&mut camera);
        assert_close(camera.eye, Point3::new(-10.0, 0.0, 0.0));
    }
}
