use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fovy: Deg<f32>,
        aspect: f32,
        znear: f32,
        zfar: f32,
    },
    /// Frustum extents are derived from `half_height` and the viewport aspect
    ///
    /// `zoom` divides the extents around their center, so values above one
    /// magnify.
    Orthographic {
        half_height: f32,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        znear: f32,
        zfar: f32,
        zoom: f32,
    },
}

impl Projection {
    pub fn perspective(fovy: Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        Projection::Perspective {
            fovy,
            aspect,
            znear,
            zfar,
        }
    }

    pub fn orthographic(half_height: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Projection::Orthographic {
            half_height,
            left: -half_height * aspect,
            right: half_height * aspect,
            top: half_height,
            bottom: -half_height,
            znear,
            zfar,
            zoom: 1.0,
        }
    }

    /// Adapts the projection to a new viewport aspect ratio
    pub fn set_aspect(&mut self, new_aspect: f32) {
        match self {
            Projection::Perspective { aspect, .. } => *aspect = new_aspect,
            Projection::Orthographic {
                half_height,
                left,
                right,
                top,
                bottom,
                ..
            } => {
                *left = -*half_height * new_aspect;
                *right = *half_height * new_aspect;
                *top = *half_height;
                *bottom = -*half_height;
            }
        }
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        match *self {
            Projection::Perspective { znear, zfar, .. }
            | Projection::Orthographic { znear, zfar, .. } => (znear, zfar),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        match *self {
            Projection::Perspective {
                fovy,
                aspect,
                znear,
                zfar,
            } => perspective(fovy, aspect, znear, zfar),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                znear,
                zfar,
                zoom,
                ..
            } => {
                let dx = (right - left) / (2.0 * zoom);
                let dy = (top - bottom) / (2.0 * zoom);
                let cx = (right + left) / 2.0;
                let cy = (top + bottom) / 2.0;
                ortho(cx - dx, cx + dx, cy - dy, cy + dy, znear, zfar)
            }
        }
    }
}

/// A camera looking from `eye` at `target`
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
}

impl Camera {
    pub fn new(projection: Projection) -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 1.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.eye = Point3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.target = Point3::new(x, y, z);
        self
    }

    /// Updates the projection for a new viewport size
    ///
    /// Returns `false` and leaves the camera untouched for a zero-sized
    /// viewport (a minimised window).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.projection.set_aspect(width as f32 / height as f32);
        true
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection.matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.eye.to_homogeneous().into(),
            view_proj: self.build_view_projection_matrix().into(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthographic_resize_recomputes_extents_from_half_height() {
        let mut camera = Camera::new(Projection::orthographic(5.0, 1.0, 0.1, 30.0));
        assert!(camera.resize(1600, 800));

        match camera.projection {
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
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn perspective_resize_sets_aspect_only() {
        let mut camera = Camera::new(Projection::perspective(Deg(50.0), 1.0, 0.1, 100.0));
        camera.resize(1280, 720);

        assert_eq!(
            camera.projection,
            Projection::perspective(Deg(50.0), 1280.0 / 720.0, 0.1, 100.0)
        );
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut camera = Camera::new(Projection::perspective(Deg(50.0), 1.5, 0.1, 100.0));
        assert!(!camera.resize(0, 600));
        assert!(!camera.resize(800, 0));
        assert_eq!(
            camera.projection,
            Projection::perspective(Deg(50.0), 1.5, 0.1, 100.0)
        );
    }

    #[test]
    fn target_projects_to_clip_center() {
        let camera = Camera::new(Projection::perspective(Deg(50.0), 1.0, 0.1, 100.0))
            .with_position(25.0, -8.0, 22.0);

        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
