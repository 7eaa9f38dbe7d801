//! # Primitive Shape Generation
//!
//! All shapes are generated with outward normals, texture coordinates and
//! counter-clockwise front faces. Cylinders and spheres use the Y axis as
//! their polar axis.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// Each face gets its own four vertices so normals stay flat, and UVs run
/// from 0 to 1 across every face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let half = [width * 0.5, height * 0.5, depth * 0.5];

    // (normal, u axis, v axis) with u x v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    for (normal, u_axis, v_axis) in faces {
        let base = data.vertices.len() as u32;

        for (su, sv) in corners {
            let mut position = [0.0; 3];
            for axis in 0..3 {
                position[axis] =
                    (normal[axis] + su * u_axis[axis] + sv * v_axis[axis]) * half[axis];
            }
            data.vertices.push(position);
            data.normals.push(normal);
            data.tex_coords.push([(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
        }

        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Parameters for [`generate_sphere`]
///
/// `phi` sweeps around the Y axis, `theta` runs from the +Y pole (0) to the
/// -Y pole (π). Restricting either range yields a partial sphere.
#[derive(Debug, Clone, Copy)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl SphereParams {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
            phi_start: 0.0,
            phi_length: PI * 2.0,
            theta_start: 0.0,
            theta_length: PI,
        }
    }

    pub fn with_phi(mut self, start: f32, length: f32) -> Self {
        self.phi_start = start;
        self.phi_length = length;
        self
    }

    pub fn with_theta(mut self, start: f32, length: f32) -> Self {
        self.theta_start = start;
        self.theta_length = length;
        self
    }
}

/// Generate a UV sphere
pub fn generate_sphere(params: &SphereParams) -> GeometryData {
    let mut data = GeometryData::new();

    let width_segs = params.width_segments.max(3);
    let height_segs = params.height_segments.max(2);
    let theta_end = (params.theta_start + params.theta_length).min(PI);

    let mut grid = Vec::with_capacity(height_segs as usize + 1);
    for iy in 0..=height_segs {
        let v = iy as f32 / height_segs as f32;
        let theta = params.theta_start + v * params.theta_length;
        let mut row = Vec::with_capacity(width_segs as usize + 1);

        for ix in 0..=width_segs {
            let u = ix as f32 / width_segs as f32;
            let phi = params.phi_start + u * params.phi_length;

            let position = [
                -params.radius * phi.cos() * theta.sin(),
                params.radius * theta.cos(),
                params.radius * phi.sin() * theta.sin(),
            ];

            row.push(data.vertices.len() as u32);
            data.vertices.push(position);
            data.normals.push(normalize_or_up(position));
            data.tex_coords.push([u, 1.0 - v]);
        }

        grid.push(row);
    }

    for iy in 0..height_segs as usize {
        for ix in 0..width_segs as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            // Degenerate pole triangles are skipped
            if iy != 0 || params.theta_start > 0.0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segs as usize - 1 || theta_end < PI {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}

/// Parameters for [`generate_cylinder`]
///
/// The cylinder is centered at the origin and spans `-height/2..height/2` on
/// the Y axis. `theta` sweeps around the axis starting at +Z.
#[derive(Debug, Clone, Copy)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl CylinderParams {
    pub fn new(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: PI * 2.0,
        }
    }

    pub fn with_height_segments(mut self, segments: u32) -> Self {
        self.height_segments = segments;
        self
    }

    pub fn with_open_ends(mut self, open_ended: bool) -> Self {
        self.open_ended = open_ended;
        self
    }

    pub fn with_theta(mut self, start: f32, length: f32) -> Self {
        self.theta_start = start;
        self.theta_length = length;
        self
    }
}

/// Generate a cylinder (or cone frustum) along the Y axis
pub fn generate_cylinder(params: &CylinderParams) -> GeometryData {
    let mut data = GeometryData::new();

    let radial_segs = params.radial_segments.max(3);
    let height_segs = params.height_segments.max(1);
    let half_height = params.height * 0.5;
    let slope = if params.height != 0.0 {
        (params.radius_bottom - params.radius_top) / params.height
    } else {
        0.0
    };

    // Side wall, top row first
    let mut grid = Vec::with_capacity(height_segs as usize + 1);
    for y in 0..=height_segs {
        let v = y as f32 / height_segs as f32;
        let radius = v * (params.radius_bottom - params.radius_top) + params.radius_top;
        let mut row = Vec::with_capacity(radial_segs as usize + 1);

        for x in 0..=radial_segs {
            let u = x as f32 / radial_segs as f32;
            let theta = params.theta_start + u * params.theta_length;
            let (sin_t, cos_t) = theta.sin_cos();

            row.push(data.vertices.len() as u32);
            data.vertices
                .push([radius * sin_t, -v * params.height + half_height, radius * cos_t]);
            data.normals.push(normalize_or_up([sin_t, slope, cos_t]));
            data.tex_coords.push([u, 1.0 - v]);
        }

        grid.push(row);
    }

    for y in 0..height_segs as usize {
        for x in 0..radial_segs as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    if !params.open_ended {
        if params.radius_top > 0.0 {
            push_cylinder_cap(&mut data, params, radial_segs, true);
        }
        if params.radius_bottom > 0.0 {
            push_cylinder_cap(&mut data, params, radial_segs, false);
        }
    }

    data
}

fn push_cylinder_cap(data: &mut GeometryData, params: &CylinderParams, radial_segs: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let radius = if top { params.radius_top } else { params.radius_bottom };
    let y = params.height * 0.5 * sign;

    // One center vertex per segment keeps cap UVs continuous
    let center_start = data.vertices.len() as u32;
    for _ in 0..radial_segs {
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, sign, 0.0]);
        data.tex_coords.push([0.5, 0.5]);
    }

    let ring_start = data.vertices.len() as u32;
    for x in 0..=radial_segs {
        let u = x as f32 / radial_segs as f32;
        let theta = params.theta_start + u * params.theta_length;
        let (sin_t, cos_t) = theta.sin_cos();

        data.vertices.push([radius * sin_t, y, radius * cos_t]);
        data.normals.push([0.0, sign, 0.0]);
        data.tex_coords.push([cos_t * 0.5 + 0.5, sin_t * 0.5 * sign + 0.5]);
    }

    for x in 0..radial_segs {
        let center = center_start + x;
        let ring = ring_start + x;

        if top {
            data.indices.extend_from_slice(&[ring, ring + 1, center]);
        } else {
            data.indices.extend_from_slice(&[ring + 1, ring, center]);
        }
    }
}

fn normalize_or_up(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > f32::EPSILON {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(data: &GeometryData, tri: usize) -> [f32; 3] {
        let [a, b, c] = [0, 1, 2].map(|k| data.vertices[data.indices[tri * 3 + k] as usize]);
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(0.6, 0.6, 0.6);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);

        for v in &cube.vertices {
            assert!(v.iter().all(|c| (c.abs() - 0.3).abs() < 1e-6));
        }
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let data = generate_box(6.0, 6.0, 6.0);
        for tri in 0..data.triangle_count() {
            let vertex_normal = data.normals[data.indices[tri * 3] as usize];
            assert!(dot(triangle_normal(&data, tri), vertex_normal) > 0.0);
        }
    }

    #[test]
    fn test_box_respects_each_dimension() {
        let data = generate_box(2.0, 4.0, 6.0);
        let max = |axis: usize| data.vertices.iter().map(|v| v[axis]).fold(f32::MIN, f32::max);
        assert_eq!(max(0), 1.0);
        assert_eq!(max(1), 2.0);
        assert_eq!(max(2), 3.0);
    }

    #[test]
    fn test_full_sphere_generation() {
        let sphere = generate_sphere(&SphereParams::new(1.0, 8, 6));
        assert_eq!(sphere.vertex_count(), 9 * 7);
        // Two triangles per quad, minus one per quad on each pole row
        assert_eq!(sphere.triangle_count(), 2 * 8 * 6 - 2 * 8);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
    }

    #[test]
    fn test_partial_sphere_keeps_rim_triangles() {
        let params = SphereParams::new(0.2, 30, 30).with_theta(4.66212349792725, 2.95938027968159);
        let hub = generate_sphere(&params);
        // Starts past the pole, but the sweep is clipped at the -Y pole
        assert_eq!(hub.triangle_count(), 2 * 30 * 30 - 30);

        for v in &hub.vertices {
            let r = dot(*v, *v).sqrt();
            assert!((r - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(&CylinderParams::new(5.0, 5.0, 10.0, 32));
        let side = 33 * 2;
        let caps = 2 * (32 + 33);
        assert_eq!(cylinder.vertex_count(), side + caps);
        assert_eq!(cylinder.triangle_count(), 2 * 32 + 2 * 32);

        let max_y = cylinder.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        let min_y = cylinder.vertices.iter().map(|v| v[1]).fold(f32::MAX, f32::min);
        assert_eq!(max_y, 5.0);
        assert_eq!(min_y, -5.0);
    }

    #[test]
    fn test_cylinder_faces_wind_outward() {
        let data = generate_cylinder(&CylinderParams::new(0.3, 0.3, 0.7, 30));
        for tri in 0..data.triangle_count() {
            let idx = data.indices[tri * 3] as usize;
            assert!(dot(triangle_normal(&data, tri), data.normals[idx]) > 0.0);
        }
    }

    #[test]
    fn test_half_cylinder_stays_on_one_side() {
        let blade = generate_cylinder(&CylinderParams::new(0.5, 0.5, 0.05, 32).with_theta(0.0, PI));
        assert!(blade.vertices.iter().all(|v| v[0] >= -1e-6));
    }

    #[test]
    fn test_open_cylinder_has_no_caps() {
        let tube = generate_cylinder(&CylinderParams::new(1.0, 1.0, 1.0, 8).with_open_ends(true));
        assert_eq!(tube.vertex_count(), 9 * 2);
        assert_eq!(tube.triangle_count(), 16);
    }
}
