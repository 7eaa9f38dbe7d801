//! Light sources and the per-frame light list handed to the shaders.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::color::Color;

use super::graph::{NodeKind, SceneGraph};

/// Upper bound on directional lights the shader evaluates
pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
/// Upper bound on point lights the shader evaluates
pub const MAX_POINT_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel light arriving from `direction` (pointing towards the source)
    Directional {
        color: Color,
        intensity: f32,
        direction: Vector3<f32>,
    },
    /// Uniform light applied to every surface regardless of orientation
    Ambient { color: Color, intensity: f32 },
    /// Light emitted from the node's world position
    ///
    /// `range` of zero means unlimited; `decay` is the distance falloff
    /// exponent.
    Point {
        color: Color,
        intensity: f32,
        range: f32,
        decay: f32,
    },
}

impl Light {
    pub fn directional(color: Color, intensity: f32, direction: Vector3<f32>) -> Self {
        Light::Directional {
            color,
            intensity,
            direction,
        }
    }

    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, range: f32) -> Self {
        Light::Point {
            color,
            intensity,
            range,
            decay: 2.0,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Light::Directional { color, .. }
            | Light::Ambient { color, .. }
            | Light::Point { color, .. } => color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Light::Directional { intensity, .. }
            | Light::Ambient { intensity, .. }
            | Light::Point { intensity, .. } => intensity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLightData {
    pub direction: Vector3<f32>,
    pub radiance: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLightData {
    pub position: Vector3<f32>,
    pub radiance: Color,
    pub range: f32,
    pub decay: f32,
}

/// Lights of a scene resolved to world space
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    pub ambient: Option<Color>,
    pub directional: Vec<DirectionalLightData>,
    pub point: Vec<PointLightData>,
}

impl LightSet {
    /// Collects every light reachable from the root
    ///
    /// Expects world matrices to be current. Ambient lights are summed;
    /// lights past the shader limits are dropped.
    pub fn gather(graph: &SceneGraph) -> Self {
        let mut set = LightSet::default();

        for (id, node) in graph.iter() {
            let NodeKind::Light(light) = &node.kind else {
                continue;
            };

            match *light {
                Light::Ambient { color, intensity } => {
                    let current = set.ambient.unwrap_or(Color::BLACK);
                    let added = color.scaled(intensity);
                    set.ambient = Some(Color::rgb(
                        current.r + added.r,
                        current.g + added.g,
                        current.b + added.b,
                    ));
                }
                Light::Directional {
                    color,
                    intensity,
                    direction,
                } => {
                    if set.directional.len() == MAX_DIRECTIONAL_LIGHTS {
                        log::debug!("Ignoring directional light '{}': limit reached", node.name);
                        continue;
                    }
                    set.directional.push(DirectionalLightData {
                        direction: direction.normalize(),
                        radiance: color.scaled(intensity),
                    });
                }
                Light::Point {
                    color,
                    intensity,
                    range,
                    decay,
                } => {
                    if set.point.len() == MAX_POINT_LIGHTS {
                        log::debug!("Ignoring point light '{}': limit reached", node.name);
                        continue;
                    }
                    set.point.push(PointLightData {
                        position: graph.world_position(id),
                        radiance: color.scaled(intensity),
                        range,
                        decay,
                    });
                }
            }
        }

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::graph::Node;
    use crate::gfx::scene::transform::Transform;

    #[test]
    fn gather_resolves_point_light_world_position() {
        let mut graph = SceneGraph::new();
        let group = graph.add(
            graph.root(),
            Node::group("offset").with_transform(Transform::from_position(1.0, 0.0, 0.0)),
        );
        graph.add(
            group,
            Node::light("bulb", Light::point(Color::WHITE, 3.0, 60.0))
                .with_transform(Transform::from_position(0.0, 2.0, 0.0)),
        );
        graph.update_world_transforms();

        let lights = LightSet::gather(&graph);
        assert_eq!(lights.point.len(), 1);
        assert_eq!(lights.point[0].position, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(lights.point[0].radiance, Color::rgb(3.0, 3.0, 3.0));
    }

    #[test]
    fn gather_sums_ambient_and_normalizes_directions() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add(root, Node::light("a", Light::ambient(Color::WHITE, 0.2)));
        graph.add(root, Node::light("b", Light::ambient(Color::WHITE, 0.3)));
        graph.add(
            root,
            Node::light(
                "sun",
                Light::directional(Color::WHITE, 1.0, Vector3::new(1.0, 1.0, 1.0)),
            ),
        );
        graph.update_world_transforms();

        let lights = LightSet::gather(&graph);
        let ambient = lights.ambient.expect("ambient light present");
        assert!((ambient.r - 0.5).abs() < 1e-6);
        assert!((lights.directional[0].direction.magnitude() - 1.0).abs() < 1e-6);
    }
}
