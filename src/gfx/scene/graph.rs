//! Arena-backed scene graph
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]s.
//! The graph always contains a root group; anything reachable from it is
//! rendered. Nodes can also be created detached, populated, and attached
//! later in one step.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::error::{PinwheelError, Result};
use crate::gfx::resources::material::MaterialId;

use super::{light::Light, mesh::GeometryId, mesh::TransformGpu, transform::Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A drawable geometry/material pair
pub struct MeshNode {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub(crate) gpu: Option<TransformGpu>,
}

pub enum NodeKind {
    /// Pure transform container
    Group,
    Mesh(MeshNode),
    Light(Light),
}

pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    world: Matrix4<f32>,
}

impl Node {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            kind,
            parent: None,
            children: Vec::new(),
            world: Matrix4::identity(),
        }
    }

    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: &str, geometry: GeometryId, material: &str) -> Self {
        Self::new(
            name,
            NodeKind::Mesh(MeshNode {
                geometry,
                material: material.to_string(),
                gpu: None,
            }),
        )
    }

    pub fn light(name: &str, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// World matrix as of the last [`SceneGraph::update_world_transforms`]
    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }
}

pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::group("root")],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes, detached ones and the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists
        false
    }

    /// Appends `node` as the last child of `parent`
    pub fn add(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.add_detached(node);
        self.link(parent, id);
        id
    }

    /// Stores `node` without a parent; it is not rendered until attached
    pub fn add_detached(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Moves `child` (and its subtree) under `parent`
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if child == self.root || self.is_ancestor_or_self(child, parent) {
            return Err(PinwheelError::GraphCycle);
        }

        if let Some(old_parent) = self.nodes[child.0].parent {
            self.nodes[old_parent.0].children.retain(|&c| c != child);
        }
        self.link(parent, child);
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        self.nodes[id.0].world.w.truncate()
    }

    /// Whether `id` is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// Depth-first, pre-order walk over every node attached to the root
    pub fn iter(&self) -> TraverseIter<'_> {
        self.iter_from(self.root)
    }

    /// Depth-first, pre-order walk over `start` and its descendants
    pub fn iter_from(&self, start: NodeId) -> TraverseIter<'_> {
        TraverseIter {
            graph: self,
            nodes_to_visit: vec![start],
        }
    }

    /// Mutable access to every attached mesh node
    pub(crate) fn meshes_mut(&mut self) -> impl Iterator<Item = (&mut MeshNode, Matrix4<f32>)> {
        let attached: Vec<bool> = (0..self.nodes.len())
            .map(|i| self.is_attached(NodeId(i)))
            .collect();

        self.nodes
            .iter_mut()
            .zip(attached)
            .filter(|(_, attached)| *attached)
            .filter_map(|(node, _)| match &mut node.kind {
                NodeKind::Mesh(mesh) => Some((mesh, node.world)),
                _ => None,
            })
    }

    /// Recomputes every world matrix from the root down
    pub fn update_world_transforms(&mut self) {
        let mut stack = vec![(self.root, Matrix4::identity())];

        while let Some((id, parent_world)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.world = parent_world * node.transform.matrix();

            let world = node.world;
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
    }
}

pub struct TraverseIter<'a> {
    graph: &'a SceneGraph,
    nodes_to_visit: Vec<NodeId>,
}

impl<'a> Iterator for TraverseIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.nodes_to_visit.pop()?;
        let node = &self.graph.nodes[id.0];
        self.nodes_to_visit.extend(node.children.iter().rev());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;
    use std::f32::consts::FRAC_PI_2;

    fn names(graph: &SceneGraph) -> Vec<String> {
        graph.iter().map(|(_, node)| node.name.clone()).collect()
    }

    #[test]
    fn traversal_is_pre_order_in_insertion_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add(root, Node::group("a"));
        graph.add(a, Node::group("a1"));
        graph.add(a, Node::group("a2"));
        graph.add(root, Node::group("b"));

        assert_eq!(names(&graph), ["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn detached_nodes_are_skipped_until_attached() {
        let mut graph = SceneGraph::new();
        let group = graph.add_detached(Node::group("group"));
        graph.add(group, Node::group("child"));
        assert_eq!(names(&graph), ["root"]);
        assert!(!graph.is_attached(group));

        graph.attach(graph.root(), group).unwrap();
        assert_eq!(names(&graph), ["root", "group", "child"]);
        assert!(graph.is_attached(group));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let parent = graph.add(graph.root(), Node::group("parent"));
        let child = graph.add(parent, Node::group("child"));

        assert!(matches!(graph.attach(child, parent), Err(PinwheelError::GraphCycle)));
        assert!(matches!(graph.attach(parent, parent), Err(PinwheelError::GraphCycle)));
    }

    #[test]
    fn attach_reparents_and_unlinks_old_parent() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let first = graph.add(root, Node::group("first"));
        let second = graph.add(root, Node::group("second"));
        let leaf = graph.add(first, Node::group("leaf"));

        graph.attach(second, leaf).unwrap();
        assert!(graph.get(first).unwrap().children().is_empty());
        assert_eq!(graph.get(second).unwrap().children(), &[leaf]);
        assert_eq!(graph.get(leaf).unwrap().parent(), Some(second));
    }

    #[test]
    fn world_transform_composes_ancestors() {
        let mut graph = SceneGraph::new();
        let spinner = graph.add(
            graph.root(),
            Node::group("spinner").with_transform(
                Transform::from_position(0.0, 1.0, 0.0).with_rotation_y(FRAC_PI_2),
            ),
        );
        let child = graph.add(
            spinner,
            Node::group("child").with_transform(Transform::from_position(0.0, 0.0, 2.0)),
        );

        graph.update_world_transforms();

        let expected = Vector3::new(2.0, 1.0, 0.0);
        assert!((graph.world_position(child) - expected).magnitude() < 1e-6);
    }
}
