//! Arena-backed object hierarchy.
//!
//! Nodes are never freed; removing a child only detaches it, so a
//! [`NodeId`] stays valid for the lifetime of its [`SceneGraph`] and can be
//! re-attached later.

use std::fmt;

use three_math::Matrix4;
use tracing::{trace, warn};

use crate::{Error, Object3D, Result};

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node {
    object: Object3D,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owns every [`Object3D`] and the parent/child links between them.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores `object` as a detached node.
    pub fn insert(&mut self, object: Object3D) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { object, parent: None, children: Vec::new() });
        id
    }

    /// True if `id` came from this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode(id))
    }

    /// The object stored at `id`.
    pub fn get(&self, id: NodeId) -> Option<&Object3D> {
        self.nodes.get(id.0).map(|n| &n.object)
    }

    /// Mutable access to the object stored at `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Object3D> {
        self.nodes.get_mut(id.0).map(|n| &mut n.object)
    }

    /// Parent of `id`, or `None` for roots and unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// True if `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Appends `child` to `parent`'s children, detaching it from its
    /// previous parent first.
    ///
    /// Adding a node to itself or to one of its own descendants would form
    /// a cycle; that request is logged and ignored.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownNode`] if either id is not in this graph.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;

        if child == parent {
            warn!(node = %child, "Object can't be added as a child of itself");
            return Ok(());
        }
        if self.is_ancestor(child, parent) {
            warn!(node = %child, parent = %parent, "Object can't be added below its own descendant");
            return Ok(());
        }

        if let Some(old) = self.nodes[child.0].parent {
            self.remove(old, child);
        }
        self.attach_unchecked(parent, child);
        Ok(())
    }

    /// Links a detached `child` below `parent`. Both ids must be valid and
    /// must not form a cycle.
    pub(crate) fn attach_unchecked(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        // recompose local and flag for a world refresh under the new parent
        self.nodes[child.0].object.update_matrix();
        trace!(parent = %parent, child = %child, "Attached node");
    }

    /// Detaches `child` from `parent`. Returns `false` if `child` was not a
    /// direct child of `parent`.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return false;
        };
        let Some(pos) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(pos);
        self.nodes[child.0].parent = None;
        true
    }

    /// Pre-order walk of the subtree rooted at `root`.
    pub fn traverse(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(root) {
            return order;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Like [`Self::traverse`] but skips invisible nodes and everything
    /// below them.
    pub fn traverse_visible(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.get(id) {
                Some(object) if object.visible => {
                    order.push(id);
                    stack.extend(self.children(id).iter().rev());
                }
                _ => {}
            }
        }
        order
    }

    /// Refreshes world matrices in the subtree rooted at `root`.
    ///
    /// A node whose world matrix changed forces the refresh of all of its
    /// descendants; untouched branches are left alone.
    pub fn update_matrix_world(&mut self, root: NodeId, force: bool) -> Result<()> {
        self.node(root)?;
        let parent_world = self
            .parent(root)
            .map(|p| *self.nodes[p.0].object.matrix_world());

        let mut stack = vec![(root, parent_world, force)];
        while let Some((id, parent_world, force)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            let changed = node.object.update_matrix_world(parent_world.as_ref(), force);
            let world = *node.object.matrix_world();
            for &child in node.children.iter().rev() {
                stack.push((child, Some(world), changed));
            }
        }
        Ok(())
    }

    /// World matrix of `id` composed from the current local transforms,
    /// ignoring the cached values. Does not mutate the graph.
    pub fn compute_world_matrix(&self, id: NodeId) -> Result<Matrix4> {
        let mut world = Matrix4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let object = &self.node(current)?.object;
            let mut local = Matrix4::IDENTITY;
            local.compose(object.position(), object.quaternion(), object.scale());
            world.premultiply(&local);
            cursor = self.parent(current);
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use three_math::Vector3;

    fn graph_with(n: usize) -> (SceneGraph, Vec<NodeId>) {
        let mut g = SceneGraph::new();
        let ids = (0..n).map(|i| g.insert(Object3D::named(format!("n{i}")))).collect();
        (g, ids)
    }

    #[test]
    fn test_add_sets_links() {
        let (mut g, ids) = graph_with(3);
        g.add(ids[0], ids[1]).unwrap();
        g.add(ids[0], ids[2]).unwrap();

        assert_eq!(g.children(ids[0]), &[ids[1], ids[2]]);
        assert_eq!(g.parent(ids[1]), Some(ids[0]));
        assert_eq!(g.parent(ids[0]), None);
    }

    #[test]
    fn test_add_reparents() {
        let (mut g, ids) = graph_with(3);
        g.add(ids[0], ids[2]).unwrap();
        g.add(ids[1], ids[2]).unwrap();

        assert!(g.children(ids[0]).is_empty());
        assert_eq!(g.children(ids[1]), &[ids[2]]);
        assert_eq!(g.parent(ids[2]), Some(ids[1]));
    }

    #[test]
    fn test_reparent_flags_world_refresh() {
        let (mut g, ids) = graph_with(2);
        g.update_matrix_world(ids[1], false).unwrap();
        assert!(!g.get(ids[1]).unwrap().matrix_world_needs_update());

        g.add(ids[0], ids[1]).unwrap();
        assert!(g.get(ids[1]).unwrap().matrix_world_needs_update());
    }

    #[test]
    fn test_add_rejects_cycles() {
        let (mut g, ids) = graph_with(3);
        g.add(ids[0], ids[0]).unwrap();
        assert!(g.children(ids[0]).is_empty());

        g.add(ids[0], ids[1]).unwrap();
        g.add(ids[1], ids[2]).unwrap();
        g.add(ids[2], ids[0]).unwrap();
        assert_eq!(g.parent(ids[0]), None);
        assert!(g.children(ids[2]).is_empty());
    }

    #[test]
    fn test_unknown_ids() {
        let (mut g, ids) = graph_with(1);
        let stray = NodeId(7);
        assert_eq!(g.add(ids[0], stray), Err(Error::UnknownNode(stray)));
        assert!(!g.remove(stray, ids[0]));
        assert!(g.children(stray).is_empty());
        assert!(g.traverse(stray).is_empty());
    }

    #[test]
    fn test_remove() {
        let (mut g, ids) = graph_with(3);
        g.add(ids[0], ids[1]).unwrap();

        assert!(!g.remove(ids[0], ids[2]));
        assert!(g.remove(ids[0], ids[1]));
        assert!(!g.remove(ids[0], ids[1]));
        assert_eq!(g.parent(ids[1]), None);
        // detached nodes stay addressable
        assert_eq!(g.get(ids[1]).unwrap().name, "n1");
    }

    #[test]
    fn test_traverse_preorder() {
        let (mut g, ids) = graph_with(5);
        g.add(ids[0], ids[1]).unwrap();
        g.add(ids[1], ids[2]).unwrap();
        g.add(ids[0], ids[3]).unwrap();
        g.add(ids[3], ids[4]).unwrap();

        assert_eq!(g.traverse(ids[0]), vec![ids[0], ids[1], ids[2], ids[3], ids[4]]);

        g.get_mut(ids[1]).unwrap().visible = false;
        assert_eq!(g.traverse_visible(ids[0]), vec![ids[0], ids[3], ids[4]]);
    }

    #[test]
    fn test_world_matrices_propagate() {
        let (mut g, ids) = graph_with(2);
        g.add(ids[0], ids[1]).unwrap();
        g.get_mut(ids[0]).unwrap().set_position(Vector3::new(1.0, 0.0, 0.0));
        g.get_mut(ids[1]).unwrap().set_position(Vector3::new(0.0, 2.0, 0.0));

        g.update_matrix_world(ids[0], false).unwrap();
        let child = g.get(ids[1]).unwrap();
        assert_eq!(child.world_position(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(*child.matrix_world(), g.compute_world_matrix(ids[1]).unwrap());

        // moving the parent alone still refreshes the child
        g.get_mut(ids[0]).unwrap().set_position(Vector3::new(-1.0, 0.0, 0.0));
        g.update_matrix_world(ids[0], false).unwrap();
        assert_eq!(g.get(ids[1]).unwrap().world_position(), Vector3::new(-1.0, 2.0, 0.0));
    }
}
