//! Root container handed to renderers.

use three_math::Color;

use crate::{NodeId, Object3D, Result, SceneGraph};

/// A [`SceneGraph`] with a fixed root node and render settings.
#[derive(Debug, Clone)]
pub struct Scene {
    graph: SceneGraph,
    root: NodeId,
    /// Clear color
    pub background: Color,
    /// Refresh world matrices automatically before rendering
    pub auto_update: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene on a black background.
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Object3D::named("Scene"));
        Self { graph, root, background: Color::BLACK, auto_update: true }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The underlying hierarchy.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the hierarchy.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Inserts `object` directly below the root.
    pub fn add(&mut self, object: Object3D) -> NodeId {
        let id = self.graph.insert(object);
        self.graph.attach_unchecked(self.root, id);
        id
    }

    /// Inserts `object` below `parent`.
    pub fn add_child(&mut self, parent: NodeId, object: Object3D) -> Result<NodeId> {
        let id = self.graph.insert(object);
        self.graph.add(parent, id)?;
        Ok(id)
    }

    /// Object at `id`.
    pub fn object(&self, id: NodeId) -> Option<&Object3D> {
        self.graph.get(id)
    }

    /// Mutable object at `id`.
    pub fn object_mut(&mut self, id: NodeId) -> Option<&mut Object3D> {
        self.graph.get_mut(id)
    }

    /// Refreshes every world matrix below the root.
    pub fn update_matrix_world(&mut self) -> Result<()> {
        self.graph.update_matrix_world(self.root, false)
    }

    /// Visible nodes carrying a mesh, in pre-order.
    pub fn meshes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph
            .traverse_visible(self.root)
            .into_iter()
            .filter(|&id| self.graph.get(id).is_some_and(|o| o.mesh.is_some()))
    }
}
