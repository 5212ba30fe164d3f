//! Scene graph received from the asset pipeline
//!
//! A flat arena of named nodes (groups and meshes) with index-based
//! children, mirroring what the render backend hands back after loading a
//! model. The initializer traverses it once; the mutators and the curtain
//! rig then write materials and transforms through [`MeshId`] handles.

use glam::Vec3;
use thiserror::Error;

use super::material::Material;

/// Traversal failures over a malformed graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {parent} references out-of-range child {child}")]
    InvalidChild { parent: usize, child: usize },
}

/// Stable handle to a mesh node inside one scene instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Renderable payload of a mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Draw order; translucent geometry goes after opaque (0)
    pub render_order: i32,
}

impl MeshData {
    /// Create mesh data with default shadow flags and draw order.
    pub fn new(material: Material) -> Self {
        Self {
            material,
            cast_shadow: false,
            receive_shadow: false,
            render_order: 0,
        }
    }
}

/// Node payload: an interior group or a renderable mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group { children: Vec<usize> },
    Mesh(MeshData),
}

/// One node of the loaded scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub kind: NodeKind,
}

impl SceneNode {
    /// Create a group node.
    pub fn group(name: impl Into<String>, position: Vec3, children: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            position,
            kind: NodeKind::Group { children },
        }
    }

    /// Create a mesh node.
    pub fn mesh(name: impl Into<String>, position: Vec3, material: Material) -> Self {
        Self {
            name: name.into(),
            position,
            kind: NodeKind::Mesh(MeshData::new(material)),
        }
    }
}

/// The loaded scene: node arena plus root list.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<usize>,
    /// Set once the initializer has run over this instance
    initialized: bool,
}

impl SceneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node without rooting it. Returns its index.
    pub fn insert(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Mark a node as a root of the graph.
    pub fn add_root(&mut self, index: usize) {
        self.roots.push(index);
    }

    /// Total node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of mesh nodes.
    pub fn mesh_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh(_)))
            .count()
    }

    /// Whether the initializer has already processed this instance.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(super) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Look up a mesh node.
    pub fn mesh(&self, id: MeshId) -> Option<&SceneNode> {
        self.nodes
            .get(id.0)
            .filter(|n| matches!(n.kind, NodeKind::Mesh(_)))
    }

    /// Look up a mesh node mutably.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut SceneNode> {
        self.nodes
            .get_mut(id.0)
            .filter(|n| matches!(n.kind, NodeKind::Mesh(_)))
    }

    /// The material of a mesh, when the handle is live.
    pub fn material(&self, id: MeshId) -> Option<&Material> {
        self.mesh(id).and_then(|node| match &node.kind {
            NodeKind::Mesh(data) => Some(&data.material),
            NodeKind::Group { .. } => None,
        })
    }

    /// Mutable access to the material of a mesh.
    pub fn material_mut(&mut self, id: MeshId) -> Option<&mut Material> {
        self.mesh_mut(id).and_then(|node| match &mut node.kind {
            NodeKind::Mesh(data) => Some(&mut data.material),
            NodeKind::Group { .. } => None,
        })
    }

    /// Visit every mesh node exactly once, depth-first from the roots.
    ///
    /// The closure receives the node index and the node. Returns the number
    /// of meshes visited, or the malformed-topology error.
    pub fn visit_meshes_mut<F>(&mut self, mut visit: F) -> Result<usize, GraphError>
    where
        F: FnMut(MeshId, &mut SceneNode),
    {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, usize)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (usize::MAX, root))
            .collect();
        let mut visited = 0;

        while let Some((parent, index)) = stack.pop() {
            if index >= self.nodes.len() {
                return Err(GraphError::InvalidChild {
                    parent,
                    child: index,
                });
            }
            if seen[index] {
                continue;
            }
            seen[index] = true;

            let children = match &self.nodes[index].kind {
                NodeKind::Group { children } => Some(children.clone()),
                NodeKind::Mesh(_) => None,
            };
            match children {
                Some(kids) => {
                    for &child in kids.iter().rev() {
                        stack.push((index, child));
                    }
                }
                None => {
                    visit(MeshId(index), &mut self.nodes[index]);
                    visited += 1;
                }
            }
        }
        Ok(visited)
    }

    /// Release the instance's geometry and material resources.
    ///
    /// Must be called when the scene is replaced or torn down so retries do
    /// not accumulate GPU memory in the backend mirror.
    pub fn dispose(&mut self) {
        log::debug!("Disposing scene graph ({} nodes)", self.nodes.len());
        self.nodes.clear();
        self.roots.clear();
        self.initialized = false;
    }

    /// Whether the instance still holds any nodes.
    pub fn is_disposed(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::LitMaterial;

    fn lit() -> Material {
        Material::Lit(LitMaterial::default())
    }

    #[test]
    fn test_visit_counts_meshes_once() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(SceneNode::mesh("A", Vec3::ZERO, lit()));
        let b = graph.insert(SceneNode::mesh("B", Vec3::ZERO, lit()));
        let group = graph.insert(SceneNode::group("G", Vec3::ZERO, vec![a, b]));
        graph.add_root(group);
        // A is also rooted directly; it must still be visited only once
        graph.add_root(a);

        let mut names = Vec::new();
        let visited = graph
            .visit_meshes_mut(|_, node| names.push(node.name.clone()))
            .unwrap();
        assert_eq!(visited, 2);
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_invalid_child_is_an_error() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(SceneNode::group("G", Vec3::ZERO, vec![42]));
        graph.add_root(group);

        let err = graph.visit_meshes_mut(|_, _| {}).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidChild {
                parent: group,
                child: 42
            }
        );
    }

    #[test]
    fn test_mesh_handle_rejects_groups() {
        let mut graph = SceneGraph::new();
        let group = graph.insert(SceneNode::group("G", Vec3::ZERO, vec![]));
        graph.add_root(group);
        assert!(graph.mesh(MeshId(group)).is_none());
    }

    #[test]
    fn test_dispose_clears_everything() {
        let mut graph = SceneGraph::new();
        let m = graph.insert(SceneNode::mesh("M", Vec3::ZERO, lit()));
        graph.add_root(m);
        graph.dispose();
        assert!(graph.is_disposed());
        assert_eq!(graph.mesh_count(), 0);
        assert!(graph.mesh(MeshId(m)).is_none());
    }
}
