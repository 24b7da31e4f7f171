//! Box tree: the parsed, hierarchical skeleton of a model.
//!
//! Boxes live in an arena and link to their parent through plain indices. A
//! tree built by [`BoxTree::parse`] stores its boxes in pre-order (parent
//! before children, children in declared order), the same order the pose
//! engine assigns buffer slots in.

use std::collections::HashMap;

use cgmath::{Quaternion, Vector3};
use log::debug;

use crate::{
    data_structures::instance::orientation_from_euler_degrees, error::ModelError,
    resources::definition::BoxDefinition,
};

/// Handle of a box inside its [`BoxTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoxId(pub usize);

/// Corner names of `vertex_coords`, in storage order.
pub mod corner {
    pub const LEFT_TOP_BACK: usize = 0;
    pub const RIGHT_TOP_BACK: usize = 1;
    pub const RIGHT_BOTTOM_BACK: usize = 2;
    pub const LEFT_BOTTOM_BACK: usize = 3;
    pub const RIGHT_TOP_FRONT: usize = 4;
    pub const LEFT_TOP_FRONT: usize = 5;
    pub const LEFT_BOTTOM_FRONT: usize = 6;
    pub const RIGHT_BOTTOM_FRONT: usize = 7;
}

/// A rigid sub-part of a model.
#[derive(Clone, Debug)]
pub struct BoxNode {
    pub name: String,
    pub parent: Option<BoxId>,
    pub position: Vector3<f32>,
    pub offset_from_pivot: Vector3<f32>,
    pub size: Vector3<f32>,
    /// Rest orientation.
    pub orientation: Quaternion<f32>,
    pub tex_offset: [i32; 2],
    /// The 8 corners in box-local space, see [`corner`].
    pub vertex_coords: [Vector3<f32>; 8],
    pub children: Vec<BoxId>,
}

impl BoxNode {
    /// Resolve a definition into a detached node (no parent, no children).
    pub fn from_definition(def: &BoxDefinition) -> Result<Self, ModelError> {
        if def.size.iter().any(|c| *c < 0.0) {
            return Err(ModelError::NegativeSize {
                name: def.name.clone(),
            });
        }
        let size = Vector3::from(def.size);
        let vertex_coords = match &def.vertex_coords {
            Some(coords) => {
                let coords: [[f32; 3]; 8] = coords.as_slice().try_into().map_err(|_| {
                    ModelError::InvalidVertexCoords {
                        name: def.name.clone(),
                        count: coords.len(),
                    }
                })?;
                coords.map(Vector3::from)
            }
            None => corners_from_size(size),
        };

        Ok(Self {
            name: def.name.clone(),
            parent: None,
            position: def.position.into(),
            offset_from_pivot: def.offset_from_pivot.into(),
            size,
            orientation: orientation_from_euler_degrees(def.rotation),
            tex_offset: def.tex_offset,
            vertex_coords,
            children: Vec::new(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Corners of a box centred on its local origin.
pub fn corners_from_size(size: Vector3<f32>) -> [Vector3<f32>; 8] {
    let (x, y, z) = (size.x / 2.0, size.y / 2.0, size.z / 2.0);
    [
        Vector3::new(-x, y, -z),
        Vector3::new(x, y, -z),
        Vector3::new(x, -y, -z),
        Vector3::new(-x, -y, -z),
        Vector3::new(x, y, z),
        Vector3::new(-x, y, z),
        Vector3::new(-x, -y, z),
        Vector3::new(x, -y, z),
    ]
}

/// The parsed box graph: arena, roots and name index.
#[derive(Clone, Debug, Default)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
    roots: Vec<BoxId>,
    by_name: HashMap<String, BoxId>,
}

impl BoxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse nested definitions, depth first in document order.
    pub fn parse(definitions: &[BoxDefinition]) -> Result<Self, ModelError> {
        let mut tree = Self::new();
        for def in definitions {
            tree.insert_recursive(def, None)?;
        }
        debug!(
            "parsed box tree with {} boxes ({} roots)",
            tree.len(),
            tree.roots.len()
        );
        Ok(tree)
    }

    fn insert_recursive(
        &mut self,
        def: &BoxDefinition,
        parent: Option<&str>,
    ) -> Result<BoxId, ModelError> {
        let id = self.insert(BoxNode::from_definition(def)?, parent)?;
        for child in &def.children {
            self.insert_recursive(child, Some(&def.name))?;
        }
        Ok(id)
    }

    /// Insert a single node below `parent` (or as a new root).
    ///
    /// The parent must already be present. Nodes keep pre-order only when every
    /// subtree is inserted completely before its next sibling, which is what
    /// [`BoxTree::parse`] does.
    pub fn insert(&mut self, mut node: BoxNode, parent: Option<&str>) -> Result<BoxId, ModelError> {
        if self.by_name.contains_key(&node.name) {
            return Err(ModelError::DuplicateName(node.name));
        }
        let parent_id = match parent {
            Some(parent_name) => Some(*self.by_name.get(parent_name).ok_or_else(|| {
                ModelError::MissingParent {
                    name: node.name.clone(),
                    parent: parent_name.to_string(),
                }
            })?),
            None => None,
        };

        let id = BoxId(self.nodes.len());
        node.parent = parent_id;
        node.children.clear();
        match parent_id {
            Some(parent_id) => self.nodes[parent_id.0].children.push(id),
            None => self.roots.push(id),
        }
        self.by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[BoxId] {
        &self.roots
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not handed out by this tree. Use [`BoxTree::try_get`] for
    /// handles of unknown origin.
    pub fn get(&self, id: BoxId) -> &BoxNode {
        &self.nodes[id.0]
    }

    pub fn try_get(&self, id: BoxId) -> Option<&BoxNode> {
        self.nodes.get(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<BoxId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&BoxNode> {
        self.id_of(name).map(|id| self.get(id))
    }

    /// All boxes in arena (pre-order) order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &BoxNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (BoxId(i), node))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.name.as_str())
    }
}
