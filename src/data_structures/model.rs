//! A loaded box model: the parsed skeleton plus the atlas it is textured with.

use log::debug;

use crate::{
    data_structures::{
        box_tree::BoxTree,
        texture::{Texture, TextureMetadata},
    },
    error::ModelError,
    resources::definition::ModelDefinition,
};

/// Box skeleton and texture, immutable once constructed.
///
/// Wrap it in an `Arc` to share it read-only between several
/// [`super::model_instance::ModelInstance`]s; each brings its own geometry
/// buffers.
#[derive(Clone, Debug)]
pub struct Model {
    pub title: String,
    pub transparent: bool,
    tree: BoxTree,
    texture: Texture,
}

impl Model {
    pub fn new(definition: &ModelDefinition, texture: Texture) -> Result<Self, ModelError> {
        let tree = BoxTree::parse(&definition.tree)?;
        debug!(
            "model {} loaded: {} boxes, texture {} ({}x{})",
            definition.title,
            tree.len(),
            texture.label,
            texture.width(),
            texture.height(),
        );
        Ok(Self {
            title: definition.title.clone(),
            transparent: definition.transparent,
            tree,
            texture,
        })
    }

    pub fn box_count(&self) -> usize {
        self.tree.len()
    }

    pub fn tree(&self) -> &BoxTree {
        &self.tree
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Release the skeleton and the texture.
    pub fn dispose(self) {
        debug!("disposing model {}", self.title);
    }
}
