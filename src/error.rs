//! Errors raised while building, allocating or posing box models.
//!
//! Structural problems in a model definition are fatal at load time. A pose
//! pass fails as a whole when the animation data does not match the model, and
//! the caller is free to skip that frame and try again with other data.

use thiserror::Error;

/// Everything that can go wrong in the core (parser, allocator, pose engine).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Two boxes in one model share a name.
    #[error("box name `{0}` is defined more than once")]
    DuplicateName(String),

    /// A box was inserted below a parent the tree does not know about.
    #[error("box `{name}` references parent `{parent}` which has not been inserted")]
    MissingParent { name: String, parent: String },

    /// Explicit corner lists must contain all 8 corners.
    #[error("box `{name}` defines {count} vertex coordinates, expected 8")]
    InvalidVertexCoords { name: String, count: usize },

    #[error("box `{name}` has a negative size component")]
    NegativeSize { name: String },

    /// An animation sampler had no answer for a box of the posed model.
    #[error("animation has no data for box `{0}`")]
    UnknownBox(String),

    /// The box count cannot be addressed through signed base-vertex offsets.
    #[error("cannot allocate geometry for {0} boxes")]
    InvalidBoxCount(usize),

    #[error("geometry holds {expected} boxes but the tree has {actual}")]
    GeometryMismatch { expected: usize, actual: usize },
}
