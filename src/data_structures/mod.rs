//! Engine data structures: box trees, models, geometry buffers and instances.
//!
//! This module contains the core data types for box-skeleton models:
//!
//! - `box_tree` parses nested box definitions into an arena of `BoxNode`s
//! - `model` owns a parsed tree together with its atlas texture
//! - `geometry` holds the flat index/position/normal/uv buffers and their chunks
//! - `instance` holds rigid transforms (position + orientation)
//! - `animation` defines the sampler contract and a keyframe implementation
//! - `texture` contains atlas metadata, pixel data and GPU upload
//! - `model_instance` ties one model to one geometry and drives posing

pub mod animation;
pub mod box_tree;
pub mod geometry;
pub mod instance;
pub mod model;
pub mod model_instance;
pub mod texture;
