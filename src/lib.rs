//! box-ngin
//!
//! Turns hierarchical "box skeleton" models (trees of oriented cuboids with a
//! pivot offset, a size and a place in a shared texture atlas) into flat,
//! optionally animated triangle buffers that can be uploaded to the GPU as-is.
//!
//! High-level modules
//! - `data_structures`: box tree, model, geometry buffers and model instances
//! - `pose`: the pose engine that bakes faces, normals and atlas UVs per frame
//! - `resources`: helpers to load model/animation definitions and textures
//! - `render`: wgpu buffers and chunked draw submission for posed geometry
//! - `error`: the error type shared by the core
//!

pub mod data_structures;
pub mod error;
pub mod pose;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use error::ModelError;

/// Install the platform logger (`env_logger` natively, the browser console on wasm).
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = console_log::init_with_level(log::Level::Warn);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::try_init();
    }
}
