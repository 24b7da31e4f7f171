//! Flat vertex buffers for posed box models.
//!
//! Every box contributes 6 quads = 24 vertices = 36 indices. The index buffer
//! depends only on the box count and is built once. Vertex data is rewritten
//! in place by every pose pass.
//!
//! Indices are 16 bit. To address more than 65536 vertices the index range is
//! split into chunks: each index is stored modulo [`CHUNK_SPAN`] and every
//! [`Chunk`] records the `base_vertex` a renderer has to add back when it
//! draws that slice of the index buffer.

use log::debug;

use crate::error::ModelError;

pub const MAX_INDEX: usize = 0xffff;
/// Number of sub-ranges the 16-bit index space is divided into.
pub const CHUNK_DIVIDER: usize = 6;
pub const CHUNK_SIZE: usize = (MAX_INDEX + 1) / CHUNK_DIVIDER;
/// Vertices addressable by one chunk. A multiple of 4, so quads never straddle.
pub const CHUNK_SPAN: usize = CHUNK_SIZE * CHUNK_DIVIDER;
/// Indices per chunk: 6 indices for each quad of the span.
pub const CHUNK_INDEX_CAPACITY: usize = (CHUNK_SPAN / 4) * 6;

pub const VERTICES_PER_BOX: usize = 24;
pub const INDICES_PER_BOX: usize = 36;
pub const POSITIONS_PER_BOX: usize = VERTICES_PER_BOX * 3;
pub const NORMALS_PER_BOX: usize = VERTICES_PER_BOX * 3;
pub const UVS_PER_BOX: usize = VERTICES_PER_BOX * 2;

/// Largest box count whose vertex offsets still fit a signed 32-bit base vertex
/// and whose buffer lengths fit `usize` (32 bit on wasm).
pub const MAX_BOX_COUNT: usize = {
    let by_base_vertex = i32::MAX as usize / VERTICES_PER_BOX;
    let by_buffer_len = usize::MAX / POSITIONS_PER_BOX;
    if by_base_vertex < by_buffer_len { by_base_vertex } else { by_buffer_len }
};

/// A slice of the index buffer that can be submitted in one draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// First index of the chunk inside the index buffer.
    pub start: u32,
    pub count: u32,
    /// Vertex offset to add to every index of this chunk.
    pub base_vertex: u32,
}

/// Flat index/position/normal/uv buffers for a fixed number of boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    box_count: usize,
    pub indices: Vec<u16>,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    chunks: Vec<Chunk>,
}

impl Geometry {
    /// Allocate buffers for `box_count` boxes and build indices and chunks.
    ///
    /// Vertex data stays zeroed until the first pose pass.
    pub fn allocate(box_count: usize) -> Result<Self, ModelError> {
        // positions are the longest buffer, so every length below fits `usize`
        if box_count > MAX_BOX_COUNT {
            return Err(ModelError::InvalidBoxCount(box_count));
        }
        let indices = build_indices(box_count);
        let chunks = build_chunks(indices.len());
        debug!(
            "allocated geometry for {} boxes: {} indices in {} chunks",
            box_count,
            indices.len(),
            chunks.len()
        );

        Ok(Self {
            box_count,
            indices,
            positions: vec![0.0; box_count * POSITIONS_PER_BOX],
            normals: vec![0.0; box_count * NORMALS_PER_BOX],
            uvs: vec![0.0; box_count * UVS_PER_BOX],
            chunks,
        })
    }

    pub fn box_count(&self) -> usize {
        self.box_count
    }

    pub fn vertex_count(&self) -> usize {
        self.box_count * VERTICES_PER_BOX
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Write one quad (4 vertices sharing `normal`) starting at vertex `offset`.
    pub(crate) fn write_quad(&mut self, offset: usize, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        for (k, corner) in corners.iter().enumerate() {
            let at = (offset + k) * 3;
            self.positions[at..at + 3].copy_from_slice(corner);
            self.normals[at..at + 3].copy_from_slice(&normal);
        }
    }

    pub(crate) fn write_quad_uvs(&mut self, offset: usize, uvs: [[f32; 2]; 4]) {
        for (k, uv) in uvs.iter().enumerate() {
            let at = (offset + k) * 2;
            self.uvs[at..at + 2].copy_from_slice(uv);
        }
    }

    /// Position of vertex `vertex`, mostly useful for inspection.
    pub fn position(&self, vertex: usize) -> [f32; 3] {
        let at = vertex * 3;
        [self.positions[at], self.positions[at + 1], self.positions[at + 2]]
    }

    pub fn normal(&self, vertex: usize) -> [f32; 3] {
        let at = vertex * 3;
        [self.normals[at], self.normals[at + 1], self.normals[at + 2]]
    }

    pub fn uv(&self, vertex: usize) -> [f32; 2] {
        let at = vertex * 2;
        [self.uvs[at], self.uvs[at + 1]]
    }
}

/// Two triangles per quad, `{0,1,2}` and `{0,2,3}`, wrapped into the chunk span.
fn build_indices(box_count: usize) -> Vec<u16> {
    let quads = box_count * 6;
    let mut indices = Vec::with_capacity(quads * 6);
    for quad in 0..quads {
        let first = quad * 4;
        for local in [0, 1, 2, 0, 2, 3] {
            // always < CHUNK_SPAN <= u16::MAX
            indices.push(((first + local) % CHUNK_SPAN) as u16);
        }
    }
    indices
}

fn build_chunks(index_count: usize) -> Vec<Chunk> {
    let chunk_count = index_count.div_ceil(CHUNK_INDEX_CAPACITY);
    (0..chunk_count)
        .map(|i| {
            let start = i * CHUNK_INDEX_CAPACITY;
            Chunk {
                start: start as u32,
                count: CHUNK_INDEX_CAPACITY.min(index_count - start) as u32,
                base_vertex: (i * CHUNK_SPAN) as u32,
            }
        })
        .collect()
}
