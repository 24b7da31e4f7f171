//! GPU buffers for posed box geometry.
//!
//! [`GeometryBuffers`] mirrors a [`Geometry`] on the GPU: a 16-bit index
//! buffer that is uploaded once and three vertex buffers (position, normal,
//! uv) that are rewritten after every pose. Drawing issues one indexed draw
//! per [`Chunk`], adding the chunk's `base_vertex` to the wrapped indices.
//!
//! Shader locations: 0 = position, 1 = normal, 2 = uv.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::data_structures::geometry::{Chunk, Geometry};

pub struct GeometryBuffers {
    pub index: wgpu::Buffer,
    pub position: wgpu::Buffer,
    pub normal: wgpu::Buffer,
    pub uv: wgpu::Buffer,
    chunks: Vec<Chunk>,
}

impl GeometryBuffers {
    pub fn new(device: &wgpu::Device, geometry: &Geometry, label: &str) -> Self {
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let vertex_buffer = |name: &str, data: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} {} Buffer", label, name)),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        };

        Self {
            position: vertex_buffer("Position", &geometry.positions),
            normal: vertex_buffer("Normal", &geometry.normals),
            uv: vertex_buffer("UV", &geometry.uvs),
            index,
            chunks: geometry.chunks().to_vec(),
        }
    }

    /// Upload the vertex data of the latest pose. The index buffer never changes.
    pub fn write(&self, queue: &wgpu::Queue, geometry: &Geometry) {
        if geometry.positions.is_empty() {
            return;
        }
        queue.write_buffer(&self.position, 0, bytemuck::cast_slice(&geometry.positions));
        queue.write_buffer(&self.normal, 0, bytemuck::cast_slice(&geometry.normals));
        queue.write_buffer(&self.uv, 0, bytemuck::cast_slice(&geometry.uvs));
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Bind the buffers and draw every chunk. Pipeline and bind groups are the
    /// caller's business.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        if self.chunks.is_empty() {
            return;
        }
        render_pass.set_vertex_buffer(0, self.position.slice(..));
        render_pass.set_vertex_buffer(1, self.normal.slice(..));
        render_pass.set_vertex_buffer(2, self.uv.slice(..));
        render_pass.set_index_buffer(self.index.slice(..), wgpu::IndexFormat::Uint16);
        for chunk in &self.chunks {
            render_pass.draw_indexed(
                chunk.start..chunk.start + chunk.count,
                chunk.base_vertex as i32,
                instances.clone(),
            );
        }
    }

    /// Vertex buffer layouts matching [`GeometryBuffers::draw`].
    pub fn desc() -> [wgpu::VertexBufferLayout<'static>; 3] {
        use std::mem;
        [
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
        ]
    }
}
