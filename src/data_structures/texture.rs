//! Atlas textures for box models.
//!
//! The pose engine only needs the pixel dimensions of the atlas to normalise
//! UVs, which is what [`TextureMetadata`] exposes. [`Texture`] additionally
//! keeps the decoded pixels so they can be uploaded with [`Texture::upload`].

use anyhow::*;
use image::{GenericImageView, ImageFormat, RgbaImage, load_from_memory_with_format};

/// Pixel dimensions of a texture atlas.
pub trait TextureMetadata {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// A decoded texture atlas shared by all boxes of a model.
#[derive(Clone, Debug)]
pub struct Texture {
    pub label: String,
    width: u32,
    height: u32,
    pixels: Option<RgbaImage>,
}

impl Texture {
    /// Metadata-only texture, for posing without pixel data (servers, tests).
    pub fn with_size(label: &str, width: u32, height: u32) -> Self {
        Self {
            label: label.to_string(),
            width,
            height,
            pixels: None,
        }
    }

    /// Decode a texture from raw image file data (PNG, JPEG, etc.).
    ///
    /// `format` is an optional file extension hint (e.g. "png"). If `None`
    /// the format is guessed from the data.
    pub fn from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<Self> {
        let img = match format {
            None => image::load_from_memory(bytes)?,
            Some(fmt) => {
                let format = ImageFormat::from_extension(fmt)
                    .with_context(|| format!("unknown image format `{}` for {}", fmt, label))?;
                load_from_memory_with_format(bytes, format)?
            }
        };
        Ok(Self::from_image(&img, label))
    }

    pub fn from_image(img: &image::DynamicImage, label: &str) -> Self {
        let (width, height) = img.dimensions();
        Self {
            label: label.to_string(),
            width,
            height,
            pixels: Some(img.to_rgba8()),
        }
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    /// Upload the decoded pixels into a nearest-filtered GPU texture.
    ///
    /// Box models are pixel art, so the sampler never blends texels.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<GpuTexture> {
        let rgba = self
            .pixels
            .as_ref()
            .with_context(|| format!("texture {} has no pixel data to upload", self.label))?;

        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&self.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(GpuTexture {
            texture,
            view,
            sampler,
        })
    }
}

impl TextureMetadata for Texture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// A GPU texture with its view and sampler.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}
