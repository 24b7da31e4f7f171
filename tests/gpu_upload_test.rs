#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
async fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..wgpu::InstanceDescriptor::new_without_display_handle()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok()?;
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("upload test device"),
            ..Default::default()
        })
        .await
        .ok()
}

#[test]
#[cfg(feature = "integration-tests")]
fn posed_geometry_uploads_into_matching_buffers() {
    use box_ngin::{data_structures::geometry::CHUNK_SPAN, render::GeometryBuffers};
    use common::test_utils::{box_def, posed_instance};

    let Some((device, queue)) = futures::executor::block_on(headless_device()) else {
        log::warn!("no adapter available, skipping GPU upload test");
        return;
    };

    let instance = posed_instance(vec![box_def("cube", [0.0; 3], [2.0, 2.0, 2.0])]);
    let geometry = instance.geometry();
    let buffers = GeometryBuffers::new(&device, geometry, "cube");
    buffers.write(&queue, geometry);
    queue.submit([]);

    assert_eq!(buffers.index.size(), (geometry.indices.len() * 2) as u64);
    assert_eq!(buffers.position.size(), (geometry.positions.len() * 4) as u64);
    assert_eq!(buffers.normal.size(), (geometry.normals.len() * 4) as u64);
    assert_eq!(buffers.uv.size(), (geometry.uvs.len() * 4) as u64);
    assert_eq!(buffers.chunks(), geometry.chunks());
    assert!(buffers.chunks().iter().all(|c| (c.base_vertex as usize) % CHUNK_SPAN == 0));
}

#[test]
#[cfg(feature = "integration-tests")]
fn atlas_pixels_upload_as_a_texture() {
    use box_ngin::{data_structures::texture::Texture, resources::load_texture};
    use futures::executor::block_on;

    let Some((device, queue)) = block_on(headless_device()) else {
        log::warn!("no adapter available, skipping texture upload test");
        return;
    };

    let atlas = block_on(load_texture("biped.png")).unwrap();
    let uploaded = atlas.upload(&device, &queue).unwrap();
    assert_eq!(uploaded.texture.width(), 64);
    assert_eq!(uploaded.texture.height(), 32);

    // metadata-only textures have nothing to upload
    assert!(Texture::with_size("empty", 4, 4).upload(&device, &queue).is_err());
}
