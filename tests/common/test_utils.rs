use box_ngin::{
    Quaternion, Vector3,
    data_structures::{model::Model, model_instance::ModelInstance, texture::Texture},
    resources::definition::{BoxDefinition, ModelDefinition},
};

pub(crate) const EPSILON: f32 = 1e-4;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An axis-aligned box without pivot offset, texture offset or children.
pub(crate) fn box_def(name: &str, position: [f32; 3], size: [f32; 3]) -> BoxDefinition {
    BoxDefinition {
        name: name.to_string(),
        position,
        offset_from_pivot: [0.0; 3],
        size,
        rotation: [0.0; 3],
        tex_offset: [0, 0],
        children: Vec::new(),
        vertex_coords: None,
    }
}

pub(crate) fn with_children(mut def: BoxDefinition, children: Vec<BoxDefinition>) -> BoxDefinition {
    def.children = children;
    def
}

pub(crate) fn model(tree: Vec<BoxDefinition>) -> Model {
    let definition = ModelDefinition {
        title: "test".to_string(),
        tree,
        transparent: false,
    };
    Model::new(&definition, Texture::with_size("atlas", 64, 32)).expect("valid test model")
}

pub(crate) fn posed_instance(tree: Vec<BoxDefinition>) -> ModelInstance {
    init_logger();
    let mut instance = ModelInstance::new(model(tree)).expect("geometry allocation");
    instance.reset_pose().expect("rest pose");
    instance
}

pub(crate) fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for axis in 0..3 {
        assert!(
            (actual[axis] - expected[axis]).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }
}

/// Quaternions are compared by what they do to the basis vectors, since `q`
/// and `-q` describe the same rotation.
pub(crate) fn assert_same_rotation(actual: Quaternion<f32>, expected: Quaternion<f32>) {
    for axis in [Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()] {
        assert_close((actual * axis).into(), (expected * axis).into());
    }
}

/// Average of the 24 baked vertices of box slot `box_index`.
pub(crate) fn box_centroid(instance: &ModelInstance, box_index: usize) -> [f32; 3] {
    let geometry = instance.geometry();
    let mut sum = [0.0; 3];
    for vertex in box_index * 24..box_index * 24 + 24 {
        let p = geometry.position(vertex);
        for axis in 0..3 {
            sum[axis] += p[axis] / 24.0;
        }
    }
    sum
}
