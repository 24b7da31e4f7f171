mod common;

use box_ngin::{
    InnerSpace, ModelError, Vector3,
    data_structures::{
        box_tree::{BoxId, BoxNode, BoxTree, corner, corners_from_size},
        instance::orientation_from_euler_degrees,
    },
};
use common::test_utils::{assert_close, box_def, init_logger, with_children};

fn skeleton() -> Vec<box_ngin::resources::definition::BoxDefinition> {
    vec![
        with_children(
            box_def("body", [0.0, 12.0, 0.0], [8.0, 12.0, 4.0]),
            vec![
                with_children(
                    box_def("arm", [6.0, 10.0, 0.0], [4.0, 12.0, 4.0]),
                    vec![box_def("hand", [0.0, -6.0, 0.0], [2.0, 2.0, 2.0])],
                ),
                box_def("head", [0.0, 12.0, 0.0], [8.0, 8.0, 8.0]),
            ],
        ),
        box_def("tail", [0.0, 6.0, -3.0], [1.0, 1.0, 6.0]),
    ]
}

#[test]
fn name_index_has_one_entry_per_box() {
    init_logger();
    let tree = BoxTree::parse(&skeleton()).unwrap();

    assert_eq!(tree.len(), 5);
    for name in ["body", "arm", "hand", "head", "tail"] {
        let node = tree.by_name(name).unwrap();
        assert_eq!(node.name, name);
    }
    assert!(tree.by_name("leg").is_none());
}

#[test]
fn children_are_listed_once_by_their_parent() {
    let tree = BoxTree::parse(&skeleton()).unwrap();

    for (id, node) in tree.iter() {
        match node.parent {
            Some(parent) => {
                let listed = tree.get(parent).children.iter().filter(|c| **c == id).count();
                assert_eq!(listed, 1, "{} listed {} times", node.name, listed);
            }
            None => assert!(tree.roots().contains(&id)),
        }
    }
    let root_names: Vec<_> = tree.roots().iter().map(|id| tree.get(*id).name.as_str()).collect();
    assert_eq!(root_names, ["body", "tail"]);
}

#[test]
fn boxes_are_stored_in_pre_order() {
    let tree = BoxTree::parse(&skeleton()).unwrap();
    let names: Vec<_> = tree.names().collect();
    assert_eq!(names, ["body", "arm", "hand", "head", "tail"]);

    let body = tree.by_name("body").unwrap();
    let child_names: Vec<_> = body.children.iter().map(|id| tree.get(*id).name.as_str()).collect();
    assert_eq!(child_names, ["arm", "head"]);
    assert_eq!(tree.id_of("hand"), Some(BoxId(2)));
}

#[test]
fn derived_corners_are_symmetric_half_sizes() {
    let corners = corners_from_size(Vector3::new(2.0, 4.0, 6.0));
    let expected = [
        [-1.0, 2.0, -3.0],
        [1.0, 2.0, -3.0],
        [1.0, -2.0, -3.0],
        [-1.0, -2.0, -3.0],
        [1.0, 2.0, 3.0],
        [-1.0, 2.0, 3.0],
        [-1.0, -2.0, 3.0],
        [1.0, -2.0, 3.0],
    ];
    for (actual, expected) in corners.iter().zip(expected) {
        assert_close((*actual).into(), expected);
    }
    assert_close(corners[corner::RIGHT_BOTTOM_FRONT].into(), [1.0, -2.0, 3.0]);

    let sum = corners.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, c| acc + *c);
    assert!(sum.magnitude() < 1e-6);
}

#[test]
fn explicit_corners_are_taken_verbatim() {
    let mut def = box_def("plane", [0.0; 3], [4.0, 0.0, 4.0]);
    let coords: Vec<[f32; 3]> = (0..8).map(|i| [i as f32, 0.5, -(i as f32)]).collect();
    def.vertex_coords = Some(coords.clone());

    let node = BoxNode::from_definition(&def).unwrap();
    for (actual, expected) in node.vertex_coords.iter().zip(coords) {
        assert_close((*actual).into(), expected);
    }
}

#[test]
fn explicit_corners_must_be_eight() {
    let mut def = box_def("broken", [0.0; 3], [1.0; 3]);
    def.vertex_coords = Some(vec![[0.0; 3]; 7]);

    assert_eq!(
        BoxTree::parse(&[def]).unwrap_err(),
        ModelError::InvalidVertexCoords {
            name: "broken".to_string(),
            count: 7
        }
    );
}

#[test]
fn negative_sizes_are_rejected() {
    let def = box_def("inside_out", [0.0; 3], [1.0, -1.0, 1.0]);
    assert!(matches!(
        BoxTree::parse(&[def]),
        Err(ModelError::NegativeSize { .. })
    ));
}

#[test]
fn duplicate_names_fail_to_load() {
    let tree = vec![with_children(
        box_def("body", [0.0; 3], [1.0; 3]),
        vec![box_def("body", [0.0; 3], [1.0; 3])],
    )];
    assert_eq!(
        BoxTree::parse(&tree).unwrap_err(),
        ModelError::DuplicateName("body".to_string())
    );
}

#[test]
fn inserting_below_an_unknown_parent_fails() {
    let mut tree = BoxTree::new();
    let root = BoxNode::from_definition(&box_def("root", [0.0; 3], [1.0; 3])).unwrap();
    let orphan = BoxNode::from_definition(&box_def("orphan", [0.0; 3], [1.0; 3])).unwrap();

    tree.insert(root, None).unwrap();
    assert_eq!(
        tree.insert(orphan.clone(), Some("ghost")).unwrap_err(),
        ModelError::MissingParent {
            name: "orphan".to_string(),
            parent: "ghost".to_string()
        }
    );
    // nothing was registered by the failed insert
    assert_eq!(tree.len(), 1);
    let id = tree.insert(orphan, Some("root")).unwrap();
    assert_eq!(tree.get(id).parent, tree.id_of("root"));
}

#[test]
fn rotations_apply_y_then_x_then_z() {
    let mut def = box_def("turned", [0.0; 3], [1.0; 3]);
    def.rotation = [90.0, 90.0, 0.0];
    let node = BoxNode::from_definition(&def).unwrap();

    // X turns +Z onto -Y, the following Y turn leaves -Y alone
    assert_close((node.orientation * Vector3::unit_z()).into(), [0.0, -1.0, 0.0]);
    assert_close(
        (orientation_from_euler_degrees([0.0, 0.0, 90.0]) * Vector3::unit_x()).into(),
        [0.0, 1.0, 0.0],
    );
}

#[test]
fn foreign_handles_are_rejected_by_try_get() {
    let tree = BoxTree::parse(&skeleton()).unwrap();

    assert_eq!(tree.try_get(BoxId(4)).map(|node| node.name.as_str()), Some("tail"));
    assert!(tree.try_get(BoxId(5)).is_none());
}

#[test]
#[should_panic]
fn get_panics_on_foreign_handles() {
    let tree = BoxTree::parse(&skeleton()).unwrap();
    tree.get(BoxId(5));
}
