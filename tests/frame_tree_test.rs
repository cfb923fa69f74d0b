//! Tests for the frame search-tree builder

use rstest::rstest;

use animpack::domain::{build_frame_tree, build_index_tree, DomainError, FrameTreeNode};
use animpack::util::testing;

fn expected_depth(n: usize) -> usize {
    // ceil(log2 n) edges, depth counts nodes
    (usize::BITS - (n - 1).leading_zeros()) as usize + 1
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(8)]
#[case(17)]
#[case(100)]
#[case(1000)]
fn given_frame_count_when_building_then_has_one_leaf_per_frame(#[case] n: usize) {
    testing::init_test_setup();
    let tree = build_index_tree(n).unwrap();

    assert_eq!(tree.leaf_count(), n);
    assert_eq!(tree.branch_count(), n - 1);
    assert_eq!(
        tree.leaf_indices(),
        (0..n as u32).collect::<Vec<_>>(),
        "leaves must cover [0, n) in order without gaps"
    );
    assert_eq!(tree.min_index(), 0);
    assert_eq!(tree.max_index() as usize, n - 1);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(64)]
#[case(65)]
#[case(999)]
fn given_frame_count_when_building_then_depth_is_logarithmic(#[case] n: usize) {
    let tree = build_index_tree(n).unwrap();
    let expected = expected_depth(n);
    let depth = tree.depth();
    assert!(
        depth + 1 >= expected && depth <= expected + 1,
        "depth {} for {} frames, expected about {}",
        depth,
        n,
        expected
    );
}

#[rstest]
#[case(3)]
#[case(10)]
#[case(33)]
fn given_branches_when_inspecting_then_children_partition_range(#[case] n: usize) {
    let tree = build_index_tree(n).unwrap();
    for node in tree.iter() {
        if let FrameTreeNode::Branch { min, max, children } = node {
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].min_index(), *min);
            assert_eq!(children[0].max_index() + 1, children[1].min_index());
            assert_eq!(children[1].max_index(), *max);
        }
    }
}

#[test]
fn given_five_frames_when_building_then_matches_walk_shape() {
    let tree = build_index_tree(5).unwrap();

    let shape: Vec<String> = tree.iter().map(|n| n.to_string()).collect();
    assert_eq!(
        shape,
        vec![
            "branch 0..4",
            "branch 0..2",
            "branch 0..1",
            "leaf 0",
            "leaf 1",
            "leaf 2",
            "branch 3..4",
            "leaf 3",
            "leaf 4",
        ]
    );
    assert_eq!(tree.leaf_count(), 5);
    assert_eq!(tree.branch_count(), 4);
}

#[test]
fn given_same_count_when_building_twice_then_trees_are_equal() {
    assert_eq!(build_index_tree(37).unwrap(), build_index_tree(37).unwrap());
}

#[test]
fn given_zero_frames_when_building_then_empty_timeline() {
    let frames: Vec<u8> = Vec::new();
    assert_eq!(
        build_frame_tree(&frames).unwrap_err(),
        DomainError::EmptyTimeline
    );
}

#[test]
fn given_payload_tree_when_mapping_then_keeps_shape() {
    let frames = vec![10, 20, 30, 40];
    let tree = build_frame_tree(&frames).unwrap();
    let doubled = tree.clone().map(&mut |v: &i32| v * 2);

    assert_eq!(doubled.find_leaf(3), Some(&80));
    assert_eq!(
        tree.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
        doubled.iter().map(|n| n.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn given_tree_when_rendering_then_shows_ranges() {
    let rendered = build_index_tree(3).unwrap().to_tree_string().to_string();
    assert!(rendered.starts_with("[0, 2]"));
    assert!(rendered.contains("[0, 1]"));
    assert!(rendered.contains("leaf 2"));
}
