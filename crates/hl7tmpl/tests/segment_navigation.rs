//! Tests for segment lookup, parent search and group collection.

mod common;

use hl7tmpl::resolver::{
    first_segments, has_segments, parent_segment, related_segment_list, segment_lists,
};
use hl7tmpl::{GroupSpan, GroupingPolicy, InstanceSelector};

// =============================================================================
// Segment lists
// =============================================================================

#[test]
fn segment_lists_collects_every_requested_name() {
    let tree = common::adt();
    let lists = segment_lists(&tree, &["PID", "NK1", "IN1"]);
    assert_eq!(lists.len(), 3);
    assert_eq!(lists["PID"].len(), 1);
    assert_eq!(lists["NK1"].len(), 1);
    assert_eq!(common::positions(&lists["IN1"]), vec![5, 6, 7]);
}

#[test]
fn segment_lists_maps_missing_names_to_empty_lists() {
    let tree = common::adt();
    let lists = segment_lists(&tree, &["OBX", "PID"]);
    assert!(lists["OBX"].is_empty());
    assert_eq!(lists["PID"].len(), 1);
}

#[test]
fn first_segments_takes_the_earliest_occurrence() {
    let tree = common::adt();
    let first = first_segments(&tree, &["IN1", "ZZZ"]);
    assert_eq!(first["IN1"].map(|s| s.position), Some(5));
    assert_eq!(first["IN1"].and_then(|s| s.set_id()), Some("1"));
    assert_eq!(first["ZZZ"], None);
}

#[test]
fn has_segments_requires_every_name() {
    let tree = common::adt();
    assert!(has_segments(&tree, &["PID", "NK1", "IN1"]));
    assert!(!has_segments(&tree, &["PID", "OBX"]));
    assert!(has_segments(&tree, &[]));
}

#[test]
fn has_segments_agrees_with_segment_lists() {
    let tree = common::lab();
    for names in [
        &["OBR", "OBX"][..],
        &["OBR", "NK1"][..],
        &["SPM"][..],
        &["IN1", "IN2"][..],
    ] {
        let lists = segment_lists(&tree, names);
        let expected = lists.values().all(|list| !list.is_empty());
        assert_eq!(has_segments(&tree, names), expected, "{names:?}");
    }
}

// =============================================================================
// Parent segment
// =============================================================================

#[test]
fn parent_segment_finds_nearest_preceding_parent() {
    let tree = common::lab();
    let parent = parent_segment(&tree, "OBX", 4, "OBR").unwrap();
    assert_eq!(parent.position, 4);
    assert_eq!(parent.set_id(), Some("1"));
}

#[test]
fn parent_segment_missing_names_yield_none() {
    let tree = common::lab();
    assert!(parent_segment(&tree, "OBX", 4, "FOO").is_none());
    assert!(parent_segment(&tree, "FOO", 4, "OBR").is_none());
}

#[test]
fn parent_segment_distance_bound_is_inclusive() {
    let tree = common::tree_of(&["OBR", "NTE", "NTE", "NTE", "OBX"]);
    assert_eq!(
        parent_segment(&tree, "OBX", 4, "OBR").map(|s| s.position),
        Some(0)
    );
    assert!(parent_segment(&tree, "OBX", 3, "OBR").is_none());
}

#[test]
fn parent_segment_ignores_parents_after_the_child() {
    let tree = common::tree_of(&["OBX", "OBR"]);
    assert!(parent_segment(&tree, "OBX", 10, "OBR").is_none());
}

#[test]
fn parent_segment_tries_later_children_in_order() {
    // The first OBX is six segments after its OBR; the second is right after one.
    let tree = common::tree_of(&["OBR", "NTE", "NTE", "NTE", "NTE", "NTE", "OBX", "OBR", "OBX"]);
    let parent = parent_segment(&tree, "OBX", 2, "OBR").unwrap();
    assert_eq!(parent.position, 7);
}

#[test]
fn parent_segment_uses_positions_not_indices() {
    use hl7tmpl::{MessageTree, Segment};

    let tree = MessageTree::new(vec![
        Segment::builder().name("OBR").position(10).build(),
        Segment::builder().name("OBX").position(20).build(),
    ])
    .unwrap();
    assert!(parent_segment(&tree, "OBX", 9, "OBR").is_none());
    assert!(parent_segment(&tree, "OBX", 10, "OBR").is_some());
}

// =============================================================================
// Related segment list
// =============================================================================

#[test]
fn related_list_collects_children_of_the_selected_parent() {
    let tree = common::lab();
    let policy = GroupingPolicy::hl7v2();
    let related = related_segment_list(&tree, "OBR", &"2".into(), "OBX", &policy);
    assert_eq!(common::positions(&related), vec![10, 11, 12, 14, 15]);
}

#[test]
fn related_list_for_unknown_child_or_parent_is_empty() {
    let tree = common::lab();
    let policy = GroupingPolicy::hl7v2();
    assert!(related_segment_list(&tree, "OBR", &"2".into(), "FOO", &policy).is_empty());
    assert!(related_segment_list(&tree, "OBR", &"9".into(), "OBX", &policy).is_empty());
    assert!(related_segment_list(&tree, "FOO", &"1".into(), "OBX", &policy).is_empty());
}

#[test]
fn related_list_set_id_comparison_trims_whitespace() {
    let tree = hl7tmpl::parse_message("MSH|^~\\&\rOBR| 2 \rOBX|1\r").unwrap();
    let policy = GroupingPolicy::hl7v2();
    let related = related_segment_list(&tree, "OBR", &"2".into(), "OBX", &policy);
    assert_eq!(related.len(), 1);
}

#[test]
fn related_list_stops_at_a_higher_level_sibling() {
    // The ORC opens a new order; its NTE does not belong to OBR 1.
    let tree = common::tree_of(&["OBR", "OBX", "ORC", "NTE", "OBR"]);
    let related = related_segment_list(
        &tree,
        "OBR",
        &InstanceSelector::Occurrence(1),
        "NTE",
        &GroupingPolicy::hl7v2(),
    );
    assert!(related.is_empty());

    let related = related_segment_list(
        &tree,
        "OBR",
        &InstanceSelector::Occurrence(1),
        "NTE",
        &GroupingPolicy::same_name_only(),
    );
    assert_eq!(common::positions(&related), vec![3]);
}

#[test]
fn related_lists_of_sibling_parents_are_disjoint() {
    let tree = common::lab();
    let policy = GroupingPolicy::hl7v2();
    let mut seen = Vec::new();
    for set_id in ["1", "2", "3"] {
        for segment in related_segment_list(&tree, "OBR", &set_id.into(), "OBX", &policy) {
            assert!(!seen.contains(&segment.position), "{} seen twice", segment.position);
            seen.push(segment.position);
        }
    }
    assert_eq!(seen, vec![5, 6, 10, 11, 12, 14, 15, 17]);
}

#[test]
fn related_list_selects_by_occurrence() {
    let tree = common::lab();
    let policy = GroupingPolicy::hl7v2();
    let second = InstanceSelector::Occurrence(2);
    let related = related_segment_list(&tree, "ORC", &second, "OBX", &policy);
    // The second order spans both OBR 2 and OBR 3.
    assert_eq!(common::positions(&related), vec![10, 11, 12, 14, 15, 17]);

    assert!(
        related_segment_list(&tree, "ORC", &InstanceSelector::Occurrence(0), "OBX", &policy)
            .is_empty()
    );
    assert!(
        related_segment_list(&tree, "ORC", &InstanceSelector::Occurrence(3), "OBX", &policy)
            .is_empty()
    );
}

#[test]
fn related_list_when_child_shares_the_parent_name() {
    let tree = common::lab();
    let related =
        related_segment_list(&tree, "OBR", &"1".into(), "OBR", &GroupingPolicy::hl7v2());
    assert!(related.is_empty());
}

// =============================================================================
// Grouping policy
// =============================================================================

#[test]
fn hl7v2_policy_closes_on_same_or_higher_level() {
    let policy = GroupingPolicy::hl7v2();
    assert!(policy.closes("OBR", "OBX", "OBR"));
    assert!(policy.closes("OBR", "OBX", "ORC"));
    assert!(policy.closes("OBR", "OBX", "PID"));
    assert!(!policy.closes("OBR", "OBX", "NTE"));
    assert!(!policy.closes("OBR", "OBX", "SPM"));
    assert!(!policy.closes("OBR", "OBX", "ZXY"));
}

#[test]
fn child_name_never_closes_a_group() {
    let policy = GroupingPolicy::hl7v2();
    // OBX has a lower level than NTE but is the requested child.
    assert!(!policy.closes("NTE", "OBX", "OBX"));
    assert!(policy.closes("NTE", "SPM", "OBX"));
}

#[test]
fn custom_levels_extend_the_policy() {
    let policy = GroupingPolicy::same_name_only()
        .with_level("IN1", 2)
        .with_level("IN2", 3)
        .with_level("GT1", 2);
    assert_eq!(policy.level("IN2"), Some(3));
    assert_eq!(policy.level("PID"), None);
    assert!(policy.closes("IN1", "IN2", "GT1"));
    assert!(!policy.closes("IN1", "GT1", "IN2"));
}

#[test]
fn group_spans_cover_each_parent_instance() {
    let tree = common::lab();
    let spans = GroupingPolicy::hl7v2().group_spans(&tree, "OBR", "OBX");
    assert_eq!(
        spans,
        vec![
            GroupSpan {
                parent: 4,
                start: 5,
                end: 8,
            },
            GroupSpan {
                parent: 9,
                start: 10,
                end: 16,
            },
            GroupSpan {
                parent: 16,
                start: 17,
                end: 19,
            },
        ]
    );
    assert_eq!(spans[1].len(), 6);
    assert!(spans[1].contains(13));
    assert!(!spans[1].contains(16));
}

#[test]
fn group_span_of_last_segment_is_empty() {
    let tree = common::tree_of(&["MSH", "OBR"]);
    let span = GroupingPolicy::hl7v2().group_span(&tree, 1, "OBX").unwrap();
    assert!(span.is_empty());
    assert!(GroupingPolicy::hl7v2().group_span(&tree, 5, "OBX").is_none());
}
