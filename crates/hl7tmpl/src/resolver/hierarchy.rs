//! Segment navigation over a message tree.
//!
//! Every function is pure over an immutable [`MessageTree`]. "Not found" is
//! a normal outcome: names that do not occur map to empty lists, a parent that
//! is not in range is `None`.

use std::collections::BTreeMap;

use crate::resolver::grouping::{GroupingPolicy, InstanceSelector};
use crate::types::{MessageTree, Segment};

/// Every requested name mapped to all of its segments.
pub type SegmentLists<'a> = BTreeMap<String, Vec<&'a Segment>>;

/// Every requested name mapped to its first segment, if any.
pub type FirstSegments<'a> = BTreeMap<String, Option<&'a Segment>>;

/// Collect all segments for each name, in message order.
///
/// Names that do not occur map to an empty list.
pub fn segment_lists<'a>(tree: &'a MessageTree, names: &[&str]) -> SegmentLists<'a> {
    names
        .iter()
        .map(|&name| (name.to_string(), tree.occurrences(name).collect()))
        .collect()
}

/// The first segment for each name.
pub fn first_segments<'a>(tree: &'a MessageTree, names: &[&str]) -> FirstSegments<'a> {
    names
        .iter()
        .map(|&name| (name.to_string(), tree.first(name)))
        .collect()
}

/// True iff every name occurs at least once. An empty name list is true.
pub fn has_segments(tree: &MessageTree, names: &[&str]) -> bool {
    names.iter().all(|name| tree.contains(name))
}

/// Find the nearest `parent_name` segment before a `child_name` segment.
///
/// Child instances are tried in message order. For each, the nearest
/// preceding parent is taken if its position is at most `max_distance`
/// before the child (the bound is inclusive). The first child that has
/// such a parent decides the result.
pub fn parent_segment<'a>(
    tree: &'a MessageTree,
    child_name: &str,
    max_distance: usize,
    parent_name: &str,
) -> Option<&'a Segment> {
    let parents = tree.indices_of(parent_name);
    if parents.is_empty() {
        return None;
    }

    for &child_index in tree.indices_of(child_name) {
        let preceding = parents.partition_point(|&index| index < child_index);
        let Some(&nearest) = preceding.checked_sub(1).and_then(|i| parents.get(i)) else {
            continue;
        };
        let (Some(child), Some(parent)) = (tree.get(child_index), tree.get(nearest)) else {
            continue;
        };
        let distance = child.position - parent.position;
        if distance <= max_distance {
            log::trace!(
                "{parent_name} at position {} is {distance} before {child_name} at {}",
                parent.position,
                child.position
            );
            return Some(parent);
        }
    }
    None
}

/// Collect the `child_name` segments in the group of one parent instance.
///
/// The group starts right after the selected parent and ends before the
/// first segment that closes it under `policy`. An unknown parent instance
/// yields an empty list.
pub fn related_segment_list<'a>(
    tree: &'a MessageTree,
    parent_name: &str,
    instance: &InstanceSelector,
    child_name: &str,
    policy: &GroupingPolicy,
) -> Vec<&'a Segment> {
    let Some(span) = instance
        .select(tree, parent_name)
        .and_then(|index| policy.group_span(tree, index, child_name))
    else {
        return Vec::new();
    };

    tree.indices_of(child_name)
        .iter()
        .filter(|&&index| span.contains(index))
        .filter_map(|&index| tree.get(index))
        .collect()
}
