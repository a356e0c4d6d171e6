//! Group inference over a flat segment list.
//!
//! A message carries no parent/child pointers: nested repeating groups are
//! encoded by segment order alone. A parent's group is the window of segments
//! after it up to the first segment that closes it, and which segments close a
//! group is a per-domain [`GroupingPolicy`].

use std::collections::HashMap;

use crate::types::MessageTree;

/// Identifies which instance of a repeated parent segment is meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSelector {
    /// The first instance whose set ID (field 1) equals this value.
    SetId(String),
    /// The n-th instance in message order, 1-based.
    Occurrence(usize),
}

impl InstanceSelector {
    /// Arena index of the selected instance of `parent_name`.
    pub fn select(&self, tree: &MessageTree, parent_name: &str) -> Option<usize> {
        let indices = tree.indices_of(parent_name);
        match self {
            InstanceSelector::SetId(id) => indices.iter().copied().find(|&index| {
                tree.get(index)
                    .and_then(|segment| segment.set_id())
                    .is_some_and(|set_id| set_id.trim() == id.trim())
            }),
            InstanceSelector::Occurrence(n) => {
                n.checked_sub(1).and_then(|i| indices.get(i).copied())
            }
        }
    }
}

impl From<&str> for InstanceSelector {
    fn from(set_id: &str) -> Self {
        InstanceSelector::SetId(set_id.to_string())
    }
}

/// Half-open window `[start, end)` of arena indices belonging to the group
/// opened by the segment at `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpan {
    pub parent: usize,
    pub start: usize,
    pub end: usize,
}

impl GroupSpan {
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Decides which segments close a parent's group.
///
/// A candidate segment closes the group of parent `P` when it is not the
/// requested child name and either
/// - its name is `P`, or
/// - both it and `P` have a nesting level and its level is `<=` that of `P`.
///
/// Segment names without a level never close a group except as the parent
/// name itself.
///
/// # Example
///
/// ```
/// use hl7tmpl::GroupingPolicy;
///
/// let policy = GroupingPolicy::hl7v2();
/// assert!(policy.closes("OBR", "OBX", "ORC"));
/// assert!(policy.closes("OBR", "OBX", "OBR"));
/// assert!(!policy.closes("OBR", "OBX", "NTE"));
///
/// let policy = GroupingPolicy::same_name_only();
/// assert!(!policy.closes("OBR", "OBX", "ORC"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingPolicy {
    levels: HashMap<String, u8>,
}

impl GroupingPolicy {
    /// A policy where only the next parent-named segment closes a group.
    pub fn same_name_only() -> Self {
        Self::default()
    }

    /// Nesting levels for the common HL7 v2 result and order structures.
    pub fn hl7v2() -> Self {
        [
            ("MSH", 0),
            ("BHS", 0),
            ("FHS", 0),
            ("PID", 1),
            ("PV1", 2),
            ("ORC", 2),
            ("OBR", 3),
            ("OBX", 4),
            ("SPM", 4),
            ("NTE", 5),
        ]
        .into_iter()
        .fold(Self::default(), |policy, (name, level)| {
            policy.with_level(name, level)
        })
    }

    /// Assign a nesting level to a segment name (lower is closer to the root).
    pub fn with_level(mut self, name: impl Into<String>, level: u8) -> Self {
        self.levels.insert(name.into(), level);
        self
    }

    pub fn level(&self, name: &str) -> Option<u8> {
        self.levels.get(name).copied()
    }

    /// Whether `candidate` ends the group of `parent` when collecting `child`.
    pub fn closes(&self, parent: &str, child: &str, candidate: &str) -> bool {
        if candidate == parent {
            return true;
        }
        if candidate == child {
            return false;
        }
        match (self.level(parent), self.level(candidate)) {
            (Some(parent_level), Some(candidate_level)) => candidate_level <= parent_level,
            _ => false,
        }
    }

    /// The group window opened by the segment at `parent_index`.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn group_span(
        &self,
        tree: &MessageTree,
        parent_index: usize,
        child: &str,
    ) -> Option<GroupSpan> {
        let parent = tree.get(parent_index)?;
        let start = parent_index + 1;
        let end = tree.segments()[start..]
            .iter()
            .position(|segment| self.closes(&parent.name, child, &segment.name))
            .map_or(tree.len(), |offset| start + offset);
        log::trace!(
            "group of {} at index {parent_index} spans [{start}, {end})",
            parent.name
        );
        Some(GroupSpan {
            parent: parent_index,
            start,
            end,
        })
    }

    /// The group windows of every instance of `parent`, in message order.
    pub fn group_spans(&self, tree: &MessageTree, parent: &str, child: &str) -> Vec<GroupSpan> {
        tree.indices_of(parent)
            .iter()
            .filter_map(|&index| self.group_span(tree, index, child))
            .collect()
    }
}
