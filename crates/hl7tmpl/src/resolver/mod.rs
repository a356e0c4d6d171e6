//! Hierarchy inference and field decomposition over message trees.
//!
//! These are the pure navigation functions behind the segment helpers. They
//! work on typed values; the helper layer decodes template arguments into
//! these types and shapes the results back into JSON.

mod grouping;
mod hierarchy;
mod repeats;

pub use grouping::{GroupSpan, GroupingPolicy, InstanceSelector};
pub use hierarchy::{
    FirstSegments, SegmentLists, first_segments, has_segments, parent_segment,
    related_segment_list, segment_lists,
};
pub use repeats::field_repeats;
pub(crate) use repeats::GET_FIELD_REPEATS;
