use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::Segment;
use crate::error::TreeError;

/// The ordered segments of one message.
///
/// Segments keep message order; positions are strictly increasing. A name
/// index (`name -> segment indices`) is built once at construction so that
/// name lookups never rescan the message.
///
/// Serializes as a JSON array of segment objects, which is the shape the
/// template helpers receive from the render context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct MessageTree {
    segments: Vec<Segment>,
    by_name: HashMap<String, Vec<usize>>,
}

impl MessageTree {
    /// Build a tree, checking the position ordering.
    pub fn new(segments: Vec<Segment>) -> Result<Self, TreeError> {
        for (index, pair) in segments.windows(2).enumerate() {
            if pair[1].position <= pair[0].position {
                return Err(TreeError::PositionOrder {
                    name: pair[1].name.clone(),
                    index: index + 1,
                    position: pair[1].position,
                    previous: pair[0].position,
                });
            }
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, segment) in segments.iter().enumerate() {
            by_name.entry(segment.name.clone()).or_default().push(index);
        }

        Ok(Self { segments, by_name })
    }

    /// Decode a tree from its JSON form (an array of segment objects).
    pub fn from_json(value: &Json) -> Result<Self, TreeError> {
        let segments: Vec<Segment> = Vec::<Segment>::deserialize(value)?;
        Self::new(segments)
    }

    pub fn to_json(&self) -> Json {
        // Segment serialization cannot fail: all keys are strings.
        serde_json::to_value(&self.segments).unwrap_or(Json::Null)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at an arena index.
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Arena indices of every segment with `name`, in message order.
    pub fn indices_of(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every segment with `name`, in message order.
    pub fn occurrences<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Segment> + use<'a> {
        self.indices_of(name)
            .iter()
            .map(move |&index| &self.segments[index])
    }

    /// The first segment with `name`.
    pub fn first(&self, name: &str) -> Option<&Segment> {
        self.indices_of(name)
            .first()
            .map(|&index| &self.segments[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.indices_of(name).is_empty()
    }

    /// Segment names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if !names.contains(&segment.name.as_str()) {
                names.push(&segment.name);
            }
        }
        names
    }
}

impl TryFrom<Vec<Segment>> for MessageTree {
    type Error = TreeError;

    fn try_from(segments: Vec<Segment>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<MessageTree> for Vec<Segment> {
    fn from(tree: MessageTree) -> Self {
        tree.segments
    }
}
