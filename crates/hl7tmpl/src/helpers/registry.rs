//! The helper table and dispatch.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde_json::{Map, Value as Json};

use crate::error::{HelperError, compute_suggestions};
use crate::evaluate::{EVALUATE, Evaluator, TemplateEngine};
use crate::helpers::functions;
use crate::resolver::{GET_FIELD_REPEATS, GroupingPolicy};

/// Signature of a helper that needs nothing beyond its arguments.
pub type HelperFn = fn(&Invocation<'_>) -> Result<Json, HelperError>;

/// The arguments of one helper call.
///
/// Template engines pass their own per-call options alongside the
/// arguments; those never reach the helper functions, which see only
/// positional parameters, hash arguments and the grouping policy.
pub struct Invocation<'a> {
    pub helper: &'static str,
    pub params: &'a [&'a Json],
    pub hash: &'a Map<String, Json>,
    pub policy: &'a GroupingPolicy,
}

impl<'a> Invocation<'a> {
    /// The positional parameter at `index`.
    pub fn param(&self, index: usize) -> Option<&'a Json> {
        self.params.get(index).copied()
    }
}

/// How many positional parameters a helper takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(min, max) => (min..=max).contains(&count),
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match *self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Between(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

/// What a helper runs.
#[derive(Debug, Clone, Copy)]
pub enum HelperKind {
    /// A pure function of the arguments.
    Pure(HelperFn),
    /// Sub-template evaluation; needs the evaluator and the engine.
    Evaluate,
}

/// A registry entry: a named, described callable.
#[derive(Debug, Clone, Copy)]
pub struct HelperSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arity: Arity,
    pub kind: HelperKind,
}

impl HelperSpec {
    fn check_arity(&self, count: usize) -> Result<(), HelperError> {
        if self.arity.accepts(count) {
            Ok(())
        } else {
            Err(HelperError::invalid_input(
                self.name,
                format!("expects {} arguments, got {count}", self.arity),
            ))
        }
    }
}

/// Every helper exposed to templates.
pub static HELPERS: &[HelperSpec] = &[
    HelperSpec {
        name: "getSegmentLists",
        description: "Returns a map from each given segment name to the list of all segments with that name",
        arity: Arity::AtLeast(1),
        kind: HelperKind::Pure(functions::get_segment_lists),
    },
    HelperSpec {
        name: "getFirstSegments",
        description: "Returns a map from each given segment name to its first segment, or an empty list if absent",
        arity: Arity::AtLeast(1),
        kind: HelperKind::Pure(functions::get_first_segments),
    },
    HelperSpec {
        name: "hasSegments",
        description: "Returns true if every given segment name occurs in the message",
        arity: Arity::AtLeast(1),
        kind: HelperKind::Pure(functions::has_segments),
    },
    HelperSpec {
        name: "getParentSegment",
        description: "Returns {parent: segment} for the nearest parent within a maximum distance before the child, or null",
        arity: Arity::Exact(4),
        kind: HelperKind::Pure(functions::get_parent_segment),
    },
    HelperSpec {
        name: "getRelatedSegmentList",
        description: "Returns {child: [segment...]} for the child segments in the group of a parent instance",
        arity: Arity::Exact(4),
        kind: HelperKind::Pure(functions::get_related_segment_list),
    },
    HelperSpec {
        name: GET_FIELD_REPEATS,
        description: "Returns the repeats of a parsed field, or null if the field is absent",
        arity: Arity::Exact(1),
        kind: HelperKind::Pure(functions::get_field_repeats),
    },
    HelperSpec {
        name: EVALUATE,
        description: "Renders a named sub-template against a context and returns its JSON output",
        arity: Arity::Between(1, 2),
        kind: HelperKind::Evaluate,
    },
    HelperSpec {
        name: "toJsonString",
        description: "Returns the value serialized as JSON text",
        arity: Arity::Exact(1),
        kind: HelperKind::Pure(functions::to_json_string),
    },
];

/// Look up a helper by name.
pub fn find_helper(name: &str) -> Result<&'static HelperSpec, HelperError> {
    HELPERS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| HelperError::UnknownHelper {
            name: name.to_string(),
            suggestions: compute_suggestions(name, HELPERS.iter().map(|spec| spec.name)),
        })
}

/// The helper set bound to one evaluator and one grouping policy.
///
/// `T` is the engine's compiled template type.
pub struct HelperRegistry<T> {
    evaluator: Arc<Evaluator<T>>,
    policy: GroupingPolicy,
}

impl<T: Send + Sync> HelperRegistry<T> {
    /// A registry using the HL7 v2 grouping policy.
    pub fn new(evaluator: Arc<Evaluator<T>>) -> Self {
        Self {
            evaluator,
            policy: GroupingPolicy::hl7v2(),
        }
    }

    pub fn with_policy(mut self, policy: GroupingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn entries(&self) -> &'static [HelperSpec] {
        HELPERS
    }

    pub fn evaluator(&self) -> &Arc<Evaluator<T>> {
        &self.evaluator
    }

    pub fn policy(&self) -> &GroupingPolicy {
        &self.policy
    }

    /// Call the helper `name` with positional and hash arguments.
    pub fn call<E>(
        &self,
        engine: &E,
        name: &str,
        params: &[&Json],
        hash: &Map<String, Json>,
    ) -> Result<Json, HelperError>
    where
        E: TemplateEngine<Compiled = T> + ?Sized,
    {
        self.dispatch(engine, find_helper(name)?, params, hash)
    }

    /// Call a helper whose entry is already known.
    pub fn dispatch<E>(
        &self,
        engine: &E,
        spec: &HelperSpec,
        params: &[&Json],
        hash: &Map<String, Json>,
    ) -> Result<Json, HelperError>
    where
        E: TemplateEngine<Compiled = T> + ?Sized,
    {
        spec.check_arity(params.len())?;
        let invocation = Invocation {
            helper: spec.name,
            params,
            hash,
            policy: &self.policy,
        };
        match spec.kind {
            HelperKind::Pure(f) => f(&invocation),
            HelperKind::Evaluate => functions::evaluate(&invocation, &self.evaluator, engine),
        }
    }
}
