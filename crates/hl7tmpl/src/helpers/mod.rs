//! The helper surface exposed to templates.
//!
//! [`HELPERS`] is the static table of named, described helpers. A
//! [`HelperRegistry`] binds the table to an evaluator and a grouping policy;
//! [`register_helpers`] installs it on a handlebars registry.

mod args;
mod binding;
mod functions;
mod registry;

pub use binding::{new_engine, register_helpers};
pub use registry::{
    Arity, HELPERS, HelperFn, HelperKind, HelperRegistry, HelperSpec, Invocation, find_helper,
};
