//! Cached sub-template evaluation.
//!
//! A template can render another named template against an in-memory
//! context and use the rendered JSON as data. Compiled templates are
//! memoized per name for the lifetime of the [`Evaluator`].

mod cache;
mod engine;
mod evaluator;

pub use cache::TemplateCache;
pub use engine::{EngineError, TemplateEngine};
pub use evaluator::Evaluator;
pub(crate) use evaluator::EVALUATE;
