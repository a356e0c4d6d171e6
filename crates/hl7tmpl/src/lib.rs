pub mod error;
pub mod evaluate;
pub mod helpers;
pub mod parser;
pub mod resolver;
pub mod types;

pub use error::{HelperError, TreeError, compute_suggestions};
pub use evaluate::{EngineError, Evaluator, TemplateCache, TemplateEngine};
pub use helpers::{HELPERS, HelperRegistry, HelperSpec, find_helper, new_engine, register_helpers};
pub use parser::{ParseError, parse_message};
pub use resolver::{GroupSpan, GroupingPolicy, InstanceSelector};
pub use types::{Field, MessageTree, Repeat, Segment};
