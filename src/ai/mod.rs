pub mod local;
pub mod rules;

pub use local::ResponseSelector;
pub use rules::{FallbackSet, Rule, RuleLibrary};
