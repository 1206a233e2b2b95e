/// Method rules for route definitions.
pub mod method_rule;

pub use method_rule::MethodRule;
