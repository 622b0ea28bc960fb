//! Rerouter Rule List Compiler
//!
//! This crate turns declarative rule descriptors (built-in or loaded from a
//! JSON rule list) into the immutable registry the dispatcher runs on.

pub mod parser;
pub mod optimizer;
pub mod builder;
pub mod builtin;

pub use builder::{build_registry, compile_rule_list, BuildError};
pub use builtin::{builtin_registry, builtin_rules};
pub use optimizer::{optimize_descriptors, OptimizeStats};
pub use parser::{parse_rule_list, to_rule_list_json, ParseError, RuleDescriptor, RuleList};
