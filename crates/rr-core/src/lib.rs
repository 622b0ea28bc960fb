//! Rerouter Core Library
//!
//! This crate provides the rule-matching and URL rewrite engine for the
//! Rerouter request redirector.
//!
//! # Architecture
//!
//! The host hands every intercepted request to a [`Dispatcher`] as a
//! `(url, request type)` pair. The dispatcher walks an immutable
//! [`Registry`] of rules in registration order; the first rule whose
//! patterns and request types accept the request runs its transform, and
//! the result comes back as a [`Decision`]. Evaluation is synchronous, does
//! no I/O and keeps no state between calls.
//!
//! # Modules
//!
//! - `pattern`: match pattern compiler
//! - `transform`: URL rewrite functions
//! - `rule`: immutable rewrite rules
//! - `registry`: ordered rule set with the ordering check
//! - `dispatcher`: per-request entry point
//! - `url`: fast URL slicing and rewrite helpers
//! - `types`: shared type definitions

pub mod types;
pub mod url;
pub mod pattern;
pub mod transform;
pub mod rule;
pub mod registry;
pub mod dispatcher;

// Re-export commonly used types
pub use dispatcher::Dispatcher;
pub use pattern::{MatchPattern, PatternError};
pub use registry::{Registry, RegistryError};
pub use rule::{Rule, RuleError};
pub use transform::{Transform, TransformError};
pub use types::{Decision, MatchResult, Request, RequestType, SchemeMask};
