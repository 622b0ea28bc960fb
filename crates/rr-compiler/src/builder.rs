//! Registry Builder
//!
//! Turns rule descriptors into compiled rules and the ordered registry.
//! Any failure is fatal: a rule that cannot be compiled must not turn into
//! a pattern that silently matches everything or nothing.

use rr_core::registry::{Registry, RegistryError};
use rr_core::rule::{Rule, RuleError};
use rr_core::types::RequestType;

use crate::optimizer::optimize_descriptors;
use crate::parser::{parse_rule_list, ParseError, RuleDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("rule {rule:?}: unknown request type {name:?}")]
    UnknownRequestType { rule: String, name: String },
    #[error("rule {rule:?}: {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build the registry from descriptors, keeping their order.
pub fn build_registry(descriptors: &[RuleDescriptor]) -> Result<Registry, BuildError> {
    let rules = descriptors
        .iter()
        .map(build_rule)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Registry::new(rules)?)
}

/// Parse, deduplicate and build a JSON rule list.
pub fn compile_rule_list(text: &str) -> Result<Registry, BuildError> {
    let mut descriptors = parse_rule_list(text)?;
    let stats = optimize_descriptors(&mut descriptors);
    log::info!(
        "compiled rule list: {} -> {} rules ({} duplicates)",
        stats.before,
        stats.after,
        stats.deduped
    );
    build_registry(&descriptors)
}

fn build_rule(descriptor: &RuleDescriptor) -> Result<Rule, BuildError> {
    let mut types = RequestType::empty();
    for name in &descriptor.types {
        types |= RequestType::parse(name).ok_or_else(|| BuildError::UnknownRequestType {
            rule: descriptor.name.clone(),
            name: name.clone(),
        })?;
    }

    Rule::new(
        descriptor.name.as_str(),
        descriptor.patterns.as_slice(),
        types,
        descriptor.transform.clone(),
    )
    .map_err(|source| BuildError::Rule {
        rule: descriptor.name.clone(),
        source,
    })
}
