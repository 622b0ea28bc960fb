//! Rule Registry
//!
//! An ordered, immutable list of rules. Order decides which rule fires, so
//! the registry refuses a rule that an earlier rule would always pre-empt:
//! when one pattern is a special case of another, the specific rule has to
//! be registered first.

use crate::rule::Rule;

/// Error type for registry construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(
        "rule {rule:?} (pattern {pattern:?}) is unreachable: earlier rule {by:?} \
         (pattern {by_pattern:?}) covers it; register the more specific rule first"
    )]
    Shadowed {
        rule: String,
        pattern: String,
        by: String,
        by_pattern: String,
    },
}

/// Ordered set of rules, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    /// Build a registry, keeping the rules in the given order.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        check_ordering(&rules)?;
        log::info!("rule registry built with {} rules", rules.len());
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, rule_id: i32) -> Option<&Rule> {
        usize::try_from(rule_id).ok().and_then(|idx| self.rules.get(idx))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Every pattern of a later rule must stay reachable: no earlier rule that
/// handles all of the later rule's request types may cover it.
fn check_ordering(rules: &[Rule]) -> Result<(), RegistryError> {
    for (idx, rule) in rules.iter().enumerate() {
        for earlier in &rules[..idx] {
            if !earlier.types().contains(rule.types()) {
                continue;
            }
            for pattern in rule.patterns() {
                if let Some(by) = earlier.patterns().iter().find(|p| p.covers(pattern)) {
                    return Err(RegistryError::Shadowed {
                        rule: rule.name().to_string(),
                        pattern: pattern.to_string(),
                        by: earlier.name().to_string(),
                        by_pattern: by.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
