use std::collections::HashSet;

use crate::parser::RuleDescriptor;

pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
}

/// Drop descriptors identical to an earlier one (same patterns, types and
/// transform). The first occurrence keeps its position.
pub fn optimize_descriptors(rules: &mut Vec<RuleDescriptor>) -> OptimizeStats {
    let before = rules.len();

    let mut seen: HashSet<RuleKey> = HashSet::new();
    let mut deduped = 0usize;
    rules.retain(|rule| {
        if seen.insert(RuleKey::from(rule)) {
            true
        } else {
            log::warn!("dropping duplicate rule {:?}", rule.name);
            deduped += 1;
            false
        }
    });

    let after = rules.len();

    OptimizeStats {
        before,
        after,
        deduped,
    }
}

/// Identity of a rule for deduplication; the name is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RuleKey {
    patterns: Vec<String>,
    types: Vec<String>,
    transform: rr_core::Transform,
}

impl From<&RuleDescriptor> for RuleKey {
    fn from(rule: &RuleDescriptor) -> Self {
        let mut types = rule.types.clone();
        types.sort();
        types.dedup();
        Self {
            patterns: rule.patterns.clone(),
            types,
            transform: rule.transform.clone(),
        }
    }
}
