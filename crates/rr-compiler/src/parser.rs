use serde::{Deserialize, Serialize};

use rr_core::transform::Transform;

/// Declarative form of a rule, as written in a rule list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    pub transform: Transform,
}

/// Top-level rule list document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleList {
    pub rules: Vec<RuleDescriptor>,
}

/// Rules apply to top-level navigations unless they say otherwise.
fn default_types() -> Vec<String> {
    vec!["main_frame".to_string()]
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid rule list JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rule #{index} has an empty name")]
    MissingName { index: usize },
}

/// Parse a JSON rule list: `{"rules": [{"name", "patterns", "types", "transform"}]}`.
pub fn parse_rule_list(text: &str) -> Result<Vec<RuleDescriptor>, ParseError> {
    let list: RuleList = serde_json::from_str(text)?;

    for (index, rule) in list.rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            return Err(ParseError::MissingName { index });
        }
    }

    log::debug!("parsed {} rule descriptors", list.rules.len());
    Ok(list.rules)
}

/// Serialize descriptors as a pretty-printed JSON rule list.
pub fn to_rule_list_json(rules: &[RuleDescriptor]) -> Result<String, ParseError> {
    let list = RuleList { rules: rules.to_vec() };
    Ok(serde_json::to_string_pretty(&list)?)
}
