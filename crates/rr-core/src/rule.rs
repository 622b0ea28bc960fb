//! Rewrite rules

use crate::pattern::{MatchPattern, PatternError};
use crate::transform::{Transform, TransformError};
use crate::types::RequestType;

/// Error type for rule construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("rule has no match patterns")]
    NoPatterns,
    #[error("rule has no request types")]
    NoRequestTypes,
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// An immutable rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    patterns: Vec<MatchPattern>,
    types: RequestType,
    transform: Transform,
}

impl Rule {
    /// Compile a rule. Every pattern must compile and the transform's
    /// parameters must be valid.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        patterns: &[S],
        types: RequestType,
        transform: Transform,
    ) -> Result<Self, RuleError> {
        if patterns.is_empty() {
            return Err(RuleError::NoPatterns);
        }
        if types.is_empty() {
            return Err(RuleError::NoRequestTypes);
        }
        transform.validate()?;

        let patterns = patterns
            .iter()
            .map(|p| MatchPattern::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            patterns,
            types,
            transform,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[MatchPattern] {
        &self.patterns
    }

    pub fn types(&self) -> RequestType {
        self.types
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// A rule is eligible when the request type is in its set and at least
    /// one of its patterns matches the URL.
    #[inline]
    pub fn is_eligible(&self, url: &str, request_type: RequestType) -> bool {
        self.types.intersects(request_type) && self.patterns.iter().any(|p| p.matches(url))
    }
}
