//! Interception Dispatcher
//!
//! This is the hot path - every intercepted request goes through here.
//! Rules are tried in registry order and the first eligible rule decides.

use crate::registry::Registry;
use crate::types::{Decision, MatchResult, Request, RequestType};
use crate::url::is_absolute_url;

/// Per-request entry point. Holds no mutable state, so one dispatcher can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    /// Create a dispatcher over an immutable registry.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Evaluate a request and return the decision.
    pub fn evaluate(&self, request: &Request<'_>) -> Decision {
        self.evaluate_detailed(request).decision
    }

    /// Convenience wrapper over [`Dispatcher::evaluate`].
    pub fn evaluate_url(&self, url: &str, request_type: RequestType) -> Decision {
        self.evaluate(&Request::new(url, request_type))
    }

    /// Evaluate a request, also reporting which rule was eligible.
    ///
    /// `rule_id` is set whenever a rule was eligible, even when its
    /// transform declined or failed and the decision is `NoAction`.
    pub fn evaluate_detailed(&self, request: &Request<'_>) -> MatchResult {
        let found = self
            .registry
            .rules()
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.is_eligible(request.url, request.request_type));

        let (idx, rule) = match found {
            Some(found) => found,
            None => return MatchResult::default(),
        };
        let rule_id = idx as i32;

        let decision = match rule.transform().apply(request.url) {
            Ok(Some(target)) if target == request.url => {
                log::debug!("rule {:?}: {} rewrites to itself, skipping", rule.name(), request.url);
                Decision::NoAction
            }
            Ok(Some(target)) if !is_absolute_url(&target) => {
                log::warn!(
                    "rule {:?}: {} rewrote to malformed URL {:?}, skipping",
                    rule.name(),
                    request.url,
                    target
                );
                Decision::NoAction
            }
            Ok(Some(target)) => {
                log::debug!("rule {:?}: {} -> {}", rule.name(), request.url, target);
                Decision::Redirect(target)
            }
            Ok(None) => Decision::NoAction,
            Err(err) => {
                log::warn!("rule {:?}: cannot rewrite {}: {}", rule.name(), request.url, err);
                Decision::NoAction
            }
        };

        MatchResult { decision, rule_id }
    }
}
