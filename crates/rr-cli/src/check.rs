//! Batch expectation checks for rule sets.

use serde::{Deserialize, Deserializer, Serialize};

use rr_core::{Dispatcher, Request, RequestType};

/// One request to evaluate, with an optional expected outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckCase {
    pub url: String,
    #[serde(rename = "type", default = "default_type")]
    pub request_type: String,
    /// Absent: no expectation. `null`: expect no redirect. A string: expect
    /// that redirect target.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub expect: Option<Option<String>>,
}

fn default_type() -> String {
    "main_frame".to_string()
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub url: String,
    #[serde(rename = "type")]
    pub request_type: String,
    pub redirect: Option<String>,
    pub rule: Option<String>,
    pub passed: bool,
}

pub fn parse_cases(text: &str) -> Result<Vec<CheckCase>, String> {
    serde_json::from_str(text).map_err(|e| format!("Invalid check file: {}", e))
}

pub fn run_cases(dispatcher: &Dispatcher, cases: &[CheckCase]) -> Vec<CheckOutcome> {
    cases
        .iter()
        .map(|case| {
            let request_type = RequestType::from_host(&case.request_type);
            let result = dispatcher.evaluate_detailed(&Request::new(&case.url, request_type));
            let rule = dispatcher
                .registry()
                .get(result.rule_id)
                .map(|rule| rule.name().to_string());
            let redirect = result.decision.into_redirect_url();
            let passed = match &case.expect {
                Some(expected) => *expected == redirect,
                None => true,
            };

            CheckOutcome {
                url: case.url.clone(),
                request_type: case.request_type.clone(),
                redirect,
                rule,
                passed,
            }
        })
        .collect()
}
