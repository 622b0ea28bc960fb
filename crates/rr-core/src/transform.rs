//! Transform Library
//!
//! Pure URL rewrite functions. Each transform is described by data (so rule
//! sets can be declared in JSON) and applied with [`Transform::apply`]:
//!
//! - `Ok(Some(url))`: rewrite to `url`
//! - `Ok(None)`: the URL is in scope but no rewrite is appropriate
//! - `Err(_)`: the rewrite could not produce a well-formed URL

use serde::{Deserialize, Serialize};

use crate::url::{
    decode_component, extract_host, extract_scheme, get_host_position, last_path_segment, parse_absolute,
    set_query_param, slash_token_count, strip_query, UrlError,
};

/// Placeholder replaced by the host token in `host_prefix_fallback` templates.
pub const TOKEN_PLACEHOLDER: &str = "{token}";
/// Placeholder replaced by the tail segment in `tail_segment_template` templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Error type for transforms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error("URL does not start with {0:?}")]
    PrefixMismatch(String),
    #[error("no host in URL")]
    MissingHost,
    #[error("empty identifier in {0:?}")]
    EmptyIdentifier(String),
    #[error("unsupported target scheme in {0:?}")]
    UnsupportedTarget(String),
    #[error("invalid transform: {0}")]
    Invalid(String),
}

/// A URL rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// When the URL (without query) splits on '/' into exactly
    /// `slash_tokens` tokens, the last of them non-empty, append `/segment`
    /// to the path and set `param=value` in the query.
    AppendPathAtDepth {
        slash_tokens: usize,
        segment: String,
        param: String,
        value: String,
    },
    /// Replace the first `from` in the host with `to`, unless the host
    /// already contains `unless`.
    ReplaceHostInfix {
        from: String,
        to: String,
        unless: String,
    },
    /// Replace the literal URL prefix `from` with `to`.
    ReplacePrefix { from: String, to: String },
    /// Set query parameter `name` to `value`, keeping the other parameters
    /// in order.
    SetQueryParam { name: String, value: String },
    /// Replace the first occurrence of `from` with `to`.
    ReplaceInfix { from: String, to: String },
    /// Strip `prefix` and percent-decode the rest into the embedded URL.
    UnwrapPrefix { prefix: String },
    /// Unless the URL starts with `required_prefix`, rebuild it from
    /// `template` with `{token}` set to the leading host label.
    HostPrefixFallback {
        required_prefix: String,
        template: String,
    },
    /// Rebuild the URL from `template` with `{id}` set to the last path
    /// segment.
    TailSegmentTemplate { template: String },
}

impl Transform {
    /// Short name of the transform family.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AppendPathAtDepth { .. } => "append_path_at_depth",
            Self::ReplaceHostInfix { .. } => "replace_host_infix",
            Self::ReplacePrefix { .. } => "replace_prefix",
            Self::SetQueryParam { .. } => "set_query_param",
            Self::ReplaceInfix { .. } => "replace_infix",
            Self::UnwrapPrefix { .. } => "unwrap_prefix",
            Self::HostPrefixFallback { .. } => "host_prefix_fallback",
            Self::TailSegmentTemplate { .. } => "tail_segment_template",
        }
    }

    /// Check the literal parameters. Called once at rule construction.
    pub fn validate(&self) -> Result<(), TransformError> {
        let kind = self.kind();

        match self {
            Self::AppendPathAtDepth { slash_tokens, segment, param, .. } => {
                if *slash_tokens < 4 {
                    return Err(TransformError::Invalid(format!(
                        "append_path_at_depth: slash_tokens must be at least 4, got {slash_tokens}"
                    )));
                }
                require_non_empty(kind, segment, "segment")?;
                require_non_empty(kind, param, "param")
            }
            Self::ReplaceHostInfix { from, unless, .. } => {
                require_non_empty(kind, from, "from")?;
                require_non_empty(kind, unless, "unless")
            }
            Self::ReplacePrefix { from, .. } | Self::ReplaceInfix { from, .. } => require_non_empty(kind, from, "from"),
            Self::SetQueryParam { name, .. } => require_non_empty(kind, name, "name"),
            Self::UnwrapPrefix { prefix } => require_non_empty(kind, prefix, "prefix"),
            Self::HostPrefixFallback { required_prefix, template } => {
                require_non_empty(kind, required_prefix, "required_prefix")?;
                require_placeholder(kind, template, TOKEN_PLACEHOLDER)
            }
            Self::TailSegmentTemplate { template } => {
                require_placeholder(kind, template, ID_PLACEHOLDER)
            }
        }
    }

    /// Apply the transform to a URL its rule matched.
    pub fn apply(&self, url: &str) -> Result<Option<String>, TransformError> {
        match self {
            Self::AppendPathAtDepth { slash_tokens, segment, param, value } => {
                if slash_token_count(url) != *slash_tokens || strip_query(url).ends_with('/') {
                    return Ok(None);
                }
                let mut parsed = parse_absolute(url)?;
                let path = format!("{}/{}", parsed.path(), segment);
                parsed.set_path(&path);
                set_query_param(&mut parsed, param, value);
                Ok(Some(parsed.into()))
            }
            Self::ReplaceHostInfix { from, to, unless } => {
                let (start, end) = get_host_position(url).ok_or(TransformError::MissingHost)?;
                let host = &url[start..end];
                if host.contains(unless.as_str()) {
                    return Ok(None);
                }
                Ok(host.find(from.as_str()).map(|pos| {
                    let at = start + pos;
                    format!("{}{}{}", &url[..at], to, &url[at + from.len()..])
                }))
            }
            Self::ReplacePrefix { from, to } => match url.strip_prefix(from.as_str()) {
                Some(rest) => Ok(Some(format!("{to}{rest}"))),
                None => Err(TransformError::PrefixMismatch(from.clone())),
            },
            Self::SetQueryParam { name, value } => {
                let mut parsed = parse_absolute(url)?;
                set_query_param(&mut parsed, name, value);
                Ok(Some(parsed.into()))
            }
            Self::ReplaceInfix { from, to } => Ok(url
                .contains(from.as_str())
                .then(|| url.replacen(from.as_str(), to, 1))),
            Self::UnwrapPrefix { prefix } => {
                let encoded = url
                    .strip_prefix(prefix.as_str())
                    .ok_or_else(|| TransformError::PrefixMismatch(prefix.clone()))?;
                let target = decode_component(encoded)?;
                parse_absolute(&target)?;
                if extract_scheme(&target).is_none() {
                    return Err(TransformError::UnsupportedTarget(target));
                }
                Ok(Some(target))
            }
            Self::HostPrefixFallback { required_prefix, template } => {
                if url.starts_with(required_prefix.as_str()) {
                    return Ok(None);
                }
                let host = extract_host(url).ok_or(TransformError::MissingHost)?;
                let token = host.split('.').next().unwrap_or_default();
                if token.is_empty() {
                    return Err(TransformError::EmptyIdentifier(url.to_string()));
                }
                Ok(Some(template.replace(TOKEN_PLACEHOLDER, token)))
            }
            Self::TailSegmentTemplate { template } => {
                let id = last_path_segment(url);
                if id.is_empty() {
                    return Err(TransformError::EmptyIdentifier(url.to_string()));
                }
                Ok(Some(template.replace(ID_PLACEHOLDER, id)))
            }
        }
    }
}

fn require_non_empty(kind: &str, value: &str, field: &str) -> Result<(), TransformError> {
    if value.is_empty() {
        Err(TransformError::Invalid(format!("{kind}: {field} must not be empty")))
    } else {
        Ok(())
    }
}

fn require_placeholder(kind: &str, template: &str, placeholder: &str) -> Result<(), TransformError> {
    if template.contains(placeholder) {
        Ok(())
    } else {
        Err(TransformError::Invalid(format!(
            "{kind}: template {template:?} has no {placeholder} placeholder"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youtube() -> Transform {
        Transform::AppendPathAtDepth {
            slash_tokens: 5,
            segment: "videos".to_string(),
            param: "view".to_string(),
            value: "0".to_string(),
        }
    }

    fn wikipedia() -> Transform {
        Transform::ReplaceHostInfix {
            from: ".wikipedia.org".to_string(),
            to: ".m.wikipedia.org".to_string(),
            unless: ".m.wikipedia.org".to_string(),
        }
    }

    fn pixiv() -> Transform {
        Transform::UnwrapPrefix {
            prefix: "https://www.pixiv.net/jump.php?url=".to_string(),
        }
    }

    #[test]
    fn append_path_only_at_exact_depth() {
        let t = youtube();
        assert_eq!(
            t.apply("https://www.youtube.com/channel/UC123").unwrap().as_deref(),
            Some("https://www.youtube.com/channel/UC123/videos?view=0")
        );
        assert_eq!(t.apply("https://www.youtube.com/channel").unwrap(), None);
        assert_eq!(t.apply("https://www.youtube.com/channel/").unwrap(), None);
        assert_eq!(t.apply("https://www.youtube.com/channel/UC123/featured").unwrap(), None);
    }

    #[test]
    fn append_path_keeps_existing_query() {
        let t = youtube();
        assert_eq!(
            t.apply("https://www.youtube.com/c/Name?si=abc&view=2").unwrap().as_deref(),
            Some("https://www.youtube.com/c/Name/videos?si=abc&view=0")
        );
    }

    #[test]
    fn host_infix_is_idempotent() {
        let t = wikipedia();
        let first = t.apply("https://de.wikipedia.org/wiki/Test").unwrap().unwrap();
        assert_eq!(first, "https://de.m.wikipedia.org/wiki/Test");
        assert_eq!(t.apply(&first).unwrap(), None);
    }

    #[test]
    fn host_infix_ignores_path_occurrences() {
        let t = wikipedia();
        assert_eq!(t.apply("https://wikipedia.org/wiki/.wikipedia.org").unwrap(), None);
        assert_eq!(
            t.apply("https://en.wikipedia.org/wiki/.m.wikipedia.org").unwrap().as_deref(),
            Some("https://en.m.wikipedia.org/wiki/.m.wikipedia.org")
        );
    }

    #[test]
    fn replace_prefix() {
        let t = Transform::ReplacePrefix {
            from: "https://m.".to_string(),
            to: "https://".to_string(),
        };
        assert_eq!(
            t.apply("https://m.imdb.com/title/tt0111161/").unwrap().as_deref(),
            Some("https://imdb.com/title/tt0111161/")
        );
        assert!(matches!(t.apply("https://www.imdb.com/"), Err(TransformError::PrefixMismatch(_))));
    }

    #[test]
    fn set_query_param_overrides() {
        let t = Transform::SetQueryParam {
            name: "name".to_string(),
            value: "orig".to_string(),
        };
        assert_eq!(
            t.apply("https://pbs.twimg.com/media/Ab.jpg?format=jpg&name=small").unwrap().as_deref(),
            Some("https://pbs.twimg.com/media/Ab.jpg?format=jpg&name=orig")
        );
    }

    #[test]
    fn replace_infix() {
        let t = Transform::ReplaceInfix {
            from: "-t500x500".to_string(),
            to: "-original".to_string(),
        };
        assert_eq!(
            t.apply("https://i1.sndcdn.com/artworks-000-t500x500.jpg").unwrap().as_deref(),
            Some("https://i1.sndcdn.com/artworks-000-original.jpg")
        );
        assert_eq!(t.apply("https://i1.sndcdn.com/artworks-000-large.jpg").unwrap(), None);
    }

    #[test]
    fn unwrap_round_trip() {
        let t = pixiv();
        let target = "https://example.com/a%20b?q=1&r=\u{e9}";
        let encoded: String =
            percent_encoding::utf8_percent_encode(target, percent_encoding::NON_ALPHANUMERIC).to_string();
        let url = format!("https://www.pixiv.net/jump.php?url={encoded}");
        assert_eq!(t.apply(&url).unwrap().as_deref(), Some(target));
    }

    #[test]
    fn unwrap_rejects_bad_targets() {
        let t = pixiv();
        assert!(t.apply("https://www.pixiv.net/jump.php?url=%E0%A4%A").is_err());
        assert!(t.apply("https://www.pixiv.net/jump.php?url=not%20a%20url").is_err());
        assert!(t.apply("https://www.pixiv.net/other").is_err());
    }

    #[test]
    fn unwrap_rejects_whitespace_and_controls() {
        let t = pixiv();
        for encoded in [
            "%20https%3A%2F%2Fexample.com",
            "https%3A%2F%2Fexample.com%0A",
            "https%3A%2F%2Fexa%09mple.com",
            "https%3A%2F%2Fexample.com%2Fa%7Fb",
        ] {
            let url = format!("https://www.pixiv.net/jump.php?url={encoded}");
            assert!(
                matches!(t.apply(&url), Err(TransformError::Url(UrlError::ForbiddenCharacter(_)))),
                "{encoded}"
            );
        }
    }

    #[test]
    fn unwrap_rejects_non_network_schemes() {
        let t = pixiv();
        for encoded in ["javascript%3Aalert(1)", "data%3Atext%2Fhtml%2Chi", "mailto%3Aa%40b.c"] {
            let url = format!("https://www.pixiv.net/jump.php?url={encoded}");
            assert!(matches!(t.apply(&url), Err(TransformError::UnsupportedTarget(_))), "{encoded}");
        }
        assert_eq!(
            t.apply("https://www.pixiv.net/jump.php?url=ftp%3A%2F%2Fexample.com%2Ff").unwrap().as_deref(),
            Some("ftp://example.com/f")
        );
    }

    #[test]
    fn host_prefix_fallback() {
        let t = Transform::HostPrefixFallback {
            required_prefix: "https://www.".to_string(),
            template: "https://artstation.com/{token}".to_string(),
        };
        assert_eq!(
            t.apply("https://someartist.artstation.com/").unwrap().as_deref(),
            Some("https://artstation.com/someartist")
        );
        assert_eq!(t.apply("https://www.artstation.com/").unwrap(), None);
    }

    #[test]
    fn tail_segment_template() {
        let t = Transform::TailSegmentTemplate {
            template: "https://artstation.com/artwork/{id}".to_string(),
        };
        assert_eq!(
            t.apply("https://someartist.artstation.com/projects/AbC12?utm=x").unwrap().as_deref(),
            Some("https://artstation.com/artwork/AbC12")
        );
        assert!(matches!(
            t.apply("https://someartist.artstation.com/projects/"),
            Err(TransformError::EmptyIdentifier(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(youtube().validate().is_ok());
        assert!(Transform::UnwrapPrefix { prefix: String::new() }.validate().is_err());
        assert!(Transform::TailSegmentTemplate { template: "https://a.com/".to_string() }.validate().is_err());
        assert!(Transform::HostPrefixFallback {
            required_prefix: "https://www.".to_string(),
            template: "https://a.com/{id}".to_string(),
        }
        .validate()
        .is_err());
    }

    #[test]
    fn deserializes_tagged_json() {
        let t: Transform = serde_json::from_str(
            r#"{"kind": "replace_prefix", "from": "https://m.", "to": "https://"}"#,
        )
        .unwrap();
        assert_eq!(t.kind(), "replace_prefix");
        assert_eq!(
            t,
            Transform::ReplacePrefix { from: "https://m.".to_string(), to: "https://".to_string() }
        );
    }
}
