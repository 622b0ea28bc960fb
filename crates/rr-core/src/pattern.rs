//! Match Pattern Compiler
//!
//! Compiles browser-style match patterns (`<scheme>://<host><path>`) into
//! predicates over request URLs.
//!
//! - Host: `*`, `*.example.com` (the domain and every subdomain) or an exact
//!   host. Compared ASCII case-insensitively; the URL port is ignored.
//! - Path: must start with `/`. `*` matches any run of characters, including
//!   `/`. The path is tested against the URL's path plus query.
//! - Scheme: matched exactly; `*` stands for `http` and `https`.
//!
//! # Examples
//!
//! ```
//! use rr_core::pattern::MatchPattern;
//!
//! let pattern = MatchPattern::compile("https://*.wikipedia.org/*/*").unwrap();
//! assert!(pattern.matches("https://de.wikipedia.org/wiki/Test"));
//! assert!(!pattern.matches("http://de.wikipedia.org/wiki/Test"));
//! ```

use std::fmt;

use crate::types::SchemeMask;
use crate::url::{extract_host, extract_path_and_query, extract_scheme};

/// Error type for pattern compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("missing \"://\" separator in {0:?}")]
    MissingSeparator(String),
    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),
    #[error("empty host in {0:?}")]
    EmptyHost(String),
    #[error("wildcard must be the whole host or a leading \"*.\" label: {0:?}")]
    InvalidHostWildcard(String),
    #[error("ports are not supported in patterns: {0:?}")]
    PortInHost(String),
    #[error("invalid character in host {0:?}")]
    InvalidHost(String),
    #[error("path must start with '/' in {0:?}")]
    MissingPath(String),
}

// =============================================================================
// Host Matching
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    /// `*`
    Any,
    /// `*.domain`: the domain itself or any subdomain
    Domain(String),
    /// Exact host
    Exact(String),
}

impl HostPattern {
    fn parse(host: &str, pattern: &str) -> Result<Self, PatternError> {
        if host.is_empty() {
            return Err(PatternError::EmptyHost(pattern.to_string()));
        }
        if host == "*" {
            return Ok(Self::Any);
        }

        let (wildcard, domain) = match host.strip_prefix("*.") {
            Some(rest) => (true, rest),
            None => (false, host),
        };

        if domain.contains('*') || domain.is_empty() {
            return Err(PatternError::InvalidHostWildcard(pattern.to_string()));
        }
        if domain.contains(':') {
            return Err(PatternError::PortInHost(pattern.to_string()));
        }
        if !domain
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_')
        {
            return Err(PatternError::InvalidHost(pattern.to_string()));
        }

        let domain = domain.to_ascii_lowercase();
        Ok(if wildcard { Self::Domain(domain) } else { Self::Exact(domain) })
    }

    #[inline]
    fn matches(&self, host: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => host.eq_ignore_ascii_case(exact),
            Self::Domain(domain) => is_same_or_subdomain(host, domain),
        }
    }

    fn covers(&self, other: &HostPattern) -> bool {
        match (self, other) {
            (Self::Any, _) => true,
            (_, Self::Any) => false,
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Exact(_), Self::Domain(_)) => false,
            (Self::Domain(a), Self::Exact(b) | Self::Domain(b)) => is_same_or_subdomain(b, a),
        }
    }
}

#[inline]
fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    if host.len() == domain.len() {
        return host.eq_ignore_ascii_case(domain);
    }
    host.len() > domain.len()
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
        && host[host.len() - domain.len()..].eq_ignore_ascii_case(domain)
}

// =============================================================================
// Path Glob
// =============================================================================

/// Path glob compiled into literal pieces separated by `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathGlob {
    /// Literal pieces; `pieces.len() - 1` wildcards sit between them.
    pieces: Vec<String>,
}

impl PathGlob {
    fn compile(path: &str) -> Self {
        Self {
            pieces: path.split('*').map(str::to_string).collect(),
        }
    }

    /// Greedy leftmost scan: each inner piece is taken at its first
    /// occurrence, which is sufficient for `*`-only globs.
    fn matches(&self, text: &str) -> bool {
        let first = &self.pieces[0];
        if self.pieces.len() == 1 {
            return text == first;
        }
        if !text.starts_with(first.as_str()) {
            return false;
        }

        let last = &self.pieces[self.pieces.len() - 1];
        let mut cursor = first.len();

        for piece in &self.pieces[1..self.pieces.len() - 1] {
            match text[cursor..].find(piece.as_str()) {
                Some(pos) => cursor += pos + piece.len(),
                None => return false,
            }
        }

        text.len() - cursor >= last.len() && text.ends_with(last.as_str())
    }

    fn source(&self) -> String {
        self.pieces.join("*")
    }
}

// =============================================================================
// Match Pattern
// =============================================================================

/// A compiled match pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    source: String,
    scheme: SchemeMask,
    host: HostPattern,
    path: PathGlob,
}

impl MatchPattern {
    /// Compile a match pattern string.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern == "<all_urls>" {
            return Ok(Self {
                source: pattern.to_string(),
                scheme: SchemeMask::all(),
                host: HostPattern::Any,
                path: PathGlob::compile("/*"),
            });
        }

        let (scheme_str, rest) = pattern
            .split_once("://")
            .ok_or_else(|| PatternError::MissingSeparator(pattern.to_string()))?;

        let scheme = SchemeMask::parse(scheme_str)
            .ok_or_else(|| PatternError::UnsupportedScheme(scheme_str.to_string()))?;

        let path_start = rest
            .find('/')
            .ok_or_else(|| PatternError::MissingPath(pattern.to_string()))?;
        let (host_str, path_str) = rest.split_at(path_start);

        let host = HostPattern::parse(host_str, pattern)?;

        Ok(Self {
            source: pattern.to_string(),
            scheme,
            host,
            path: PathGlob::compile(path_str),
        })
    }

    /// The pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a request URL against this pattern.
    #[inline]
    pub fn matches(&self, url: &str) -> bool {
        let scheme = match extract_scheme(url) {
            Some(scheme) => scheme,
            None => return false,
        };
        if !self.scheme.contains(scheme) {
            return false;
        }

        let host = match extract_host(url) {
            Some(host) if !host.is_empty() => host,
            _ => return false,
        };
        if !self.host.matches(host) {
            return false;
        }

        self.path.matches(&extract_path_and_query(url))
    }

    /// Whether every URL matched by `other` is also matched by `self`.
    ///
    /// `other`'s path glob is read as literal text; `self`'s glob can only
    /// consume one of its `*` with a `*` of its own, so a match means the
    /// whole of `other`'s language is covered.
    pub fn covers(&self, other: &MatchPattern) -> bool {
        self.scheme.contains(other.scheme)
            && self.host.covers(&other.host)
            && self.path.matches(&other.path.source())
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
