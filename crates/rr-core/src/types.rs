//! Core type definitions for Rerouter
//!
//! These types are shared by the pattern compiler, the rule registry and
//! the dispatcher, and are the values exchanged with the host.

// =============================================================================
// Request Types (bit mask for type filtering)
// =============================================================================

bitflags::bitflags! {
    /// Request type bit mask.
    ///
    /// A request carries exactly one bit; a rule carries the set of types
    /// it applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestType: u32 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;
        const SUBDOCUMENT = 1 << 5;  // iframe/frame
        const MAIN_FRAME = 1 << 6;   // main document
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;
        const PING = 1 << 11;
        const CSP_REPORT = 1 << 12;
        const BEACON = 1 << 13;
        const FETCH = 1 << 14;
        const SPECULATIVE = 1 << 15;

        /// All request types
        const ALL = 0xFFFF;
    }
}

/// Browser names for each single request type, in bit order.
const TYPE_NAMES: &[(RequestType, &str)] = &[
    (RequestType::OTHER, "other"),
    (RequestType::SCRIPT, "script"),
    (RequestType::IMAGE, "image"),
    (RequestType::STYLESHEET, "stylesheet"),
    (RequestType::OBJECT, "object"),
    (RequestType::SUBDOCUMENT, "sub_frame"),
    (RequestType::MAIN_FRAME, "main_frame"),
    (RequestType::XMLHTTPREQUEST, "xmlhttprequest"),
    (RequestType::WEBSOCKET, "websocket"),
    (RequestType::FONT, "font"),
    (RequestType::MEDIA, "media"),
    (RequestType::PING, "ping"),
    (RequestType::CSP_REPORT, "csp_report"),
    (RequestType::BEACON, "beacon"),
    (RequestType::FETCH, "fetch"),
    (RequestType::SPECULATIVE, "speculative"),
];

impl RequestType {
    /// Parse a browser request type string, accepting common aliases.
    /// Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s {
            "main_frame" | "document" => Self::MAIN_FRAME,
            "sub_frame" | "subdocument" => Self::SUBDOCUMENT,
            "stylesheet" | "css" => Self::STYLESHEET,
            "script" | "js" => Self::SCRIPT,
            "image" | "img" => Self::IMAGE,
            "font" => Self::FONT,
            "object" => Self::OBJECT,
            "xmlhttprequest" | "xhr" => Self::XMLHTTPREQUEST,
            "ping" => Self::PING,
            "beacon" => Self::BEACON,
            "fetch" => Self::FETCH,
            "csp_report" => Self::CSP_REPORT,
            "speculative" => Self::SPECULATIVE,
            "media" => Self::MEDIA,
            "websocket" | "ws" => Self::WEBSOCKET,
            "other" => Self::OTHER,
            _ => return None,
        };
        Some(ty)
    }

    /// Parse a request type coming from the host. Unknown types map to `OTHER`.
    pub fn from_host(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::OTHER)
    }

    /// Browser names of every type in this set, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        TYPE_NAMES
            .iter()
            .filter(|(ty, _)| self.contains(*ty))
            .map(|(_, name)| *name)
            .collect()
    }
}

// =============================================================================
// Scheme Masks
// =============================================================================

bitflags::bitflags! {
    /// URL scheme mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SchemeMask: u8 {
        const HTTP = 1 << 0;
        const HTTPS = 1 << 1;
        const WS = 1 << 2;
        const WSS = 1 << 3;
        const FTP = 1 << 4;
        /// What a `*` scheme in a match pattern stands for
        const WEB = Self::HTTP.bits() | Self::HTTPS.bits();
    }
}

impl SchemeMask {
    /// Parse a match pattern scheme.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "*" => Some(Self::WEB),
            "http" => Some(Self::HTTP),
            "https" => Some(Self::HTTPS),
            "ws" => Some(Self::WS),
            "wss" => Some(Self::WSS),
            "ftp" => Some(Self::FTP),
            _ => None,
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// A request handed over by the host. Borrowed for one evaluation only.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// Full request URL
    pub url: &'a str,
    /// Request type
    pub request_type: RequestType,
}

impl<'a> Request<'a> {
    pub fn new(url: &'a str, request_type: RequestType) -> Self {
        Self { url, request_type }
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Decision {
    /// Let the request proceed unmodified
    #[default]
    NoAction,
    /// Replace the request target with this absolute URL
    Redirect(String),
}

impl Decision {
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Decision::Redirect(url) => Some(url),
            Decision::NoAction => None,
        }
    }

    pub fn into_redirect_url(self) -> Option<String> {
        match self {
            Decision::Redirect(url) => Some(url),
            Decision::NoAction => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirect(_))
    }
}

/// Result of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The final decision for this request
    pub decision: Decision,
    /// Registry index of the rule that was eligible (for logging), or -1
    pub rule_id: i32,
}

impl Default for MatchResult {
    fn default() -> Self {
        Self {
            decision: Decision::NoAction,
            rule_id: -1,
        }
    }
}
