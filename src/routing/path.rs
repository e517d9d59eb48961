//! Path classification.
//!
//! # Responsibilities
//! - Recognize analytics-ingestion, auth-bypass, and viewer path categories
//! - Apply the viewer denylist (blocked substrings, file-like suffixes)
//! - Recognize paths outside the dispatcher's jurisdiction entirely
//!
//! # Design Decisions
//! - Categories are tested in a fixed precedence order; exactly one applies
//! - The analytics pattern is a precompiled regex held by the classifier,
//!   never rebuilt per request
//! - The bypass prefixes are one shared constant so the custom-domain rule
//!   and the app-handler rule can never drift apart

use regex::Regex;

/// Analytics ingestion paths: a fixed segment followed by any remainder.
const ANALYTICS_PATH_PATTERN: &str = r"^/ingest/.*";

/// Prefixes that reach first-party auth/verification pages even on a tenant
/// domain, and are exempt from generic app handling for the same reason.
pub const VIEWER_BYPASS_PREFIXES: [&str; 3] = ["/verify", "/login", "/auth"];

/// Prefix reserved for rendering shared documents.
pub const VIEWER_CONTENT_PREFIX: &str = "/view/";

/// Unsubscribe endpoints are terminal pages, not app traffic.
pub const UNSUBSCRIBE_PREFIX: &str = "/unsubscribe";

/// Leading segments the gateway never evaluates: API routes, framework
/// internals, static assets, and a small fixed set of well-known files.
const EXCLUDED_LEADING_SEGMENTS: [&str; 8] = [
    "api/",
    "_next/",
    "_static",
    "vendor",
    "_icons",
    "_vercel",
    "favicon.ico",
    "sitemap.xml",
];

/// Outcome of classifying a request path. Exactly one category applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCategory {
    /// Analytics ingestion traffic.
    Analytics,

    /// Auth/verification passthrough, exempt from custom-domain rewriting.
    ViewerBypass,

    /// Shared-document viewer content.
    Viewer,

    /// Ordinary application traffic.
    StandardApp,

    /// None of the above (e.g. unsubscribe pages).
    Other,
}

/// Path classifier with precompiled patterns and the viewer denylist.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    analytics: Regex,
    blocked_pathnames: Vec<String>,
}

impl PathClassifier {
    pub fn new(blocked_pathnames: Vec<String>) -> Self {
        Self {
            // The pattern is a fixed literal; compilation cannot fail.
            analytics: Regex::new(ANALYTICS_PATH_PATTERN).expect("analytics pattern is valid"),
            blocked_pathnames,
        }
    }

    /// Classify a path. Total: every path maps to exactly one category,
    /// tested in precedence order.
    pub fn classify(&self, path: &str) -> PathCategory {
        if self.analytics.is_match(path) {
            return PathCategory::Analytics;
        }
        if VIEWER_BYPASS_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
        {
            return PathCategory::ViewerBypass;
        }
        if path.starts_with(VIEWER_CONTENT_PREFIX) {
            return PathCategory::Viewer;
        }
        if !app_exemption_prefixes()
            .iter()
            .any(|prefix| path.starts_with(prefix))
        {
            return PathCategory::StandardApp;
        }
        PathCategory::Other
    }

    /// Viewer denylist: true if the path contains any blocked substring or a
    /// literal `.` (file-extension-looking viewer paths are rejected — a
    /// blunt heuristic kept as existing policy). Only meaningful for
    /// `Viewer` paths.
    pub fn is_blocked_viewer_path(&self, path: &str) -> bool {
        self.blocked_pathnames
            .iter()
            .any(|blocked| path.contains(blocked.as_str()))
            || path.contains('.')
    }
}

/// Prefixes exempt from generic app handling: the shared bypass prefixes
/// plus viewer content and unsubscribe pages. Built from
/// `VIEWER_BYPASS_PREFIXES` so the two exemption lists stay in lockstep.
pub fn app_exemption_prefixes() -> Vec<&'static str> {
    let mut prefixes = vec![VIEWER_CONTENT_PREFIX, UNSUBSCRIBE_PREFIX];
    prefixes.extend(VIEWER_BYPASS_PREFIXES);
    prefixes
}

/// Paths outside the dispatcher's jurisdiction, forwarded to the app origin
/// without classification.
pub fn is_excluded_path(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    EXCLUDED_LEADING_SEGMENTS
        .iter()
        .any(|segment| rest.starts_with(segment))
}
