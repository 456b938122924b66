//! Denylist for markup that would run in a browser.
//!
//! The renderer consults these checks before an element or attribute taken
//! from the source reaches the view tree:
//! - elements that load or execute code are dropped with their children
//! - `on*` event handler attributes are dropped
//! - URL attributes with a script-capable scheme are dropped

/// Elements never emitted from markup (matched case-insensitively)
const BLOCKED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "base", "link",
    "meta", "noscript", "template",
];

/// Attributes whose value is fetched or navigated to
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "poster",
    "background",
    "cite",
    "xlink:href",
];

/// Schemes that run script when navigated to
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// `data:` URLs allowed through (inert image payloads)
const ALLOWED_DATA_PREFIX: &str = "data:image/";

pub fn is_blocked_element(name: &str) -> bool {
    BLOCKED_ELEMENTS
        .iter()
        .any(|blocked| blocked.eq_ignore_ascii_case(name))
}

/// `onClick`, `onerror`, `ONLOAD`, ...
pub fn is_event_handler(name: &str) -> bool {
    name.len() > 2 && name.as_bytes()[..2].eq_ignore_ascii_case(b"on")
}

pub fn is_url_attribute(name: &str) -> bool {
    URL_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

/// Whether a URL would execute script when followed or loaded.
///
/// Browsers ignore leading whitespace and control characters and strip
/// tabs and newlines anywhere in the scheme, so the check does the same.
pub fn is_unsafe_url(url: &str) -> bool {
    let normalized: String = url
        .trim_start_matches(|c: char| c.is_ascii_whitespace() || c.is_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take(32)
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized.starts_with(ALLOWED_DATA_PREFIX) {
        return false;
    }

    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_elements_ignore_case() {
        assert!(is_blocked_element("script"));
        assert!(is_blocked_element("Script"));
        assert!(is_blocked_element("IFRAME"));
        assert!(!is_blocked_element("div"));
        assert!(!is_blocked_element("scripts"));
    }

    #[test]
    fn test_event_handlers() {
        assert!(is_event_handler("onClick"));
        assert!(is_event_handler("onerror"));
        assert!(is_event_handler("ONLOAD"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("open"));
        assert!(!is_event_handler("className"));
    }

    #[test]
    fn test_unsafe_urls() {
        assert!(is_unsafe_url("javascript:alert(1)"));
        assert!(is_unsafe_url("JavaScript:alert(1)"));
        assert!(is_unsafe_url("  javascript:alert(1)"));
        assert!(is_unsafe_url("java\tscript:alert(1)"));
        assert!(is_unsafe_url("vbscript:msgbox"));
        assert!(is_unsafe_url("data:text/html;base64,PHNjcmlwdD4="));
    }

    #[test]
    fn test_safe_urls() {
        assert!(!is_unsafe_url("https://solana.com"));
        assert!(!is_unsafe_url("/courses/anchor"));
        assert!(!is_unsafe_url("#accounts"));
        assert!(!is_unsafe_url("mailto:team@example.com"));
        assert!(!is_unsafe_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_unsafe_url("docs/javascript:notes"));
    }
}
