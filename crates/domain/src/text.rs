//! Label and URL helpers shared by choice lists, filters and error handling.

use std::collections::BTreeMap;

use url::Url;

const OPEN_BRACES: &str = "{{";
const CLOSE_BRACES: &str = "}}";
const OPEN_BRACES_ESCAPED: &str = "&#123;&#123;";
const CLOSE_BRACES_ESCAPED: &str = "&#125;&#125;";

/// Tag keys with this prefix are reserved by the provider and never shown.
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// Replaces template interpolation braces so the text renders literally.
#[must_use]
pub fn escape_braces(text: &str) -> String {
    text.replace(OPEN_BRACES, OPEN_BRACES_ESCAPED)
        .replace(CLOSE_BRACES, CLOSE_BRACES_ESCAPED)
}

/// Reverses [`escape_braces`].
#[must_use]
pub fn unescape_braces(text: &str) -> String {
    text.replace(OPEN_BRACES_ESCAPED, OPEN_BRACES)
        .replace(CLOSE_BRACES_ESCAPED, CLOSE_BRACES)
}

/// Returns `"<Name tag> (<id>)"` when a `Name` tag is set, otherwise the id.
#[must_use]
pub fn display_name(id: &str, tags: &BTreeMap<String, String>, escape: bool) -> String {
    let name = match tags.get("Name").filter(|n| !n.is_empty()) {
        Some(name_tag) => format!("{name_tag} ({id})"),
        None => id.to_string(),
    };
    if escape { escape_braces(&name) } else { name }
}

/// Joins tags as `key=value` pairs, skipping reserved keys.
///
/// The `Name` tag is skipped when `skip_name` is set. A non-zero `wrap_width`
/// breaks each pair longer than the width onto several lines.
#[must_use]
pub fn tags_display(tags: &BTreeMap<String, String>, skip_name: bool, wrap_width: usize) -> String {
    tags.iter()
        .filter(|(key, _)| !key.starts_with(RESERVED_TAG_PREFIX))
        .filter(|(key, _)| !(skip_name && key.as_str() == "Name"))
        .map(|(key, value)| {
            let text = format!("{key}={value}");
            if wrap_width > 0 && text.chars().count() > wrap_width {
                wrap(&text, wrap_width)
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn wrap(text: &str, width: usize) -> String {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reduces a redirect target to a local path.
///
/// Absolute URLs keep only their path; a scheme with no host (e.g.
/// `http:///evil.example`) and empty input both yield `/`.
#[must_use]
pub fn sanitize_url(url: &str) -> String {
    const DEFAULT_PATH: &str = "/";
    let url = url.trim();
    if url.is_empty() {
        return DEFAULT_PATH.to_string();
    }
    if has_scheme(url) {
        let path = match Url::parse(url) {
            Ok(parsed)
                if parsed.host_str().is_some_and(|h| !h.is_empty())
                    && !authority_is_empty(url) =>
            {
                parsed.path().to_string()
            }
            _ => return DEFAULT_PATH.to_string(),
        };
        return if path.is_empty() { DEFAULT_PATH.to_string() } else { path };
    }
    if url.starts_with("//") {
        return DEFAULT_PATH.to_string();
    }
    url.to_string()
}

fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
    })
}

// `Url::parse` normalizes `http:///host` into `http://host/`, so the raw
// authority has to be checked before trusting the parsed host.
fn authority_is_empty(url: &str) -> bool {
    url.split_once("://")
        .is_none_or(|(_, rest)| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_escape_roundtrip() {
        let raw = "group {{ evil }}";
        let escaped = escape_braces(raw);
        assert_eq!(escaped, "group &#123;&#123; evil &#125;&#125;");
        assert_eq!(unescape_braces(&escaped), raw);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("vol-1", &tags(&[]), true), "vol-1");
        assert_eq!(
            display_name("vol-1", &tags(&[("Name", "data")]), true),
            "data (vol-1)"
        );
        assert_eq!(
            display_name("vol-1", &tags(&[("Name", "{{x}}")]), true),
            "&#123;&#123;x&#125;&#125; (vol-1)"
        );
    }

    #[test]
    fn test_tags_display() {
        let t = tags(&[("Name", "web"), ("aws:cloudformation", "x"), ("env", "prod")]);
        assert_eq!(tags_display(&t, true, 0), "env=prod");
        assert_eq!(tags_display(&t, false, 0), "Name=web, env=prod");
        assert_eq!(tags_display(&tags(&[("k", "abcdef")]), true, 4), "k=ab\ncdef");
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url(""), "/");
        assert_eq!(sanitize_url("/instances"), "/instances");
        assert_eq!(sanitize_url("https://evil.example/instances"), "/instances");
        assert_eq!(sanitize_url("http:///evil.example"), "/");
        assert_eq!(sanitize_url("//evil.example/path"), "/");
    }
}
