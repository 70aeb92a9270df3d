//! Helpers shared by the reqwest-backed adapters.

use reqwest::Url;

/// Append path segments to `base`, keeping any path prefix it already has.
/// Segments are percent-encoded. Returns `None` for URLs that cannot carry a
/// path (e.g. `mailto:`).
pub(crate) fn base_url_with_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

/// Single-line, length-capped rendering of an error body for logs and errors.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://cms.local:1337", "http://cms.local:1337/api/products/doc%201")]
    #[case("http://cms.local/", "http://cms.local/api/products/doc%201")]
    #[case("http://proxy.local/cms/", "http://proxy.local/cms/api/products/doc%201")]
    fn appends_encoded_segments(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        let url = base_url_with_segments(&base, &["api", "products", "doc 1"]).expect("joinable");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn rejects_cannot_be_a_base_urls() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        assert!(base_url_with_segments(&base, &["api"]).is_none());
    }

    #[test]
    fn preview_compacts_and_truncates() {
        assert_eq!(body_preview(b"  {\n \"error\":  \"nope\" }"), "{ \"error\": \"nope\" }");
        let long = "x".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }
}
