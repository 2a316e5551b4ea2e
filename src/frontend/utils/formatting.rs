/// Escape text for inclusion in html markup.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Relative url which reloads the current page, bypassing caches.
pub fn cache_bust_url(param: &str, stamp: i64) -> String {
    let query = serde_urlencoded::to_string([(param, stamp.to_string())]).unwrap_or_default();
    format!("?{query}")
}

/// Whether a dialog body should be inserted as markup rather than text.
pub fn is_markup(text: &str) -> bool {
    text.starts_with('<')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;",
            html_escape("<b>Tom & \"Jerry\"</b>")
        );
    }

    #[test]
    fn cache_bust() {
        assert_eq!("?t=1700000000000", cache_bust_url("t", 1_700_000_000_000));
    }

    #[test]
    fn markup_detection() {
        assert!(is_markup("<b>hi</b>"));
        assert!(!is_markup("hi <b>"));
        assert!(!is_markup(""));
    }
}
