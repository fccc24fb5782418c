/// Escape characters that can open markup or a script context.
///
/// `&` is escaped too, so escaping an already escaped string escapes it again.
/// `/` is left as is: closing tags are already neutralized by `<`, and URLs
/// and paths in messages stay readable.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_tags() {
        assert_eq!(sanitize("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn test_sanitize_twice_double_escapes() {
        let once = sanitize("<b>hi</b>");
        assert_eq!(sanitize(&once), "&amp;lt;b&amp;gt;hi&amp;lt;/b&amp;gt;");
    }

    #[test]
    fn test_sanitize_quotes_and_backtick() {
        assert_eq!(sanitize(r#"a"b'c`d"#), "a&quot;b&#x27;c&#x60;d");
    }

    #[test]
    fn test_sanitize_keeps_slash() {
        assert_eq!(sanitize("a/b"), "a/b");
        assert_eq!(sanitize("</b>"), "&lt;/b&gt;");
        assert_eq!(sanitize("https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn test_sanitize_plain_text_untouched() {
        assert_eq!(sanitize("Hello, world. 2 + 2 = 4 / 1"), "Hello, world. 2 + 2 = 4 / 1");
        assert_eq!(sanitize(""), "");
    }
}
