//! HTML escaping.

/// Which quote characters [`escape_html`] converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeFlags {
    /// Escape both `"` and `'`.
    #[default]
    Quotes,
    /// Escape `"` only.
    Compat,
    /// Leave both quote characters alone.
    NoQuotes,
}

/// Escapes HTML special characters using the default flags.
///
/// Equivalent to `escape_html(input, EscapeFlags::Quotes, true)`.
///
/// ```rust
/// assert_eq!(standout_view::esc("<p>Lorem</p>"), "&lt;p&gt;Lorem&lt;/p&gt;");
/// ```
pub fn esc(input: &str) -> String {
    escape_html(input, EscapeFlags::Quotes, true)
}

/// Escapes `&`, `<`, `>` and, depending on `flags`, quote characters.
///
/// With `double_encode` off, character references already present in the
/// input (`&amp;`, `&#039;`, `&#x1F600;`) are kept as they are.
pub fn escape_html(input: &str, flags: EscapeFlags, double_encode: bool) -> String {
    let mut out = String::with_capacity(input.len());

    for (i, ch) in input.char_indices() {
        match ch {
            '&' if !double_encode && is_entity(&input[i + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if flags != EscapeFlags::NoQuotes => out.push_str("&quot;"),
            '\'' if flags == EscapeFlags::Quotes => out.push_str("&#039;"),
            other => out.push(other),
        }
    }

    out
}

/// Checks whether `rest` (the text after an `&`) starts a character reference.
fn is_entity(rest: &str) -> bool {
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];

    if let Some(numeric) = body.strip_prefix('#') {
        return match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()),
        };
    }

    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esc_markup() {
        assert_eq!(esc("<p>Lorem</p>"), "&lt;p&gt;Lorem&lt;/p&gt;");
    }

    #[test]
    fn test_quote_flags() {
        let input = r#"a "b" 'c'"#;
        assert_eq!(
            escape_html(input, EscapeFlags::Quotes, true),
            "a &quot;b&quot; &#039;c&#039;"
        );
        assert_eq!(
            escape_html(input, EscapeFlags::Compat, true),
            "a &quot;b&quot; 'c'"
        );
        assert_eq!(escape_html(input, EscapeFlags::NoQuotes, true), input);
    }

    #[test]
    fn test_double_encode() {
        let input = "&amp; &#039; &#x1F600; & &bogus &;";
        assert_eq!(
            escape_html(input, EscapeFlags::Quotes, true),
            "&amp;amp; &amp;#039; &amp;#x1F600; &amp; &amp;bogus &amp;;"
        );
        assert_eq!(
            escape_html(input, EscapeFlags::Quotes, false),
            "&amp; &#039; &#x1F600; &amp; &amp;bogus &amp;;"
        );
    }

    #[test]
    fn test_passes_unicode_through() {
        assert_eq!(esc("Grüße → ✓"), "Grüße → ✓");
    }
}
