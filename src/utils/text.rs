use std::path::Path;

/// Parse a user-entered decimal number, accepting `,` as the decimal separator.
pub fn parse_number(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Turn the file-name prompt input into a file name.
///
/// Empty input yields `default_name`; names without an extension borrow the
/// default's extension. Path separators are rejected.
pub fn resolve_file_name(input: &str, default_name: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default_name.to_string());
    }
    if trimmed.contains(['/', '\\']) {
        return Err("File name must not contain path separators");
    }
    if matches!(trimmed, "." | "..") {
        return Err("Not a valid file name");
    }

    let has_extension = Path::new(trimmed).extension().is_some();
    match Path::new(default_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !has_extension => Ok(format!("{trimmed}.{ext}")),
        _ => Ok(trimmed.to_string()),
    }
}

/// Escape text for inclusion in XML/SVG character data and attributes.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dot_and_comma_decimals() {
        assert_eq!(parse_number("7"), Some(7.0));
        assert_eq!(parse_number(" 4.75 "), Some(4.75));
        assert_eq!(parse_number("4,75"), Some(4.75));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn file_name_defaults_and_extensions() {
        let default = "distribution_diagram.png";
        assert_eq!(resolve_file_name("", default).unwrap(), default);
        assert_eq!(resolve_file_name("acetic", default).unwrap(), "acetic.png");
        assert_eq!(resolve_file_name("acetic.svg", default).unwrap(), "acetic.svg");
        assert!(resolve_file_name("sub/acetic", default).is_err());
        assert!(resolve_file_name("..", default).is_err());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("A<B> & \"C\""), "A&lt;B&gt; &amp; &quot;C&quot;");
    }
}
