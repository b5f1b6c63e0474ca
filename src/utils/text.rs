/// Split a comma-separated list, trimming items and dropping empty ones
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape text for use inside SVG/XML content and attribute values
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
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
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(" alice, bob ,,carol,"), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_split_csv_empty_input() {
        assert!(split_csv("").is_empty());
        assert!(split_csv(" , ").is_empty());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("O'Brien <dev> & \"co\""), "O&apos;Brien &lt;dev&gt; &amp; &quot;co&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
