//! Free-text sanitisation applied before user input reaches an LLM prompt
//! or is stored as community content.

/// Characters removed from every free-text input.
pub const STRIPPED_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

/// Maximum number of characters kept from a single free-text input.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Strip [`STRIPPED_CHARS`], trim, and truncate to [`MAX_INPUT_CHARS`].
pub fn sanitize_text(input: &str) -> String {
    sanitize_with_limit(input, MAX_INPUT_CHARS)
}

/// Strip [`STRIPPED_CHARS`], trim, and truncate to `max_chars` characters.
///
/// Truncation counts Unicode scalar values, so multi-byte input is never
/// split mid-character.
pub fn sanitize_with_limit(input: &str, max_chars: usize) -> String {
    input
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .chars()
        .take(max_chars)
        .collect()
}

/// Escape `%`, `_` and `\` so user input can be embedded in an `ILIKE`
/// pattern as a literal substring match.
pub fn like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('%');
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_characters() {
        assert_eq!(
            sanitize_text("<script>alert(\"x\") & 'y'</script>"),
            "scriptalert(x)  y/script"
        );
    }

    #[test]
    fn truncates_to_limit() {
        let long = "a".repeat(MAX_INPUT_CHARS + 500);
        assert_eq!(sanitize_text(&long).len(), MAX_INPUT_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let input = "é".repeat(20);
        let out = sanitize_with_limit(&input, 5);
        assert_eq!(out.chars().count(), 5);
        assert_eq!(out, "ééééé");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_text("   hello  \n"), "hello");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
