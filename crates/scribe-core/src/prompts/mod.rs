use crate::images::file_name;

pub fn alt_text_prompt(path: &str) -> String {
    format!(
        r#"You are writing alt text for an image that appears in a software project's developer documentation.

The image file is named "{}" (referenced as "{}").

Write one short, descriptive alt text (at most 125 characters) describing what the image most likely shows, based on its name and the documentation context. Respond with the alt text only: no quotes, no markdown, no explanation."#,
        file_name(path),
        path
    )
}

/// Clean up a completion so it fits inside `![...]`.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_alt_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut text = collapsed.as_str();
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = &text[1..text.len() - 1];
            break;
        }
    }

    let cleaned: String = text.chars().filter(|c| !matches!(c, '[' | ']')).collect();
    // a trailing `\` would escape the closing `]`
    let cleaned = cleaned.trim().trim_end_matches('\\').trim_end();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Expand `{filename}` and `{path}` in a fallback template
pub fn fallback_alt_text(template: &str, path: &str) -> String {
    template
        .replace("{filename}", file_name(path))
        .replace("{path}", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_file() {
        let prompt = alt_text_prompt("images/setup-flow.png");
        assert!(prompt.contains("\"setup-flow.png\""));
        assert!(prompt.contains("images/setup-flow.png"));
        assert!(prompt.contains("developer documentation"));
    }

    #[test]
    fn test_sanitize_alt_text() {
        let test_cases = vec![
            ("Diagram of the setup flow", Some("Diagram of the setup flow")),
            ("  \"Quoted answer\"\n", Some("Quoted answer")),
            ("Line one\nline two", Some("Line one line two")),
            ("Chart [beta] view", Some("Chart beta view")),
            ("   ", None),
            ("\"\"", None),
            ("[]", None),
            ("Build pipeline overview\\", Some("Build pipeline overview")),
            ("Trailing escapes \\\\ ", Some("Trailing escapes")),
            ("\\", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(
                sanitize_alt_text(input).as_deref(),
                expected,
                "Failed for input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_fallback_alt_text() {
        assert_eq!(
            fallback_alt_text("Image of {filename}", "docs/img/arch.png"),
            "Image of arch.png"
        );
        assert_eq!(
            fallback_alt_text("Missing description for {path}", "a/b.png"),
            "Missing description for a/b.png"
        );
    }
}
