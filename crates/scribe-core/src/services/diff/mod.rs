mod types;

pub use types::*;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HUNK_HEADER_REGEX: Regex =
        Regex::new(r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@").unwrap();
}

pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = HUNK_HEADER_REGEX.captures(line)?;
    Some(HunkHeader {
        new_start: caps.get(1)?.as_str().parse().ok()?,
    })
}

/// Parse the patch text GitHub returns per changed file.
///
/// Lines before the first hunk header are numbered from 1.
pub fn parse_patch(patch: &str) -> Vec<PatchLine> {
    let mut lines = Vec::new();
    let mut next_new_line: u32 = 1;
    let mut in_hunk = false;

    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(header) = parse_hunk_header(line) {
                next_new_line = header.new_start;
                in_hunk = true;
            }
            continue;
        }

        if !in_hunk && (line.starts_with("+++ ") || line.starts_with("--- ")) {
            continue;
        }

        // "\ No newline at end of file"
        if line.starts_with('\\') {
            continue;
        }

        let (change_type, content) = match line.chars().next() {
            Some('+') => (ChangeType::Add, &line[1..]),
            Some('-') => (ChangeType::Remove, &line[1..]),
            Some(' ') => (ChangeType::Context, &line[1..]),
            _ => (ChangeType::Context, line),
        };

        let new_line = match change_type {
            ChangeType::Remove => None,
            ChangeType::Add | ChangeType::Context => {
                let current = next_new_line;
                next_new_line += 1;
                Some(current)
            }
        };

        lines.push(PatchLine {
            change_type,
            content: content.to_string(),
            new_line,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hunk_header() {
        assert_eq!(
            parse_hunk_header("@@ -12,7 +14,9 @@ ## Section"),
            Some(HunkHeader { new_start: 14 })
        );
        assert_eq!(
            parse_hunk_header("@@ -1 +1 @@"),
            Some(HunkHeader { new_start: 1 })
        );
        assert_eq!(parse_hunk_header("@@ garbage @@"), None);
    }

    #[test]
    fn test_parse_patch_line_numbers() {
        let patch = "@@ -3,4 +3,5 @@\n context\n-old line\n+new line\n+another\n tail\n@@ -20,1 +21,2 @@\n+late addition\n\\ No newline at end of file";
        let lines = parse_patch(patch);

        let numbered: Vec<(ChangeType, &str, Option<u32>)> = lines
            .iter()
            .map(|l| (l.change_type, l.content.as_str(), l.new_line))
            .collect();

        assert_eq!(
            numbered,
            vec![
                (ChangeType::Context, "context", Some(3)),
                (ChangeType::Remove, "old line", None),
                (ChangeType::Add, "new line", Some(4)),
                (ChangeType::Add, "another", Some(5)),
                (ChangeType::Context, "tail", Some(6)),
                (ChangeType::Add, "late addition", Some(21)),
            ]
        );
    }

    #[test]
    fn test_parse_patch_without_header() {
        let lines = parse_patch("+first\n second");
        assert_eq!(lines[0].new_line, Some(1));
        assert_eq!(lines[1].new_line, Some(2));
        assert_eq!(lines[1].change_type, ChangeType::Context);
    }

    #[test]
    fn test_parse_patch_skips_file_headers() {
        let lines = parse_patch("--- a/README.md\n+++ b/README.md\n@@ -1 +1 @@\n-a\n+b");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].content, "b");
        assert_eq!(lines[1].new_line, Some(1));
    }
}
