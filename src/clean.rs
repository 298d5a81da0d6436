//! Pre-processing steps to normalize a document's raw text before
//! tokenizing it. Each step is independent and idempotent; callers choose
//! which ones apply to their source (an OCR'd PDF needs different cleaning
//! than an HTML scrape).

/// Collapse runs of horizontal whitespace (but not newlines) to a single
/// space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Normalize `\r\n` and bare `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Strip a short, fixed set of invisible Unicode characters (zero-width
/// space, byte-order mark, soft hyphen) that OCR and copy-paste commonly
/// introduce and that would otherwise desynchronize citation spans from
/// visible character offsets.
pub fn strip_invisible(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{FEFF}' | '\u{00AD}'))
        .collect()
}

/// Collapse any run of whitespace, including newlines, to a single space.
/// Unlike [`collapse_whitespace`], this does not preserve paragraph breaks.
pub fn collapse_all_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Replace underscores with spaces -- common in OCR'd or redacted text
/// where a run of underscores stands in for blanked-out words.
pub fn replace_underscores(text: &str) -> String {
    text.replace('_', " ")
}

/// Strip XML processing instructions and declarations (`<?xml ...?>`),
/// then fall through to the same tag-stripping `html` uses.
pub fn strip_xml(text: &str) -> String {
    let without_pi = match (text.find("<?"), text.find("?>")) {
        (Some(start), Some(end)) if end > start => {
            format!("{}{}", &text[..start], &text[end + 2..])
        }
        _ => text.to_string(),
    };
    crate::annotate::markup::strip_tags(&without_pi)
}

/// Named clean steps, applied in the order given -- mirrors the external
/// interface's `clean_text(text, steps)` contract. Recognized identifiers:
/// `html`, `inline_whitespace`, `all_whitespace`, `underscores`, `xml`.
/// An unrecognized identifier is a non-fatal, logged no-op, per the
/// "recoverable, non-propagating" error posture the rest of the pipeline
/// uses for input-driven faults.
pub fn clean_text(text: &str, steps: &[&str]) -> String {
    let mut current = text.to_string();
    for step in steps {
        current = match *step {
            "inline_whitespace" => collapse_whitespace(&current),
            "all_whitespace" => collapse_all_whitespace(&current),
            "underscores" => replace_underscores(&current),
            "html" => crate::annotate::markup::strip_tags(&current),
            "xml" => strip_xml(&current),
            other => {
                tracing::warn!(step = other, "unknown clean step, skipping");
                current
            }
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_repeated_spaces() {
        assert_eq!(collapse_whitespace("a   b\tc"), "a b c");
    }

    #[test]
    fn normalizes_crlf() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn strips_zero_width_space() {
        assert_eq!(strip_invisible("a\u{200B}b"), "ab");
    }

    #[test]
    fn pipeline_applies_steps_in_order() {
        let out = clean_text("a\r\n  b", &["all_whitespace", "inline_whitespace"]);
        assert_eq!(out, "a b");
    }

    #[test]
    fn replaces_underscores_with_spaces() {
        assert_eq!(replace_underscores("a___b"), "a   b");
    }

    #[test]
    fn strips_xml_declaration_and_tags() {
        let out = strip_xml(r#"<?xml version="1.0"?><doc><p>text</p></doc>"#);
        assert_eq!(out, "text");
    }

    #[test]
    fn unknown_step_is_a_no_op() {
        assert_eq!(clean_text("a  b", &["bogus"]), "a  b");
    }
}
