//! Finds bare case-name references: mentions of a case by name alone,
//! with no citation form attached, that nonetheless resolve to a full
//! citation already found elsewhere in the document (e.g. "the *Roe*
//! decision" after `Roe v. Wade, 410 U.S. 113 (1973)` has already
//! appeared), when followed by a pin-cite-shaped locator.

use crate::find::models::{Citation, CitationSource, Metadata, Span};
use crate::regexes;

/// Scan `document` after `full_citation`'s span for a capitalized name run
/// matching its plaintiff/defendant/resolved case name, immediately
/// followed by a pin-cite pattern. Returns fresh `Citation::Reference`
/// entries carrying `pin_cite` metadata; callers merge these into their
/// citation list and re-filter.
pub fn extract_reference_citations(full_citation: &Citation, document: &str) -> Vec<Citation> {
    let metadata = full_citation.metadata();
    let mut names: Vec<&str> = Vec::new();
    if let Some(d) = metadata.defendant.as_deref() {
        if d.len() > 2 {
            names.push(d);
        }
    }
    if let Some(p) = metadata.plaintiff.as_deref() {
        if p.len() > 2 {
            names.push(p);
        }
    }
    if let Some(r) = metadata.resolved_case_name.as_deref() {
        if r.len() > 2 {
            names.push(r);
        }
    }
    if names.is_empty() {
        return Vec::new();
    }

    let scan_start = full_citation.full_span().end;
    let Some(tail) = document.get(scan_start..) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for caps in regexes::REFERENCE_NAME_RE.captures_iter(tail) {
        let whole = caps.get(0).unwrap();
        let matched_name = caps.name("name").unwrap().as_str();
        let Some(&matched) = names.iter().find(|n| matched_name.contains(**n)) else {
            continue;
        };

        let pin_cite = caps
            .name("pin_cite")
            .map(|m| m.as_str().trim_end_matches(|c| c == '.' || c == ',').to_string());

        let span = Span::new(scan_start + whole.start(), scan_start + whole.end());
        found.push(Citation::Reference {
            source: CitationSource {
                matched_text: whole.as_str().to_string(),
                token_index: usize::MAX,
                span,
                full_span: span,
                groups: Default::default(),
                metadata: Metadata {
                    antecedent_guess: Some(matched.to_string()),
                    pin_cite,
                    ..Metadata::default()
                },
            },
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::models::{CitationSource as CS, Span as Sp};

    fn full_case_named(name: &str, full_span_end: usize) -> Citation {
        Citation::FullCase {
            source: CS {
                matched_text: "410 U.S. 113".into(),
                token_index: 0,
                span: Sp::new(0, full_span_end),
                full_span: Sp::new(0, full_span_end),
                groups: Default::default(),
                metadata: Metadata {
                    defendant: Some(name.into()),
                    ..Metadata::default()
                },
            },
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        }
    }

    #[test]
    fn finds_bare_name_reference_with_pin_cite() {
        let prefix = "Roe v. Wade, 410 U.S. 113 (1973). ";
        let text = format!("{prefix}Later, Wade, at 120, held that...");
        let citation = full_case_named("Wade", prefix.len());
        let found = extract_reference_citations(&citation, &text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metadata().antecedent_guess.as_deref(), Some("Wade"));
        assert_eq!(found[0].metadata().pin_cite.as_deref(), Some("120"));
    }

    #[test]
    fn ignores_a_bare_name_with_no_pin_cite() {
        let prefix = "Roe v. Wade, 410 U.S. 113 (1973). ";
        let text = format!("{prefix}The Wade decision held that...");
        let citation = full_case_named("Wade", prefix.len());
        assert!(extract_reference_citations(&citation, &text).is_empty());
    }

    #[test]
    fn only_scans_after_the_full_citation() {
        let text = "Wade, at 120, foreshadowed Roe v. Wade, 410 U.S. 113 (1973).";
        let citation = full_case_named("Wade", text.len());
        assert!(extract_reference_citations(&citation, text).is_empty());
    }

    #[test]
    fn returns_nothing_without_a_matching_name() {
        let prefix = "Roe v. Wade, 410 U.S. 113 (1973). ";
        let text = format!("{prefix}Later, Smith, at 120, held that...");
        let citation = full_case_named("Wade", prefix.len());
        assert!(extract_reference_citations(&citation, &text).is_empty());
    }
}
