use lexcite::tokenizers::extractors::EXTRACTORS;
use lexcite::{get_citations, Ahocorasick, Citation, GetCitationsOptions};

fn citations_for(text: &str) -> Vec<Citation> {
    let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
    get_citations(text, GetCitationsOptions::default(), &tokenizer)
}

#[test]
fn finds_a_full_case_citation_with_case_name_and_year() {
    let citations = citations_for("Roe v. Wade, 410 U. S. 113 (1973)");
    assert_eq!(citations.len(), 1);
    match &citations[0] {
        Citation::FullCase {
            volume,
            reporter,
            page,
            ..
        } => {
            assert_eq!(volume.as_deref(), Some("410"));
            assert_eq!(reporter, "U. S.");
            assert_eq!(page.as_deref(), Some("113"));
            assert_eq!(citations[0].metadata().plaintiff.as_deref(), Some("Roe"));
            assert_eq!(citations[0].metadata().defendant.as_deref(), Some("Wade"));
            assert_eq!(citations[0].metadata().year, Some(1973));
        }
        other => panic!("expected FullCase, got {other:?}"),
    }
}

#[test]
fn finds_a_pin_cite_on_a_full_citation() {
    let citations = citations_for("Roe v. Wade, 410 U. S. 113, 120 (1973)");
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].metadata().pin_cite.as_deref(), Some("120"));
}

#[test]
fn finds_an_id_citation_after_a_full_citation() {
    let citations = citations_for("Roe v. Wade, 410 U. S. 113 (1973). Id. at 120.");
    assert!(citations.len() >= 2);
    assert!(citations
        .iter()
        .any(|c| matches!(c, Citation::Id { .. }) && c.metadata().pin_cite.as_deref() == Some("120")));
}

#[test]
fn finds_a_supra_citation() {
    let citations = citations_for(
        "Roe v. Wade, 410 U. S. 113 (1973). Later the Court reaffirmed this. Roe, supra, at 120.",
    );
    assert!(citations.iter().any(|c| matches!(c, Citation::Supra { .. })));
}

#[test]
fn finds_a_law_citation() {
    let citations = citations_for("42 U.S.C. § 1983");
    assert!(citations.iter().any(|c| matches!(c, Citation::FullLaw { .. })));
}

#[test]
fn drops_overlapping_duplicate_matches() {
    // Same citation text shouldn't be reported twice even if two
    // extractors both match it.
    let citations = citations_for("See 410 U. S. 113.");
    let spans: Vec<_> = citations.iter().map(|c| c.span()).collect();
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            assert!(spans[i].overlap_fraction(&spans[j]) <= 0.5);
        }
    }
}

#[test]
fn annotates_each_citation_once() {
    let text = "Roe v. Wade, 410 U. S. 113 (1973)";
    let citations = citations_for(text);
    let annotations = lexcite::annotate::annotations_for(&citations, "<cite>", "</cite>");
    let out = lexcite::annotate::annotate(text, &annotations);
    assert_eq!(out.matches("<cite>").count(), citations.len());
    assert_eq!(out.matches("</cite>").count(), citations.len());
}

#[test]
fn resolves_id_citation_to_the_preceding_full_case() {
    let text = "Roe v. Wade, 410 U. S. 113 (1973). Id. at 120.";
    let citations = citations_for(text);
    let resolved = lexcite::resolve::resolve_citations(&citations);
    // Every resolved group should have at least one citation in it, and
    // there should be fewer resources than citations once the id citation
    // joins its antecedent's group.
    let total: usize = resolved.values().map(|v| v.len()).sum();
    assert_eq!(total, citations.len());
    assert!(resolved.len() < citations.len());
}

#[test]
fn clean_text_normalizes_before_tokenizing() {
    let dirty = "Roe  v.\r\nWade, 410  U. S. 113 (1973)";
    let cleaned = lexcite::clean::clean_text(dirty, &["all_whitespace", "inline_whitespace"]);
    let citations = citations_for(&cleaned);
    assert_eq!(citations.len(), 1);
}
