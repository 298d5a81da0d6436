//! Resolves duplicate and overlapping citations the tokenizer/builder pass
//! can produce -- the same span matched by more than one extractor, or one
//! citation's `full_span` swallowing a shorter one's.

use std::collections::HashSet;

use crate::find::models::Citation;

/// Dedup by stable hash, then drop citations whose span overlaps another
/// citation's by more than half of the shorter span, keeping the
/// higher-priority one (full > short > supra/id > reference) and breaking
/// ties by metadata richness.
pub fn filter_citations(mut citations: Vec<Citation>) -> Vec<Citation> {
    dedup_by_hash(&mut citations);
    citations.sort_by_key(|c| c.span().start);
    resolve_overlaps(citations)
}

/// Drop citations that share both a span and a stable hash -- the same
/// text matched twice by different extractors, not two separate
/// occurrences of the same cite elsewhere in the document.
fn dedup_by_hash(citations: &mut Vec<Citation>) {
    let mut seen = HashSet::new();
    citations.retain(|c| seen.insert((c.span().start, c.span().end, c.stable_hash())));
}

fn resolve_overlaps(citations: Vec<Citation>) -> Vec<Citation> {
    let mut kept: Vec<Citation> = Vec::with_capacity(citations.len());

    'outer: for candidate in citations {
        for idx in 0..kept.len() {
            let existing = &kept[idx];
            if !existing.full_span().overlaps(&candidate.full_span())
                && !is_adjacent_parallel(existing, &candidate)
            {
                continue;
            }
            if is_parallel_citation(existing, &candidate)
                || is_multi_section_law(existing, &candidate)
                || is_nested_in_parenthetical(existing, &candidate)
            {
                continue;
            }
            let fraction = existing.full_span().overlap_fraction(&candidate.full_span());
            if fraction <= 0.5 {
                continue;
            }
            if should_replace(existing, &candidate) {
                kept[idx] = candidate;
            }
            continue 'outer;
        }
        kept.push(candidate);
    }

    kept
}

/// Same `full_span.start`, or overlapping spans naming different reporters,
/// or the same plaintiff/defendant cited to a different reporter -- a
/// parallel citation to the same case, not a competing match for the same
/// text. Both are kept.
fn is_parallel_citation(a: &Citation, b: &Citation) -> bool {
    if a.full_span().start == b.full_span().start {
        return true;
    }
    let different_reporters = match (a.reporter_str(), b.reporter_str()) {
        (Some(ra), Some(rb)) => ra != rb,
        _ => false,
    };
    if !different_reporters {
        return false;
    }
    if a.full_span().overlaps(&b.full_span()) {
        return true;
    }
    let same_parties = a.metadata().plaintiff.is_some()
        && a.metadata().plaintiff == b.metadata().plaintiff
        && a.metadata().defendant == b.metadata().defendant;
    same_parties
}

/// Two law citations sharing a reporter and chapter/title but naming
/// different sections -- a multi-section statutory citation, not a
/// duplicate. Kept side by side when adjacent or overlapping.
fn is_multi_section_law(a: &Citation, b: &Citation) -> bool {
    if !a.is_law() || !b.is_law() {
        return false;
    }
    let same_reporter = matches!((a.reporter_str(), b.reporter_str()), (Some(ra), Some(rb)) if ra == rb);
    let same_chapter = a.chapter_str() == b.chapter_str();
    same_reporter && same_chapter
}

/// One citation's matched text sits inside the other's trailing
/// parenthetical -- e.g. "... (discussing 410 U.S. 113)" -- rather than
/// being a competing match for the same text. Both are kept.
fn is_inside_parenthetical(outer: &Citation, inner: &Citation) -> bool {
    if let Some(paren) = outer.metadata().parenthetical.as_deref() {
        if paren.contains(inner.source().matched_text.as_str()) {
            return true;
        }
    }
    inner.span().start > outer.span().end && inner.full_span().end <= outer.full_span().end
}

fn is_nested_in_parenthetical(a: &Citation, b: &Citation) -> bool {
    is_inside_parenthetical(a, b) || is_inside_parenthetical(b, a)
}

/// Gap of fewer than 20 characters, containing only whitespace/comma/
/// semicolon, between two full_spans -- close enough to be read as a
/// parallel cite even though the spans don't literally overlap.
fn is_adjacent_parallel(a: &Citation, b: &Citation) -> bool {
    let (first, second) = if a.full_span().start <= b.full_span().start {
        (a.full_span(), b.full_span())
    } else {
        (b.full_span(), a.full_span())
    };
    if second.start < first.end {
        return false;
    }
    second.start - first.end < 20
}

fn should_replace(existing: &Citation, candidate: &Citation) -> bool {
    match candidate.priority().cmp(&existing.priority()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => candidate.metadata_richness() > existing.metadata_richness(),
    }
}

/// Fold a `Reference` immediately preceding a `FullCase` (gap of at most
/// two characters, e.g. just a space or "., ") into that `FullCase`,
/// copying over whichever of plaintiff/defendant the full citation didn't
/// already have and extending `full_span` to cover the reference too. Not
/// run by default from [`filter_citations`]/[`crate::find::get_citations`]
/// -- gated behind an explicit call, since folding a bare-name reference
/// into the citation it precedes changes the shape of the returned list
/// in a way that's only sometimes wanted (see the spec's Open Questions).
pub fn merge_adjacent_references(citations: Vec<Citation>) -> Vec<Citation> {
    let mut citations = citations;
    citations.sort_by_key(|c| c.span().start);

    let mut merged: Vec<Citation> = Vec::with_capacity(citations.len());
    let mut pending_reference: Option<Citation> = None;

    for citation in citations {
        match (&pending_reference, &citation) {
            (Some(reference), Citation::FullCase { .. })
                if reference.full_span().end <= citation.full_span().start
                    && citation.full_span().start - reference.full_span().end <= 2 =>
            {
                let reference = pending_reference.take().unwrap();
                merged.push(fold_reference_into_full_case(reference, citation));
            }
            _ => {
                if let Some(reference) = pending_reference.take() {
                    merged.push(reference);
                }
                if matches!(citation, Citation::Reference { .. }) {
                    pending_reference = Some(citation);
                } else {
                    merged.push(citation);
                }
            }
        }
    }
    if let Some(reference) = pending_reference {
        merged.push(reference);
    }

    merged
}

fn fold_reference_into_full_case(reference: Citation, mut full_case: Citation) -> Citation {
    let reference_full_span = reference.full_span();
    let reference_meta = reference.metadata().clone();
    let full_span = full_case.full_span();
    let extended = crate::find::models::Span::new(
        reference_full_span.start.min(full_span.start),
        reference_full_span.end.max(full_span.end),
    );

    let metadata = full_case.metadata_mut();
    if metadata.plaintiff.is_none() {
        metadata.plaintiff = reference_meta.plaintiff;
    }
    if metadata.defendant.is_none() {
        metadata.defendant = reference_meta.defendant.or(reference_meta.antecedent_guess);
    }
    full_case.source_mut().full_span = extended;
    full_case
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::models::{CitationSource, Metadata, Span};

    fn full_case(start: usize, end: usize, richness: usize) -> Citation {
        let mut metadata = Metadata::default();
        if richness > 0 {
            metadata.court = Some("court".into());
        }
        if richness > 1 {
            metadata.year = Some(1990);
        }
        Citation::FullCase {
            source: CitationSource {
                matched_text: "410 U.S. 113".into(),
                token_index: 0,
                span: Span::new(start, end),
                full_span: Span::new(start, end),
                groups: Default::default(),
                metadata,
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
    fn drops_exact_duplicate() {
        let citations = vec![full_case(0, 10, 0), full_case(0, 10, 0)];
        assert_eq!(filter_citations(citations).len(), 1);
    }

    #[test]
    fn keeps_richer_citation_on_overlap() {
        let plain = full_case(100, 110, 0);
        let richer = full_case(101, 109, 2);
        let result = filter_citations(vec![plain, richer]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].metadata_richness(), 2);
    }

    #[test]
    fn keeps_a_citation_nested_in_the_other_s_parenthetical() {
        // "Smith v. Jones, 500 U.S. 1 (discussing 410 U.S. 113)" -- the
        // inner citation overlaps the outer's full_span but sits entirely
        // inside its trailing parenthetical, so both survive.
        let mut outer = full_case(0, 12, 0);
        if let Citation::FullCase { source, .. } = &mut outer {
            source.full_span = Span::new(0, 53);
            source.metadata.parenthetical = Some("discussing 410 U.S. 113".into());
        }
        let mut inner = full_case(30, 42, 0);
        if let Citation::FullCase { source, .. } = &mut inner {
            source.full_span = Span::new(30, 42);
        }
        assert_eq!(filter_citations(vec![outer, inner]).len(), 2);
    }

    #[test]
    fn keeps_non_overlapping_citations_separate() {
        let a = full_case(0, 10, 0);
        let b = full_case(100, 110, 0);
        assert_eq!(filter_citations(vec![a, b]).len(), 2);
    }

    fn full_case_with_reporter(start: usize, end: usize, reporter: &str) -> Citation {
        let mut citation = full_case(start, end, 0);
        if let Citation::FullCase { reporter: r, .. } = &mut citation {
            *r = reporter.to_string();
        }
        citation
    }

    #[test]
    fn keeps_parallel_citations_sharing_full_span_start() {
        // "410 U.S. 113, 93 S. Ct. 705" -- two reporters for the same case,
        // same full_span.start, should both survive.
        let mut a = full_case_with_reporter(0, 12, "U.S.");
        let mut b = full_case_with_reporter(14, 28, "S. Ct.");
        if let Citation::FullCase { source, .. } = &mut a {
            source.full_span = Span::new(0, 28);
        }
        if let Citation::FullCase { source, .. } = &mut b {
            source.full_span = Span::new(0, 28);
        }
        assert_eq!(filter_citations(vec![a, b]).len(), 2);
    }

    fn reference_at(start: usize, end: usize, defendant: &str) -> Citation {
        Citation::Reference {
            source: CitationSource {
                matched_text: defendant.to_string(),
                token_index: usize::MAX,
                span: Span::new(start, end),
                full_span: Span::new(start, end),
                groups: Default::default(),
                metadata: Metadata {
                    antecedent_guess: Some(defendant.to_string()),
                    ..Metadata::default()
                },
            },
        }
    }

    #[test]
    fn merges_adjacent_reference_into_following_full_case() {
        // "Wade, 410 U.S. 113" -- a bare-name reference immediately before
        // the full citation it names.
        let reference = reference_at(0, 4, "Wade");
        let full = full_case(6, 18, 0);
        let merged = merge_adjacent_references(vec![reference, full]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].metadata().defendant.as_deref(), Some("Wade"));
        assert_eq!(merged[0].full_span(), Span::new(0, 18));
    }

    #[test]
    fn does_not_merge_a_distant_reference() {
        let reference = reference_at(0, 4, "Wade");
        let full = full_case(50, 62, 0);
        let merged = merge_adjacent_references(vec![reference, full]);
        assert_eq!(merged.len(), 2);
    }
}
