//! This crate's main workhorse function. Given a string of text (e.g. a
//! judicial opinion or other legal document), return a list of
//! [`models::Citation`] objects representing the citations found in the
//! document.

use std::collections::HashMap;

use tracing::debug;

use crate::disambiguate;
use crate::filter;
use crate::find::case_name::{scan_backward, scan_forward};
use crate::find::html_case_name::EmphasisTag;
use crate::find::models::{Citation, CitationSource, Metadata, Span};
use crate::tokenizers::models::Token;
use crate::tokenizers::Tokenizer;

pub mod case_name;
pub mod court;
pub mod edition;
pub mod html_case_name;
pub mod law;
pub mod models;

/// Options controlling how [`get_citations`] builds and filters the
/// citation list.
#[derive(Debug, Clone, Default)]
pub struct GetCitationsOptions {
    /// Whether to drop reporter/edition candidates whose date range rules
    /// them out once a year is known, removing citations that would
    /// otherwise be ambiguous between multiple reporters (see
    /// [`disambiguate`]).
    pub remove_ambiguous: bool,
    /// The document's original markup, when available. When present, a
    /// citation's case name is looked for first among the document's
    /// `<em>`/`<i>`/`<b>` tags (see [`html_case_name`]) before falling back
    /// to the plain-text backward scan.
    pub markup_text: Option<String>,
}

/// Find every citation in `plain_text` using `tokenizer`.
pub fn get_citations<'a>(
    plain_text: &'a str,
    options: GetCitationsOptions,
    tokenizer: &'a (dyn Tokenizer<'a>),
) -> Vec<Citation> {
    let (all_tokens, citation_tokens) = tokenizer.tokenize(plain_text);

    let emphasis_tags: Option<Vec<EmphasisTag>> = options
        .markup_text
        .as_deref()
        .map(|markup| html_case_name::extract_emphasis_tags(markup).1);

    let mut citations: Vec<Citation> = citation_tokens
        .iter()
        .filter(|(_, token)| token.is_citation_bearing())
        .filter_map(|(index, token)| {
            build_citation(plain_text, &all_tokens, *index, token, emphasis_tags.as_deref())
        })
        .collect();

    debug!(count = citations.len(), "built raw citations");

    citations = filter::filter_citations(citations);

    if options.remove_ambiguous {
        citations = disambiguate::disambiguate_reporters(citations);
    }

    citations
}

fn build_citation(
    full_text: &str,
    all_tokens: &[Token],
    token_index: usize,
    token: &Token,
    tags: Option<&[EmphasisTag]>,
) -> Option<Citation> {
    let groups = string_groups(token);
    let span = Span::new(token.start(), token.end());
    let source = CitationSource::new(token, token_index, span);

    match token {
        Token::Citation(data) => {
            let volume = groups.get("volume").cloned();
            let reporter = groups.get("reporter").cloned().unwrap_or_default();
            let page = groups.get("page").cloned();
            let exact_editions = data.extra.exact_editions.clone();
            let variation_editions = data.extra.variation_editions.clone();

            let back = tags
                .and_then(|tags| html_case_name::scan_html_case_name(tags, full_text, span.start))
                .unwrap_or_else(|| scan_backward(all_tokens, token_index));
            let forward = scan_forward(all_tokens, token_index, full_text);

            let mut source = source;
            source.full_span = Span::new(
                back.span_start.unwrap_or(span.start),
                forward.span_end.unwrap_or(span.end),
            );
            apply_forward_metadata(&mut source.metadata, &forward);
            if source.metadata.year.is_none() {
                source.metadata.year = back.pre_cite_year;
            }

            if back.plaintiff.is_some() || back.defendant.is_some() {
                source.metadata.plaintiff = back.plaintiff;
                source.metadata.defendant = back.defendant;
                check_missing_edition_for_year(&mut source.metadata, &exact_editions);
                let edition_guess = sole_edition_guess(&exact_editions, source.metadata.year);
                Some(Citation::FullCase {
                    source,
                    volume,
                    reporter,
                    page,
                    edition_guess,
                    exact_editions,
                    variation_editions,
                })
            } else {
                source.metadata.antecedent_guess = back.antecedent_guess;
                check_missing_edition_for_year(&mut source.metadata, &exact_editions);
                let edition_guess = sole_edition_guess(&exact_editions, source.metadata.year);
                Some(Citation::ShortCase {
                    source,
                    volume,
                    reporter,
                    page,
                    edition_guess,
                    exact_editions,
                    variation_editions,
                })
            }
        }

        Token::Law(_) => {
            let reporter = groups.get("reporter").cloned().unwrap_or_default();
            let chapter_or_title = law::chapter_or_title(&groups);
            let (part, section) = match (groups.get("part"), law::section(&groups)) {
                (Some(part), raw_section) => (Some(part.clone()), raw_section),
                (None, Some(raw_section)) => {
                    let (part, section) = law::split_part(&reporter, &raw_section);
                    (part, Some(section))
                }
                (None, None) => (None, None),
            };

            let mut source = source;
            let forward = scan_forward(all_tokens, token_index, full_text);
            source.full_span = Span::new(span.start, forward.span_end.unwrap_or(span.end));
            apply_forward_metadata(&mut source.metadata, &forward);
            if let Some(publisher) = groups.get("publisher") {
                source.metadata.publisher = Some(publisher.clone());
            }

            Some(Citation::FullLaw {
                source,
                reporter,
                chapter_or_title,
                part,
                section,
            })
        }

        Token::Journal(_) => {
            let volume = groups.get("volume").cloned().unwrap_or_default();
            let journal = groups.get("reporter").cloned().unwrap_or_default();
            let page = groups.get("page").cloned().unwrap_or_default();

            let mut source = source;
            let forward = scan_forward(all_tokens, token_index, full_text);
            source.full_span = Span::new(span.start, forward.span_end.unwrap_or(span.end));
            apply_forward_metadata(&mut source.metadata, &forward);

            Some(Citation::FullJournal {
                source,
                volume,
                journal,
                page,
            })
        }

        Token::Supra(_) => {
            let back = scan_backward(all_tokens, token_index);
            let forward = scan_forward(all_tokens, token_index, full_text);

            let mut source = source;
            source.full_span = Span::new(
                back.span_start.unwrap_or(span.start),
                forward.span_end.unwrap_or(span.end),
            );
            source.metadata.antecedent_guess = back.antecedent_guess.or(back.defendant);
            apply_forward_metadata(&mut source.metadata, &forward);
            if source.metadata.year.is_none() {
                source.metadata.year = back.pre_cite_year;
            }

            Some(Citation::Supra { source })
        }

        Token::Id(_) => {
            let forward = scan_forward(all_tokens, token_index, full_text);

            let mut source = source;
            source.full_span = Span::new(span.start, forward.span_end.unwrap_or(span.end));
            apply_forward_metadata(&mut source.metadata, &forward);

            if groups.contains_key("section") {
                Some(Citation::IdLaw {
                    source,
                    section: groups.get("section").cloned(),
                    section_marker: groups.get("section_marker").cloned(),
                })
            } else {
                Some(Citation::Id { source })
            }
        }

        _ => None,
    }
}

fn apply_forward_metadata(metadata: &mut Metadata, forward: &case_name::PostCitationScan) {
    metadata.pin_cite = forward.pin_cite.clone();
    if let Some((start, end)) = forward.pin_cite_span {
        metadata.pin_cite_span_start = Some(start);
        metadata.pin_cite_span_end = Some(end);
    }
    metadata.court = forward.court.clone();
    metadata.year = forward.year;
    metadata.year_range = forward.year_range.clone();
    metadata.end_year = forward.end_year;
    metadata.parenthetical = forward.parenthetical.clone();
    metadata.extra = forward.extra.clone();
    metadata.warnings.extend(forward.warnings.iter().cloned());
}

/// Set only when narrowing by year leaves exactly one candidate edition --
/// otherwise the reporter identity stays ambiguous and `edition_guess` must
/// remain unset (see `disambiguate::disambiguate_reporters`).
fn sole_edition_guess(
    exact_editions: &[crate::find::models::Edition],
    year: Option<i32>,
) -> Option<crate::find::models::Edition> {
    let mut narrowed = edition::guess_edition(exact_editions, year).into_iter();
    let first = narrowed.next()?;
    if narrowed.next().is_some() {
        None
    } else {
        Some(first.clone())
    }
}

/// Push a warning when a citation has a known year but none of its
/// candidate editions covers it -- the year survives in `metadata.year`,
/// but `edition_guess` will come back unset.
fn check_missing_edition_for_year(
    metadata: &mut Metadata,
    exact_editions: &[crate::find::models::Edition],
) {
    if edition::no_edition_covers_year(exact_editions, metadata.year) {
        metadata.warnings.push(crate::error::CitationWarning::MissingEditionForYear {
            year: metadata.year.expect("no_edition_covers_year implies a year"),
        });
    }
}

fn string_groups(token: &Token) -> HashMap<String, String> {
    match token {
        Token::Citation(d)
        | Token::Law(d)
        | Token::Journal(d)
        | Token::Id(d)
        | Token::Supra(d)
        | Token::StopWord(d)
        | Token::CaseReference(d)
        | Token::Placeholder(d)
        | Token::Paragraph(d)
        | Token::Section(d) => d
            .groups
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        Token::Word(_) | Token::Space => HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::extractors::EXTRACTORS;
    use crate::tokenizers::Ahocorasick;

    #[test]
    fn finds_full_case_citation() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Roe v. Wade, 410 U. S. 113 (1973)";
        let citations = get_citations(text, GetCitationsOptions::default(), &tokenizer);
        assert_eq!(citations.len(), 1);
        match &citations[0] {
            Citation::FullCase { reporter, .. } => {
                assert_eq!(reporter, "U. S.");
                assert_eq!(citations[0].metadata().year, Some(1973));
                assert_eq!(citations[0].metadata().plaintiff.as_deref(), Some("Roe"));
                assert_eq!(citations[0].metadata().defendant.as_deref(), Some("Wade"));
            }
            other => panic!("expected FullCase, got {other:?}"),
        }
    }
}
