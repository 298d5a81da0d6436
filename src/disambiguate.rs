//! Drops any case citation whose `edition_guess` never settled on exactly
//! one reporter edition. `edition_guess` itself is computed once, when the
//! citation is built (see [`crate::find::edition::guess_edition`]); this
//! pass only acts on whether that slot ended up filled.

use crate::find::models::Citation;

/// Law and journal citations never participate in multi-edition reporter
/// ambiguity, so only `FullCase`/`ShortCase` are candidates for removal.
pub fn disambiguate_reporters(citations: Vec<Citation>) -> Vec<Citation> {
    citations
        .into_iter()
        .filter(|c| !is_unresolved_case(c))
        .collect()
}

fn is_unresolved_case(citation: &Citation) -> bool {
    match citation {
        Citation::FullCase { edition_guess, .. } | Citation::ShortCase { edition_guess, .. } => {
            edition_guess.is_none()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::models::{CitationSource, Edition, Metadata, ReporterHandle, Span};

    fn edition(name: &str) -> Edition {
        Edition {
            reporter: ReporterHandle {
                short_name: name.into(),
                full_name: name.into(),
                cite_type: "state".into(),
                is_scotus: false,
            },
            found_name: name.into(),
            start: None,
            end: None,
        }
    }

    fn case_with(editions: Vec<Edition>, year: Option<i32>) -> Citation {
        let mut metadata = Metadata::default();
        metadata.year = year;
        let mut narrowed = crate::find::edition::guess_edition(&editions, year).into_iter();
        let edition_guess = match (narrowed.next(), narrowed.next()) {
            (Some(only), None) => Some(only.clone()),
            _ => None,
        };
        Citation::FullCase {
            source: CitationSource {
                matched_text: "1 Rep. 1".into(),
                token_index: 0,
                span: Span::new(0, 8),
                full_span: Span::new(0, 8),
                groups: Default::default(),
                metadata,
            },
            volume: Some("1".into()),
            reporter: "Rep.".into(),
            page: Some("1".into()),
            edition_guess,
            exact_editions: editions,
            variation_editions: vec![],
        }
    }

    #[test]
    fn single_candidate_is_never_ambiguous() {
        let citations = vec![case_with(vec![edition("A")], None)];
        assert_eq!(disambiguate_reporters(citations).len(), 1);
    }

    #[test]
    fn multiple_undated_candidates_stay_ambiguous_and_are_dropped() {
        let citations = vec![case_with(vec![edition("A"), edition("B")], None)];
        assert_eq!(disambiguate_reporters(citations).len(), 0);
    }
}
