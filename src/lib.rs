//! Extracts, classifies, resolves, and annotates legal citations in free
//! text: tokenize a document, build a typed `Citation` for each match,
//! resolve case-name/pin-cite/court/year metadata around it, filter out
//! overlaps and duplicates, link short/supra/id forms back to the full
//! citation they refer to, and splice annotations back into the source.

extern crate core;

pub mod annotate;
pub mod clean;
pub mod disambiguate;
pub mod error;
pub mod filter;
pub mod find;
pub mod reference;
pub mod regexes;
pub mod resolve;
pub mod span_updater;
pub mod stop_words;
pub mod templates;
pub mod tokenizers;

pub use annotate::{annotate_document, default_wrap};
pub use clean::clean_text;
pub use disambiguate::disambiguate_reporters;
pub use error::{CitationError, CitationWarning};
pub use filter::filter_citations;
pub use find::models::{Citation, Metadata, Resource, Span};
pub use find::{get_citations, GetCitationsOptions};
pub use reference::extract_reference_citations;
pub use resolve::resolve_citations;
pub use tokenizers::{Ahocorasick, Tokenizer};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::extractors::EXTRACTORS;

    #[test]
    fn end_to_end_finds_and_resolves_a_short_form() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Roe v. Wade, 410 U. S. 113, 115 (1973). Later, Roe, 410 U. S. at 120.";
        let citations = get_citations(text, GetCitationsOptions::default(), &tokenizer);
        assert!(citations.iter().any(|c| matches!(c, Citation::FullCase { .. })));
    }
}
