use crate::error::CitationWarning;
use crate::tokenizers::models::Token;

pub use crate::tokenizers::extractors::{EditionInfo as Edition, ReporterHandle};

/// Every field a citation's surrounding context can populate. Which ones
/// end up filled in depends on the citation variant and on what the
/// backward/forward metadata scans find.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub subject: Option<String>,
    pub court: Option<String>,
    pub year: Option<i32>,
    pub month: Option<String>,
    pub day: Option<u32>,
    pub pin_cite: Option<String>,
    pub pin_cite_span_start: Option<usize>,
    pub pin_cite_span_end: Option<usize>,
    pub parenthetical: Option<String>,
    pub extra: Option<String>,
    pub publisher: Option<String>,
    pub antecedent_guess: Option<String>,
    pub resolved_case_name: Option<String>,
    pub resolved_case_name_short: Option<String>,
    pub volume: Option<String>,
    pub journal: Option<String>,
    pub reporter: Option<String>,
    pub chapter: Option<String>,
    pub section: Option<String>,
    pub title: Option<String>,
    pub page: Option<String>,
    pub year_range: Option<String>,
    pub end_year: Option<i32>,
    pub warnings: Vec<CitationWarning>,
}

/// A narrow span `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Fraction of the shorter of `self`/`other` that the two spans share,
    /// the Filter's "significant overlap" test.
    pub fn overlap_fraction(&self, other: &Span) -> f64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end <= start {
            return 0.0;
        }
        let overlap = (end - start) as f64;
        let shorter = (self.end - self.start).min(other.end - other.start) as f64;
        if shorter == 0.0 {
            0.0
        } else {
            overlap / shorter
        }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The shared envelope every citation variant carries, independent of
/// which fields its variant-specific data fills in.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationSource {
    /// The literal matched text (`span.text(doc_text)`), captured once so
    /// downstream passes don't need to keep the document text around.
    pub matched_text: String,
    /// Index into the tokenizer's full token list, so the backward/forward
    /// scanners can walk neighboring tokens.
    pub token_index: usize,
    pub span: Span,
    pub full_span: Span,
    pub groups: std::collections::HashMap<String, String>,
    pub metadata: Metadata,
}

impl CitationSource {
    pub fn new(token: &Token, token_index: usize, span: Span) -> Self {
        Self {
            matched_text: token_data_text(token).to_string(),
            token_index,
            span,
            full_span: span,
            groups: token_groups(token),
            metadata: Metadata::default(),
        }
    }
}

fn token_data_text<'a>(token: &'a Token<'a>) -> &'a str {
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
        | Token::Section(d) => d.data,
        Token::Word(w) => w,
        Token::Space => " ",
    }
}

fn token_groups(token: &Token) -> std::collections::HashMap<String, String> {
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
        Token::Word(_) | Token::Space => Default::default(),
    }
}

/// The citation sum type. Every variant carries a `CitationSource` with the
/// shared envelope fields; variant-specific data (volume/reporter/page,
/// editions, section, ...) lives alongside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Citation {
    FullCase {
        source: CitationSource,
        volume: Option<String>,
        reporter: String,
        page: Option<String>,
        edition_guess: Option<Edition>,
        exact_editions: Vec<Edition>,
        variation_editions: Vec<Edition>,
    },
    ShortCase {
        source: CitationSource,
        volume: Option<String>,
        reporter: String,
        page: Option<String>,
        edition_guess: Option<Edition>,
        exact_editions: Vec<Edition>,
        variation_editions: Vec<Edition>,
    },
    FullLaw {
        source: CitationSource,
        reporter: String,
        chapter_or_title: Option<String>,
        part: Option<String>,
        section: Option<String>,
    },
    FullJournal {
        source: CitationSource,
        volume: String,
        journal: String,
        page: String,
    },
    Supra {
        source: CitationSource,
    },
    Id {
        source: CitationSource,
    },
    IdLaw {
        source: CitationSource,
        section: Option<String>,
        section_marker: Option<String>,
    },
    Reference {
        source: CitationSource,
    },
    Unknown {
        source: CitationSource,
    },
}

const PRIORITY_FULL: u8 = 5;
const PRIORITY_SHORT: u8 = 4;
const PRIORITY_SUPRA_ID: u8 = 3;
const PRIORITY_REFERENCE: u8 = 2;
const PRIORITY_UNKNOWN: u8 = 1;

impl Citation {
    pub fn source(&self) -> &CitationSource {
        match self {
            Citation::FullCase { source, .. }
            | Citation::ShortCase { source, .. }
            | Citation::FullLaw { source, .. }
            | Citation::FullJournal { source, .. }
            | Citation::Supra { source }
            | Citation::Id { source }
            | Citation::IdLaw { source, .. }
            | Citation::Reference { source }
            | Citation::Unknown { source } => source,
        }
    }

    pub fn source_mut(&mut self) -> &mut CitationSource {
        match self {
            Citation::FullCase { source, .. }
            | Citation::ShortCase { source, .. }
            | Citation::FullLaw { source, .. }
            | Citation::FullJournal { source, .. }
            | Citation::Supra { source }
            | Citation::Id { source }
            | Citation::IdLaw { source, .. }
            | Citation::Reference { source }
            | Citation::Unknown { source } => source,
        }
    }

    pub fn span(&self) -> Span {
        self.source().span
    }

    pub fn full_span(&self) -> Span {
        self.source().full_span
    }

    pub fn metadata(&self) -> &Metadata {
        &self.source().metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.source_mut().metadata
    }

    /// Full citations outrank short forms, which outrank supra/id, which
    /// outrank bare references, for the Filter's overlap tie-break.
    pub fn priority(&self) -> u8 {
        match self {
            Citation::FullCase { .. } | Citation::FullLaw { .. } | Citation::FullJournal { .. } => {
                PRIORITY_FULL
            }
            Citation::ShortCase { .. } => PRIORITY_SHORT,
            Citation::Supra { .. } | Citation::Id { .. } | Citation::IdLaw { .. } => {
                PRIORITY_SUPRA_ID
            }
            Citation::Reference { .. } => PRIORITY_REFERENCE,
            Citation::Unknown { .. } => PRIORITY_UNKNOWN,
        }
    }

    /// Number of populated metadata fields, the Filter's tie-break when two
    /// overlapping citations share a priority.
    pub fn metadata_richness(&self) -> usize {
        let m = self.metadata();
        [
            m.plaintiff.is_some(),
            m.defendant.is_some(),
            m.subject.is_some(),
            m.court.is_some(),
            m.year.is_some(),
            m.month.is_some(),
            m.day.is_some(),
            m.pin_cite.is_some(),
            m.parenthetical.is_some(),
            m.extra.is_some(),
            m.publisher.is_some(),
            m.antecedent_guess.is_some(),
        ]
        .into_iter()
        .filter(|b| *b)
        .count()
    }

    pub fn is_case(&self) -> bool {
        matches!(self, Citation::FullCase { .. } | Citation::ShortCase { .. })
    }

    pub fn is_law(&self) -> bool {
        matches!(self, Citation::FullLaw { .. } | Citation::IdLaw { .. })
    }

    /// `reporter`/`journal` string, when the variant carries one -- used by
    /// parallel-citation and multi-section-law detection in the Filter.
    pub fn reporter_str(&self) -> Option<&str> {
        match self {
            Citation::FullCase { reporter, .. }
            | Citation::ShortCase { reporter, .. }
            | Citation::FullLaw { reporter, .. } => Some(reporter.as_str()),
            Citation::FullJournal { journal, .. } => Some(journal.as_str()),
            _ => None,
        }
    }

    pub fn chapter_str(&self) -> Option<&str> {
        match self {
            Citation::FullLaw {
                chapter_or_title, ..
            } => chapter_or_title.as_deref(),
            _ => None,
        }
    }

    /// A deterministic hash for full-case/law/journal variants, and an
    /// identity hash for `Id`/`Unknown`/pageless citations, which carry no
    /// stable content of their own.
    pub fn stable_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();

        match self {
            Citation::FullCase {
                volume,
                reporter,
                page,
                exact_editions,
                ..
            } => {
                "FullCase".hash(&mut hasher);
                volume.hash(&mut hasher);
                reporter.hash(&mut hasher);
                match page {
                    Some(p) => p.hash(&mut hasher),
                    None => self.source().token_index.hash(&mut hasher),
                }
                let mut names: Vec<_> = exact_editions
                    .iter()
                    .map(|e| e.reporter.short_name.clone())
                    .collect();
                names.sort();
                names.hash(&mut hasher);
            }
            Citation::ShortCase {
                volume,
                reporter,
                page,
                ..
            } => {
                "ShortCase".hash(&mut hasher);
                volume.hash(&mut hasher);
                reporter.hash(&mut hasher);
                match page {
                    Some(p) => p.hash(&mut hasher),
                    None => self.source().token_index.hash(&mut hasher),
                }
            }
            Citation::FullLaw {
                reporter,
                chapter_or_title,
                section,
                ..
            } => {
                "FullLaw".hash(&mut hasher);
                reporter.hash(&mut hasher);
                chapter_or_title.hash(&mut hasher);
                section.hash(&mut hasher);
            }
            Citation::FullJournal {
                volume,
                journal,
                page,
                ..
            } => {
                "FullJournal".hash(&mut hasher);
                volume.hash(&mut hasher);
                journal.hash(&mut hasher);
                page.hash(&mut hasher);
            }
            Citation::Supra { source } | Citation::Reference { source } => {
                "BackRef".hash(&mut hasher);
                source.metadata.plaintiff.hash(&mut hasher);
                source.metadata.defendant.hash(&mut hasher);
                source.metadata.antecedent_guess.hash(&mut hasher);
            }
            Citation::Id { source } | Citation::IdLaw { source, .. } | Citation::Unknown { source } => {
                "Unique".hash(&mut hasher);
                source.token_index.hash(&mut hasher);
                source.span.start.hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

/// An opaque canonical identity for "the case/statute/journal article being
/// cited". Equality is by `(volume, reporter, page)` for cases,
/// `(reporter, chapter_or_title, section)` for laws, and
/// `(volume, journal, page)` for journal articles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Case {
        volume: Option<String>,
        reporter: String,
        page: Option<String>,
    },
    Law {
        reporter: String,
        chapter_or_title: Option<String>,
        section: Option<String>,
    },
    Journal {
        volume: String,
        journal: String,
        page: String,
    },
    /// Bucket for citations the resolver could not place under a concrete
    /// resource. Unresolved non-id citations each get a distinct id here so
    /// they stay reachable through the resource map without colliding.
    Unresolved(usize),
}

impl Resource {
    pub fn for_citation(citation: &Citation, next_unresolved_id: impl FnOnce() -> usize) -> Self {
        match citation {
            Citation::FullCase {
                volume,
                reporter,
                page,
                ..
            }
            | Citation::ShortCase {
                volume,
                reporter,
                page,
                ..
            } => Resource::Case {
                volume: volume.clone(),
                reporter: reporter.clone(),
                page: page.clone(),
            },
            Citation::FullLaw {
                reporter,
                chapter_or_title,
                section,
                ..
            } => Resource::Law {
                reporter: reporter.clone(),
                chapter_or_title: chapter_or_title.clone(),
                section: section.clone(),
            },
            Citation::FullJournal {
                volume,
                journal,
                page,
                ..
            } => Resource::Journal {
                volume: volume.clone(),
                journal: journal.clone(),
                page: page.clone(),
            },
            _ => Resource::Unresolved(next_unresolved_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(start: usize, end: usize) -> CitationSource {
        CitationSource {
            matched_text: "410 U.S. 113".into(),
            token_index: 0,
            span: Span::new(start, end),
            full_span: Span::new(start, end),
            groups: Default::default(),
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn full_case_outranks_short_case() {
        let full = Citation::FullCase {
            source: src(0, 12),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        let short = Citation::ShortCase {
            source: src(0, 12),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        assert!(full.priority() > short.priority());
    }

    #[test]
    fn stable_hash_matches_for_identical_full_cases() {
        let a = Citation::FullCase {
            source: src(0, 12),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        let b = Citation::FullCase {
            source: src(50, 62),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        assert_eq!(a.stable_hash(), b.stable_hash());
    }

    #[test]
    fn overlap_fraction_full_containment_is_one() {
        let outer = Span::new(0, 20);
        let inner = Span::new(5, 10);
        assert_eq!(outer.overlap_fraction(&inner), 1.0);
    }

    #[test]
    fn resource_groups_same_case_citation() {
        let a = Citation::FullCase {
            source: src(0, 12),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        let b = Citation::ShortCase {
            source: src(50, 60),
            volume: Some("410".into()),
            reporter: "U.S.".into(),
            page: Some("113".into()),
            edition_guess: None,
            exact_editions: vec![],
            variation_editions: vec![],
        };
        assert_eq!(
            Resource::for_citation(&a, || 0),
            Resource::for_citation(&b, || 1)
        );
    }
}
