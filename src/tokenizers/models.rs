use crate::tokenizers::extractors::TokenExtractorExtra;
use std::collections::HashMap;
use std::fmt::Debug;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TokenData<'a> {
    pub data: &'a str,
    pub start: usize,
    pub end: usize,
    pub extra: &'a TokenExtractorExtra,
    pub groups: HashMap<&'a str, &'a str>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token<'a> {
    /// A word
    Word(&'a str),
    /// A Space
    Space,
    /// String matching a citation regex from the reporters data table.
    Citation(TokenData<'a>),
    /// Word containing a section symbol.
    Section(TokenData<'a>),
    /// Word matching "supra" with or without punctuation.
    Supra(TokenData<'a>),
    /// Word matching "id" or "ibid".
    Id(TokenData<'a>),
    /// Word matching a break between paragraphs.
    Paragraph(TokenData<'a>),
    /// Word matching one of the stop words (`v`, `re`, `parte`, ...).
    StopWord(TokenData<'a>),
    /// String matching a law citation regex from the laws data table.
    Law(TokenData<'a>),
    /// String matching a journal citation regex from the journals data table.
    Journal(TokenData<'a>),
    /// A bare case-name reference immediately preceding a citation, folded
    /// into it by the Filter unless left standalone.
    CaseReference(TokenData<'a>),
    /// A caller-registered custom token with no built-in semantics.
    Placeholder(TokenData<'a>),
}

impl Token<'_> {
    fn data(&self) -> &TokenData {
        match self {
            Token::Citation(data)
            | Token::StopWord(data)
            | Token::Supra(data)
            | Token::Id(data)
            | Token::Paragraph(data)
            | Token::Law(data)
            | Token::Journal(data)
            | Token::CaseReference(data)
            | Token::Placeholder(data)
            | Token::Section(data) => data,
            Token::Word(_) | Token::Space => {
                unreachable!("Word/Space tokens carry no TokenData and are never merged or re-sorted")
            }
        }
    }

    pub fn start(&self) -> usize {
        self.data().start
    }

    pub fn end(&self) -> usize {
        self.data().end
    }

    /// Whether this token represents text that can seed a `Citation`, as
    /// opposed to structural tokens like `Space`/`StopWord`/`Section`.
    pub fn is_citation_bearing(&self) -> bool {
        matches!(
            self,
            Token::Citation(_) | Token::Law(_) | Token::Journal(_) | Token::Id(_) | Token::Supra(_)
        )
    }

    /// Merge two tokens occupying the same `(start, end)` span when they
    /// were matched by two different extractors, unioning edition lists when
    /// both are citation tokens of the same short/long polarity.
    pub(crate) fn merge(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Token::Citation(a), Token::Citation(b))
                if a.start == b.start && a.end == b.end && a.groups == b.groups =>
            {
                if a.extra.short != b.extra.short {
                    return None;
                }
                let mut exact: Vec<_> = a.extra.exact_editions.clone();
                for e in &b.extra.exact_editions {
                    if !exact.contains(e) {
                        exact.push(e.clone());
                    }
                }
                let mut variation: Vec<_> = a.extra.variation_editions.clone();
                for e in &b.extra.variation_editions {
                    if !variation.contains(e) {
                        variation.push(e.clone());
                    }
                }
                // Leak a merged extra so it lives as long as the input text,
                // matching every other extractor extra's lifetime (those
                // are leaked once at registry construction time in
                // `tokenizers::extractors`).
                let merged_extra: &'static TokenExtractorExtra =
                    Box::leak(Box::new(TokenExtractorExtra {
                        exact_editions: exact,
                        variation_editions: variation,
                        short: a.extra.short,
                        canonical_name: a.extra.canonical_name.clone().or_else(|| b.extra.canonical_name.clone()),
                        nominative: a.extra.nominative || b.extra.nominative,
                    }));
                Some(Token::Citation(TokenData {
                    extra: merged_extra,
                    ..a.clone()
                }))
            }
            (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => {
                let (da, db) = (a.data(), b.data());
                if da.start == db.start && da.end == db.end && da.groups == db.groups {
                    Some(a.clone())
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

pub trait TokenFactory: Clone + Debug {
    fn create<'a, 'b>(&'a self, data: TokenData<'b>) -> Token<'b>
    where
        'b: 'a;
}

#[derive(Debug, Clone)]
pub enum TokenFactories {
    Paragraph,
    Id,
    Supra,
    Citation,
    StopWord,
    Section,
    Law,
    Journal,
    CaseReference,
    Placeholder,
}

impl TokenFactory for TokenFactories {
    fn create<'a, 'b>(&'a self, data: TokenData<'b>) -> Token<'b>
    where
        'b: 'a,
    {
        match self {
            TokenFactories::Paragraph => Token::Paragraph(data),
            TokenFactories::Id => Token::Id(data),
            TokenFactories::Supra => Token::Supra(data),
            TokenFactories::Citation => Token::Citation(data),
            TokenFactories::Section => Token::Section(data),
            TokenFactories::StopWord => Token::StopWord(data),
            TokenFactories::Law => Token::Law(data),
            TokenFactories::Journal => Token::Journal(data),
            TokenFactories::CaseReference => Token::CaseReference(data),
            TokenFactories::Placeholder => Token::Placeholder(data),
        }
    }
}

pub type Tokens<'a> = Vec<Token<'a>>;
