use thiserror::Error;

/// Errors produced while building the extractor registry or compiling its
/// regex catalog. Never returned by the input-driven entry points
/// (`get_citations`, `annotate`, `resolve_citations`, `filter_citations`,
/// `disambiguate_reporters`, `clean_text`) -- those degrade to warnings
/// instead, per the error taxonomy in the design notes.
#[derive(Error, Debug)]
pub enum CitationError {
    #[error("Error building tokenizer: {source}")]
    AhocorasickError {
        #[from]
        source: daachorse::errors::DaachorseError,
    },

    #[error("Error building regex: {source}")]
    RegexError {
        #[from]
        source: regex::Error,
    },

    #[error("Malformed pattern template `{pattern}`: {reason}")]
    MalformedTemplate { pattern: String, reason: String },

    #[error("Data table `{table}` has an unexpected shape: {reason}")]
    MalformedDataTable { table: String, reason: String },

    #[error("Duplicate named group `{group}` could not be resolved in pattern `{pattern}`")]
    UnresolvableDuplicateGroup { group: String, pattern: String },
}

/// A recoverable issue attached to a single [`crate::find::models::Citation`]
/// rather than propagated. See [`crate::find::models::Metadata::warnings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationWarning {
    InvalidYearRange { text: String },
    SuspiciousYear { year: i32 },
    MissingEditionForYear { year: i32 },
}

impl std::fmt::Display for CitationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CitationWarning::InvalidYearRange { text } => {
                write!(f, "invalid year range `{text}`")
            }
            CitationWarning::SuspiciousYear { year } => {
                write!(f, "suspicious year {year}")
            }
            CitationWarning::MissingEditionForYear { year } => {
                write!(f, "no edition covers year {year}")
            }
        }
    }
}
