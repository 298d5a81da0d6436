//! Stop-Word Stripper: cleans a raw plaintiff/defendant/
//! antecedent candidate pulled off the backward case-name scan.

/// Connective words the backward scan is allowed to walk through without
/// stopping.
pub const CONNECTIVES: &[&str] = &[
    "of", "the", "an", "and", "ex", "rel.", "in", "re", "on", "to", "at", "by",
];

/// Corporate suffixes that keep a preceding comma instead of having it
/// stripped as leading/trailing punctuation.
pub const CORPORATE_SUFFIXES: &[&str] = &[
    "Inc.", "Inc", "Corp.", "Corp", "LLC", "L.L.C.", "Ltd.", "Ltd", "Co.", "Co", "L.P.", "LP",
    "P.C.", "PLC", "N.A.", "S.A.",
];

const LEADING_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "see", "also", "citing", "quoting", "accord",
];

fn strip_comma_unless_corporate(text: &str) -> &str {
    let trimmed = text.trim_end();
    if let Some(stripped) = trimmed.strip_suffix(',') {
        let last_word = stripped.trim_end().rsplit(' ').next().unwrap_or("");
        if CORPORATE_SUFFIXES.iter().any(|s| *s == last_word) {
            return trimmed;
        }
        return stripped.trim_end();
    }
    trimmed
}

/// Remove leading stop-words, preserve a comma immediately before a
/// corporate suffix, preserve a trailing dot that belongs to an
/// abbreviation (single capital letter, or a known suffix), and collapse
/// internal whitespace runs to single spaces.
pub fn strip(raw: &str) -> String {
    let collapsed: Vec<&str> = raw.split_whitespace().collect();
    let mut words = collapsed.as_slice();

    while let Some((first, rest)) = words.split_first() {
        let bare = first.trim_end_matches(|c: char| c == ',' || c == ';');
        if LEADING_STOP_WORDS
            .iter()
            .any(|w| w.eq_ignore_ascii_case(bare))
        {
            words = rest;
        } else {
            break;
        }
    }

    let joined = words.join(" ");
    strip_comma_unless_corporate(joined.trim()).to_string()
}

/// True when `text`, after stripping, is nothing but a bare corporate
/// suffix. When that happens, the plaintiff is rejected and `full_span`
/// should start at the `v` token instead.
pub fn is_bare_corporate_suffix(text: &str) -> bool {
    let trimmed = text.trim();
    CORPORATE_SUFFIXES.iter().any(|s| *s == trimmed)
}
