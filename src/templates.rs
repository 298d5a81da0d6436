//! Pattern Templates: turns a data table's symbolic regex template into
//! a pattern the `regex` crate can compile.
//!
//! `reporters-db` already performs the base symbolic-variable substitution
//! (`$volume`, `$reporter`, `$page`, ...) via
//! [`reporters_db::utils::process_variables`] and
//! [`reporters_db::utils::recursive_substitute`], bounded to a handful of
//! passes until a pass makes no change -- that machinery travels with the
//! data tables, since the template grammar is part of the reporters/laws/
//! journals data format itself.
//!
//! What's left for this module is the post-processing layered on top of
//! that substitution: de-duplicating named capture groups that a
//! substitution can introduce more than once, normalizing the two named-group
//! dialects the data tables may use into the one the `regex` crate accepts,
//! and the law-specific tail-pattern append (publisher/year/month/day/
//! parenthetical) with its own group de-duplication pass.

use std::collections::HashMap;
use std::collections::HashSet;

use regex::Regex;
use reporters_db::regexes::{RegexTemplate, ResolvedRegex};

use crate::error::CitationError;
use crate::regexes;

lazy_static::lazy_static! {
    static ref NAMED_GROUP_ANGLE: Regex = Regex::new(r"\(\?<([A-Za-z_][A-Za-z0-9_]*)>").unwrap();
    static ref NAMED_GROUP_PYTHON: Regex = Regex::new(r"\(\?P<([A-Za-z_][A-Za-z0-9_]*)>").unwrap();
    static ref BARE_SECTION_SIGN: Regex = Regex::new(r"§(?:§\??)?").unwrap();
    static ref BRACKET_SECTION_ALT: Regex = Regex::new(r"\[§\|([^\]]*)\]").unwrap();
}

/// Rewrite `(?<name>...)` groups to the `(?P<name>...)` dialect the `regex`
/// crate expects, leaving already-Python-style groups untouched. Both
/// dialects appear across the data tables' hand-authored regex templates;
/// the target engine only accepts one, so every pattern handed to
/// [`regex::Regex`] must be normalized uniformly.
pub fn normalize_group_dialect(pattern: &str) -> String {
    NAMED_GROUP_ANGLE
        .replace_all(pattern, "(?P<$1>")
        .into_owned()
}

/// Rewrite every occurrence of a named group after its first into a
/// non-capturing group, per variable. A pattern like `$volume $volume`
/// would otherwise produce two `(?P<volume>...)` groups, which `regex`
/// rejects. Operates dialect-agnostically: call
/// [`normalize_group_dialect`] first if the pattern mixes dialects.
pub fn dedup_named_groups(pattern: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = String::with_capacity(pattern.len());
    let mut last = 0;

    for caps in NAMED_GROUP_PYTHON.captures_iter(pattern) {
        let whole = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str().to_string();

        out.push_str(&pattern[last..whole.start()]);
        if seen.contains(&name) {
            out.push_str("(?:");
        } else {
            out.push_str(whole.as_str());
            seen.insert(name);
        }
        last = whole.end();
    }
    out.push_str(&pattern[last..]);
    out
}

/// Expand the `[§|x]` bracket-alternative syntax to `((§§?)|x)`, and a bare
/// `§` that isn't already part of a `§§?` run to the section-marker
/// variable, so that plural "§§" forms match wherever a single "§" would
/// have been written in a hand-authored template.
pub fn expand_section_sign(pattern: &str) -> String {
    let with_brackets = BRACKET_SECTION_ALT
        .replace_all(pattern, |c: &regex::Captures| {
            format!("((§§?)|{})", &c[1])
        })
        .into_owned();

    // Leave existing `§§?` runs alone; only bare, unadorned `§` signs are
    // plural-enabled.
    let mut out = String::with_capacity(with_brackets.len());
    let mut last = 0;
    for m in BARE_SECTION_SIGN.find_iter(&with_brackets) {
        out.push_str(&with_brackets[last..m.start()]);
        if m.as_str() == "§" {
            out.push_str(regexes::SECTION_MARKER_REGEX);
        } else {
            out.push_str(m.as_str());
        }
        last = m.end();
    }
    out.push_str(&with_brackets[last..]);
    out
}

/// Apply the full template post-processing pipeline to an already
/// variable-substituted pattern: normalize the named-group dialect,
/// expand section-sign alternatives, then de-duplicate named groups.
pub fn finish_pattern(resolved: &ResolvedRegex) -> ResolvedRegex {
    let normalized = normalize_group_dialect(resolved.value());
    let with_sections = expand_section_sign(&normalized);
    let deduped = dedup_named_groups(&with_sections);
    ResolvedRegex::of(deduped)
}

/// Append the law-citation tail pattern: an optional comma, publisher,
/// and parenthetical `(month day, year)` or `(year)` block, following the
/// main volume/chapter/section match. Any `year`/`month`/`day` groups the
/// law pattern itself already defines are deduplicated against the tail's
/// own groups, since both may independently capture a trailing date.
pub fn append_law_tail(resolved: &ResolvedRegex) -> ResolvedRegex {
    let tail = format!(
        r#"(?:\s*\((?:(?P<publisher>[A-Za-z.&' ]+)\s+)?(?:{month}\.?\s+{day},?\s+)?{year}\))?"#,
        month = regexes::MONTH_REGEX,
        day = regexes::DAY_REGEX,
        year = regexes::YEAR_REGEX,
    );
    let combined = format!("{}{}", resolved.value(), tail);
    let deduped = dedup_named_groups(&combined);
    ResolvedRegex::of(deduped)
}

/// Recursively substitute `$variable` references up to a bounded number of
/// passes, stopping early when a pass makes no further change. Thin wrapper
/// over [`reporters_db::utils::recursive_substitute`] for call sites in this
/// crate that don't already hold a `reporters-db` variable environment
/// handle (most do, and call the upstream function directly -- see
/// `tokenizers::extractors::_populate_reporter_extractors`).
pub fn substitute_bounded(
    template: RegexTemplate,
    variables: &HashMap<String, RegexTemplate>,
) -> Result<ResolvedRegex, CitationError> {
    const MAX_PASSES: usize = 10;
    let mut current = template;
    for _ in 0..MAX_PASSES {
        let next = reporters_db::utils::recursive_substitute(current.clone(), variables);
        if next == current {
            break;
        }
        current = next;
    }
    current.resolved().ok_or_else(|| CitationError::MalformedTemplate {
        pattern: format!("{current:?}"),
        reason: "template did not fully resolve after bounded substitution".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_angle_dialect() {
        let out = normalize_group_dialect(r"(?<volume>\d+) (?P<reporter>U\.S\.)");
        assert_eq!(out, r"(?P<volume>\d+) (?P<reporter>U\.S\.)");
    }

    #[test]
    fn dedups_repeated_group() {
        let out = dedup_named_groups(r"(?P<year>\d{4})-(?P<year>\d{4})");
        assert_eq!(out, r"(?P<year>\d{4})-(?:\d{4})");
    }

    #[test]
    fn expands_bracket_alternative() {
        let out = expand_section_sign(r"[§|sec\.]\s*\d+");
        assert!(out.starts_with("((§§?)|sec\\.)"));
    }

    #[test]
    fn expands_bare_section_sign() {
        let out = expand_section_sign(r"§\s*(?P<section>\d+)");
        assert!(out.starts_with(regexes::SECTION_MARKER_REGEX));
    }

    #[test]
    fn leaves_existing_plural_alone() {
        let out = expand_section_sign(r"§§?\s*(?P<section>\d+)");
        assert!(out.starts_with("§§?"));
    }
}
