//! HTML-assisted case-name scan: when the document carries markup, a full
//! case citation's plaintiff/defendant is often carried entirely inside an
//! `<em>`/`<i>`/`<b>` emphasis tag rather than in the plain surrounding
//! prose, so the plain-text backward scan in `find::case_name` never sees
//! it as ordinary words. This module locates those tags and, when one sits
//! close enough to a citation to plausibly be its case name, builds the
//! same [`CaseNameScan`] the plain-text scan would, preferring it over
//! that scan.

use crate::find::case_name::CaseNameScan;
use crate::stop_words;

/// Tags recognized as carrying case names in legal markup.
const EMPHASIS_TAGS: [&str; 3] = ["em", "i", "b"];

/// How many emphasis tags back-to-back (separated only by whitespace or a
/// bare "v."/"vs.") may be merged into a single case name.
const MAX_MERGE_TAGS: usize = 3;

/// How close (in plain-text characters) a tag must end before a citation
/// starts to be considered its case name.
const MAX_LOOKBACK: usize = 50;

/// An emphasis tag found in a document's markup, with its inner text and
/// position already translated into the markup-stripped plain text.
#[derive(Debug, Clone)]
pub struct EmphasisTag {
    pub text: String,
    pub plain_start: usize,
    pub plain_end: usize,
}

/// Strip tags out of `markup`, returning the plain-text projection
/// alongside every `<em>`/`<i>`/`<b>` tag found, with offsets already
/// translated into that plain text. Other tags are stripped with no
/// tracking -- only emphasis tags carry case-name information.
pub fn extract_emphasis_tags(markup: &str) -> (String, Vec<EmphasisTag>) {
    let mut plain = String::with_capacity(markup.len());
    let mut tags = Vec::new();
    let mut open_stack: Vec<(String, usize)> = Vec::new();

    let mut chars = markup.char_indices();
    while let Some((_, c)) = chars.next() {
        if c != '<' {
            plain.push(c);
            continue;
        }

        let mut tag_body = String::new();
        let mut closed = false;
        for (_, tc) in chars.by_ref() {
            if tc == '>' {
                closed = true;
                break;
            }
            tag_body.push(tc);
        }
        if !closed {
            break;
        }

        let is_closing = tag_body.starts_with('/');
        let name = tag_body
            .trim_start_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        if !EMPHASIS_TAGS.contains(&name.as_str()) {
            continue;
        }

        if is_closing {
            if let Some(pos) = open_stack.iter().rposition(|(n, _)| *n == name) {
                let (_, plain_open) = open_stack.remove(pos);
                tags.push(EmphasisTag {
                    text: plain[plain_open..plain.len()].to_string(),
                    plain_start: plain_open,
                    plain_end: plain.len(),
                });
            }
        } else {
            open_stack.push((name, plain.len()));
        }
    }

    tags.sort_by_key(|t| t.plain_start);
    (plain, tags)
}

/// Attempt the HTML-assisted case-name scan for a citation starting at
/// `citation_start` in `plain_text`. Returns `None` when no qualifying
/// emphasis tag configuration is found, so the caller falls back to the
/// plain-text scan.
pub fn scan_html_case_name(
    tags: &[EmphasisTag],
    plain_text: &str,
    citation_start: usize,
) -> Option<CaseNameScan> {
    let candidates: Vec<&EmphasisTag> = tags
        .iter()
        .filter(|t| t.plain_end <= citation_start && citation_start - t.plain_end <= MAX_LOOKBACK)
        .collect();

    let last = *candidates.last()?;

    if let Some((plaintiff, defendant)) = split_versus(&last.text) {
        return Some(finished(plaintiff, Some(defendant), last.plain_start));
    }

    if let Some(scan) = corporate_suffix_glue(plain_text, last) {
        return Some(scan);
    }

    merge_consecutive(plain_text, &candidates)
}

fn finished(plaintiff: String, defendant: Option<String>, span_start: usize) -> CaseNameScan {
    CaseNameScan {
        plaintiff: stop_words::strip(&plaintiff).pipe(non_empty),
        defendant: defendant.map(|d| stop_words::strip(&d)).and_then(non_empty),
        antecedent_guess: None,
        span_start: Some(span_start),
        pre_cite_year: None,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Tiny local pipe helper so `finished` reads top-to-bottom without an
/// extra `let`.
trait Pipe: Sized {
    fn pipe<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }
}
impl Pipe for String {}

fn split_versus(text: &str) -> Option<(String, String)> {
    for sep in [" v. ", " vs. ", " v ", " vs "] {
        if let Some((p, d)) = text.split_once(sep) {
            return Some((p.trim().to_string(), d.trim().to_string()));
        }
    }
    None
}

/// A single tag's text immediately followed in the plain text by a
/// corporate suffix, then "v.", then a defendant name: glue the suffix
/// onto the plaintiff rather than leaving it stranded in the surrounding
/// prose (e.g. `<i>Acme</i>, Inc. v. Widget Co.`).
fn corporate_suffix_glue(plain_text: &str, tag: &EmphasisTag) -> Option<CaseNameScan> {
    let after = plain_text.get(tag.plain_end..)?;
    let lead_len = after.len()
        - after
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',')
            .len();
    let trimmed = &after[lead_len..];

    let (suffix, _) = stop_words::CORPORATE_SUFFIXES
        .iter()
        .find_map(|s| trimmed.strip_prefix(*s).map(|rest| (*s, rest)))?;
    let suffix_end = lead_len + suffix.len();

    let tail = &after[suffix_end..];
    let tail_lead = tail.len()
        - tail
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',')
            .len();
    let tail = &tail[tail_lead..];

    let defendant_start = ["v. ", "vs. ", "v ", "vs "]
        .iter()
        .find_map(|sep| tail.strip_prefix(sep))?;
    let defendant: String = defendant_start
        .split(|c: char| c == ',' || c == '(')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if defendant.is_empty() {
        return None;
    }

    let plaintiff = format!("{}{}", tag.text, &after[..suffix_end]);
    Some(finished(plaintiff, Some(defendant), tag.plain_start))
}

/// Merge up to [`MAX_MERGE_TAGS`] consecutive candidate tags, separated
/// only by whitespace or a bare "v."/"vs.", into a single case name (e.g.
/// `<i>Roe</i> v. <i>Wade</i>`).
fn merge_consecutive(plain_text: &str, candidates: &[&EmphasisTag]) -> Option<CaseNameScan> {
    if candidates.len() < 2 {
        return None;
    }
    let take = candidates.len().min(MAX_MERGE_TAGS);
    let chosen = &candidates[candidates.len() - take..];

    for window in chosen.windows(2) {
        let (a, b) = (window[0], window[1]);
        let between = plain_text.get(a.plain_end..b.plain_start)?;
        let ok = between.trim().is_empty() || matches!(between.trim(), "v." | "vs." | "v" | "vs");
        if !ok {
            return None;
        }
    }

    let merged = plain_text.get(chosen[0].plain_start..chosen[chosen.len() - 1].plain_end)?;
    let (plaintiff, defendant) = split_versus(merged)?;
    Some(finished(plaintiff, Some(defendant), chosen[0].plain_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_single_emphasis_tag() {
        let (plain, tags) = extract_emphasis_tags("See <i>Roe v. Wade</i>, 410 U.S. 113");
        assert_eq!(plain, "See Roe v. Wade, 410 U.S. 113");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].text, "Roe v. Wade");
    }

    #[test]
    fn splits_versus_inside_a_single_tag() {
        let (plain, tags) = extract_emphasis_tags("<i>Roe v. Wade</i>, 410 U.S. 113");
        let citation_start = plain.find("410").unwrap();
        let scan = scan_html_case_name(&tags, &plain, citation_start).unwrap();
        assert_eq!(scan.plaintiff.as_deref(), Some("Roe"));
        assert_eq!(scan.defendant.as_deref(), Some("Wade"));
    }

    #[test]
    fn glues_corporate_suffix_onto_plaintiff() {
        let (plain, tags) = extract_emphasis_tags("<i>Acme</i>, Inc. v. Widget Co., 410 U.S. 113");
        let citation_start = plain.find("410").unwrap();
        let scan = scan_html_case_name(&tags, &plain, citation_start).unwrap();
        assert_eq!(scan.plaintiff.as_deref(), Some("Acme, Inc."));
        assert_eq!(scan.defendant.as_deref(), Some("Widget Co."));
    }

    #[test]
    fn merges_consecutive_tags_around_a_bare_v() {
        let (plain, tags) = extract_emphasis_tags("<i>Roe</i> v. <i>Wade</i>, 410 U.S. 113");
        let citation_start = plain.find("410").unwrap();
        let scan = scan_html_case_name(&tags, &plain, citation_start).unwrap();
        assert_eq!(scan.plaintiff.as_deref(), Some("Roe"));
        assert_eq!(scan.defendant.as_deref(), Some("Wade"));
    }

    #[test]
    fn returns_none_when_no_tag_is_close_enough() {
        let (plain, tags) = extract_emphasis_tags(
            "<i>Roe v. Wade</i> is an old case that was decided a very long time ago \
             and has been cited many times since, including here at 410 U.S. 113",
        );
        let citation_start = plain.find("410").unwrap();
        assert!(scan_html_case_name(&tags, &plain, citation_start).is_none());
    }
}
