//! Normalizes the groups a law-citation regex captures (`title`/`chapter`,
//! `section`) into the `FullLaw` citation's `chapter_or_title`/`section`
//! fields.
//!
//! `reporters-db`'s law templates name the leading numeric group
//! differently depending on the jurisdiction's citation convention --
//! "title" for federal-style codes (`42 U.S.C. § 1983`), "chapter" for
//! others. Resolved here rather than left for callers, since both spellings
//! mean the same thing structurally: "the subdivision the section lives
//! under."

use std::collections::HashMap;

/// Reporters whose section numbering nests a "part" under the leading
/// digits of a dotted section (`778.113` under C.F.R. title/chapter 29
/// means part 778, section 113). Spec §9: "the data model exposes all
/// three [volume/title/chapter] and the normalization rule lives in the
/// law builder" -- this is that rule's reporter allowlist.
const DOTTED_PART_REPORTERS: &[&str] = &["C.F.R.", "CFR"];

pub fn chapter_or_title(groups: &HashMap<String, String>) -> Option<String> {
    groups
        .get("title")
        .or_else(|| groups.get("chapter"))
        .cloned()
}

pub fn section(groups: &HashMap<String, String>) -> Option<String> {
    groups.get("section").cloned()
}

/// Split a single dot-separated section (`"778.113"`) into `(part,
/// section_only)` for reporters that nest a part number this way.
/// A multi-section form (anything with a comma, or more than one dot)
/// is left verbatim in `section` with `part` empty -- per spec §4.4:
/// "a multi-section form like '778.217(a), 778.22' is stored verbatim
/// in `section` and leaves `part` empty."
pub fn split_part(reporter: &str, raw_section: &str) -> (Option<String>, String) {
    let uses_dotted_parts = DOTTED_PART_REPORTERS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(reporter.trim()));

    if !uses_dotted_parts || raw_section.contains(',') {
        return (None, raw_section.to_string());
    }

    match raw_section.split_once('.') {
        Some((part, rest))
            if !part.is_empty()
                && part.chars().all(|c| c.is_ascii_digit())
                && !rest.contains('.') =>
        {
            (Some(part.to_string()), rest.to_string())
        }
        _ => (None, raw_section.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_title_over_chapter() {
        let mut groups = HashMap::new();
        groups.insert("title".to_string(), "42".to_string());
        groups.insert("chapter".to_string(), "9".to_string());
        assert_eq!(chapter_or_title(&groups), Some("42".to_string()));
    }

    #[test]
    fn falls_back_to_chapter() {
        let mut groups = HashMap::new();
        groups.insert("chapter".to_string(), "9".to_string());
        assert_eq!(chapter_or_title(&groups), Some("9".to_string()));
    }

    #[test]
    fn splits_single_dotted_cfr_section_into_part() {
        let (part, section) = split_part("C.F.R.", "778.113");
        assert_eq!(part.as_deref(), Some("778"));
        assert_eq!(section, "113");
    }

    #[test]
    fn leaves_multi_section_cfr_form_verbatim() {
        let (part, section) = split_part("C.F.R.", "778.217(a), 778.22");
        assert_eq!(part, None);
        assert_eq!(section, "778.217(a), 778.22");
    }

    #[test]
    fn leaves_non_dotted_part_reporters_untouched() {
        let (part, section) = split_part("U.S.C.", "207");
        assert_eq!(part, None);
        assert_eq!(section, "207");
    }
}
