//! Picks a single reporter edition out of a citation's candidate list once
//! a year is known, and normalizes court abbreviations.

use crate::tokenizers::extractors::EditionInfo;
use chrono::Datelike;

/// Narrow a candidate edition list down to the ones whose `[start, end)`
/// date range covers `year`, falling back to the full list only when the
/// year itself is unknown. When a year is known but no candidate's range
/// covers it, the (now possibly empty) filtered list is returned as-is --
/// that's a genuine "no edition fits" case, not license to fall back to
/// the unfiltered list, since a caller asking "does the year narrow this
/// down to one?" would otherwise get a false positive.
pub fn guess_edition<'a>(
    candidates: &'a [EditionInfo],
    year: Option<i32>,
) -> Vec<&'a EditionInfo> {
    let Some(year) = year else {
        return candidates.iter().collect();
    };

    candidates
        .iter()
        .filter(|e| edition_covers_year(e, year))
        .collect()
}

fn edition_covers_year(edition: &EditionInfo, year: i32) -> bool {
    let after_start = edition.start.map_or(true, |d| d.year() <= year);
    let before_end = edition.end.map_or(true, |d| d.year() >= year);
    after_start && before_end
}

/// True when `year` is known, there is more than one candidate edition,
/// and none of them covers it -- the `MissingEditionForYear` warning case,
/// distinct from "year unknown" or "exactly one candidate covers it".
pub fn no_edition_covers_year(candidates: &[EditionInfo], year: Option<i32>) -> bool {
    let Some(year) = year else { return false };
    candidates.len() > 1 && !candidates.iter().any(|e| edition_covers_year(e, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::extractors::ReporterHandle;
    use chrono::NaiveDate;

    fn handle(name: &str) -> ReporterHandle {
        ReporterHandle {
            short_name: name.into(),
            full_name: name.into(),
            cite_type: "state".into(),
            is_scotus: false,
        }
    }

    #[test]
    fn narrows_to_edition_covering_year() {
        let old = EditionInfo {
            reporter: handle("Old Rep."),
            found_name: "Old Rep.".into(),
            start: Some(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(1950, 1, 1).unwrap()),
        };
        let new = EditionInfo {
            reporter: handle("New Rep."),
            found_name: "New Rep.".into(),
            start: Some(NaiveDate::from_ymd_opt(1951, 1, 1).unwrap()),
            end: None,
        };
        let candidates = vec![old, new.clone()];
        let guessed = guess_edition(&candidates, Some(1975));
        assert_eq!(guessed, vec![&new]);
    }

    #[test]
    fn falls_back_to_all_when_year_unknown() {
        let only = EditionInfo {
            reporter: handle("Rep."),
            found_name: "Rep.".into(),
            start: None,
            end: None,
        };
        let candidates = vec![only.clone()];
        assert_eq!(guess_edition(&candidates, None), vec![&only]);
    }
}
