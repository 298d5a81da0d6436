//! Normalizes a court abbreviation scraped out of a citation's trailing
//! parenthetical against the courts data table.

/// Look up `raw` (already stop-word-stripped) against the courts table's
/// known abbreviations, case-insensitively, returning the canonical id
/// when found and the trimmed raw text otherwise.
pub fn normalize_court(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('.');
    for court in reporters_db::courts::courts() {
        if court
            .citation_string
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(trimmed))
        {
            return court.id.clone();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_trimmed_raw_for_unknown_court() {
        assert_eq!(normalize_court("Some Made Up Ct."), "Some Made Up Ct");
    }
}
