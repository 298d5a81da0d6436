//! Backward scan for a case name (plaintiff/defendant or antecedent guess)
//! preceding a citation token, and the matching forward scan for pin cite,
//! court, year, and parenthetical following it.

use crate::error::CitationWarning;
use crate::stop_words;
use crate::tokenizers::models::{Token, Tokens};

/// Width beyond which a `YYYY-YY`/`YYYY-YYYY` parenthetical range is
/// treated as malformed rather than a legitimate multi-year span (e.g. a
/// case decided across several terms).
const MAX_YEAR_RANGE_WIDTH: i32 = 10;

/// Years outside this window are flagged as suspicious rather than
/// rejected outright -- a citation's forward scan has no other way to
/// sanity-check an OCR'd or malformed year.
const EARLIEST_PLAUSIBLE_YEAR: i32 = 1600;
const LATEST_PLAUSIBLE_YEAR: i32 = 2100;

/// How far back a pin-cite-shaped "extra" free-text run is allowed to
/// reach for a trailing parenthetical before the forward scan gives up on
/// finding one nearby.
const FORWARD_SCAN_WINDOW: usize = 300;

/// A `v`/`vs` stop word: the two-party split point. `StopWord` tokens
/// carry only a single word each (see `regexes::STOP_WORDS`), so this
/// never matches the two-word "In re"/"Ex parte" phrases -- those are
/// recognized separately, across the adjacent `Word`+`StopWord` pair, by
/// [`one_party_lead_word`].
fn is_versus(word: &str) -> bool {
    matches!(word.trim_end_matches('.'), "v" | "vs")
}

/// The lowercase word that, immediately before this stop word, turns it
/// into a one-party phrase ("In re", "Ex parte") instead of an ordinary
/// stop word that ends the scan.
fn one_party_lead_word(stop_word: &str) -> Option<&'static str> {
    match stop_word.trim_end_matches('.') {
        "re" => Some("in"),
        "parte" => Some("ex"),
        _ => None,
    }
}

/// Find the nearest preceding `Word` token before index `before`, skipping
/// over any `Space` tokens in between. Returns the word's token index, its
/// text, and how many bytes of space were skipped, or `None` if something
/// other than a word or space comes first.
fn previous_word_before<'a>(tokens: &'a Tokens, before: usize) -> Option<(usize, &'a str, usize)> {
    let mut j = before;
    let mut skipped = 0usize;
    while j > 0 {
        j -= 1;
        match &tokens[j] {
            Token::Space => skipped += 1,
            Token::Word(w) => return Some((j, w, skipped)),
            _ => return None,
        }
    }
    None
}

fn is_terminal_punctuation(word: &str) -> bool {
    word == ";"
        || word.ends_with(';')
        || matches!(word, "\u{201C}" | "\u{201D}" | "\u{2019}")
        || word.ends_with('\u{201D}')
        || word.ends_with('\u{2019}')
}

/// A bare `(YYYY)` token seen during the backward scan, captured as
/// [`CaseNameScan::pre_cite_year`] rather than treated as a stop.
fn parenthesized_year(word: &str) -> Option<i32> {
    let inner = word.strip_prefix('(')?.strip_suffix(')')?;
    if inner.len() == 4 && inner.chars().all(|c| c.is_ascii_digit()) {
        inner.parse().ok()
    } else {
        None
    }
}

fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_lowercase())
}

/// A lowercase connective (`stop_words::CONNECTIVES`) the backward scan is
/// allowed to walk through without stopping, e.g. the "of" in "Matter of
/// Smith" or the "rel." in "State ex rel. Smith".
fn is_connective(word: &str) -> bool {
    let bare = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '.');
    stop_words::CONNECTIVES.iter().any(|c| c.eq_ignore_ascii_case(bare))
}

fn is_capitalized_abbreviation(word: &str) -> bool {
    word.ends_with('.') && word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Result of scanning backward from a citation token for the case name
/// that precedes it.
pub struct CaseNameScan {
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    /// Single-party antecedent guess, used when no `v.`-style stop word was
    /// found (short-form/supra/id citations referring back to one name).
    pub antecedent_guess: Option<String>,
    /// Start offset of the text this scan consumed, i.e. where the
    /// citation's `full_span` should begin.
    pub span_start: Option<usize>,
    /// A year captured from a `(YYYY)` parenthetical seen before the
    /// citation, used as a fallback when the forward scan finds none of
    /// its own.
    pub pre_cite_year: Option<i32>,
}

/// Walk backward from `token_index` over `Word`/`Space`/`StopWord` tokens
/// collecting plaintiff/defendant text around a `v.`/`vs.` stop word (or a
/// one-party `In re`/`Ex parte` phrase), applying, in order:
///
/// - a prior citation token resets whatever's been collected and keeps
///   scanning past it, rather than stopping there;
/// - terminal punctuation (`;`, a curly quote, a closing quote) stops the
///   scan outright;
/// - a bare `(YYYY)` is captured as [`CaseNameScan::pre_cite_year`] and
///   skipped;
/// - any other leading `(` stops the scan once some name text has already
///   been collected;
/// - once a `v`/`vs` has been seen, a lowercase word that isn't a
///   connective, or a capitalized abbreviation once more than one
///   plaintiff word has been collected, stops the scan;
/// - before a `v`/`vs` has been seen, a lowercase word that isn't a
///   connective stops the scan;
/// - a `Paragraph` break is a hard stop.
pub fn scan_backward(tokens: &Tokens, token_index: usize) -> CaseNameScan {
    let mut defendant_words: Vec<&str> = Vec::new();
    let mut plaintiff_words: Vec<&str> = Vec::new();
    let mut saw_v = false;
    let mut one_party = false;
    let mut pre_cite_year = None;
    let mut span_start = None;
    // `Word`/`Space` tokens carry no offsets of their own (see
    // `tokenizers::models`), so the consumed span's start is tracked by
    // walking the cursor back by each token's byte length rather than by
    // indexing into token data that only citation-bearing tokens have.
    let mut cursor = tokens[token_index].start();
    let mut i = token_index;

    while i > 0 {
        i -= 1;
        match &tokens[i] {
            Token::Space => cursor -= 1,

            Token::Word(w) if is_terminal_punctuation(w) => {
                cursor -= w.len();
                break;
            }

            Token::Word(w) if parenthesized_year(w).is_some() => {
                cursor -= w.len();
                pre_cite_year = parenthesized_year(w);
            }

            Token::Word(w)
                if w.starts_with('(') && (!defendant_words.is_empty() || !plaintiff_words.is_empty()) =>
            {
                cursor -= w.len();
                break;
            }

            Token::Word(w) if saw_v && starts_lowercase(w) && !is_connective(w) => {
                cursor -= w.len();
                break;
            }

            Token::Word(w) if saw_v && is_capitalized_abbreviation(w) && plaintiff_words.len() > 1 => {
                cursor -= w.len();
                break;
            }

            Token::Word(w) if !saw_v && starts_lowercase(w) && !is_connective(w) => {
                cursor -= w.len();
                break;
            }

            Token::Word(w) => {
                cursor -= w.len();
                span_start = Some(cursor);
                if saw_v {
                    plaintiff_words.push(w);
                } else {
                    defendant_words.push(w);
                }
            }

            Token::StopWord(d) if is_versus(d.data) => {
                cursor = d.start;
                span_start = Some(cursor);
                saw_v = true;
            }

            Token::StopWord(d) => {
                if let Some(lead) = one_party_lead_word(d.data) {
                    if let Some((word_idx, prev, spaces)) = previous_word_before(tokens, i) {
                        if prev.eq_ignore_ascii_case(lead) {
                            defendant_words.push(d.data);
                            defendant_words.push(prev);
                            one_party = true;
                            cursor = d.start - spaces - prev.len();
                            span_start = Some(cursor);
                            i = word_idx;
                            continue;
                        }
                    }
                }
                cursor = d.start;
                break;
            }

            Token::Citation(_) | Token::Law(_) | Token::Journal(_) => {
                // A prior citation acts as a separator, not a hard stop:
                // whatever's been collected so far belonged to it, not to
                // the citation being scanned, so discard it and keep
                // walking backward past it.
                defendant_words.clear();
                plaintiff_words.clear();
                saw_v = false;
                one_party = false;
                span_start = Some(tokens[i].end());
            }

            Token::Paragraph(_) => break,

            _ => break,
        }

        if plaintiff_words.len() > 8 || defendant_words.len() > 8 {
            break;
        }
    }

    defendant_words.reverse();
    plaintiff_words.reverse();

    if one_party {
        let phrase = non_empty(stop_words::strip(&defendant_words.join(" ")));
        return CaseNameScan {
            plaintiff: phrase,
            defendant: None,
            antecedent_guess: None,
            span_start,
            pre_cite_year,
        };
    }

    let defendant = non_empty(stop_words::strip(&defendant_words.join(" ")));
    let plaintiff = if saw_v {
        non_empty(stop_words::strip(&plaintiff_words.join(" ")))
    } else {
        None
    };

    let antecedent_guess = if saw_v { None } else { defendant.clone() };
    let defendant = if saw_v { defendant } else { None };

    let (defendant, span_start) = match &defendant {
        Some(d) if stop_words::is_bare_corporate_suffix(d) => (None, None),
        _ => (defendant, span_start),
    };

    CaseNameScan {
        plaintiff,
        defendant,
        antecedent_guess,
        span_start,
        pre_cite_year,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Forward scan result: pin cite, free "extra" text, court, year, and
/// parenthetical captured after a citation token's match, plus how far the
/// full span should extend.
#[derive(Debug, Default, Clone)]
pub struct PostCitationScan {
    pub pin_cite: Option<String>,
    pub pin_cite_span: Option<(usize, usize)>,
    /// Free text between the pin cite and the trailing parenthetical, e.g.
    /// the "rev'd on other grounds" in "410 U.S. 113, 115, rev'd on other
    /// grounds (5th Cir. 2000)".
    pub extra: Option<String>,
    pub court: Option<String>,
    pub year: Option<i32>,
    pub year_range: Option<String>,
    pub end_year: Option<i32>,
    pub parenthetical: Option<String>,
    pub span_end: Option<usize>,
    pub warnings: Vec<CitationWarning>,
}

/// Scan the raw text following a citation's match for its trailing pin
/// cite (`, at 123` or the bare `at 123` id/supra citations use), any free
/// text before a trailing parenthetical, and that parenthetical
/// (`(D. Mass. 1990)` or `(discussing ...)`). Works directly against
/// `full_text` rather than the token stream, since the pin-cite and
/// parenthetical grammar don't line up with word/space token boundaries in
/// any useful way.
pub fn scan_forward(tokens: &Tokens, token_index: usize, full_text: &str) -> PostCitationScan {
    let mut scan = PostCitationScan::default();
    let mut cursor = tokens[token_index].end();

    if let Some(caps) = crate::regexes::PIN_CITE_RE.captures(&full_text[cursor..]) {
        let whole = caps.get(0).unwrap();
        if whole.start() == 0 {
            let pin = caps.name("pin_cite").unwrap();
            scan.pin_cite = Some(
                pin.as_str()
                    .trim_end_matches(|c| c == '.' || c == ',')
                    .to_string(),
            );
            scan.pin_cite_span = Some((cursor + pin.start(), cursor + pin.end()));
            cursor += whole.end();
        }
    }

    let window_end = (cursor + FORWARD_SCAN_WINDOW).min(full_text.len());
    let mut window_end = window_end;
    while !full_text.is_char_boundary(window_end) {
        window_end -= 1;
    }
    let window = &full_text[cursor..window_end];

    let Some(paren_rel) = window.find('(') else {
        scan.span_end = Some(cursor);
        return scan;
    };

    let candidate = window[..paren_rel].trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';');
    if !candidate.is_empty() {
        scan.extra = Some(candidate.to_string());
    }
    cursor += paren_rel;

    let trimmed = &full_text[cursor..];
    if let Some(close_rel) = trimmed.find(')') {
        let inner = &trimmed[1..close_rel];
        cursor += close_rel + 1;

        if let Some(caps) = crate::regexes::YEAR_RE.captures(inner) {
            let start_year: Option<i32> = caps.name("year").and_then(|m| m.as_str().parse().ok());
            scan.year = start_year;
            if let (Some(start_year), Some(range_end)) = (start_year, caps.name("year_range_end")) {
                apply_year_range(&mut scan, start_year, range_end.as_str());
            }
            if let Some(year) = scan.year {
                if !(EARLIEST_PLAUSIBLE_YEAR..=LATEST_PLAUSIBLE_YEAR).contains(&year) {
                    scan.warnings.push(CitationWarning::SuspiciousYear { year });
                }
            }
            let before_year = inner[..caps.get(0).unwrap().start()]
                .trim()
                .trim_end_matches(',');
            if !before_year.is_empty() {
                scan.court = Some(crate::find::court::normalize_court(before_year));
            }
        } else if !inner.is_empty() {
            scan.parenthetical = Some(inner.to_string());
        }
    }

    scan.span_end = Some(cursor);
    scan
}

/// Normalize a `YYYY-YY`/`YYYY-YYYY` range suffix against its start year:
/// a two-digit end is read as a same-century year (`1973-74` -> 1974); a
/// four-digit end is taken literally. Widths over
/// [`MAX_YEAR_RANGE_WIDTH`] or an end year before the start are rejected
/// with a warning rather than guessed at.
fn apply_year_range(scan: &mut PostCitationScan, start_year: i32, raw_end: &str) {
    let end_year = match raw_end.len() {
        2 => raw_end
            .parse::<i32>()
            .ok()
            .map(|suffix| (start_year / 100) * 100 + suffix),
        4 => raw_end.parse::<i32>().ok(),
        _ => None,
    };

    let literal = format!("{start_year}-{raw_end}");
    match end_year {
        Some(end_year) if end_year >= start_year && end_year - start_year <= MAX_YEAR_RANGE_WIDTH => {
            scan.year_range = Some(literal);
            scan.end_year = Some(end_year);
        }
        _ => scan.warnings.push(CitationWarning::InvalidYearRange { text: literal }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizers::extractors::EXTRACTORS;
    use crate::tokenizers::{Ahocorasick, Tokenizer};

    fn citation_index(all_tokens: &Tokens) -> usize {
        all_tokens
            .iter()
            .position(|t| matches!(t, Token::Citation(_)))
            .unwrap()
    }

    #[test]
    fn scans_plaintiff_and_defendant() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "See Roe v. Wade, 410 U. S. 113 (1973)";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.defendant.as_deref(), Some("Wade"));
        assert_eq!(scan.plaintiff.as_deref(), Some("Roe"));
    }

    #[test]
    fn recognizes_in_re_one_party_phrase() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "In re Smith, 1 U. S. 1";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.plaintiff.as_deref(), Some("In re Smith"));
        assert_eq!(scan.defendant, None);
    }

    #[test]
    fn recognizes_ex_parte_one_party_phrase() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Ex parte Young, 1 U. S. 1";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.plaintiff.as_deref(), Some("Ex parte Young"));
        assert_eq!(scan.defendant, None);
    }

    #[test]
    fn walks_through_a_connective_without_stopping() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "the Estate of Smith v. Jones, 1 U. S. 1";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.plaintiff.as_deref(), Some("Estate of Smith"));
        assert_eq!(scan.defendant.as_deref(), Some("Jones"));
    }

    #[test]
    fn captures_a_pre_cite_year() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Roe v. Wade (1973) 410 U. S. 113";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.pre_cite_year, Some(1973));
        assert_eq!(scan.defendant.as_deref(), Some("Wade"));
    }

    #[test]
    fn stops_at_terminal_punctuation() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "the old rule; Roe v. Wade, 410 U. S. 113";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_backward(&all_tokens, citation_index(&all_tokens));
        assert_eq!(scan.defendant.as_deref(), Some("Wade"));
        assert_eq!(scan.plaintiff.as_deref(), Some("Roe"));
    }

    #[test]
    fn scans_year_parenthetical_forward() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "See Roe v. Wade, 410 U. S. 113 (1973)";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_forward(&all_tokens, citation_index(&all_tokens), text);
        assert_eq!(scan.year, Some(1973));
        assert_eq!(scan.extra, None);
    }

    #[test]
    fn captures_free_extra_text_before_a_parenthetical() {
        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Roe v. Wade, 410 U. S. 113 rev'd on other grounds (5th Cir. 2000)";
        let (all_tokens, _) = tokenizer.tokenize(text);
        let scan = scan_forward(&all_tokens, citation_index(&all_tokens), text);
        assert_eq!(scan.extra.as_deref(), Some("rev'd on other grounds"));
        assert!(scan.court.is_some());
        assert_eq!(scan.year, Some(2000));
    }

    #[test]
    fn two_digit_year_range_resolves_same_century() {
        let mut scan = PostCitationScan::default();
        apply_year_range(&mut scan, 1973, "74");
        assert_eq!(scan.end_year, Some(1974));
        assert_eq!(scan.year_range.as_deref(), Some("1973-74"));
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn oversized_year_range_is_rejected_with_warning() {
        let mut scan = PostCitationScan::default();
        apply_year_range(&mut scan, 1950, "1975");
        assert!(scan.end_year.is_none());
        assert_eq!(
            scan.warnings,
            vec![CitationWarning::InvalidYearRange {
                text: "1950-1975".into()
            }]
        );
    }
}
