use crate::regexes;
use crate::templates;
use crate::tokenizers::models::{Token, TokenData, TokenFactories, TokenFactory};
use lazy_static::lazy_static;
use reporters_db::regexes::{RegexTemplate, ResolvedRegex};
use reporters_db::reporters::{reporters, Edition, EditionName};
use reporters_db::utils::process_variables;
use std::collections::{HashMap, HashSet};

/// The reporter-identity half of an `Edition`: short name, full name,
/// citation type, and a SCOTUS flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReporterHandle {
    pub short_name: String,
    pub full_name: String,
    pub cite_type: String,
    pub is_scotus: bool,
}

fn is_scotus(cite_type: &str, short_name: &str) -> bool {
    cite_type.eq_ignore_ascii_case("federal")
        && matches!(short_name, "U.S." | "U. S." | "S. Ct." | "L. Ed." | "L. Ed. 2d")
}

/// A candidate reporter edition: `(reporter_handle, found_name,
/// optional_start_date, optional_end_date)`. `found_name` is the specific
/// spelling (canonical or variation) that led to this candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionInfo {
    pub reporter: ReporterHandle,
    pub found_name: String,
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
}

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct TokenExtractorExtra {
    pub exact_editions: Vec<EditionInfo>,
    pub variation_editions: Vec<EditionInfo>,
    pub short: bool,
    /// Canonical reporter/journal name to normalize a variation spelling to
    /// Law and journal tokens carry their canonical reporter/journal key
    /// here, separate from the spelling actually matched..
    pub canonical_name: Option<String>,
    /// Set on nominative-reporter extractors: require a volume
    /// group and reject matches immediately preceded by `v.`/`In re`/
    /// `Ex parte`, since the `regex` crate has no lookbehind to express
    /// this as part of the pattern itself.
    pub nominative: bool,
}

pub struct TokenMatch<'a> {
    pub(crate) regex_match: regex::Captures<'a>,
    pub(crate) names: Vec<&'a str>,
}

#[derive(Debug)]
pub struct TokenExtractor {
    pub regex: ResolvedRegex,
    pub token_factory: TokenFactories,
    pub extra: TokenExtractorExtra,
    pub strings: HashSet<String>,
    pub ignore_case: bool,
    built_regex: regex::Regex,
}

/// Case/party-name contexts that disqualify a nominative-reporter match
/// immediately to its left.
const NOMINATIVE_EXCLUSION_CONTEXTS: [&str; 3] = ["v.", "In re", "Ex parte"];

impl TokenExtractor {
    pub fn new(
        regex: ResolvedRegex,
        token_factory: TokenFactories,
        ignore_case: bool,
        strings: HashSet<String>,
        extra: TokenExtractorExtra,
    ) -> Self {
        Self::try_new(regex, token_factory, ignore_case, strings, extra)
            .expect("unable to build regex")
    }

    /// Attempt to build a `TokenExtractor`, returning `None` (and logging a
    /// warning) instead of panicking when the pattern fails to compile.
    /// Spec §7: "a single extractor's regex fails to compile; the extractor
    /// is skipped and logged; the pipeline continues with the remaining
    /// extractors."
    pub fn try_new(
        regex: ResolvedRegex,
        token_factory: TokenFactories,
        ignore_case: bool,
        strings: HashSet<String>,
        extra: TokenExtractorExtra,
    ) -> Option<Self> {
        match regex::RegexBuilder::new(regex.value())
            .case_insensitive(ignore_case)
            .build()
        {
            Ok(built_regex) => Some(Self {
                regex,
                token_factory,
                built_regex,
                ignore_case,
                strings,
                extra,
            }),
            Err(source) => {
                tracing::warn!(pattern = regex.value(), %source, "skipping extractor with malformed pattern");
                None
            }
        }
    }

    fn passes_nominative_filter(&self, text: &str, start: usize) -> bool {
        if !self.extra.nominative {
            return true;
        }
        let mut window_start = start.saturating_sub(16);
        while window_start < start && !text.is_char_boundary(window_start) {
            window_start += 1;
        }
        let preceding = &text[window_start..start];
        !NOMINATIVE_EXCLUSION_CONTEXTS
            .iter()
            .any(|needle| preceding.trim_end().ends_with(needle))
    }

    /// Return match objects for all matches in text.
    pub fn get_matches<'a>(&'a self, text: &'a str) -> Vec<TokenMatch<'a>> {
        let names: Vec<_> = self.built_regex.capture_names().flatten().collect();

        self.built_regex
            .captures_iter(text)
            .filter(|m| {
                let whole = m.get(1).unwrap_or_else(|| m.get(0).unwrap());
                self.passes_nominative_filter(text, whole.start())
            })
            .map(|regex_match| TokenMatch {
                regex_match,
                names: names.clone(),
            })
            .collect()
    }

    /// For a given match object, return a Token.
    pub fn get_token<'a>(&'a self, token_match: TokenMatch<'a>) -> Token<'a> {
        let m = token_match
            .regex_match
            .get(1)
            .unwrap_or_else(|| token_match.regex_match.get(0).unwrap());
        let start = m.start();
        let end = m.end();
        let data: &'a str = m.as_str();

        let extra: &'a TokenExtractorExtra = &self.extra;

        self.token_factory.create(TokenData {
            start,
            end,
            data,
            extra,
            groups: token_match
                .names
                .into_iter()
                .flat_map(|name| {
                    token_match
                        .regex_match
                        .name(name)
                        .map(move |m| (name, m.as_str()))
                })
                .collect(),
        })
    }
}

fn base_variables() -> HashMap<String, RegexTemplate> {
    let mut raw_regex_variables = reporters_db::regexes::raw_regexes();

    raw_regex_variables
        .get_mut("full_cite")
        .expect("full_cite should already exist")
        .add("", RegexTemplate::of("$volume $reporter,? $page"));

    raw_regex_variables
        .get_mut("page")
        .expect("page should already exist")
        .add("", RegexTemplate::of(regexes::PAGE_REGEX));

    process_variables(raw_regex_variables)
}

fn _substitute_edition(template: RegexTemplate, edition_name: &[EditionName]) -> RegexTemplate {
    let mut map: HashMap<String, RegexTemplate> = HashMap::new();
    let editions: Vec<String> = edition_name
        .iter()
        .map(|e| e.value())
        .map(regex::escape)
        .collect();
    map.insert("edition".into(), RegexTemplate::of(editions.join("|")));
    template.resolve(&map)
}

#[derive(Default, Debug)]
struct Lookup {
    editions: Vec<EditionInfo>,
    variations: Vec<EditionInfo>,
    strings: HashSet<String>,
    short: bool,
    nominative: bool,
}

fn edition_info(handle: &ReporterHandle, found_name: &EditionName, edition: &Edition) -> EditionInfo {
    EditionInfo {
        reporter: handle.clone(),
        found_name: found_name.value(),
        start: edition.start.map(|d| d.date()),
        end: edition.end.map(|d| d.date()),
    }
}

fn _add_regex(
    reporters: &[EditionName],
    edition: EditionInfo,
    regex: ResolvedRegex,
    is_short: bool,
    nominative: bool,
    result: &mut HashMap<ResolvedRegex, Lookup>,
    func: fn(&mut Lookup) -> &mut Vec<EditionInfo>,
) {
    let entry = result.entry(regex.clone()).or_default();

    entry.short = is_short;
    entry.nominative = entry.nominative || nominative;

    let editions = func(entry);
    editions.push(edition);

    let has_strings = regex.value().contains(&regex::escape(reporters[0].value()));

    if has_strings {
        let cloned = reporters.iter().map(|r| r.value().into());

        for s in cloned {
            entry.strings.insert(s);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn _add_regexes(
    regex_templates: &[RegexTemplate],
    edition_name: EditionName,
    edition: Edition,
    handle: &ReporterHandle,
    variations: Vec<EditionName>,
    variables: &HashMap<String, RegexTemplate>,
    nominative: bool,
    result: &mut HashMap<ResolvedRegex, Lookup>,
) {
    for template in regex_templates {
        let template = reporters_db::utils::recursive_substitute(template.clone(), variables);
        let arg = vec![edition_name.clone()];
        let regex = match _substitute_edition(template.clone(), arg.as_slice()).resolved() {
            Some(r) => r,
            None => continue,
        };
        let regex = templates::finish_pattern(&regex);

        let short_regex = regexes::short_cite_re(regex.value());
        let canonical_info = edition_info(handle, &edition_name, &edition);
        _add_regex(
            arg.as_slice(),
            canonical_info.clone(),
            regex,
            false,
            nominative,
            result,
            |l| &mut l.editions,
        );
        _add_regex(
            arg.as_slice(),
            canonical_info,
            short_regex,
            true,
            nominative,
            result,
            |l| &mut l.editions,
        );

        if !variations.is_empty() {
            let variation_regex =
                match _substitute_edition(template, variations.as_slice()).resolved() {
                    Some(r) => r,
                    None => continue,
                };
            let variation_regex = templates::finish_pattern(&variation_regex);

            let short_variation_regex = regexes::short_cite_re(variation_regex.value());

            for variation_name in &variations {
                let variation_info = edition_info(handle, variation_name, &edition);
                _add_regex(
                    variations.as_slice(),
                    variation_info.clone(),
                    variation_regex.clone(),
                    false,
                    nominative,
                    result,
                    |l| &mut l.variations,
                );
                _add_regex(
                    variations.as_slice(),
                    variation_info,
                    short_variation_regex.clone(),
                    false,
                    nominative,
                    result,
                    |l| &mut l.variations,
                );
            }
        }
    }
}

fn _populate_reporter_extractors(variables: &HashMap<String, RegexTemplate>) -> Vec<TokenExtractor> {
    let mut editions_by_regex: HashMap<ResolvedRegex, Lookup> = HashMap::new();

    let reporters = reporters();
    for (_key, cluster) in reporters {
        for source in cluster {
            let variations = source.variations;
            let is_nominative = source.cite_type.eq_ignore_ascii_case("nominative");

            for (edition_name, edition_data) in source.editions {
                let handle = ReporterHandle {
                    short_name: edition_name.value(),
                    full_name: source.name.clone(),
                    cite_type: source.cite_type.clone(),
                    is_scotus: is_scotus(&source.cite_type, &edition_name.value()),
                };

                let regexes = edition_data
                    .regexes
                    .clone()
                    .unwrap_or_else(|| vec![RegexTemplate::of("$full_cite")]);

                let edition_variations: Vec<_> = variations
                    .iter()
                    .filter(|(_, v)| edition_name == (*v).clone())
                    .map(|(k, _)| k.clone())
                    .collect();

                _add_regexes(
                    &regexes,
                    edition_name,
                    edition_data,
                    &handle,
                    edition_variations,
                    variables,
                    is_nominative,
                    &mut editions_by_regex,
                )
            }
        }
    }

    let mut extractors = Vec::new();

    for (regex, lookup) in editions_by_regex {
        // Nominative reporters require a volume group: reject patterns that
        // expanded to a volume-less form (e.g. year-page special formats).
        if lookup.nominative && !regex.value().contains("(?P<volume>") {
            continue;
        }

        if let Some(extractor) = TokenExtractor::try_new(
            regexes::nonalphanum_boundaries_re(&regex),
            TokenFactories::Citation,
            false,
            lookup.strings,
            TokenExtractorExtra {
                exact_editions: lookup.editions,
                variation_editions: lookup.variations,
                short: lookup.short,
                canonical_name: None,
                nominative: lookup.nominative,
            },
        ) {
            extractors.push(extractor);
        }
    }

    extractors
}

fn _populate_law_extractors(variables: &HashMap<String, RegexTemplate>) -> Vec<TokenExtractor> {
    let mut extractors = Vec::new();

    for (law_key, source) in reporters_db::laws::laws() {
        let mut names = vec![law_key.clone()];
        names.extend(source.variations.iter().cloned());

        for name in &names {
            let mut vars = variables.clone();
            vars.insert(
                "reporter".into(),
                RegexTemplate::of(format!("(?P<reporter>{})", regex::escape(name))),
            );

            for template in &source.regexes {
                let resolved = match templates::substitute_bounded(template.clone(), &vars) {
                    Ok(r) => r,
                    Err(source) => {
                        tracing::warn!(%source, law = law_key.as_str(), "skipping malformed law template");
                        continue;
                    }
                };
                let finished = templates::finish_pattern(&resolved);
                let with_tail = templates::append_law_tail(&finished);

                if let Some(extractor) = TokenExtractor::try_new(
                    with_tail,
                    TokenFactories::Law,
                    false,
                    [name.clone()].into_iter().collect(),
                    TokenExtractorExtra {
                        canonical_name: Some(law_key.clone()),
                        ..Default::default()
                    },
                ) {
                    extractors.push(extractor);
                }
            }
        }
    }

    extractors
}

fn _populate_journal_extractors(variables: &HashMap<String, RegexTemplate>) -> Vec<TokenExtractor> {
    let mut extractors = Vec::new();

    for (journal_key, source) in reporters_db::journals::journals() {
        let mut names = vec![journal_key.clone()];
        names.extend(source.variations.iter().cloned());

        for name in &names {
            let mut vars = variables.clone();
            vars.insert(
                "reporter".into(),
                RegexTemplate::of(format!("(?P<reporter>{})", regex::escape(name))),
            );

            let template = RegexTemplate::of("$volume $reporter,? $page");
            let resolved = match templates::substitute_bounded(template, &vars) {
                Ok(r) => r,
                Err(source) => {
                    tracing::warn!(%source, journal = journal_key.as_str(), "skipping malformed journal template");
                    continue;
                }
            };
            let finished = templates::finish_pattern(&resolved);

            if let Some(extractor) = TokenExtractor::try_new(
                regexes::nonalphanum_boundaries_re(&finished),
                TokenFactories::Journal,
                false,
                [name.clone()].into_iter().collect(),
                TokenExtractorExtra {
                    canonical_name: Some(source.name.clone()),
                    ..Default::default()
                },
            ) {
                extractors.push(extractor);
            }
        }
    }

    extractors
}

fn _populate_special_extractors() -> Vec<TokenExtractor> {
    let mut extractors = Vec::new();

    if let Some(e) = TokenExtractor::try_new(
        ResolvedRegex::of(regexes::ID_REGEX.into()),
        TokenFactories::Id,
        true,
        vec!["id.".into(), "ibid.".into()].into_iter().collect(),
        Default::default(),
    ) {
        extractors.push(e);
    }

    if let Some(e) = TokenExtractor::try_new(
        ResolvedRegex::of(regexes::SUPRA_REGEX.into()),
        TokenFactories::Supra,
        true,
        vec!["supra".into()].into_iter().collect(),
        Default::default(),
    ) {
        extractors.push(e);
    }

    if let Some(e) = TokenExtractor::try_new(
        ResolvedRegex::of(regexes::PARAGRAPH_REGEX.into()),
        TokenFactories::Paragraph,
        false,
        Default::default(),
        Default::default(),
    ) {
        extractors.push(e);
    }

    if let Some(e) = TokenExtractor::try_new(
        ResolvedRegex::of(regexes::STOP_WORD_REGEX.into()),
        TokenFactories::StopWord,
        true,
        regexes::STOP_WORDS.into_iter().map(|s| s.into()).collect(),
        Default::default(),
    ) {
        extractors.push(e);
    }

    if let Some(e) = TokenExtractor::try_new(
        ResolvedRegex::of(regexes::SECTION_REGEX.into()),
        TokenFactories::Section,
        false,
        vec!["§"].into_iter().map(|s| s.into()).collect(),
        Default::default(),
    ) {
        extractors.push(e);
    }

    extractors
}

pub fn _populate_all_extractors() -> Vec<TokenExtractor> {
    let variables = base_variables();
    let mut extractors = _populate_reporter_extractors(&variables);
    extractors.extend(_populate_law_extractors(&variables));
    extractors.extend(_populate_journal_extractors(&variables));
    extractors.extend(_populate_special_extractors());
    extractors
}

lazy_static! {
    pub static ref EXTRACTORS: Vec<TokenExtractor> = _populate_all_extractors();
}

/// The Extractor Registry: a mutable collection of
/// `TokenExtractor`s plus the literal-hint indexes used to cheaply decide
/// which extractors are even worth running against a given input. Built
/// once from the reporters/laws/journals/special-token sources by
/// [`ExtractorRegistry::default_registry`]; callers that need a custom
/// tokenizer (e.g. to add a firm-specific [`TokenFactories::Placeholder`]
/// pattern, or to drop a noisy reporter) mutate a registry via `add`/
/// `remove`/`clear`/`replace`/`modify_pattern_by`.
pub struct ExtractorRegistry {
    extractors: Vec<TokenExtractor>,
    hints: HashMap<String, Vec<usize>>,
    unhinted: Vec<usize>,
}

impl ExtractorRegistry {
    pub fn new(extractors: Vec<TokenExtractor>) -> Self {
        let mut registry = Self {
            extractors,
            hints: HashMap::new(),
            unhinted: Vec::new(),
        };
        registry.rebuild_index();
        registry
    }

    pub fn default_registry() -> Self {
        Self::new(_populate_all_extractors())
    }

    fn rebuild_index(&mut self) {
        self.hints.clear();
        self.unhinted.clear();
        for (i, extractor) in self.extractors.iter().enumerate() {
            if extractor.strings.is_empty() {
                self.unhinted.push(i);
            } else {
                for hint in &extractor.strings {
                    self.hints.entry(hint.clone()).or_default().push(i);
                }
            }
        }
    }

    pub fn extractors(&self) -> &[TokenExtractor] {
        &self.extractors
    }

    pub fn add(&mut self, extractor: TokenExtractor) {
        self.extractors.push(extractor);
        self.rebuild_index();
    }

    pub fn clear(&mut self) {
        self.extractors.clear();
        self.rebuild_index();
    }

    pub fn remove(&mut self, predicate: impl Fn(&TokenExtractor) -> bool) {
        self.extractors.retain(|e| !predicate(e));
        self.rebuild_index();
    }

    pub fn replace(&mut self, predicate: impl Fn(&TokenExtractor) -> bool, replacement: TokenExtractor) {
        self.remove(predicate);
        self.add(replacement);
    }

    /// Rebuild the built regex of every extractor whose current pattern
    /// matches `predicate`, applying `rewrite` to the pattern source first.
    pub fn modify_pattern_by(
        &mut self,
        predicate: impl Fn(&TokenExtractor) -> bool,
        rewrite: impl Fn(&str) -> String,
    ) {
        let mut replacements = Vec::new();
        for (i, extractor) in self.extractors.iter().enumerate() {
            if predicate(extractor) {
                let new_pattern = rewrite(extractor.regex.value());
                replacements.push((i, new_pattern));
            }
        }
        for (i, new_pattern) in replacements {
            let old = &self.extractors[i];
            if let Some(rebuilt) = TokenExtractor::try_new(
                ResolvedRegex::of(new_pattern),
                old.token_factory.clone(),
                old.ignore_case,
                old.strings.clone(),
                old.extra.clone(),
            ) {
                self.extractors[i] = rebuilt;
            }
        }
        self.rebuild_index();
    }

    /// Extractors worth running against `text`: those with no literal hint
    /// (always applicable), plus those whose hint is a substring of `text`.
    pub fn applicable<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a TokenExtractor> + 'a {
        let mut seen = HashSet::new();
        let unhinted = self.unhinted.iter().copied();
        let hinted = self
            .hints
            .iter()
            .filter(move |(hint, _)| text.contains(hint.as_str()))
            .flat_map(|(_, idxs)| idxs.iter().copied());

        unhinted.chain(hinted).filter_map(move |i| {
            if seen.insert(i) {
                Some(&self.extractors[i])
            } else {
                None
            }
        })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::default_registry()
    }
}
