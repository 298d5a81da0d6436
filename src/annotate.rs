//! Splices annotation text (e.g. `<a href="...">`/`</a>` pairs) around
//! citation spans in a document, without disturbing citations whose spans
//! nest or sit back-to-back.

use crate::find::models::{Citation, Span};
use crate::find::{get_citations, GetCitationsOptions};
use crate::tokenizers::Tokenizer;

pub mod markup;

/// Crude markup sniff matching the external interface's "auto-detect
/// markup by presence of `<.+>`" rule -- a real tag start/end pair
/// anywhere in the text, not full well-formedness.
fn looks_like_markup(text: &str) -> bool {
    match text.find('<') {
        Some(lt) => text[lt..].contains('>'),
        None => false,
    }
}

/// Default `annotate_func`: wrap each citation in a `citation`-class
/// `span`, as the external interface's `annotate()` does when the caller
/// doesn't supply its own renderer.
pub fn default_wrap(_citation: &Citation) -> (String, String) {
    (r#"<span class="citation">"#.to_string(), "</span>".to_string())
}

/// The crate's top-level `annotate(text, {...}) -> string` entry point:
/// auto-detects markup, finds citations via `get_citations` when the
/// caller doesn't supply its own list, and wraps each citation's
/// `full_span` using `wrap`. In markup mode, a span that would otherwise
/// land inside a tag is snapped to just outside it (see
/// [`markup::snap_outside_tags`]) rather than corrupting the tag.
pub fn annotate_document<'a>(
    text: &'a str,
    citations: Option<&[Citation]>,
    tokenizer: &'a dyn Tokenizer<'a>,
    wrap: impl Fn(&Citation) -> (String, String),
) -> String {
    let markup = looks_like_markup(text);

    let owned;
    let citations: &[Citation] = match citations {
        Some(c) => c,
        None => {
            let options = GetCitationsOptions {
                markup_text: markup.then(|| text.to_string()),
                ..GetCitationsOptions::default()
            };
            owned = get_citations(text, options, tokenizer);
            &owned
        }
    };
    let wrapped: Vec<(Span, String, String)> = citations
        .iter()
        .map(|c| {
            let (before, after) = wrap(c);
            let span = c.full_span();
            let span = if markup {
                Span::new(
                    markup::snap_outside_tags(text, span.start),
                    markup::snap_outside_tags(text, span.end),
                )
            } else {
                span
            };
            (span, before, after)
        })
        .collect();

    let annotations: Vec<Annotation> = wrapped
        .iter()
        .map(|(span, before, after)| Annotation {
            span: *span,
            before: before.as_str(),
            after: after.as_str(),
        })
        .collect();

    annotate(text, &annotations)
}

/// A `(before, after)` pair of text to insert immediately before and after
/// a citation's span.
pub struct Annotation<'a> {
    pub span: Span,
    pub before: &'a str,
    pub after: &'a str,
}

/// Depth-first splice: sort annotations by span, then by descending length
/// so an outer span's insertions wrap an inner span's, and walk the text
/// once inserting each pair at its boundary. Overlapping (non-nested)
/// spans are rejected by being skipped, since there's no well-formed
/// splice for them.
pub fn annotate(text: &str, annotations: &[Annotation]) -> String {
    let mut sorted: Vec<&Annotation> = annotations.iter().collect();
    sorted.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut accepted: Vec<&Annotation> = Vec::new();
    for candidate in sorted {
        let conflicts = accepted.iter().any(|existing| {
            existing.span.overlaps(&candidate.span)
                && !(existing.span.start <= candidate.span.start
                    && candidate.span.end <= existing.span.end)
                && !(candidate.span.start <= existing.span.start
                    && existing.span.end <= candidate.span.end)
        });
        if !conflicts {
            accepted.push(candidate);
        }
    }

    // Collect insertion points: (offset, text, insertion_order) where a
    // later (closer-to-the-text) insertion at the same offset goes nearer
    // the citation text than an earlier (outer) one.
    let mut insertions: Vec<(usize, i64, String)> = Vec::new();
    for (depth, ann) in accepted.iter().enumerate() {
        // Outer spans were accepted first (sorted start-asc), so a lower
        // `depth` here means a wider-nesting annotation. Opening tags at
        // the same offset go outer-first; closing tags at the same offset
        // go inner-first.
        insertions.push((ann.span.start, depth as i64, ann.before.to_string()));
        insertions.push((ann.span.end, -(depth as i64), ann.after.to_string()));
    }
    insertions.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut out = String::with_capacity(text.len() + insertions.len() * 8);
    let mut last = 0;
    for (offset, _, snippet) in insertions {
        out.push_str(&text[last..offset]);
        out.push_str(&snippet);
        last = offset;
    }
    out.push_str(&text[last..]);
    out
}

/// Build one [`Annotation`] per citation in `citations`, wrapping each in
/// `before`/`after`, using `full_span` so a citation's case name and pin
/// cite get wrapped along with its reporter/volume/page.
pub fn annotations_for<'a>(citations: &[Citation], before: &'a str, after: &'a str) -> Vec<Annotation<'a>> {
    citations
        .iter()
        .map(|c| Annotation {
            span: c.full_span(),
            before,
            after,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_a_single_span() {
        let text = "See Roe v. Wade, 410 U.S. 113 (1973)";
        let span = Span::new(4, 37);
        let annotations = vec![Annotation {
            span,
            before: "<a>",
            after: "</a>",
        }];
        let out = annotate(text, &annotations);
        assert_eq!(out, "See <a>Roe v. Wade, 410 U.S. 113 (1973)</a>");
    }

    #[test]
    fn nests_inner_span_inside_outer() {
        let text = "Roe v. Wade, 410 U.S. 113";
        let outer = Annotation {
            span: Span::new(0, 26),
            before: "<outer>",
            after: "</outer>",
        };
        let inner = Annotation {
            span: Span::new(13, 26),
            before: "<inner>",
            after: "</inner>",
        };
        let out = annotate(text, &[outer, inner]);
        assert_eq!(
            out,
            "<outer>Roe v. Wade, <inner>410 U.S. 113</inner></outer>"
        );
    }

    #[test]
    fn annotate_document_finds_and_wraps_citations_in_plain_text() {
        use crate::tokenizers::extractors::EXTRACTORS;
        use crate::tokenizers::Ahocorasick;

        let tokenizer = Ahocorasick::new(EXTRACTORS.as_slice()).unwrap();
        let text = "Roe v. Wade, 410 U. S. 113 (1973)";
        let out = annotate_document(text, None, &tokenizer, default_wrap);
        assert!(out.starts_with(r#"<span class="citation">Roe v. Wade"#));
        assert!(out.ends_with("(1973)</span>"));
    }

    #[test]
    fn annotate_document_detects_markup_and_snaps_span_outside_a_tag() {
        use crate::find::models::CitationSource;

        let text = r#"<p>See Roe v. Wade, <i>410</i> U. S. 113 (1973)</p>"#;
        let citation = Citation::Reference {
            source: CitationSource {
                matched_text: "i>410</i> U. S. 113 (1973".into(),
                token_index: 0,
                span: Span::new(21, text.len() - 4),
                full_span: Span::new(21, text.len() - 4),
                groups: Default::default(),
                metadata: Default::default(),
            },
        };
        let citations: &[Citation] = &[citation];
        let out = annotate_document(
            text,
            Some(citations),
            &crate::tokenizers::Ahocorasick::new(crate::tokenizers::extractors::EXTRACTORS.as_slice())
                .unwrap(),
            default_wrap,
        );
        // The span started inside "<i>", so the wrap must land after it.
        assert!(out.contains(r#"<i><span class="citation">410</i>"#));
    }
}
