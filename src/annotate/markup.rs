//! HTML/markup-mode support: stripping tags down to a plain-text
//! projection (for [`crate::clean::clean_text`]'s `"html"` step) and
//! building a [`crate::span_updater::SpanUpdater`] that maps spans found
//! in that projection back into the original markup.

use crate::span_updater::SpanUpdater;

/// Strip every `<...>` tag from `text`, leaving only the text nodes, with
/// no offset tracking. Used by [`crate::clean::clean_text`] callers who
/// only want plain text and don't need to annotate the original markup
/// afterward.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Strip tags while recording a [`SpanUpdater`] diff for each one removed,
/// so citation spans found in the returned plain text can be mapped back
/// onto offsets in `text`.
pub fn strip_tags_tracked(text: &str) -> (String, SpanUpdater) {
    let mut out = String::with_capacity(text.len());
    let mut updater = SpanUpdater::new();
    let mut in_tag = false;
    let mut tag_start = 0usize;

    for (byte_offset, c) in text.char_indices() {
        match c {
            '<' => {
                in_tag = true;
                tag_start = byte_offset;
            }
            '>' if in_tag => {
                in_tag = false;
                let tag_len = byte_offset + 1 - tag_start;
                updater.record(tag_start, tag_len, 0);
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    (out, updater)
}

/// In markup mode, an annotation's splice point must not land inside a
/// tag: if `offset` (into the original markup) falls within a `<...>`
/// run, push it to just past the tag's closing `>`.
pub fn snap_outside_tags(markup: &str, offset: usize) -> usize {
    let bytes = markup.as_bytes();
    let mut in_tag = false;
    for (i, &b) in bytes.iter().enumerate().take(offset) {
        match b {
            b'<' => in_tag = true,
            b'>' => in_tag = false,
            _ => {}
        }
        let _ = i;
    }

    if !in_tag {
        return offset;
    }
    match markup[offset..].find('>') {
        Some(rel) => offset + rel + 1,
        None => markup.len(),
    }
}
