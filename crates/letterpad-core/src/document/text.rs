//! Plain-text projection of document bodies.
//!
//! Bodies are HTML markup. Everything the user sees as "text" (counters,
//! previews, search) is computed from the projection produced here, never
//! from the raw markup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6])\s*>").expect("line break pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Projects HTML markup to the text a reader would see.
///
/// `<br>` and closing block tags become line breaks, every other tag is
/// dropped, and the common named entities are decoded. Trailing line
/// breaks introduced by the last block are trimmed.
pub fn plain_text(markup: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(markup, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);
    decoded.trim_end_matches('\n').to_string()
}

fn decode_entities(text: &str) -> String {
    // &amp; goes last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Word and character counters shown next to the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Whitespace-delimited non-empty tokens.
    pub words: usize,
    /// Length of the plain-text projection in characters.
    pub characters: usize,
}

impl TextStats {
    /// Computes the counters for a body payload.
    pub fn from_markup(markup: &str) -> Self {
        Self::from_text(&plain_text(markup))
    }

    /// Computes the counters for already projected text.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_inline_tags() {
        assert_eq!(plain_text("<b>Hello</b> <i>world</i>"), "Hello world");
    }

    #[test]
    fn test_plain_text_block_tags_become_line_breaks() {
        assert_eq!(plain_text("<p>Dear Ann,</p><p>Thanks</p>"), "Dear Ann,\nThanks");
        assert_eq!(plain_text("one<br>two<BR/>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        assert_eq!(plain_text("a&nbsp;&amp;&nbsp;b &lt;3"), "a & b <3");
        assert_eq!(plain_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_stats_count_rendered_text_not_markup() {
        let stats = TextStats::from_markup("<p><b>Hello</b>   there</p><ul><li>friend</li></ul>");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, "Hello   there\nfriend".chars().count());
    }

    #[test]
    fn test_stats_empty_body() {
        assert_eq!(TextStats::from_markup(""), TextStats::default());
        assert_eq!(TextStats::from_markup("<p></p>").words, 0);
    }
}
