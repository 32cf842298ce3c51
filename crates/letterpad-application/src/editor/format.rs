//! Formatting commands over the HTML body.
//!
//! Every command is an opaque body mutation: it produces a new markup
//! string, and the editor treats it exactly like typed text for dirty
//! tracking and autosave.

use std::collections::VecDeque;
use std::ops::Range;
use strum::{Display, EnumString};

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A toolbar command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Align(Alignment),
    UnorderedList,
    OrderedList,
    /// Wraps the selection in a link to the URL.
    Link(String),
    /// Inserts an image with the URL as source.
    Image(String),
    Undo,
    Redo,
}

/// Byte range of the body markup the command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Creates a selection; the bounds may be given in either order.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// An empty selection at `position`.
    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Selects the whole body.
    pub fn all(body: &str) -> Self {
        Self::new(0, body.len())
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamps the selection to `body`, snapping to char boundaries.
    pub fn clamp(&self, body: &str) -> Range<usize> {
        let snap = |mut i: usize| {
            i = i.min(body.len());
            while !body.is_char_boundary(i) {
                i -= 1;
            }
            i
        };
        snap(self.start)..snap(self.end)
    }
}

/// Applies a markup command to `body`.
///
/// Returns `None` when the command does not change the markup: history
/// commands, and links or images with an empty URL.
pub fn apply_markup(body: &str, command: &FormatCommand, selection: Selection) -> Option<String> {
    let range = selection.clamp(body);
    match command {
        FormatCommand::Bold => Some(wrap(body, range, "<b>", "</b>")),
        FormatCommand::Italic => Some(wrap(body, range, "<i>", "</i>")),
        FormatCommand::Underline => Some(wrap(body, range, "<u>", "</u>")),
        FormatCommand::Align(alignment) => Some(wrap(
            body,
            range,
            &format!("<div style=\"text-align:{}\">", alignment),
            "</div>",
        )),
        FormatCommand::UnorderedList => Some(wrap(body, range, "<ul><li>", "</li></ul>")),
        FormatCommand::OrderedList => Some(wrap(body, range, "<ol><li>", "</li></ol>")),
        FormatCommand::Link(url) => {
            let url = url.trim();
            if url.is_empty() {
                return None;
            }
            let open = format!("<a href=\"{}\">", escape_attr(url));
            if range.is_empty() {
                let at = range.start;
                Some(format!(
                    "{}{}{}</a>{}",
                    &body[..at],
                    open,
                    escape_text(url),
                    &body[at..]
                ))
            } else {
                Some(wrap(body, range, &open, "</a>"))
            }
        }
        FormatCommand::Image(url) => {
            let url = url.trim();
            if url.is_empty() {
                return None;
            }
            let at = range.end;
            Some(format!(
                "{}<img src=\"{}\">{}",
                &body[..at],
                escape_attr(url),
                &body[at..]
            ))
        }
        FormatCommand::Undo | FormatCommand::Redo => None,
    }
}

fn wrap(body: &str, range: Range<usize>, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(body.len() + open.len() + close.len());
    out.push_str(&body[..range.start]);
    out.push_str(open);
    out.push_str(&body[range.clone()]);
    out.push_str(close);
    out.push_str(&body[range.end..]);
    out
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Bounded undo/redo stacks of body states.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<String>,
    redo_stack: Vec<String>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Records the body as it was before an edit.
    pub fn record(&mut self, previous: String) {
        self.redo_stack.clear();
        if self.limit == 0 {
            return;
        }
        self.undo_stack.push_back(previous);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Steps back. Returns the body to restore, if any.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.to_string());
        Some(previous)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.to_string());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_styles_wrap_selection() {
        let body = "Hello world";
        assert_eq!(
            apply_markup(body, &FormatCommand::Bold, Selection::new(6, 11)).unwrap(),
            "Hello <b>world</b>"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::Italic, Selection::new(5, 0)).unwrap(),
            "<i>Hello</i> world"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::Underline, Selection::caret(5)).unwrap(),
            "Hello<u></u> world"
        );
    }

    #[test]
    fn test_blocks() {
        let body = "Dear Ann";
        assert_eq!(
            apply_markup(body, &FormatCommand::Align(Alignment::Center), Selection::all(body))
                .unwrap(),
            "<div style=\"text-align:center\">Dear Ann</div>"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::OrderedList, Selection::all(body)).unwrap(),
            "<ol><li>Dear Ann</li></ol>"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::UnorderedList, Selection::all(body)).unwrap(),
            "<ul><li>Dear Ann</li></ul>"
        );
    }

    #[test]
    fn test_link_and_image() {
        let body = "see here";
        assert_eq!(
            apply_markup(
                body,
                &FormatCommand::Link("https://a.example/?q=1&r=\"2\"".to_string()),
                Selection::new(4, 8)
            )
            .unwrap(),
            "see <a href=\"https://a.example/?q=1&amp;r=&quot;2&quot;\">here</a>"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::Link("https://b.example".to_string()), Selection::caret(0))
                .unwrap(),
            "<a href=\"https://b.example\">https://b.example</a>see here"
        );
        assert_eq!(
            apply_markup(body, &FormatCommand::Image("pic.png".to_string()), Selection::new(0, 3))
                .unwrap(),
            "see<img src=\"pic.png\"> here"
        );
    }

    #[test]
    fn test_empty_url_is_noop() {
        assert!(apply_markup("x", &FormatCommand::Link("  ".to_string()), Selection::all("x")).is_none());
        assert!(apply_markup("x", &FormatCommand::Image(String::new()), Selection::all("x")).is_none());
        assert!(apply_markup("x", &FormatCommand::Undo, Selection::all("x")).is_none());
    }

    #[test]
    fn test_selection_clamps_to_char_boundaries() {
        let body = "héllo";
        // 'é' occupies bytes 1..3
        assert_eq!(Selection::new(2, 99).clamp(body), 1..6);
        assert_eq!(
            apply_markup(body, &FormatCommand::Bold, Selection::new(2, 99)).unwrap(),
            "h<b>éllo</b>"
        );
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new(100);
        history.record("a".to_string());
        history.record("ab".to_string());

        assert_eq!(history.undo("abc").as_deref(), Some("ab"));
        assert_eq!(history.undo("ab").as_deref(), Some("a"));
        assert!(history.undo("a").is_none());
        assert_eq!(history.redo("a").as_deref(), Some("ab"));
        assert!(history.can_redo());

        history.record("ab".to_string());
        assert!(!history.can_redo(), "a new edit clears redo");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new(2);
        for body in ["1", "2", "3"] {
            history.record(body.to_string());
        }
        assert_eq!(history.undo("4").as_deref(), Some("3"));
        assert_eq!(history.undo("3").as_deref(), Some("2"));
        assert!(history.undo("2").is_none());
    }
}
