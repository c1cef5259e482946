//! Selection handling and result splicing for AI actions.
//!
//! # Invariants
//! - Offsets are counted in `char`s, not bytes, so splicing never splits a
//!   UTF-8 sequence.
//! - Out-of-range offsets are clamped; reversed ranges are normalized.
//! - Only an absent or zero-width selection means "whole content". A
//!   selection that clamps to nothing selects nothing.

use crate::ai::action::AiActionKind;

/// Character range `[start, end)` inside note content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Builds a selection from UTF-16 code unit offsets into `content`.
    ///
    /// Offsets inside a surrogate pair round up to the next character.
    /// Offsets past the end keep their distance beyond the last character,
    /// so an out-of-range UTF-16 selection stays out of range.
    pub fn from_utf16(content: &str, start: usize, end: usize) -> Self {
        Self::new(
            utf16_to_char_offset(content, start),
            utf16_to_char_offset(content, end),
        )
    }

    /// Selection covering no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Byte span of a selection within some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteSpan {
    start: usize,
    end: usize,
}

/// What an action operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Whole,
    /// May be empty when the selection lies past the end of the content.
    Span(ByteSpan),
}

fn resolve(content: &str, selection: Option<Selection>) -> Target {
    let Some(selection) = selection.filter(|selection| !selection.is_empty()) else {
        return Target::Whole;
    };
    let char_len = content.chars().count();
    let start = selection.start.min(selection.end).min(char_len);
    let end = selection.start.max(selection.end).min(char_len);

    Target::Span(ByteSpan {
        start: byte_offset(content, start),
        end: byte_offset(content, end),
    })
}

fn utf16_to_char_offset(content: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    let mut chars = 0;
    for ch in content.chars() {
        if units >= utf16_offset {
            return chars;
        }
        units += ch.len_utf16();
        chars += 1;
    }
    chars + utf16_offset.saturating_sub(units)
}

fn byte_offset(content: &str, char_index: usize) -> usize {
    content
        .char_indices()
        .nth(char_index)
        .map_or(content.len(), |(offset, _)| offset)
}

/// Text an action should operate on: the selection, or the whole content.
pub fn text_to_process(content: &str, selection: Option<Selection>) -> &str {
    match resolve(content, selection) {
        Target::Span(span) => &content[span.start..span.end],
        Target::Whole => content,
    }
}

/// Splices an AI result back into `content`.
///
/// - Continue writing inserts `" " + result` after the selection end, or
///   appends it to the content (no extra space when the content already ends
///   with one).
/// - Every other action replaces the selection, or the whole content.
pub fn splice_result(
    content: &str,
    selection: Option<Selection>,
    action: AiActionKind,
    result: &str,
) -> String {
    let target = resolve(content, selection);

    if action.inserts_after_selection() {
        return match target {
            Target::Span(span) => {
                format!("{} {}{}", &content[..span.end], result, &content[span.end..])
            }
            Target::Whole if content.ends_with(' ') => format!("{content}{result}"),
            Target::Whole => format!("{content} {result}"),
        };
    }

    match target {
        Target::Span(span) => {
            format!("{}{}{}", &content[..span.start], result, &content[span.end..])
        }
        Target::Whole => result.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{splice_result, text_to_process, Selection};
    use crate::ai::action::AiActionKind;

    #[test]
    fn continue_writing_without_selection_appends_with_space() {
        let spliced = splice_result("Hello", None, AiActionKind::ContinueWriting, "world");
        assert_eq!(spliced, "Hello world");

        let spliced = splice_result("Hello ", None, AiActionKind::ContinueWriting, "world");
        assert_eq!(spliced, "Hello world");
    }

    #[test]
    fn continue_writing_inserts_after_selection_end() {
        let content = "One. Three.";
        let selection = Some(Selection::new(0, 4));
        let spliced = splice_result(content, selection, AiActionKind::ContinueWriting, "Two.");
        assert_eq!(spliced, "One. Two. Three.");
    }

    #[test]
    fn replacing_actions_swap_selection_or_whole_content() {
        let selection = Some(Selection::new(0, 3));
        assert_eq!(
            splice_result("teh cat", selection, AiActionKind::FixGrammar, "the"),
            "the cat"
        );
        assert_eq!(
            splice_result("long text", None, AiActionKind::Summarize, "short"),
            "short"
        );
    }

    #[test]
    fn offsets_count_chars_and_clamp() {
        let content = "héllo wörld";
        assert_eq!(text_to_process(content, Some(Selection::new(6, 99))), "wörld");
        assert_eq!(text_to_process(content, Some(Selection::new(5, 1))), "éllo");
        assert_eq!(text_to_process(content, Some(Selection::new(3, 3))), content);
        assert_eq!(text_to_process(content, Some(Selection::new(11, 20))), "");
        assert_eq!(
            splice_result(content, Some(Selection::new(1, 2)), AiActionKind::FixGrammar, "e"),
            "hello wörld"
        );
    }

    #[test]
    fn selection_past_the_end_selects_nothing() {
        assert_eq!(text_to_process("abc", Some(Selection::new(10, 20))), "");
        assert_eq!(text_to_process("abc", None), "abc");
        assert_eq!(
            splice_result("abc", Some(Selection::new(10, 20)), AiActionKind::Summarize, "x"),
            "abcx"
        );
    }

    #[test]
    fn utf16_offsets_map_past_surrogate_pairs() {
        let content = "😀 teh cat";
        let selection = Selection::from_utf16(content, 3, 6);
        assert_eq!(selection, Selection::new(2, 5));
        assert_eq!(text_to_process(content, Some(selection)), "teh");
        assert_eq!(
            splice_result(content, Some(selection), AiActionKind::FixGrammar, "the"),
            "😀 the cat"
        );

        // Inside the surrogate pair rounds up; past the end stays past it.
        assert_eq!(Selection::from_utf16(content, 1, 2), Selection::new(1, 1));
        assert_eq!(Selection::from_utf16("ab", 5, 7), Selection::new(5, 7));
        assert_eq!(text_to_process("ab", Some(Selection::from_utf16("ab", 5, 7))), "");
    }
}
