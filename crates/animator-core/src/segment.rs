//! Text segmentation into animatable spans.

use animator_dom::Fragment;
use unicode_segmentation::UnicodeSegmentation;

use crate::mode::AnimationMode;

/// Non-breaking space used for space characters in letter mode, so the
/// space unit keeps its width once it becomes an inline block.
pub const NBSP: char = '\u{a0}';

const WRAPPER_CLASS: &str = "word-wrapper";

/// Build the replacement markup for an element's text in the given mode.
pub fn segment(mode: AnimationMode, text: &str) -> Vec<Fragment> {
    match mode {
        AnimationMode::Letters => letters(text),
        AnimationMode::Words => join_words(words(text).into_iter().map(|word| {
            Fragment::span(WRAPPER_CLASS, vec![word_span(mode.unit_class(), word)])
        })),
        AnimationMode::Staggered => {
            join_words(words(text).into_iter().map(|word| word_span(WRAPPER_CLASS, word)))
        }
    }
}

/// One `char` span per extended grapheme cluster.
fn letters(text: &str) -> Vec<Fragment> {
    text.graphemes(true)
        .map(|g| {
            if g == " " {
                Fragment::text_span(AnimationMode::Letters.unit_class(), NBSP.to_string())
            } else {
                Fragment::text_span(AnimationMode::Letters.unit_class(), g)
            }
        })
        .collect()
}

/// Whitespace-separated words. Empty text has no words; whitespace-only
/// text yields a single empty word.
fn words(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() { vec![""] } else { words }
}

fn word_span(class: &'static str, word: &str) -> Fragment {
    if word.is_empty() {
        Fragment::span(class, Vec::new())
    } else {
        Fragment::text_span(class, word)
    }
}

fn join_words(units: impl Iterator<Item = Fragment>) -> Vec<Fragment> {
    let mut out = Vec::new();
    for unit in units {
        if !out.is_empty() {
            out.push(Fragment::text(" "));
        }
        out.push(unit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use animator_dom::markup::fragments_to_html;

    #[test]
    fn letters_preserve_spaces_as_nbsp() {
        let html = fragments_to_html(&segment(AnimationMode::Letters, "ab c"));
        assert_eq!(
            html,
            concat!(
                r#"<span class="char">a</span>"#,
                r#"<span class="char">b</span>"#,
                r#"<span class="char">&nbsp;</span>"#,
                r#"<span class="char">c</span>"#,
            )
        );
    }

    #[test]
    fn letters_keep_combining_marks_together() {
        let fragments = segment(AnimationMode::Letters, "e\u{301}!");
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], Fragment::text_span("char", "e\u{301}"));
    }

    #[test]
    fn words_nest_inner_unit_in_wrapper() {
        let html = fragments_to_html(&segment(AnimationMode::Words, "Hi there"));
        assert_eq!(
            html,
            concat!(
                r#"<span class="word-wrapper"><span class="word">Hi</span></span>"#,
                " ",
                r#"<span class="word-wrapper"><span class="word">there</span></span>"#,
            )
        );
    }

    #[test]
    fn staggered_wraps_each_word_once() {
        let html = fragments_to_html(&segment(AnimationMode::Staggered, "  Hi\n  there "));
        assert_eq!(
            html,
            r#"<span class="word-wrapper">Hi</span> <span class="word-wrapper">there</span>"#
        );
    }

    #[test]
    fn empty_text_has_no_units() {
        for mode in AnimationMode::ALL {
            assert!(segment(mode, "").is_empty(), "{mode:?}");
        }
    }

    #[test]
    fn whitespace_only_text_has_one_empty_word() {
        assert_eq!(
            segment(AnimationMode::Staggered, "   "),
            vec![Fragment::span("word-wrapper", Vec::new())]
        );
        assert_eq!(
            fragments_to_html(&segment(AnimationMode::Words, " ")),
            r#"<span class="word-wrapper"><span class="word"></span></span>"#
        );
        assert_eq!(segment(AnimationMode::Letters, "  ").len(), 2);
    }
}
