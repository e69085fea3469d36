use std::fmt::Write;

use crate::document::escape_text;

/// Markup produced by segmentation, applied through [`crate::Dom::replace_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Span {
        class: &'static str,
        children: Vec<Fragment>,
    },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn span(class: &'static str, children: Vec<Fragment>) -> Self {
        Self::Span { class, children }
    }

    /// Span wrapping a single text node.
    pub fn text_span(class: &'static str, text: impl Into<String>) -> Self {
        Self::span(class, vec![Self::text(text)])
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Fragment::Text(text) => escape_text(text, out),
            Fragment::Span { class, children } => {
                let _ = write!(out, "<span class=\"{class}\">");
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</span>");
            }
        }
    }
}

/// Serialize a fragment sequence the way it will appear as inner HTML.
pub fn fragments_to_html(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::to_html).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_spans_serialize_in_order() {
        let fragment = Fragment::span("word-wrapper", vec![Fragment::text_span("word", "Hi")]);
        assert_eq!(
            fragment.to_html(),
            r#"<span class="word-wrapper"><span class="word">Hi</span></span>"#
        );
    }

    #[test]
    fn text_is_escaped() {
        let fragments = [
            Fragment::text_span("char", "<"),
            Fragment::text_span("char", "\u{a0}"),
        ];
        assert_eq!(
            fragments_to_html(&fragments),
            r#"<span class="char">&lt;</span><span class="char">&nbsp;</span>"#
        );
    }
}
