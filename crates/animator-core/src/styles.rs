//! Initial visual state for generated units.

use animator_dom::Dom;

/// `id` of the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "text-animator-styles";

/// Units start hidden or offset; the engine animates them to their natural
/// position.
pub const STYLESHEET: &str = r#"
    [class*='animate-text'] {
        opacity: 1;
    }

    .animate-text-letters .char {
        display: inline-block;
        opacity: 0;
        transform: translateY(40px);
    }

    .animate-text-words .word-wrapper {
        display: inline-block;
        overflow: hidden;
        margin-right: 0.3em;
    }
    .animate-text-words .word {
        display: inline-block;
        transform: translateY(100%);
    }

    .animate-text-staggered .word-wrapper {
        display: inline-block;
        overflow: hidden;
        margin-right: 0.3em;
        opacity: 0;
        transform: translateY(50%);
    }
"#;

/// Append the stylesheet unless it is already present. Returns whether a
/// new style element was added.
pub fn inject_styles(dom: &mut dyn Dom) -> bool {
    if dom.contains_element_id(STYLE_ELEMENT_ID) {
        return false;
    }
    dom.append_style(STYLE_ELEMENT_ID, STYLESHEET);
    true
}
