//! Document access for the text animator.
//!
//! The animator never touches markup directly; it goes through the [`Dom`]
//! trait so hosts can back it with a browser DOM, a test double, or the
//! in-memory [`HtmlDocument`] shipped here.

pub mod document;
pub mod markup;

pub use document::HtmlDocument;
pub use markup::Fragment;

use serde::{Deserialize, Serialize};

/// Handle to an element inside a [`Dom`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Loading phase of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    /// Still parsing; the content-loaded signal has not fired yet.
    Loading,
    Interactive,
    #[default]
    Complete,
}

/// Query and mutation surface the animator needs from a document.
pub trait Dom {
    fn ready_state(&self) -> ReadyState;

    /// Elements carrying any of `classes`, in document order.
    fn query_classes(&self, classes: &[&str]) -> Vec<NodeId>;

    /// Descendants of `element` carrying `class`, in document order.
    fn descendants_with_class(&self, element: NodeId, class: &str) -> Vec<NodeId>;

    fn has_class(&self, element: NodeId, class: &str) -> bool;
    fn add_class(&mut self, element: NodeId, class: &str);
    fn remove_class(&mut self, element: NodeId, class: &str);

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, element: NodeId) -> String;

    /// Replace all children of `element` with a single text node.
    fn set_text_content(&mut self, element: NodeId, text: &str);

    /// Replace all children of `element` with nodes built from `fragments`.
    fn replace_content(&mut self, element: NodeId, fragments: &[Fragment]);

    /// Whether an element with the given `id` attribute exists.
    fn contains_element_id(&self, id: &str) -> bool;

    /// Append a `<style id=..>` element holding `css` to the document head.
    fn append_style(&mut self, id: &str, css: &str);

    fn inner_html(&self, element: NodeId) -> String;

    /// Serialize the whole document.
    fn to_html(&self) -> String;

    /// Short selector-like label for logs and plans, e.g. `h1#hero.title`.
    fn describe(&self, element: NodeId) -> String;
}
