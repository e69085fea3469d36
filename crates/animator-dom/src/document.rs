//! In-memory HTML document backing the [`Dom`] trait.
//!
//! Markup is parsed with `scraper` and copied into a small mutable arena.
//! Replaced subtrees are released and their slots reused by later inserts,
//! so ids of removed nodes may come to name new nodes.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::trace;

use crate::{Dom, Fragment, NodeId, ReadyState};

const ROOT: NodeId = NodeId::new(0);

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    fn set_attr(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
    Vacant,
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Mutable HTML document.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
    ready_state: ReadyState,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            free: Vec::new(),
            ready_state: ReadyState::Complete,
        }
    }
}

impl HtmlDocument {
    /// Parse a full HTML document. Missing `html`/`head`/`body` elements are
    /// synthesized by the parser.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut document = Self::default();
        for child in parsed.tree.root().children() {
            document.import(child, ROOT);
        }
        trace!(nodes = document.nodes.len(), "parsed html document");
        document
    }

    /// Parse a snippet of body content.
    pub fn from_body(body: &str) -> Self {
        Self::parse(&format!("<!DOCTYPE html><html><head></head><body>{body}</body></html>"))
    }

    fn import(&mut self, node: NodeRef<'_, Node>, parent: NodeId) {
        let kind = match node.value() {
            Node::Element(element) => NodeKind::Element(ElementData {
                name: element.name().to_string(),
                attrs: element
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            }),
            Node::Text(text) => NodeKind::Text((**text).to_string()),
            Node::Comment(comment) => NodeKind::Comment((**comment).to_string()),
            Node::Doctype(doctype) => NodeKind::Doctype(doctype.name().to_string()),
            _ => return,
        };
        let id = self.push(parent, kind);
        for child in node.children() {
            self.import(child, id);
        }
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let data = NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = data;
                id
            }
            None => {
                self.nodes.push(data);
                NodeId::new(self.nodes.len() - 1)
            }
        };
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Number of live nodes, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Attached descendants of `id` in document order, excluding `id` itself.
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.node(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            let mut released = self.descendants(child);
            released.push(child);
            for id in released {
                let slot = &mut self.nodes[id.index()];
                slot.parent = None;
                slot.children.clear();
                slot.kind = NodeKind::Vacant;
                self.free.push(id);
            }
        }
    }

    fn append_fragment(&mut self, parent: NodeId, fragment: &Fragment) {
        match fragment {
            Fragment::Text(text) => {
                self.push(parent, NodeKind::Text(text.clone()));
            }
            Fragment::Span { class, children } => {
                let span = self.push(
                    parent,
                    NodeKind::Element(ElementData {
                        name: "span".to_string(),
                        attrs: vec![("class".to_string(), (*class).to_string())],
                    }),
                );
                for child in children {
                    self.append_fragment(span, child);
                }
            }
        }
    }

    /// First attached element with the given tag name.
    pub fn first_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(ROOT)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|el| el.name == name))
    }

    /// Element carrying the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(ROOT)
            .into_iter()
            .find(|node| self.element(*node).and_then(|el| el.attr("id")) == Some(id))
    }

    pub fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.element(element)?.attr(name)
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Vacant => {}
            NodeKind::Document => self.write_children(id, out),
            NodeKind::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Text(text) => {
                let raw = node
                    .parent
                    .and_then(|parent| self.element(parent))
                    .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name.as_str()));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    return;
                }
                self.write_children(id, out);
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            for child in &node.children {
                self.write_node(*child, out);
            }
        }
    }
}

impl Dom for HtmlDocument {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn query_classes(&self, classes: &[&str]) -> Vec<NodeId> {
        self.descendants(ROOT)
            .into_iter()
            .filter(|id| {
                self.element(*id)
                    .is_some_and(|el| el.classes().any(|c| classes.contains(&c)))
            })
            .collect()
    }

    fn descendants_with_class(&self, element: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(element)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|el| el.has_class(class)))
            .collect()
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.element(element).is_some_and(|el| el.has_class(class))
    }

    fn add_class(&mut self, element: NodeId, class: &str) {
        let Some(el) = self.element_mut(element) else {
            return;
        };
        if el.has_class(class) {
            return;
        }
        let mut classes: Vec<String> = el.classes().map(str::to_string).collect();
        classes.push(class.to_string());
        el.set_attr("class", classes.join(" "));
    }

    fn remove_class(&mut self, element: NodeId, class: &str) {
        let Some(el) = self.element_mut(element) else {
            return;
        };
        if !el.has_class(class) {
            return;
        }
        let classes: Vec<String> = el
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        el.set_attr("class", classes.join(" "));
    }

    fn text_content(&self, element: NodeId) -> String {
        self.descendants(element)
            .into_iter()
            .filter_map(|id| match &self.node(id)?.kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn set_text_content(&mut self, element: NodeId, text: &str) {
        if self.element(element).is_none() {
            return;
        }
        self.clear_children(element);
        if !text.is_empty() {
            self.push(element, NodeKind::Text(text.to_string()));
        }
    }

    fn replace_content(&mut self, element: NodeId, fragments: &[Fragment]) {
        if self.element(element).is_none() {
            return;
        }
        self.clear_children(element);
        for fragment in fragments {
            self.append_fragment(element, fragment);
        }
    }

    fn contains_element_id(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }

    fn append_style(&mut self, id: &str, css: &str) {
        let head = match self.first_element("head") {
            Some(head) => head,
            None => {
                let parent = self.first_element("html").unwrap_or(ROOT);
                self.push(
                    parent,
                    NodeKind::Element(ElementData {
                        name: "head".to_string(),
                        attrs: Vec::new(),
                    }),
                )
            }
        };
        let style = self.push(
            head,
            NodeKind::Element(ElementData {
                name: "style".to_string(),
                attrs: vec![("id".to_string(), id.to_string())],
            }),
        );
        self.push(style, NodeKind::Text(css.to_string()));
    }

    fn inner_html(&self, element: NodeId) -> String {
        let mut out = String::new();
        self.write_children(element, &mut out);
        out
    }

    fn to_html(&self) -> String {
        self.inner_html(ROOT)
    }

    fn describe(&self, element: NodeId) -> String {
        let Some(el) = self.element(element) else {
            return format!("node#{}", element.index());
        };
        let mut label = el.name.clone();
        if let Some(id) = el.attr("id") {
            label.push('#');
            label.push_str(id);
        }
        for class in el.classes() {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_synthesizes_head_and_body() {
        let doc = HtmlDocument::parse("<p>hello</p>");
        assert!(doc.first_element("head").is_some());
        assert!(doc.first_element("body").is_some());
        let p = doc.first_element("p").unwrap();
        assert_eq!(doc.text_content(p), "hello");
    }

    #[test]
    fn class_mutation_keeps_other_classes() {
        let mut doc = HtmlDocument::from_body(r#"<h1 class="title big">Hi</h1>"#);
        let h1 = doc.first_element("h1").unwrap();
        doc.add_class(h1, "processed");
        doc.add_class(h1, "processed");
        assert_eq!(doc.attr(h1, "class"), Some("title big processed"));
        doc.remove_class(h1, "big");
        assert_eq!(doc.attr(h1, "class"), Some("title processed"));
        assert!(!doc.has_class(h1, "big"));
    }

    #[test]
    fn replaced_children_are_unreachable() {
        let mut doc = HtmlDocument::from_body(r#"<p class="x"><b class="old">a</b></p>"#);
        let p = doc.first_element("p").unwrap();
        doc.replace_content(p, &[Fragment::text_span("new", "b")]);
        assert!(doc.query_classes(&["old"]).is_empty());
        assert_eq!(doc.descendants_with_class(p, "new").len(), 1);
        assert_eq!(doc.inner_html(p), r#"<span class="new">b</span>"#);
    }

    #[test]
    fn repeated_replacement_reuses_released_slots() {
        let mut doc = HtmlDocument::from_body(r#"<p id="t">seed</p>"#);
        let p = doc.element_by_id("t").unwrap();
        let spans: Vec<Fragment> = (0..10)
            .map(|i| Fragment::text_span("char", i.to_string()))
            .collect();

        doc.replace_content(p, &spans);
        let live = doc.node_count();
        let allocated = doc.nodes.len();
        for _ in 0..1000 {
            doc.replace_content(p, &spans);
        }
        assert_eq!(doc.node_count(), live);
        assert!(doc.nodes.len() <= allocated + 20);
        assert_eq!(doc.descendants_with_class(p, "char").len(), 10);
        assert_eq!(doc.text_content(p), "0123456789");
    }

    #[test]
    fn released_nodes_are_not_elements() {
        let mut doc = HtmlDocument::from_body(r#"<p id="t"><b id="inner">x</b></p>"#);
        let p = doc.element_by_id("t").unwrap();
        let inner = doc.element_by_id("inner").unwrap();
        doc.set_text_content(p, "");
        assert!(!doc.has_class(inner, "anything"));
        assert_eq!(doc.text_content(inner), "");
        assert_eq!(doc.describe(inner), format!("node#{}", inner.index()));
        assert_eq!(doc.to_html().matches("<b").count(), 0);
    }

    #[test]
    fn raw_text_is_not_escaped() {
        let mut doc = HtmlDocument::from_body("<p>a &amp; b</p>");
        doc.append_style("sheet", ".a > .b { color: red; }");
        let html = doc.to_html();
        assert!(html.contains("<style id=\"sheet\">.a > .b { color: red; }</style>"));
        assert!(html.contains("<p>a &amp; b</p>"));
    }

    #[test]
    fn describe_lists_id_and_classes() {
        let doc = HtmlDocument::from_body(r#"<h2 id="hero" class="one two">x</h2>"#);
        let h2 = doc.element_by_id("hero").unwrap();
        assert_eq!(doc.describe(h2), "h2#hero.one.two");
    }
}
