use animator_dom::{Dom, NodeId};
use serde::{Deserialize, Serialize};

/// Class added to an element once its text has been segmented.
pub const PROCESSED_CLASS: &str = "processed";

/// Segmentation and animation style, selected by a marker class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationMode {
    /// One unit per character, cascading in.
    Letters,
    /// One clipped unit per word, sliding up inside its wrapper.
    Words,
    /// One clipped wrapper per word, sliding and fading in.
    Staggered,
}

impl AnimationMode {
    /// Every mode, in processing order.
    pub const ALL: [AnimationMode; 3] = [Self::Letters, Self::Words, Self::Staggered];

    /// Marker classes for every mode, in processing order.
    pub const MARKERS: [&'static str; 3] = [
        Self::Letters.marker_class(),
        Self::Words.marker_class(),
        Self::Staggered.marker_class(),
    ];

    pub const fn marker_class(self) -> &'static str {
        match self {
            Self::Letters => "animate-text-letters",
            Self::Words => "animate-text-words",
            Self::Staggered => "animate-text-staggered",
        }
    }

    /// Class of the generated spans the engine animates.
    pub const fn unit_class(self) -> &'static str {
        match self {
            Self::Letters => "char",
            Self::Words => "word",
            Self::Staggered => "word-wrapper",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Letters => "letter cascade",
            Self::Words => "word flow",
            Self::Staggered => "staggered slide",
        }
    }

    /// Mode of an element; the first matching marker wins.
    pub fn of(dom: &dyn Dom, element: NodeId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| dom.has_class(element, mode.marker_class()))
    }
}

/// Every marked element in document order, paired with its mode.
pub fn discover(dom: &dyn Dom) -> Vec<(NodeId, AnimationMode)> {
    dom.query_classes(&AnimationMode::MARKERS)
        .into_iter()
        .filter_map(|id| AnimationMode::of(dom, id).map(|mode| (id, mode)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use animator_dom::HtmlDocument;

    #[test]
    fn discovers_in_document_order() {
        let doc = HtmlDocument::from_body(
            r#"
            <p class="animate-text-staggered">c</p>
            <h1 class="animate-text-letters">a</h1>
            <p>plain</p>
            <h2 class="animate-text-words processed">b</h2>
            "#,
        );
        let modes: Vec<AnimationMode> = discover(&doc).into_iter().map(|(_, m)| m).collect();
        assert_eq!(
            modes,
            vec![
                AnimationMode::Staggered,
                AnimationMode::Letters,
                AnimationMode::Words
            ]
        );
    }

    #[test]
    fn first_marker_wins() {
        let doc = HtmlDocument::from_body(
            r#"<h1 class="animate-text-staggered animate-text-letters">a</h1>"#,
        );
        let found = discover(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, AnimationMode::Letters);
    }
}
