//! Capability injection.
//!
//! The animator owns nothing it did not receive here: a document, an
//! animation engine, and optionally a scroll link. Hosts substitute any of
//! them, and tests pass recording doubles.

use std::fmt;

use animator_dom::{Dom, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::{AnimatorError, Result};
use crate::tween::{ScrollTriggerSpec, TweenRequest};

/// Tween engine that plays requests over time.
pub trait AnimationEngine {
    /// Called once at construction when a scroll link will gate animations.
    fn register_plugin(&mut self, _name: &str) {}

    /// Animate every unit in `request` to its target state.
    fn tween_to(&mut self, request: &TweenRequest);

    /// Discard tweens targeting any of `elements`. Called before their
    /// markup is regenerated.
    fn kill_tweens_of(&mut self, _elements: &[NodeId]) {}
}

/// Scroll-position mechanism that fires play/reverse on gated tweens.
pub trait ScrollLink {
    /// Name the engine knows this link by.
    fn plugin_name(&self) -> &str;

    /// Start watching the trigger element described by `trigger`.
    fn observe(&mut self, trigger: &ScrollTriggerSpec);

    /// Stop watching triggers on any of `elements`.
    fn release(&mut self, _elements: &[NodeId]) {}
}

/// A required capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    Dom,
    AnimationEngine,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dependency::Dom => "DOM access",
            Dependency::AnimationEngine => "an animation engine",
        })
    }
}

/// Capabilities offered to [`crate::TextAnimator`].
#[derive(Default)]
pub struct Capabilities {
    dom: Option<Box<dyn Dom>>,
    engine: Option<Box<dyn AnimationEngine>>,
    scroll_link: Option<Box<dyn ScrollLink>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dom(mut self, dom: impl Dom + 'static) -> Self {
        self.dom = Some(Box::new(dom));
        self
    }

    pub fn with_engine(mut self, engine: impl AnimationEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    pub fn with_scroll_link(mut self, link: impl ScrollLink + 'static) -> Self {
        self.scroll_link = Some(Box::new(link));
        self
    }

    /// Check that the required capabilities are present.
    pub(crate) fn resolve(self) -> Result<Resolved> {
        let dom = self
            .dom
            .ok_or(AnimatorError::MissingDependency(Dependency::Dom))?;
        let engine = self
            .engine
            .ok_or(AnimatorError::MissingDependency(Dependency::AnimationEngine))?;
        Ok(Resolved {
            dom,
            engine,
            scroll_link: self.scroll_link,
        })
    }
}

pub(crate) struct Resolved {
    pub dom: Box<dyn Dom>,
    pub engine: Box<dyn AnimationEngine>,
    pub scroll_link: Option<Box<dyn ScrollLink>>,
}
