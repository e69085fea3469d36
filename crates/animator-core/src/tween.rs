//! Animation requests handed to the engine.
//!
//! A request covers one mode and carries the (element, units) pairs found
//! for that mode, each optionally gated by its own scroll trigger.

use std::fmt;

use animator_config::{AnimatorOptions, Ease};
use animator_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::mode::AnimationMode;

/// Total spread of unit start times within a group, in seconds.
pub const STAGGER_AMOUNT: f64 = 0.5;

/// Word flow runs slower than the configured duration by this factor.
pub const WORD_DURATION_FACTOR: f64 = 1.2;

/// How unit start times are spread across a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaggerSpec {
    /// Seconds between the first and the last unit starting.
    pub amount: f64,
    /// Curve applied to the distribution of start times.
    pub ease: Ease,
}

impl Default for StaggerSpec {
    fn default() -> Self {
        Self {
            amount: STAGGER_AMOUNT,
            ease: Ease::POWER2_IN_OUT,
        }
    }
}

impl StaggerSpec {
    /// Start offset of each of `count` units, in seconds.
    pub fn offsets(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let last = (count - 1) as f64;
                (0..count)
                    .map(|i| self.amount * self.ease.apply(i as f64 / last))
                    .collect()
            }
        }
    }
}

/// Target end state and timing for every unit in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenVars {
    /// Vertical offset to animate to; zero restores the natural position.
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Seconds per unit.
    pub duration: f64,
    pub ease: Ease,
    pub stagger: StaggerSpec,
}

impl TweenVars {
    pub fn for_mode(mode: AnimationMode, options: &AnimatorOptions) -> Self {
        let stagger = StaggerSpec::default();
        match mode {
            AnimationMode::Letters => Self {
                y: 0.0,
                opacity: Some(1.0),
                duration: options.default_duration,
                ease: options.default_ease,
                stagger,
            },
            AnimationMode::Words => Self {
                y: 0.0,
                opacity: None,
                duration: options.default_duration * WORD_DURATION_FACTOR,
                ease: Ease::POWER4_OUT,
                stagger,
            },
            AnimationMode::Staggered => Self {
                y: 0.0,
                opacity: Some(1.0),
                duration: options.default_duration,
                ease: Ease::POWER3_OUT,
                stagger,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Play,
    Reverse,
    None,
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToggleAction::Play => "play",
            ToggleAction::Reverse => "reverse",
            ToggleAction::None => "none",
        })
    }
}

/// What the animation does at each crossing of the trigger point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleActions {
    /// Scrolling down past the start point.
    pub on_enter: ToggleAction,
    /// Scrolling down past the end point.
    pub on_leave: ToggleAction,
    /// Scrolling up back past the end point.
    pub on_enter_back: ToggleAction,
    /// Scrolling up back past the start point.
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// Play once on the way down, reverse on the way back up.
    pub const ENTRANCE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::Reverse,
    };
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        })
    }
}

/// Start point: fires when `element_edge` of the trigger element meets
/// `viewport_edge` of the viewport moved up by `offset` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerStart {
    pub element_edge: Edge,
    pub viewport_edge: Edge,
    pub offset: f64,
}

impl fmt::Display for TriggerStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset == 0.0 {
            write!(f, "{} {}", self.element_edge, self.viewport_edge)
        } else {
            write!(
                f,
                "{} {}-={}",
                self.element_edge, self.viewport_edge, self.offset
            )
        }
    }
}

/// Scroll gate for one element's units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTriggerSpec {
    pub trigger: NodeId,
    pub start: TriggerStart,
    pub toggle_actions: ToggleActions,
}

impl ScrollTriggerSpec {
    /// Play when the element's top passes `offset` pixels above the viewport
    /// bottom while scrolling down; reverse when scrolling back above it.
    pub fn entrance(trigger: NodeId, offset: f64) -> Self {
        Self {
            trigger,
            start: TriggerStart {
                element_edge: Edge::Top,
                viewport_edge: Edge::Bottom,
                offset,
            },
            toggle_actions: ToggleActions::ENTRANCE,
        }
    }
}

/// Units of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitGroup {
    pub element: NodeId,
    pub units: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_trigger: Option<ScrollTriggerSpec>,
}

/// One grouped request per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenRequest {
    pub mode: AnimationMode,
    pub vars: TweenVars,
    pub groups: Vec<UnitGroup>,
}

impl TweenRequest {
    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(|group| group.units.len()).sum()
    }
}
