//! Text segmentation and entrance-animation orchestration.
//!
//! [`TextAnimator`] finds elements marked with one of the mode classes,
//! wraps their text in per-character or per-word spans, and asks an injected
//! [`AnimationEngine`] to stagger those spans into place, optionally gated by
//! an injected [`ScrollLink`].

pub mod animator;
pub mod capabilities;
pub mod error;
pub mod mode;
pub mod plan;
pub mod segment;
pub mod styles;
pub mod tween;

pub use animator::{PassReport, TextAnimator};
pub use capabilities::{AnimationEngine, Capabilities, Dependency, ScrollLink};
pub use error::{AnimatorError, Result};
pub use mode::{AnimationMode, PROCESSED_CLASS};
pub use plan::{AnimationPlan, PlanRecorder, RecordingScrollLink};
pub use tween::{ScrollTriggerSpec, StaggerSpec, TweenRequest, TweenVars, UnitGroup};

pub use animator_config::{AnimatorOptions, ConfigError, Ease, OptionsPatch};
pub use animator_dom::{Dom, Fragment, NodeId, ReadyState};
