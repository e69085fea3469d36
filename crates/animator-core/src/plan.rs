//! Recording engine and scroll link.
//!
//! [`PlanRecorder`] stands in for a real tween engine: it keeps every
//! request and renders them as an [`AnimationPlan`] with concrete per-unit
//! timings. Clones share the same recording, so a host can keep one handle
//! and give the other to the animator.

use std::cell::RefCell;
use std::rc::Rc;

use animator_config::Ease;
use animator_dom::{Dom, NodeId};
use serde::Serialize;
use tracing::trace;

use crate::capabilities::{AnimationEngine, ScrollLink};
use crate::mode::AnimationMode;
use crate::tween::{ScrollTriggerSpec, StaggerSpec, TweenRequest};

#[derive(Debug, Default)]
struct Recording {
    plugins: Vec<String>,
    requests: Vec<TweenRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanRecorder {
    inner: Rc<RefCell<Recording>>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<TweenRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn plugins(&self) -> Vec<String> {
        self.inner.borrow().plugins.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    /// Drop recorded requests, keeping registered plugins.
    pub fn clear_requests(&self) {
        self.inner.borrow_mut().requests.clear();
    }

    /// Resolve recorded requests against `dom` into a serializable plan.
    pub fn plan(&self, dom: &dyn Dom) -> AnimationPlan {
        let recording = self.inner.borrow();
        AnimationPlan {
            plugins: recording.plugins.clone(),
            tweens: recording
                .requests
                .iter()
                .map(|request| PlannedTween::resolve(request, dom))
                .collect(),
        }
    }
}

impl AnimationEngine for PlanRecorder {
    fn register_plugin(&mut self, name: &str) {
        let mut recording = self.inner.borrow_mut();
        if !recording.plugins.iter().any(|p| p == name) {
            recording.plugins.push(name.to_string());
        }
    }

    fn tween_to(&mut self, request: &TweenRequest) {
        trace!(
            mode = ?request.mode,
            groups = request.groups.len(),
            units = request.unit_count(),
            "recording tween request"
        );
        self.inner.borrow_mut().requests.push(request.clone());
    }

    fn kill_tweens_of(&mut self, elements: &[NodeId]) {
        let mut recording = self.inner.borrow_mut();
        for request in &mut recording.requests {
            request.groups.retain(|group| !elements.contains(&group.element));
        }
        recording.requests.retain(|request| !request.groups.is_empty());
    }
}

/// Everything the animator asked the engine to do.
#[derive(Debug, Clone, Serialize)]
pub struct AnimationPlan {
    pub plugins: Vec<String>,
    pub tweens: Vec<PlannedTween>,
}

impl AnimationPlan {
    /// Time at which the last unit finishes, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.tweens
            .iter()
            .flat_map(|tween| tween.groups.iter())
            .flat_map(|group| group.units.iter())
            .map(|unit| unit.end)
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedTween {
    pub mode: AnimationMode,
    pub label: &'static str,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub duration: f64,
    pub ease: Ease,
    pub stagger: StaggerSpec,
    pub groups: Vec<PlannedGroup>,
}

impl PlannedTween {
    fn resolve(request: &TweenRequest, dom: &dyn Dom) -> Self {
        let vars = &request.vars;
        let groups = request
            .groups
            .iter()
            .map(|group| {
                let offsets = vars.stagger.offsets(group.units.len());
                PlannedGroup {
                    element: dom.describe(group.element),
                    scroll_trigger: group.scroll_trigger.as_ref().map(|trigger| {
                        PlannedTrigger {
                            start: trigger.start.to_string(),
                            toggle_actions: trigger.toggle_actions.to_string(),
                        }
                    }),
                    units: group
                        .units
                        .iter()
                        .zip(offsets)
                        .map(|(unit, start)| PlannedUnit {
                            text: dom.text_content(*unit),
                            start,
                            end: start + vars.duration,
                        })
                        .collect(),
                }
            })
            .collect();
        Self {
            mode: request.mode,
            label: request.mode.label(),
            y: vars.y,
            opacity: vars.opacity,
            duration: vars.duration,
            ease: vars.ease,
            stagger: vars.stagger,
            groups,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedGroup {
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_trigger: Option<PlannedTrigger>,
    pub units: Vec<PlannedUnit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedTrigger {
    pub start: String,
    pub toggle_actions: String,
}

/// One unit's playback window relative to its trigger, in seconds.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedUnit {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Scroll link that only records the triggers it was asked to observe.
#[derive(Debug, Clone, Default)]
pub struct RecordingScrollLink {
    observed: Rc<RefCell<Vec<ScrollTriggerSpec>>>,
}

impl RecordingScrollLink {
    pub const PLUGIN_NAME: &'static str = "ScrollTrigger";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn observed(&self) -> Vec<ScrollTriggerSpec> {
        self.observed.borrow().clone()
    }
}

impl ScrollLink for RecordingScrollLink {
    fn plugin_name(&self) -> &str {
        Self::PLUGIN_NAME
    }

    fn observe(&mut self, trigger: &ScrollTriggerSpec) {
        self.observed.borrow_mut().push(trigger.clone());
    }

    fn release(&mut self, elements: &[NodeId]) {
        self.observed
            .borrow_mut()
            .retain(|trigger| !elements.contains(&trigger.trigger));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::{TweenVars, UnitGroup};
    use animator_config::AnimatorOptions;
    use animator_dom::{Fragment, HtmlDocument};

    #[test]
    fn clones_share_one_recording() {
        let recorder = PlanRecorder::new();
        let mut engine = recorder.clone();
        engine.register_plugin("ScrollTrigger");
        engine.register_plugin("ScrollTrigger");
        engine.tween_to(&TweenRequest {
            mode: AnimationMode::Words,
            vars: TweenVars::for_mode(AnimationMode::Words, &AnimatorOptions::default()),
            groups: Vec::new(),
        });
        assert_eq!(recorder.plugins(), vec!["ScrollTrigger".to_string()]);
        assert_eq!(recorder.request_count(), 1);
        recorder.clear_requests();
        assert_eq!(engine.request_count(), 0);
    }

    #[test]
    fn killed_groups_leave_the_recording() {
        let (a, b) = (NodeId::new(3), NodeId::new(7));
        let group = |element: NodeId| UnitGroup {
            element,
            units: vec![NodeId::new(element.index() + 1)],
            scroll_trigger: Some(ScrollTriggerSpec::entrance(element, 100.0)),
        };
        let mut recorder = PlanRecorder::new();
        let mut link = RecordingScrollLink::new();
        let request = TweenRequest {
            mode: AnimationMode::Letters,
            vars: TweenVars::for_mode(AnimationMode::Letters, &AnimatorOptions::default()),
            groups: vec![group(a), group(b)],
        };
        for trigger in request.groups.iter().filter_map(|g| g.scroll_trigger.as_ref()) {
            link.observe(trigger);
        }
        recorder.tween_to(&request);

        recorder.kill_tweens_of(&[a]);
        link.release(&[a]);
        let requests = recorder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].groups.len(), 1);
        assert_eq!(requests[0].groups[0].element, b);
        assert_eq!(link.observed().len(), 1);

        recorder.kill_tweens_of(&[b]);
        assert_eq!(recorder.request_count(), 0);
    }

    #[test]
    fn plan_resolves_unit_timings() {
        let mut doc = HtmlDocument::from_body(r#"<p id="t">x</p>"#);
        let p = doc.element_by_id("t").unwrap();
        doc.replace_content(
            p,
            &[
                Fragment::text_span("char", "a"),
                Fragment::text_span("char", "b"),
            ],
        );
        let units = doc.descendants_with_class(p, "char");

        let mut recorder = PlanRecorder::new();
        recorder.tween_to(&TweenRequest {
            mode: AnimationMode::Letters,
            vars: TweenVars::for_mode(AnimationMode::Letters, &AnimatorOptions::default()),
            groups: vec![UnitGroup {
                element: p,
                units,
                scroll_trigger: Some(ScrollTriggerSpec::entrance(p, 100.0)),
            }],
        });

        let plan = recorder.plan(&doc);
        let group = &plan.tweens[0].groups[0];
        assert_eq!(group.element, "p#t");
        assert_eq!(group.units[0].text, "a");
        assert_eq!(group.units[0].start, 0.0);
        assert!((group.units[1].start - 0.5).abs() < 1e-9);
        assert!((plan.total_duration() - 1.5).abs() < 1e-9);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["tweens"][0]["ease"], "power3.out");
        assert_eq!(
            json["tweens"][0]["groups"][0]["scroll_trigger"]["start"],
            "top bottom-=100"
        );
    }
}
