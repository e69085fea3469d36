//! The text animator.

use animator_config::{AnimatorOptions, OptionsPatch};
use animator_dom::{Dom, NodeId, ReadyState};
use tracing::{debug, error, info, warn};

use crate::capabilities::{AnimationEngine, Capabilities, Resolved, ScrollLink};
use crate::error::{AnimatorError, Result};
use crate::mode::{AnimationMode, PROCESSED_CLASS, discover};
use crate::segment::segment;
use crate::styles::inject_styles;
use crate::tween::{ScrollTriggerSpec, TweenRequest, TweenVars, UnitGroup};

/// Outcome of one discovery → segmentation → animation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Marked elements found in the document.
    pub discovered: usize,
    /// Elements segmented during this pass.
    pub segmented: usize,
    /// Requests issued to the engine.
    pub requests: usize,
    /// Units covered by those requests.
    pub units: usize,
}

/// Segments marked elements and requests their entrance animations.
pub struct TextAnimator {
    options: AnimatorOptions,
    dom: Box<dyn Dom>,
    engine: Box<dyn AnimationEngine>,
    scroll_link: Option<Box<dyn ScrollLink>>,
    waiting_for_content: bool,
    last_pass: Option<PassReport>,
}

impl TextAnimator {
    /// Merge `patch` over the defaults and construct.
    pub fn new(capabilities: Capabilities, patch: &OptionsPatch) -> Result<Self> {
        let resolved = capabilities.resolve()?;
        Self::build(resolved, AnimatorOptions::default().merged(patch))
    }

    /// Construct from a loosely typed options value such as parsed JSON.
    pub fn from_value(capabilities: Capabilities, options: serde_json::Value) -> Result<Self> {
        let resolved = capabilities.resolve()?;
        let patch = OptionsPatch::from_value(options)?;
        Self::build(resolved, AnimatorOptions::default().merged(&patch))
    }

    pub fn with_options(capabilities: Capabilities, options: AnimatorOptions) -> Result<Self> {
        let resolved = capabilities.resolve()?;
        Self::build(resolved, options)
    }

    fn build(resolved: Resolved, mut options: AnimatorOptions) -> Result<Self> {
        let Resolved {
            mut dom,
            mut engine,
            scroll_link,
        } = resolved;

        if options.debug {
            debug!("initializing text animator");
            debug!(?options, "current options");
        }

        if let Err(err) = options.validate() {
            let err = AnimatorError::from(err);
            if options.debug {
                error!(%err, "rejecting text animator options");
            }
            return Err(err);
        }

        let scroll_link = if options.use_scroll_trigger {
            match scroll_link {
                Some(link) => {
                    engine.register_plugin(link.plugin_name());
                    if options.debug {
                        debug!(plugin = link.plugin_name(), "scroll trigger is enabled");
                    }
                    Some(link)
                }
                None => {
                    if options.debug {
                        warn!("no scroll link available; animating unconditionally");
                    }
                    options.use_scroll_trigger = false;
                    None
                }
            }
        } else {
            if options.debug {
                debug!("scroll trigger is disabled");
            }
            None
        };

        if options.auto_inject_styles && inject_styles(dom.as_mut()) && options.debug {
            debug!("styles have been injected");
        }

        let waiting_for_content = dom.ready_state() == ReadyState::Loading;
        let mut animator = Self {
            options,
            dom,
            engine,
            scroll_link,
            waiting_for_content,
            last_pass: None,
        };

        if animator.waiting_for_content {
            if animator.options.debug {
                debug!("document still loading; deferring until content is loaded");
            }
        } else {
            animator.run_pass();
        }
        Ok(animator)
    }

    /// Run the deferred first pass once the document finished loading.
    ///
    /// Returns `None` when no pass was pending.
    pub fn handle_content_loaded(&mut self) -> Option<PassReport> {
        if !self.waiting_for_content {
            return None;
        }
        self.waiting_for_content = false;
        Some(self.run_pass())
    }

    /// Clear the processed marker on every marked element and run the
    /// pipeline again against the current text.
    pub fn refresh(&mut self) -> Result<PassReport> {
        if self.options.debug {
            debug!("refreshing animations");
        }

        let elements = self.dom.query_classes(&AnimationMode::MARKERS);
        if elements.is_empty() {
            let err = AnimatorError::RefreshFailed;
            if self.options.debug {
                error!(%err, "refresh failed");
            }
            return Err(err);
        }

        for element in elements {
            self.dom.remove_class(element, PROCESSED_CLASS);
        }
        self.waiting_for_content = false;
        let report = self.run_pass();

        if self.options.debug {
            debug!(?report, "refresh complete");
        }
        Ok(report)
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.options.debug = enabled;
        info!("debug mode {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn options(&self) -> &AnimatorOptions {
        &self.options
    }

    /// Whether requests are gated by the scroll link.
    pub fn scroll_trigger_active(&self) -> bool {
        self.options.use_scroll_trigger && self.scroll_link.is_some()
    }

    pub fn is_waiting_for_content(&self) -> bool {
        self.waiting_for_content
    }

    pub fn last_pass(&self) -> Option<PassReport> {
        self.last_pass
    }

    pub fn dom(&self) -> &dyn Dom {
        self.dom.as_ref()
    }

    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        self.dom.as_mut()
    }

    fn run_pass(&mut self) -> PassReport {
        let discovered = discover(self.dom.as_ref()).len();
        if self.options.debug {
            debug!(count = discovered, "found elements to animate");
        }

        let mut report = PassReport {
            discovered,
            ..PassReport::default()
        };
        if discovered == 0 {
            if self.options.debug {
                warn!("no animatable elements found in the document");
            }
            self.last_pass = Some(report);
            return report;
        }

        for mode in AnimationMode::ALL {
            report.segmented += self.segment_mode(mode);
        }
        // segmenting an outer element drops any marked elements nested in it
        let elements = discover(self.dom.as_ref());
        for mode in AnimationMode::ALL {
            if let Some(request) = self.build_request(mode, &elements) {
                self.issue(&request);
                report.requests += 1;
                report.units += request.unit_count();
            }
        }

        self.last_pass = Some(report);
        report
    }

    /// Segment every unprocessed element of `mode`; returns how many.
    fn segment_mode(&mut self, mode: AnimationMode) -> usize {
        let pending: Vec<NodeId> = discover(self.dom.as_ref())
            .into_iter()
            .filter(|(_, m)| *m == mode)
            .map(|(id, _)| id)
            .filter(|id| !self.dom.has_class(*id, PROCESSED_CLASS))
            .collect();
        if self.options.debug {
            debug!(count = pending.len(), "processing {} animations", mode.label());
        }

        for element in &pending {
            self.release(*element);
            let text = self.dom.text_content(*element);
            let fragments = segment(mode, &text);
            self.dom.replace_content(*element, &fragments);
            self.dom.add_class(*element, PROCESSED_CLASS);
        }
        pending.len()
    }

    /// Tell the engine and scroll link that `element` and any marked
    /// elements inside it are about to lose their units.
    fn release(&mut self, element: NodeId) {
        let mut superseded = vec![element];
        for marker in AnimationMode::MARKERS {
            superseded.extend(self.dom.descendants_with_class(element, marker));
        }
        self.engine.kill_tweens_of(&superseded);
        if let Some(link) = self.scroll_link.as_mut() {
            link.release(&superseded);
        }
    }

    /// Pair each element of `mode` with its units. Elements without units are
    /// left out; `None` when nothing is left to animate.
    fn build_request(
        &self,
        mode: AnimationMode,
        elements: &[(NodeId, AnimationMode)],
    ) -> Option<TweenRequest> {
        let gated = self.scroll_trigger_active();
        let groups: Vec<UnitGroup> = elements
            .iter()
            .filter(|(_, m)| *m == mode)
            .map(|(element, _)| UnitGroup {
                element: *element,
                units: self.dom.descendants_with_class(*element, mode.unit_class()),
                scroll_trigger: gated.then(|| {
                    ScrollTriggerSpec::entrance(*element, self.options.scroll_trigger_offset)
                }),
            })
            .filter(|group| !group.units.is_empty())
            .collect();
        if groups.is_empty() {
            return None;
        }
        Some(TweenRequest {
            mode,
            vars: TweenVars::for_mode(mode, &self.options),
            groups,
        })
    }

    fn issue(&mut self, request: &TweenRequest) {
        if let Some(link) = self.scroll_link.as_mut() {
            for trigger in request.groups.iter().filter_map(|g| g.scroll_trigger.as_ref()) {
                link.observe(trigger);
            }
        }
        self.engine.tween_to(request);
        if self.options.debug {
            debug!(units = request.unit_count(), "created {} animation", request.mode.label());
        }
    }
}
