//! Text animator configuration
//!
//! Options are merged from a partial patch over documented defaults and
//! validated once. Patches can come from a JSON-style value, from an
//! `animator.toml` file, or from environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub mod ease;
mod error;

pub use ease::{Curve, Ease, EaseDirection};
pub use error::ConfigError;

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "animator.toml";

/// Fully resolved animator options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimatorOptions {
    /// Gate animations on scroll position when a scroll link is available
    pub use_scroll_trigger: bool,
    /// Distance in pixels above the viewport bottom at which animations start
    pub scroll_trigger_offset: f64,
    /// Base animation duration in seconds
    pub default_duration: f64,
    /// Curve used by the letter cascade
    pub default_ease: Ease,
    /// Inject the unit stylesheet into the document head
    pub auto_inject_styles: bool,
    /// Emit verbose tracing
    pub debug: bool,
}

impl Default for AnimatorOptions {
    fn default() -> Self {
        Self {
            use_scroll_trigger: true,
            scroll_trigger_offset: 100.0,
            default_duration: 1.0,
            default_ease: Ease::POWER3_OUT,
            auto_inject_styles: true,
            debug: false,
        }
    }
}

impl AnimatorOptions {
    /// Overlay every field set in `patch` on top of `self`.
    pub fn merged(mut self, patch: &OptionsPatch) -> Self {
        if let Some(v) = patch.use_scroll_trigger {
            self.use_scroll_trigger = v;
        }
        if let Some(v) = patch.scroll_trigger_offset {
            self.scroll_trigger_offset = v;
        }
        if let Some(v) = patch.default_duration {
            self.default_duration = v;
        }
        if let Some(v) = patch.default_ease {
            self.default_ease = v;
        }
        if let Some(v) = patch.auto_inject_styles {
            self.auto_inject_styles = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
        self
    }

    /// Check the numeric invariants: duration > 0, offset >= 0, both finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_duration.is_finite() || self.default_duration <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.default_duration));
        }
        if !self.scroll_trigger_offset.is_finite() || self.scroll_trigger_offset < 0.0 {
            return Err(ConfigError::InvalidOffset(self.scroll_trigger_offset));
        }
        Ok(())
    }
}

/// A partial set of options; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsPatch {
    #[serde(alias = "use_scroll_trigger", skip_serializing_if = "Option::is_none")]
    pub use_scroll_trigger: Option<bool>,
    #[serde(alias = "scroll_trigger_offset", skip_serializing_if = "Option::is_none")]
    pub scroll_trigger_offset: Option<f64>,
    #[serde(alias = "default_duration", skip_serializing_if = "Option::is_none")]
    pub default_duration: Option<f64>,
    #[serde(alias = "default_ease", skip_serializing_if = "Option::is_none")]
    pub default_ease: Option<Ease>,
    #[serde(alias = "auto_inject_styles", skip_serializing_if = "Option::is_none")]
    pub auto_inject_styles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl OptionsPatch {
    /// Build a patch from a loosely typed options value.
    ///
    /// `null` is treated as an empty patch. Any other non-object value is
    /// rejected, as is a recognized key holding a value of the wrong type.
    /// Unrecognized keys are ignored.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        use serde_json::Value;

        let kind = match &value {
            Value::Null => return Ok(Self::default()),
            Value::Object(_) => None,
            Value::Bool(_) => Some("a boolean"),
            Value::Number(_) => Some("a number"),
            Value::String(_) => Some("a string"),
            Value::Array(_) => Some("an array"),
        };
        if let Some(kind) = kind {
            return Err(ConfigError::NotAnObject(kind));
        }
        serde_json::from_value(value).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn extend(&mut self, other: &OptionsPatch) {
        if other.use_scroll_trigger.is_some() {
            self.use_scroll_trigger = other.use_scroll_trigger;
        }
        if other.scroll_trigger_offset.is_some() {
            self.scroll_trigger_offset = other.scroll_trigger_offset;
        }
        if other.default_duration.is_some() {
            self.default_duration = other.default_duration;
        }
        if other.default_ease.is_some() {
            self.default_ease = other.default_ease;
        }
        if other.auto_inject_styles.is_some() {
            self.auto_inject_styles = other.auto_inject_styles;
        }
        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }

    /// Load a patch from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `animator.toml` from the current directory, or an empty patch if
    /// it is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_file(path).unwrap_or_else(|err| {
            warn!(%err, "ignoring unreadable {DEFAULT_CONFIG_FILE}");
            Self::default()
        })
    }

    /// Merge environment overrides into the patch.
    ///
    /// Environment variables take precedence over file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_SCROLL_TRIGGER") {
            self.use_scroll_trigger = Some(parse_flag(&val));
        }
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_SCROLL_OFFSET") {
            match val.parse::<f64>() {
                Ok(offset) => self.scroll_trigger_offset = Some(offset),
                Err(_) => warn!(value = %val, "TEXT_ANIMATOR_SCROLL_OFFSET is not a number"),
            }
        }
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_DURATION") {
            match val.parse::<f64>() {
                Ok(duration) => self.default_duration = Some(duration),
                Err(_) => warn!(value = %val, "TEXT_ANIMATOR_DURATION is not a number"),
            }
        }
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_EASE") {
            match val.parse::<Ease>() {
                Ok(ease) => self.default_ease = Some(ease),
                Err(err) => warn!(%err, "ignoring TEXT_ANIMATOR_EASE"),
            }
        }
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_INJECT_STYLES") {
            self.auto_inject_styles = Some(parse_flag(&val));
        }
        if let Ok(val) = std::env::var("TEXT_ANIMATOR_DEBUG") {
            self.debug = Some(parse_flag(&val));
        }
    }

    /// Load the file patch and apply environment overrides on top.
    pub fn load() -> Self {
        let mut patch = Self::load_or_default();
        patch.merge_with_env();
        patch
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = AnimatorOptions::default();
        assert!(options.use_scroll_trigger);
        assert_eq!(options.scroll_trigger_offset, 100.0);
        assert_eq!(options.default_duration, 1.0);
        assert_eq!(options.default_ease, Ease::POWER3_OUT);
        assert!(options.auto_inject_styles);
        assert!(!options.debug);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_patch_overlays_defaults() {
        let patch = OptionsPatch::from_value(json!({
            "defaultDuration": 2.5,
            "useScrollTrigger": false,
            "defaultEase": "power2.inOut",
            "somethingElse": 42
        }))
        .unwrap();
        let options = AnimatorOptions::default().merged(&patch);
        assert_eq!(options.default_duration, 2.5);
        assert!(!options.use_scroll_trigger);
        assert_eq!(options.default_ease, Ease::POWER2_IN_OUT);
        assert_eq!(options.scroll_trigger_offset, 100.0);
    }

    #[test]
    fn test_null_is_empty_patch() {
        assert_eq!(
            OptionsPatch::from_value(serde_json::Value::Null).unwrap(),
            OptionsPatch::default()
        );
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            OptionsPatch::from_value(json!("fast")),
            Err(ConfigError::NotAnObject("a string"))
        ));
        assert!(matches!(
            OptionsPatch::from_value(json!([1, 2])),
            Err(ConfigError::NotAnObject("an array"))
        ));
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        assert!(matches!(
            OptionsPatch::from_value(json!({ "defaultDuration": "slow" })),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            OptionsPatch::from_value(json!({ "defaultEase": "wobble" })),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_validation_bounds() {
        let zero = AnimatorOptions {
            default_duration: 0.0,
            ..AnimatorOptions::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidDuration(_))));

        let nan = AnimatorOptions {
            default_duration: f64::NAN,
            ..AnimatorOptions::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::InvalidDuration(_))));

        let negative_offset = AnimatorOptions {
            scroll_trigger_offset: -1.0,
            ..AnimatorOptions::default()
        };
        assert!(matches!(
            negative_offset.validate(),
            Err(ConfigError::InvalidOffset(_))
        ));

        let zero_offset = AnimatorOptions {
            scroll_trigger_offset: 0.0,
            ..AnimatorOptions::default()
        };
        assert!(zero_offset.validate().is_ok());
    }

    #[test]
    fn test_extend_prefers_later_values() {
        let mut base = OptionsPatch {
            debug: Some(false),
            default_duration: Some(2.0),
            ..OptionsPatch::default()
        };
        base.extend(&OptionsPatch {
            debug: Some(true),
            ..OptionsPatch::default()
        });
        assert_eq!(base.debug, Some(true));
        assert_eq!(base.default_duration, Some(2.0));
    }

    #[test]
    fn test_toml_file_accepts_both_key_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animator.toml");
        std::fs::write(
            &path,
            "scrollTriggerOffset = 40.0\ndefault_ease = \"power4.out\"\ndebug = true\n",
        )
        .unwrap();

        let patch = OptionsPatch::load_from_file(&path).unwrap();
        assert_eq!(patch.scroll_trigger_offset, Some(40.0));
        assert_eq!(patch.default_ease, Some(Ease::POWER4_OUT));
        assert_eq!(patch.debug, Some(true));
        assert_eq!(patch.use_scroll_trigger, None);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = OptionsPatch::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("TEXT_ANIMATOR_DURATION", "0.75");
            std::env::set_var("TEXT_ANIMATOR_DEBUG", "true");
            std::env::set_var("TEXT_ANIMATOR_EASE", "not-a-curve");
        }

        let mut patch = OptionsPatch {
            default_ease: Some(Ease::POWER4_OUT),
            ..OptionsPatch::default()
        };
        patch.merge_with_env();

        assert_eq!(patch.default_duration, Some(0.75));
        assert_eq!(patch.debug, Some(true));
        assert_eq!(patch.default_ease, Some(Ease::POWER4_OUT));

        unsafe {
            std::env::remove_var("TEXT_ANIMATOR_DURATION");
            std::env::remove_var("TEXT_ANIMATOR_DEBUG");
            std::env::remove_var("TEXT_ANIMATOR_EASE");
        }
    }
}
