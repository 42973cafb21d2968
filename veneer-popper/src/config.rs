//! Caller-supplied overlay configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PassthroughRule, Placement, PopperResult};

/// Offset along the placement axes.
///
/// Accepts either a single distance or a `[skew, distance]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    /// Distance along the main axis only.
    Distance(f64),
    /// `[skew, distance]`; extra components are ignored.
    Pair(Vec<f64>),
}

impl Offset {
    /// Normalize to a `[skew, distance]` pair.
    #[must_use]
    pub fn normalized(&self) -> [f64; 2] {
        match self {
            Self::Distance(distance) => [0.0, *distance],
            Self::Pair(values) => [
                values.first().copied().unwrap_or(0.0),
                values.get(1).copied().unwrap_or(0.0),
            ],
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::Distance(0.0)
    }
}

/// How the floating element's `transform-origin` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformOrigin {
    /// `true` derives the origin from the placement, `false` skips it.
    Auto(bool),
    /// Explicit CSS origin used verbatim.
    Explicit(String),
}

impl Default for TransformOrigin {
    fn default() -> Self {
        Self::Auto(true)
    }
}

/// Configuration for one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Requested placement. Validated when an instance is created.
    #[serde(default = "OverlayConfig::default_placement")]
    pub placement: String,
    /// Offset from the reference element, in pixels.
    #[serde(default)]
    pub offset: Offset,
    /// Padding kept from the clipping boundary.
    #[serde(default = "OverlayConfig::default_boundary_padding")]
    pub boundary_padding: f64,
    /// Padding between the arrow and the floating element's corners.
    #[serde(default = "OverlayConfig::default_arrow_offset")]
    pub arrow_offset: f64,
    /// Whether an arrow element is attached.
    #[serde(default = "OverlayConfig::default_true")]
    pub show_arrow: bool,
    /// Relocate the floating element to the document root on first show.
    #[serde(default = "OverlayConfig::default_true")]
    pub append_to_root: bool,
    /// Suppress all positioning activity.
    #[serde(default)]
    pub disabled: bool,
    /// Transform-origin policy.
    #[serde(default)]
    pub transform_origin: TransformOrigin,
    /// Let the floating element detach from the reference when contained.
    #[serde(default)]
    pub cutoff: bool,
    /// Placements the flip modifier may fall back to, in order.
    #[serde(default)]
    pub fallback_placements: Vec<Placement>,
    /// Attributes copied from the floating element onto the arrow.
    #[serde(default)]
    pub passthrough_attributes: PassthroughRule,
    /// Emit [`crate::OverlayEvent::Updated`] on every recompute.
    #[serde(default)]
    pub track_updates: bool,
    /// Modifier options merged over the built pipeline, keyed by name.
    #[serde(default)]
    pub pipeline_overrides: BTreeMap<String, serde_json::Value>,
}

impl OverlayConfig {
    fn default_placement() -> String {
        "bottom".to_string()
    }

    const fn default_boundary_padding() -> f64 {
        5.0
    }

    const fn default_arrow_offset() -> f64 {
        35.0
    }

    const fn default_true() -> bool {
        true
    }

    /// Parse a configuration from JSON, filling defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> PopperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the requested placement.
    #[must_use]
    pub fn with_placement(mut self, placement: impl Into<String>) -> Self {
        self.placement = placement.into();
        self
    }

    /// Set the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable the arrow.
    #[must_use]
    pub fn with_arrow(mut self, show_arrow: bool) -> Self {
        self.show_arrow = show_arrow;
        self
    }

    /// Enable or disable relocation to the document root.
    #[must_use]
    pub fn with_append_to_root(mut self, append_to_root: bool) -> Self {
        self.append_to_root = append_to_root;
        self
    }

    /// Set the transform-origin policy.
    #[must_use]
    pub fn with_transform_origin(mut self, origin: TransformOrigin) -> Self {
        self.transform_origin = origin;
        self
    }

    /// Set the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Add a modifier override.
    #[must_use]
    pub fn with_override(mut self, name: impl Into<String>, options: serde_json::Value) -> Self {
        self.pipeline_overrides.insert(name.into(), options);
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            placement: Self::default_placement(),
            offset: Offset::default(),
            boundary_padding: Self::default_boundary_padding(),
            arrow_offset: Self::default_arrow_offset(),
            show_arrow: true,
            append_to_root: true,
            disabled: false,
            transform_origin: TransformOrigin::default(),
            cutoff: false,
            fallback_placements: Vec::new(),
            passthrough_attributes: PassthroughRule::default(),
            track_updates: false,
            pipeline_overrides: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = OverlayConfig::from_json("{}").expect("valid config");
        assert_eq!(config, OverlayConfig::default());
        assert!((config.boundary_padding - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.transform_origin, TransformOrigin::Auto(true));
    }

    #[test]
    fn test_offset_number_or_pair() {
        let config = OverlayConfig::from_json(r#"{"offset": 8}"#).expect("number");
        assert_eq!(config.offset.normalized(), [0.0, 8.0]);

        let config = OverlayConfig::from_json(r#"{"offset": [4, 12, 99]}"#).expect("pair");
        assert_eq!(config.offset.normalized(), [4.0, 12.0]);

        let config = OverlayConfig::from_json(r#"{"offset": [3]}"#).expect("short pair");
        assert_eq!(config.offset.normalized(), [3.0, 0.0]);
    }

    #[test]
    fn test_transform_origin_bool_or_string() {
        let config = OverlayConfig::from_json(r#"{"transform_origin": false}"#).expect("bool");
        assert_eq!(config.transform_origin, TransformOrigin::Auto(false));

        let config =
            OverlayConfig::from_json(r#"{"transform_origin": "left top"}"#).expect("string");
        assert_eq!(
            config.transform_origin,
            TransformOrigin::Explicit("left top".to_string())
        );
    }

    #[test]
    fn test_invalid_placement_is_kept_unvalidated() {
        let config = OverlayConfig::from_json(r#"{"placement": "sideways"}"#).expect("parses");
        assert_eq!(config.placement, "sideways");
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = OverlayConfig::from_json("{ nope").expect_err("malformed");
        assert!(matches!(err, crate::PopperError::Config(_)));
    }
}
