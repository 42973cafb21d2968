//! Modifier pipeline construction.
//!
//! The pipeline order is fixed: offset, boundary containment, arrow, flip.
//! Containment must see the offset already applied, the arrow is centered on
//! the contained box, and flip runs last because it can invalidate the
//! placement the others worked from.

use serde_json::{json, Value};

use crate::{OverlayConfig, Placement};

/// Name of the offset modifier.
pub const OFFSET: &str = "offset";
/// Name of the boundary-containment modifier.
pub const PREVENT_OVERFLOW: &str = "preventOverflow";
/// Name of the arrow modifier.
pub const ARROW: &str = "arrow";
/// Name of the flip modifier.
pub const FLIP: &str = "flip";

/// Options of one modifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifierOptions<N> {
    /// Offset from the reference as `[skew, distance]`.
    Offset {
        /// Cross-axis skew and main-axis distance.
        offset: [f64; 2],
    },
    /// Keep the floating element inside its clipping boundary.
    PreventOverflow {
        /// Padding kept from the boundary.
        padding: f64,
        /// Check against the clipping ancestor instead of the positioning root.
        alt_boundary: bool,
        /// Keep the floating element tethered to its reference.
        tether: bool,
    },
    /// Position the arrow element.
    Arrow {
        /// The arrow node.
        element: N,
        /// Padding from the floating element's corners.
        padding: f64,
    },
    /// Swap to a fallback placement on overflow.
    Flip {
        /// Fallback placements; empty uses the algorithm's default order.
        fallback_placements: Vec<Placement>,
    },
    /// Caller-supplied options that replaced the built ones.
    Custom(Value),
}

/// A named step in the positioning pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierSpec<N> {
    /// Modifier name as the positioning algorithm knows it.
    pub name: String,
    /// Modifier options.
    pub options: ModifierOptions<N>,
}

impl<N> ModifierSpec<N> {
    fn new(name: &str, options: ModifierOptions<N>) -> Self {
        Self {
            name: name.to_string(),
            options,
        }
    }

    /// Options in the positioning algorithm's JSON shape.
    ///
    /// Node handles are not data; the arrow element is left for the adapter
    /// to attach.
    #[must_use]
    pub fn options_json(&self) -> Value {
        match &self.options {
            ModifierOptions::Offset { offset } => json!({ "offset": offset }),
            ModifierOptions::PreventOverflow {
                padding,
                alt_boundary,
                tether,
            } => json!({
                "padding": padding,
                "altBoundary": alt_boundary,
                "tether": tether,
            }),
            ModifierOptions::Arrow { padding, .. } => json!({ "padding": padding }),
            ModifierOptions::Flip {
                fallback_placements,
            } if fallback_placements.is_empty() => json!({}),
            ModifierOptions::Flip {
                fallback_placements,
            } => json!({ "fallbackPlacements": fallback_placements }),
            ModifierOptions::Custom(value) => value.clone(),
        }
    }

    /// The whole modifier as `{"name": ..., "options": ...}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "name": self.name, "options": self.options_json() })
    }
}

/// Build the modifier pipeline for `config`.
///
/// The arrow modifier is included only when the config asks for an arrow and
/// a handle is available. Overrides replace the options of a built modifier
/// wholesale; unknown names are appended after the fixed sequence.
#[must_use]
pub fn build<N: Clone>(config: &OverlayConfig, arrow: Option<&N>) -> Vec<ModifierSpec<N>> {
    let mut modifiers = vec![
        ModifierSpec::new(
            OFFSET,
            ModifierOptions::Offset {
                offset: config.offset.normalized(),
            },
        ),
        ModifierSpec::new(
            PREVENT_OVERFLOW,
            ModifierOptions::PreventOverflow {
                padding: config.boundary_padding,
                alt_boundary: true,
                tether: config.cutoff,
            },
        ),
    ];

    match (config.show_arrow, arrow) {
        (true, Some(element)) => modifiers.push(ModifierSpec::new(
            ARROW,
            ModifierOptions::Arrow {
                element: element.clone(),
                padding: config.arrow_offset,
            },
        )),
        (true, None) => tracing::warn!("Arrow requested but unavailable; omitting arrow modifier"),
        (false, _) => {}
    }

    modifiers.push(ModifierSpec::new(
        FLIP,
        ModifierOptions::Flip {
            fallback_placements: config.fallback_placements.clone(),
        },
    ));

    for (name, options) in &config.pipeline_overrides {
        let custom = ModifierOptions::Custom(options.clone());
        match modifiers.iter_mut().find(|m| m.name == *name) {
            Some(existing) => existing.options = custom,
            None => modifiers.push(ModifierSpec::new(name, custom)),
        }
    }

    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Offset;

    fn names<N>(modifiers: &[ModifierSpec<N>]) -> Vec<&str> {
        modifiers.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_fixed_order_with_arrow() {
        let config = OverlayConfig::default().with_offset(Offset::Distance(8.0));
        let modifiers = build(&config, Some(&7_u32));

        assert_eq!(names(&modifiers), vec![OFFSET, PREVENT_OVERFLOW, ARROW, FLIP]);
        assert_eq!(
            modifiers[0].options,
            ModifierOptions::Offset { offset: [0.0, 8.0] }
        );
        assert_eq!(
            modifiers[2].options,
            ModifierOptions::Arrow {
                element: 7,
                padding: 35.0
            }
        );
    }

    #[test]
    fn test_arrow_omitted_when_disabled() {
        let config = OverlayConfig::default().with_arrow(false);
        let modifiers = build(&config, Some(&7_u32));
        assert_eq!(names(&modifiers), vec![OFFSET, PREVENT_OVERFLOW, FLIP]);
    }

    #[test]
    fn test_containment_options() {
        let config = OverlayConfig {
            boundary_padding: 12.0,
            cutoff: true,
            ..OverlayConfig::default()
        };
        let modifiers = build::<u32>(&config, None);
        assert_eq!(
            modifiers[1].options_json(),
            json!({ "padding": 12.0, "altBoundary": true, "tether": true })
        );
    }

    #[test]
    fn test_override_replaces_wholesale() {
        let config = OverlayConfig::default()
            .with_override(PREVENT_OVERFLOW, json!({ "padding": 0 }))
            .with_override("hide", json!({ "enabled": true }));
        let modifiers = build(&config, Some(&1_u32));

        assert_eq!(
            names(&modifiers),
            vec![OFFSET, PREVENT_OVERFLOW, ARROW, FLIP, "hide"]
        );
        assert_eq!(modifiers[1].options_json(), json!({ "padding": 0 }));
        assert_eq!(
            modifiers[4].to_json(),
            json!({ "name": "hide", "options": { "enabled": true } })
        );
    }

    #[test]
    fn test_flip_fallbacks_serialize() {
        let config = OverlayConfig {
            fallback_placements: vec!["top".parse().expect("valid"), "right-end".parse().expect("valid")],
            ..OverlayConfig::default()
        };
        let modifiers = build::<u32>(&config, None);
        let flip = modifiers.last().expect("flip present");
        assert_eq!(
            flip.options_json(),
            json!({ "fallbackPlacements": ["top", "right-end"] })
        );

        let default_flip = build::<u32>(&OverlayConfig::default(), None);
        assert_eq!(default_flip.last().map(ModifierSpec::options_json), Some(json!({})));
    }
}
