//! Arrow element management.
//!
//! An arrow node is created at most once per floating element and reused
//! across every show/hide cycle.

use serde::{Deserialize, Serialize};

use crate::{Dom, PopperResult};

/// Attribute marking the arrow for the positioning algorithm.
pub const ARROW_MARKER: &str = "data-popper-arrow";

/// Class applied to the arrow node.
pub const ARROW_CLASS: &str = "popper__arrow";

/// Which floating-element attributes are copied onto the arrow.
///
/// Scoped stylesheets key their rules on per-component attributes; copying
/// them lets those rules reach the arrow too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassthroughRule {
    prefixes: Vec<String>,
}

impl PassthroughRule {
    /// Match attributes starting with any of `prefixes`.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Copy nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Whether an attribute name passes through.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

impl Default for PassthroughRule {
    fn default() -> Self {
        Self::new(["data-v-"])
    }
}

#[derive(Debug, Clone)]
struct ArrowBinding<N> {
    floating: N,
    arrow: N,
}

/// Creates and caches the arrow node of a floating element.
#[derive(Debug, Clone)]
pub struct ArrowManager<N> {
    binding: Option<ArrowBinding<N>>,
}

impl<N: Clone + PartialEq> ArrowManager<N> {
    /// Create a manager with no arrow attached.
    #[must_use]
    pub fn new() -> Self {
        Self { binding: None }
    }

    /// Return the arrow for `floating`, creating and attaching it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be created or attached. Nothing is
    /// cached in that case, so a later call retries.
    pub fn ensure<D>(&mut self, dom: &D, floating: &N, rule: &PassthroughRule) -> PopperResult<N>
    where
        D: Dom<Node = N>,
    {
        if let Some(binding) = &self.binding {
            if binding.floating == *floating {
                return Ok(binding.arrow.clone());
            }
        }

        let arrow = dom.create_element("div")?;
        for name in dom.attribute_names(floating) {
            if rule.matches(&name) {
                dom.set_attribute(&arrow, &name, "")?;
            }
        }
        dom.set_attribute(&arrow, ARROW_MARKER, "")?;
        dom.set_attribute(&arrow, "class", ARROW_CLASS)?;
        dom.append_child(floating, &arrow)?;

        tracing::debug!("Attached arrow to floating element");
        self.binding = Some(ArrowBinding {
            floating: floating.clone(),
            arrow: arrow.clone(),
        });
        Ok(arrow)
    }

    /// Whether an arrow has been attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// The cached arrow, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&N> {
        self.binding.as_ref().map(|b| &b.arrow)
    }

    /// Forget the cached arrow. Only valid when the floating element itself
    /// is replaced.
    pub fn reset(&mut self) {
        self.binding = None;
    }
}

impl<N: Clone + PartialEq> Default for ArrowManager<N> {
    fn default() -> Self {
        Self::new()
    }
}
