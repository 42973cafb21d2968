//! Overlay lifecycle.
//!
//! ```text
//!            set_visible(true)            signals settle
//! Hidden ─────────────────────▶ Pending ─────────────▶ Active
//!    ▲                            │  ▲                  │  ▲
//!    │      set_visible(false)    │  └── settle() retry  │  └── update()
//!    └────────────────────────────┴──────────────────────┘
//!
//! Disabled: entered from any phase while the `disabled` flag is set.
//! ```
//!
//! [`Overlay`] owns the only live positioning instance for its floating
//! element. The host drives it with explicit calls (`set_visible`,
//! `apply_config`, `update`) and gives it a [`Overlay::settle`] pass after
//! each render so deferred work can run.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::adapter::{GeometryNotifier, GeometrySignal, InstanceId};
use crate::{
    modifier, origin, ArrowManager, Dom, OverlayConfig, Placement, PositionOptions,
    PositionStrategy, PositioningAdapter, PositioningInstance, StackingCounter, GLOBAL_STACK,
};

/// Unique identifier for an overlay, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(Uuid);

impl OverlayId {
    /// Create a new unique overlay ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable phase of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPhase {
    /// Not visible; no instance.
    Hidden,
    /// Visible requested but not yet positionable.
    Pending,
    /// Instance created and positioning.
    Active,
    /// Positioning suppressed; visibility changes are only recorded.
    Disabled,
}

/// Events for the view layer, drained with [`Overlay::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The first placement of a new instance was computed.
    Created,
    /// The visibility state changed; mirrors [`Overlay::is_visible`].
    VisibilityChanged(bool),
    /// A recompute finished (only with `track_updates`).
    Updated(Placement),
}

/// Why an instance could not be created yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotReady {
    /// No reference element bound.
    #[error("reference element not bound")]
    MissingReference,
    /// No floating element bound.
    #[error("floating element not bound")]
    MissingFloating,
    /// The configured placement is not canonical.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),
    /// The positioning adapter declined.
    #[error("positioning adapter declined to create an instance")]
    AdapterDeclined,
}

struct LiveInstance<I> {
    id: InstanceId,
    inner: I,
}

/// A floating element anchored to a reference element.
pub struct Overlay<D, A>
where
    D: Dom,
    A: PositioningAdapter<D::Node>,
{
    id: OverlayId,
    dom: D,
    adapter: A,
    config: OverlayConfig,
    stacking: &'static StackingCounter,
    reference: Option<D::Node>,
    floating: Option<D::Node>,
    visible: bool,
    resolved_placement: Option<Placement>,
    instance: Option<LiveInstance<A::Instance>>,
    next_instance: u64,
    arrow: ArrowManager<D::Node>,
    relocated: bool,
    click_guarded: bool,
    refresh_scheduled: bool,
    signal_tx: Sender<(InstanceId, GeometrySignal)>,
    signal_rx: Receiver<(InstanceId, GeometrySignal)>,
    events: Vec<OverlayEvent>,
    torn_down: bool,
}

impl<D, A> Overlay<D, A>
where
    D: Dom,
    A: PositioningAdapter<D::Node>,
{
    /// Create a hidden overlay with `config` applied.
    #[must_use]
    pub fn new(dom: D, adapter: A, config: OverlayConfig) -> Self {
        let (signal_tx, signal_rx) = mpsc::channel();
        Self {
            id: OverlayId::new(),
            dom,
            adapter,
            config,
            stacking: &GLOBAL_STACK,
            reference: None,
            floating: None,
            visible: false,
            resolved_placement: None,
            instance: None,
            next_instance: 0,
            arrow: ArrowManager::new(),
            relocated: false,
            click_guarded: false,
            refresh_scheduled: false,
            signal_tx,
            signal_rx,
            events: Vec::new(),
            torn_down: false,
        }
    }

    /// Draw z-indices from `stacking` instead of the process-wide counter.
    #[must_use]
    pub fn with_stacking(mut self, stacking: &'static StackingCounter) -> Self {
        self.stacking = stacking;
        self
    }

    /// The overlay's identifier.
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        if self.config.disabled {
            OverlayPhase::Disabled
        } else if self.instance.is_some() {
            OverlayPhase::Active
        } else if self.visible {
            OverlayPhase::Pending
        } else {
            OverlayPhase::Hidden
        }
    }

    /// Whether the overlay is meant to be shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a positioning instance is live.
    #[must_use]
    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// The last placement reported by the positioning algorithm.
    #[must_use]
    pub fn resolved_placement(&self) -> Option<Placement> {
        self.resolved_placement
    }

    /// The applied configuration.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The bound floating element.
    #[must_use]
    pub fn floating(&self) -> Option<&D::Node> {
        self.floating.as_ref()
    }

    /// Whether the arrow has been attached to the floating element.
    #[must_use]
    pub fn arrow_attached(&self) -> bool {
        self.arrow.is_attached()
    }

    /// The arrow node, once attached.
    #[must_use]
    pub fn arrow(&self) -> Option<&D::Node> {
        self.arrow.handle()
    }

    /// Whether the floating element was moved to the append target.
    #[must_use]
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.events)
    }

    /// Bind (or unbind) the reference element.
    ///
    /// A shown overlay is (re)created against the new reference right away.
    pub fn bind_reference(&mut self, reference: Option<D::Node>) {
        if self.reference == reference {
            return;
        }
        self.reference = reference;
        self.destroy_instance();
        self.activate_if_shown();
    }

    /// Bind (or unbind) the floating element.
    ///
    /// Replacing the floating element releases the old one: its instance is
    /// destroyed and, if it was relocated, it is removed from the append
    /// target. Arrow and relocation state start over for the new element.
    pub fn bind_floating(&mut self, floating: Option<D::Node>) {
        if self.floating == floating {
            return;
        }
        self.destroy_instance();
        self.release_floating();
        self.arrow.reset();
        self.floating = floating;
        self.activate_if_shown();
    }

    /// Apply a new configuration.
    ///
    /// A changed placement discards the resolved placement. A live instance
    /// is rebuilt so the new pipeline takes effect.
    pub fn apply_config(&mut self, config: OverlayConfig) {
        if config == self.config {
            return;
        }
        let disabled = config.disabled;
        if config.placement != self.config.placement {
            self.resolved_placement = None;
        }
        let was_active = self.destroy_instance();
        self.config = OverlayConfig {
            disabled: self.config.disabled,
            ..config
        };
        self.set_disabled(disabled);
        if was_active {
            self.activate_if_shown();
        }
    }

    /// Set the disabled flag.
    ///
    /// Disabling destroys any live instance. Re-enabling acts on the
    /// visibility recorded meanwhile.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.config.disabled == disabled {
            return;
        }
        self.config.disabled = disabled;
        tracing::debug!(overlay = %self.id, disabled, "Overlay disabled flag changed");
        if disabled {
            self.destroy_instance();
        } else if self.visible {
            self.activate();
        }
    }

    /// Show or hide the overlay.
    ///
    /// Repeated shows while pending or active are no-ops.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.events.push(OverlayEvent::VisibilityChanged(visible));

        if self.config.disabled {
            tracing::debug!(overlay = %self.id, visible, "Visibility recorded while disabled");
            return;
        }

        if visible {
            self.activate();
        } else {
            self.destroy_instance();
        }
    }

    /// Refresh the position.
    ///
    /// Active overlays recompute and move to the top of the stack; pending
    /// overlays retry creation.
    pub fn update(&mut self) {
        match self.phase() {
            OverlayPhase::Active => {
                if let Some(live) = self.instance.as_mut() {
                    live.inner.update();
                }
                self.raise();
            }
            OverlayPhase::Pending => self.activate(),
            OverlayPhase::Hidden | OverlayPhase::Disabled => {}
        }
    }

    /// Run deferred work: apply adapter signals, retry a pending creation,
    /// and perform a scheduled refresh.
    ///
    /// Call once per render/settle pass of the host view.
    pub fn settle(&mut self) {
        while let Ok((instance, signal)) = self.signal_rx.try_recv() {
            self.handle_signal(instance, signal);
        }

        match self.phase() {
            OverlayPhase::Pending => self.activate(),
            OverlayPhase::Active if self.refresh_scheduled => {
                self.refresh_scheduled = false;
                self.update();
            }
            _ => {}
        }
    }

    /// Tear the overlay down with its owning view.
    ///
    /// Destroys the instance regardless of visibility and returns a relocated
    /// floating element to nowhere. Safe to call more than once; also runs
    /// on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.destroy_instance();
        self.release_floating();
        tracing::debug!(overlay = %self.id, "Overlay torn down");
    }

    fn activate_if_shown(&mut self) {
        if self.visible && !self.config.disabled {
            self.activate();
        }
    }

    fn activate(&mut self) {
        if self.torn_down {
            return;
        }
        match self.try_activate() {
            Ok(()) => {}
            Err(reason) => {
                tracing::debug!(overlay = %self.id, %reason, "Overlay not ready; will retry");
            }
        }
    }

    fn try_activate(&mut self) -> Result<(), NotReady> {
        if self.instance.is_some() {
            return Ok(());
        }

        let placement = match self.resolved_placement {
            Some(placement) => placement,
            None => self
                .config
                .placement
                .parse::<Placement>()
                .map_err(|_| NotReady::InvalidPlacement(self.config.placement.clone()))?,
        };
        let reference = self.reference.clone().ok_or(NotReady::MissingReference)?;
        let floating = self.floating.clone().ok_or(NotReady::MissingFloating)?;

        let arrow = if self.config.show_arrow {
            match self
                .arrow
                .ensure(&self.dom, &floating, &self.config.passthrough_attributes)
            {
                Ok(arrow) => Some(arrow),
                Err(e) => {
                    tracing::warn!(overlay = %self.id, "Failed to attach arrow: {e}");
                    None
                }
            }
        } else {
            None
        };
        let modifiers = modifier::build(&self.config, arrow.as_ref());

        if self.config.append_to_root {
            self.relocate(&floating);
        }
        if !self.click_guarded {
            match self.dom.guard_clicks(&floating) {
                Ok(()) => self.click_guarded = true,
                Err(e) => tracing::warn!(overlay = %self.id, "Failed to guard clicks: {e}"),
            }
        }

        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        let notifier = GeometryNotifier::new(id, self.signal_tx.clone());
        let options = PositionOptions {
            placement,
            strategy: PositionStrategy::Fixed,
            modifiers,
        };

        let inner = self
            .adapter
            .create(&reference, &floating, options, notifier)
            .ok_or(NotReady::AdapterDeclined)?;
        self.instance = Some(LiveInstance { id, inner });
        tracing::debug!(overlay = %self.id, %id, %placement, "Positioning instance created");
        Ok(())
    }

    fn handle_signal(&mut self, instance: InstanceId, signal: GeometrySignal) {
        let current = self.instance.as_ref().map(|live| live.id);
        if current != Some(instance) {
            tracing::debug!(overlay = %self.id, %instance, "Ignoring signal from stale instance");
            return;
        }

        match signal {
            GeometrySignal::FirstComputed(placement) => {
                self.resolved_placement = Some(placement);
                self.apply_origin(placement);
                self.raise();
                self.refresh_scheduled = true;
                self.events.push(OverlayEvent::Created);
            }
            GeometrySignal::Recomputed(placement) => {
                if self.resolved_placement != Some(placement) {
                    tracing::debug!(overlay = %self.id, %placement, "Placement changed");
                    self.resolved_placement = Some(placement);
                    self.apply_origin(placement);
                }
                if self.config.track_updates {
                    self.events.push(OverlayEvent::Updated(placement));
                }
            }
        }
    }

    fn apply_origin(&self, placement: Placement) {
        let Some(floating) = &self.floating else {
            return;
        };
        if let Some(value) = origin::compute(placement, &self.config.transform_origin) {
            if let Err(e) = self.dom.set_style(floating, "transform-origin", &value) {
                tracing::warn!(overlay = %self.id, "Failed to set transform-origin: {e}");
            }
        }
    }

    fn raise(&self) {
        let Some(floating) = &self.floating else {
            return;
        };
        let z_index = self.stacking.next();
        if let Err(e) = self.dom.set_style(floating, "z-index", &z_index.to_string()) {
            tracing::warn!(overlay = %self.id, "Failed to set z-index: {e}");
        }
    }

    fn relocate(&mut self, floating: &D::Node) {
        if self.relocated {
            return;
        }
        let Some(target) = self.dom.append_target() else {
            tracing::warn!(overlay = %self.id, "No append target; floating element stays in place");
            return;
        };
        match self.dom.append_child(&target, floating) {
            Ok(()) => self.relocated = true,
            Err(e) => tracing::warn!(overlay = %self.id, "Failed to relocate floating element: {e}"),
        }
    }

    fn release_floating(&mut self) {
        let Some(floating) = self.floating.clone() else {
            return;
        };
        if self.click_guarded {
            self.dom.release_clicks(&floating);
            self.click_guarded = false;
        }
        if self.relocated {
            self.relocated = false;
            if let Some(target) = self.dom.append_target() {
                if self.dom.parent(&floating).as_ref() == Some(&target) {
                    if let Err(e) = self.dom.remove_child(&target, &floating) {
                        tracing::warn!(overlay = %self.id, "Failed to remove floating element: {e}");
                    }
                }
            }
        }
    }

    /// Destroy the live instance, returning whether there was one.
    fn destroy_instance(&mut self) -> bool {
        let Some(mut live) = self.instance.take() else {
            return false;
        };
        live.inner.destroy();
        self.refresh_scheduled = false;
        tracing::debug!(overlay = %self.id, id = %live.id, "Positioning instance destroyed");
        true
    }
}

impl<D, A> fmt::Debug for Overlay<D, A>
where
    D: Dom,
    A: PositioningAdapter<D::Node>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("visible", &self.visible)
            .field("resolved_placement", &self.resolved_placement)
            .field("arrow_attached", &self.arrow.is_attached())
            .field("relocated", &self.relocated)
            .finish_non_exhaustive()
    }
}

impl<D, A> Drop for Overlay<D, A>
where
    D: Dom,
    A: PositioningAdapter<D::Node>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
