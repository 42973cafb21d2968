//! Contract with the external positioning algorithm.
//!
//! ```text
//! Overlay ──create(reference, floating, options, notifier)──▶ Adapter
//!    ▲                                                          │
//!    └──── GeometrySignal (first computed / recomputed) ◀───────┘
//! ```
//!
//! The engine embeds no geometry. Any implementation that can position a
//! floating node against a reference node and report the placement it chose
//! can sit behind [`PositioningAdapter`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::{ModifierSpec, Placement};

/// Positioning strategy requested from the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionStrategy {
    /// Viewport-relative; stays correct under scrolling ancestors.
    #[default]
    Fixed,
}

impl PositionStrategy {
    /// CSS `position` keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
        }
    }
}

/// Everything the algorithm needs to position one floating element.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOptions<N> {
    /// Initial placement.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: PositionStrategy,
    /// Ordered modifier pipeline.
    pub modifiers: Vec<ModifierSpec<N>>,
}

/// Identity of one adapter instance within an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

/// Notification from an adapter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySignal {
    /// The first placement computation finished.
    FirstComputed(Placement),
    /// A later computation finished.
    Recomputed(Placement),
}

/// Channel back to the overlay that owns an instance.
///
/// Signals may be sent at any time, including long after `create` returned;
/// the overlay picks them up on its next settle pass. Signals from an
/// instance that has since been destroyed are discarded.
#[derive(Debug, Clone)]
pub struct GeometryNotifier {
    instance: InstanceId,
    tx: Sender<(InstanceId, GeometrySignal)>,
    first_sent: Arc<AtomicBool>,
}

impl GeometryNotifier {
    pub(crate) fn new(instance: InstanceId, tx: Sender<(InstanceId, GeometrySignal)>) -> Self {
        Self {
            instance,
            tx,
            first_sent: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The instance this notifier reports for.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Report the first computed placement. Later calls are ignored.
    pub fn first_computed(&self, placement: Placement) {
        if self.first_sent.swap(true, Ordering::AcqRel) {
            return;
        }
        self.send(GeometrySignal::FirstComputed(placement));
    }

    /// Report the placement of a later computation, e.g. after a flip.
    pub fn recomputed(&self, placement: Placement) {
        self.send(GeometrySignal::Recomputed(placement));
    }

    fn send(&self, signal: GeometrySignal) {
        if self.tx.send((self.instance, signal)).is_err() {
            tracing::debug!("Overlay for {} is gone; dropping {:?}", self.instance, signal);
        }
    }
}

/// A live positioning instance.
pub trait PositioningInstance {
    /// Recompute the position.
    fn update(&mut self);

    /// Release the instance. Must not emit further signals.
    fn destroy(&mut self);
}

/// Factory for positioning instances.
pub trait PositioningAdapter<N> {
    /// Instance type produced by this adapter.
    type Instance: PositioningInstance;

    /// Start positioning `floating` against `reference`.
    ///
    /// Returns `None` when the elements cannot be positioned yet; the caller
    /// treats that as "not ready" and retries later.
    fn create(
        &mut self,
        reference: &N,
        floating: &N,
        options: PositionOptions<N>,
        notifier: GeometryNotifier,
    ) -> Option<Self::Instance>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_first_computed_sent_once() {
        let (tx, rx) = mpsc::channel();
        let notifier = GeometryNotifier::new(InstanceId(3), tx);
        let top: Placement = "top".parse().expect("valid");

        notifier.first_computed(top);
        notifier.clone().first_computed(top);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![(InstanceId(3), GeometrySignal::FirstComputed(top))]
        );
    }

    #[test]
    fn test_recomputed_after_first() {
        let (tx, rx) = mpsc::channel();
        let notifier = GeometryNotifier::new(InstanceId(2), tx);
        let bottom: Placement = "bottom".parse().expect("valid");
        let top: Placement = "top".parse().expect("valid");

        notifier.first_computed(bottom);
        notifier.recomputed(top);

        let received: Vec<_> = rx.try_iter().map(|(_, signal)| signal).collect();
        assert_eq!(
            received,
            vec![
                GeometrySignal::FirstComputed(bottom),
                GeometrySignal::Recomputed(top)
            ]
        );
    }

    #[test]
    fn test_strategy_is_fixed() {
        assert_eq!(PositionStrategy::default().as_str(), "fixed");
    }
}
