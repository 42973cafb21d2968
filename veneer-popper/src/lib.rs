//! # Veneer Popper
//!
//! Overlay positioning engine for floating UI (dropdowns, tooltips, popovers).
//! Compiles to WASM for use in the browser; runs headless everywhere else.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Overlay (lifecycle)            │
//! ├──────────────────┬──────────────────────────┤
//! │ Modifier builder │  Arrow manager           │
//! │ - offset         │  - created once          │
//! │ - preventOverflow│  - scoped attributes     │
//! │ - arrow / flip   │                          │
//! ├──────────────────┼──────────────────────────┤
//! │ Positioning      │  Transform origin        │
//! │ adapter (trait)  │  Z-index stacking        │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! The geometry itself is computed by an external positioning algorithm
//! reached through [`PositioningAdapter`]; the engine only owns the
//! lifecycle and the state around it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod arrow;
pub mod config;
pub mod dom;
pub mod error;
pub mod modifier;
pub mod origin;
pub mod overlay;
pub mod placement;
pub mod stacking;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adapter::{
    GeometryNotifier, GeometrySignal, InstanceId, PositionOptions, PositionStrategy,
    PositioningAdapter, PositioningInstance,
};
pub use arrow::{ArrowManager, PassthroughRule};
pub use config::{Offset, OverlayConfig, TransformOrigin};
pub use dom::{Dom, MemoryDom, NodeId};
pub use error::{PopperError, PopperResult};
pub use modifier::{ModifierOptions, ModifierSpec};
pub use overlay::{NotReady, Overlay, OverlayEvent, OverlayId, OverlayPhase};
pub use placement::{Alignment, Placement, Side};
pub use stacking::{next_z_index, StackingCounter, BASE_Z_INDEX, GLOBAL_STACK};

/// Popper engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
