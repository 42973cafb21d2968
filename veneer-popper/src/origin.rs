//! Transform-origin derivation.

use crate::{Placement, TransformOrigin};

/// CSS `transform-origin` for a floating element at `placement`.
///
/// Returns `None` when the origin is disabled. An explicit non-empty origin is
/// used verbatim; otherwise the origin sits on the side facing the reference,
/// so scale/fade transitions grow out of it.
#[must_use]
pub fn compute(placement: Placement, configured: &TransformOrigin) -> Option<String> {
    match configured {
        TransformOrigin::Auto(false) => None,
        TransformOrigin::Explicit(origin) if !origin.is_empty() => Some(origin.clone()),
        TransformOrigin::Auto(true) | TransformOrigin::Explicit(_) => {
            let side = placement.side();
            let opposite = side.opposite().as_str();
            if side.is_vertical() {
                Some(format!("center {opposite}"))
            } else {
                Some(format!("{opposite} center"))
            }
        }
    }
}
