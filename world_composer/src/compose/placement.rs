//! Placement of the dynamic cluster next to the static one
//!
//! The dynamic entities are shifted along +X so their leftmost position sits
//! `gap` past the static cluster's rightmost one, and their Y midpoint lines
//! up with the static midpoint.

use thiserror::Error;
use tracing::warn;

use crate::config::PlacementConfig;
use crate::sdf::{Bounds, Element, Pose6};

/// Why a bounds-based offset could not be computed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoundsUnavailable {
    #[error("static world has no posed models or actors")]
    Static,

    #[error("dynamic content has no posed models or actors")]
    Dynamic,

    #[error("neither world has posed models or actors")]
    Both,
}

/// Translation applied to transplanted entities
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Offset {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dz]
    }
}

impl From<[f64; 3]> for Offset {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Offset derived from both clusters' bounds
pub fn offset_from_bounds(
    static_bounds: Option<Bounds>,
    dynamic_bounds: Option<Bounds>,
    config: &PlacementConfig,
) -> Result<Offset, BoundsUnavailable> {
    match (static_bounds, dynamic_bounds) {
        (Some(s), Some(d)) => Ok(Offset::new(
            (s.max_x + config.gap) - d.min_x,
            s.center_y() - d.center_y(),
            config.z_offset,
        )),
        (None, Some(_)) => Err(BoundsUnavailable::Static),
        (Some(_), None) => Err(BoundsUnavailable::Dynamic),
        (None, None) => Err(BoundsUnavailable::Both),
    }
}

/// Offset from bounds, falling back to the configured default with a warning
pub fn compute_offset(
    static_bounds: Option<Bounds>,
    dynamic_bounds: Option<Bounds>,
    config: &PlacementConfig,
) -> Offset {
    offset_from_bounds(static_bounds, dynamic_bounds, config).unwrap_or_else(|reason| {
        let fallback = Offset::from(config.default_offset);
        warn!(
            "Failed to compute bounds ({}), using default offset ({}, {}, {})",
            reason, fallback.dx, fallback.dy, fallback.dz
        );
        fallback
    })
}

/// Shift an element's direct `<pose>` by `offset`
///
/// Only full six-value poses are rewritten; anything else is left untouched.
/// Returns whether the pose was changed.
pub fn translate(elem: &mut Element, offset: Offset) -> bool {
    let Some(pose_elem) = elem.find_mut("pose") else {
        return false;
    };
    let Some(pose) = pose_elem.text().and_then(Pose6::parse) else {
        return false;
    };
    pose_elem.text = Some(pose.translated(offset.as_array()).to_text());
    true
}
