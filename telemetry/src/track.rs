//! Geographic extent of a session's track.

use crate::geo::DegPosition;

/// A bounding box that only ever widens as fixes arrive.
///
/// Corner convention: `upper_left` carries the maximum latitude and the
/// minimum longitude, `lower_right` the minimum latitude and the maximum
/// longitude. Consumers index the corners directly, so the pairing is part
/// of the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    upper_left: DegPosition,
    lower_right: DegPosition,
}

impl BoundingBox {
    /// Starts the box collapsed onto `seed`, typically the first fix.
    pub fn new(seed: DegPosition) -> Self {
        Self {
            upper_left: seed,
            lower_right: seed,
        }
    }

    /// Widens the box to include `pos`.
    pub fn update(&mut self, pos: DegPosition) {
        self.upper_left.lat = self.upper_left.lat.max(pos.lat);
        self.lower_right.lat = self.lower_right.lat.min(pos.lat);
        self.upper_left.lon = self.upper_left.lon.min(pos.lon);
        self.lower_right.lon = self.lower_right.lon.max(pos.lon);
    }

    pub fn upper_left(&self) -> DegPosition {
        self.upper_left
    }

    pub fn lower_right(&self) -> DegPosition {
        self.lower_right
    }

    /// True when `pos` lies inside or on the box.
    pub fn contains(&self, pos: DegPosition) -> bool {
        pos.lat <= self.upper_left.lat
            && pos.lat >= self.lower_right.lat
            && pos.lon >= self.upper_left.lon
            && pos.lon <= self.lower_right.lon
    }
}
