use crate::map::Cell;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Wrap an angle into [0, 2π)
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Quadrant of a ray direction.
///
/// Screen convention: y grows downward and angles grow clockwise.
/// Down iff 0 < a < π, right iff a < π/2 or a > 3π/2, so the axis-aligned
/// angles classify as: 0 up+right, π/2 down+left, π up+left, 3π/2 up+left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Facing {
    pub down: bool,
    pub right: bool,
}

impl Facing {
    /// Classify an angle, normalizing it first
    pub fn from_angle(angle: f32) -> Self {
        let angle = normalize_angle(angle);
        Facing {
            down: angle > 0.0 && angle < PI,
            right: angle < FRAC_PI_2 || angle > 3.0 * FRAC_PI_2,
        }
    }

    pub fn up(self) -> bool {
        !self.down
    }

    pub fn left(self) -> bool {
        !self.right
    }
}

/// Nearest wall hit for one screen column, recomputed every frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ray {
    /// Normalized ray angle in radians
    pub angle: f32,
    pub hit_x: f32,
    pub hit_y: f32,
    /// Straight-line distance from the eye to the hit point
    pub distance: f32,
    /// `distance` projected onto the view direction (fisheye removed)
    pub corrected_distance: f32,
    /// Hit lies on a vertical grid line (east/west facing wall face)
    pub hit_vertical: bool,
    /// Cell that stopped the ray; `Empty` when it left an open-bordered map
    pub cell: Cell,
    pub facing: Facing,
}
