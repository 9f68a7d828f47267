//! Winding number calculation for point-in-region testing.
//!
//! Uses horizontal ray casting with signed crossing count. Regions are given
//! as flat edge lists so a boundary with several closed rings is handled in
//! one pass.

use super::math::orient;
use crate::model::Vec2;

/// Compute the winding number of a point relative to a set of edges.
///
/// - Positive = counter-clockwise winding (in a y-up frame)
/// - Negative = clockwise winding
/// - Zero = point is outside
pub fn winding_number(p: Vec2, edges: &[(Vec2, Vec2)]) -> i32 {
    let mut winding = 0i32;

    for &(p1, p2) in edges {
        // Check if the edge crosses the horizontal ray from p going right
        if p1.y <= p.y {
            if p2.y > p.y && orient(p1, p2, p) > 0.0 {
                // Upward crossing
                winding += 1;
            }
        } else if p2.y <= p.y && orient(p1, p2, p) < 0.0 {
            // Downward crossing
            winding -= 1;
        }
    }

    winding
}

/// Check if a point is inside using the non-zero winding rule.
#[inline]
pub fn point_in_region_nonzero(p: Vec2, edges: &[(Vec2, Vec2)]) -> bool {
    winding_number(p, edges) != 0
}
