//! Corner classification for user-dragged quadrilaterals.
//!
//! Dragged points can end up in any order, or even crossed. Which source
//! corner maps to which output corner must come from the geometry rather than
//! from input order, otherwise the warp comes out flipped or mirrored.
//!
//! # Algorithm
//!
//! Compute the bounding box of the four points. For each bounding-box corner
//! (min-x/min-y, max-x/min-y, max-x/max-y, min-x/max-y) pick the input point
//! closest to it. Ties go to the earlier input point.
//!
//! # Known limitation
//!
//! This is a nearest-corner heuristic, not a convex-hull sort. It is stable
//! for perspective-skewed rectangles, which is the intended input. For
//! self-intersecting or very thin quads it can assign corners inconsistently,
//! and may even pick the same point for two corners. Callers must supply a
//! simple, roughly convex quadrilateral; a duplicated corner is rejected later
//! by the homography estimator as degenerate.

use super::{Point, Quad};

/// Label four points as `[top_left, top_right, bottom_right, bottom_left]`.
pub fn classify(points: [Point; 4]) -> [Point; 4] {
    let b = Quad::new(points).bounds();

    let targets = [
        Point::new(b.min_x, b.min_y),
        Point::new(b.max_x, b.min_y),
        Point::new(b.max_x, b.max_y),
        Point::new(b.min_x, b.max_y),
    ];

    targets.map(|target| nearest(&points, target))
}

/// Closest point to `target`; the first one wins on equal distance.
fn nearest(points: &[Point; 4], target: Point) -> Point {
    let mut best = points[0];
    let mut best_dist = best.distance(target);
    for &p in &points[1..] {
        let d = p.distance(target);
        if d < best_dist {
            best = p;
            best_dist = d;
        }
    }
    best
}
