//! Tile projection resolvers for boxes and circles.
//!
//! Both shapes share the contact computation and the tie-break helpers in
//! this module; the per-class region logic lives in [`aabb`] and [`circle`].

mod aabb;
mod circle;

pub use aabb::AabbProjection;
pub use circle::CircleProjection;

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use crate::body::Body;
use crate::tile::Tile;
use crate::types::CollisionOutcome;

/// Overlap between a body's bounding extent and a tile cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileContact {
    /// Minimal-axis correction, signed away from the tile center.
    pub axis: Vec2,
    /// Unsigned penetration along x and y.
    pub depth: Vec2,
    /// Cell the body center lies in relative to the tile: each component in {-1, 0, 1}.
    pub region: Vec2,
}

impl TileContact {
    /// `offset` is body center minus tile center; `depth` must be positive on both axes.
    pub fn new(offset: Vec2, depth: Vec2, tile: &Tile) -> Self {
        let axis = if depth.x < depth.y {
            Vec2::new(if offset.x < 0.0 { -depth.x } else { depth.x }, 0.0)
        } else {
            Vec2::new(0.0, if offset.y < 0.0 { -depth.y } else { depth.y })
        };
        let side = |d: f32, half: f32| {
            if d < -half {
                -1.0
            } else if d > half {
                1.0
            } else {
                0.0
            }
        };
        let region = Vec2::new(side(offset.x, tile.xw), side(offset.y, tile.yw));
        Self { axis, depth, region }
    }

    pub fn axis_len(&self) -> f32 {
        self.axis.length()
    }

    pub fn in_cell(&self) -> bool {
        self.region == Vec2::ZERO
    }
}

// Shared resolution steps ----------------------------------------------------

/// Correct along the minimal axis.
pub(crate) fn push_axis(c: &TileContact, body: &mut Body) -> CollisionOutcome {
    let len = c.axis_len();
    body.report_collision_vs_world(c.axis, c.axis / len);
    CollisionOutcome::Axis
}

/// Pick the shorter of the axis correction and the slope correction `n * -dp`.
pub(crate) fn axis_or_slope(c: &TileContact, body: &mut Body, n: Vec2, dp: f32) -> CollisionOutcome {
    let slope = n * -dp;
    if c.axis_len() < slope.length() {
        push_axis(c, body)
    } else {
        body.report_collision_vs_world(slope, n);
        CollisionOutcome::Other
    }
}

/// Test the body's support point against the line through `anchor` with normal `n`.
pub(crate) fn project_plane(
    c: &TileContact,
    body: &mut Body,
    anchor: Vec2,
    n: Vec2,
) -> CollisionOutcome {
    let dp = (body.support_point(n) - anchor).dot(n);
    if dp < 0.0 {
        axis_or_slope(c, body, n, dp)
    } else {
        CollisionOutcome::None
    }
}

/// Like [`project_plane`] but always along the normal.
pub(crate) fn push_plane(body: &mut Body, anchor: Vec2, n: Vec2) -> CollisionOutcome {
    let dp = (body.support_point(n) - anchor).dot(n);
    if dp < 0.0 {
        body.report_collision_vs_world(n * -dp, n);
        CollisionOutcome::Other
    } else {
        CollisionOutcome::None
    }
}

/// Push out of a neighbouring tile's horizontal face.
pub(crate) fn push_face_x(c: &TileContact, body: &mut Body) -> CollisionOutcome {
    let oh = c.region.x;
    body.report_collision_vs_world(Vec2::new(c.depth.x * oh, 0.0), Vec2::new(oh, 0.0));
    CollisionOutcome::Axis
}

/// Push out of a neighbouring tile's vertical face.
pub(crate) fn push_face_y(c: &TileContact, body: &mut Body) -> CollisionOutcome {
    let ov = c.region.y;
    body.report_collision_vs_world(Vec2::new(0.0, c.depth.y * ov), Vec2::new(0.0, ov));
    CollisionOutcome::Axis
}

/// Push a circle away from `point` if the point lies inside it.
/// `fallback` is used when the center sits exactly on the point.
pub(crate) fn push_from_point(body: &mut Body, point: Vec2, fallback: Vec2) -> CollisionOutcome {
    let d = body.pos - point;
    let len = d.length();
    let pen = body.radius() - len;
    if pen <= 0.0 {
        return CollisionOutcome::None;
    }
    let dir = if len == 0.0 { fallback } else { d / len };
    body.report_collision_vs_world(dir * pen, dir);
    CollisionOutcome::Other
}

/// Push a circle away from the tile corner nearest its diagonal region.
pub(crate) fn push_from_corner(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
    let vertex = tile.pos + c.region * tile.half();
    push_from_point(body, vertex, c.region * FRAC_1_SQRT_2)
}

/// Push along `offset` (of length `len`) by `pen`.
pub(crate) fn push_radial(body: &mut Body, offset: Vec2, len: f32, pen: f32) -> CollisionOutcome {
    if len == 0.0 {
        return CollisionOutcome::None;
    }
    let dir = offset / len;
    body.report_collision_vs_world(dir * pen, dir);
    CollisionOutcome::Other
}

/// Circle in a cell next to a slope: decide between the slope and the
/// `vertex` that ends it. `vertex_side` is +1 when a positive perp product
/// selects the vertex (vertical neighbours) and -1 for horizontal ones.
pub(crate) fn slope_or_vertex(
    body: &mut Body,
    tile: &Tile,
    vertex: Vec2,
    vertex_side: f32,
) -> CollisionOutcome {
    let n = tile.shape.normal;
    let o = body.pos - vertex;
    let perp = o.x * -n.y + o.y * n.x;
    if perp * tile.signx() * tile.signy() * vertex_side > 0.0 {
        return push_from_point(body, vertex, n);
    }
    let pen = body.radius() - o.dot(n).abs();
    if pen > 0.0 {
        body.report_collision_vs_world(n * pen, n);
        CollisionOutcome::Other
    } else {
        CollisionOutcome::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile;

    #[test]
    fn test_contact_axis_and_region() {
        let t = Tile::new(Vec2::new(8.0, 8.0), 16.0, 16.0, tile::FULL).unwrap();
        // body left of center, shallower in x
        let c = TileContact::new(Vec2::new(-10.0, 1.0), Vec2::new(2.0, 5.0), &t);
        assert_eq!(c.axis, Vec2::new(-2.0, 0.0));
        assert_eq!(c.region, Vec2::new(-1.0, 0.0));
        // ties resolve on y
        let c = TileContact::new(Vec2::new(1.0, -3.0), Vec2::new(4.0, 4.0), &t);
        assert_eq!(c.axis, Vec2::new(0.0, -4.0));
        assert!(c.in_cell());
    }

    #[test]
    fn test_axis_or_slope_prefers_shorter() {
        let t = Tile::new(Vec2::ZERO, 16.0, 16.0, tile::SLOPE_45_PN).unwrap();
        let n = t.shape.normal;
        let c = TileContact::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 3.0), &t);
        let mut b = Body::aabb(Vec2::ZERO, Vec2::splat(1.0));
        assert_eq!(axis_or_slope(&c, &mut b, n, -2.0), CollisionOutcome::Axis);
        let mut b = Body::aabb(Vec2::ZERO, Vec2::splat(1.0));
        assert_eq!(axis_or_slope(&c, &mut b, n, -0.5), CollisionOutcome::Other);
        assert!((b.pos - n * 0.5).length() < 1e-5);
    }
}
