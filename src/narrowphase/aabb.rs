use glam::Vec2;

use super::{axis_or_slope, project_plane, push_axis, push_radial, TileContact};
use crate::api::TileProjectionApi;
use crate::body::Body;
use crate::tile::Tile;
use crate::types::CollisionOutcome;

/// Tile projections for axis-aligned boxes.
pub struct AabbProjection;

impl AabbProjection {
    /// Small 22/67 pieces: the flat base edge can be a tighter bound than
    /// either the axis or the slope.
    fn base_or_slope(
        c: &TileContact,
        body: &mut Body,
        base: Vec2,
        n: Vec2,
        dp: f32,
    ) -> CollisionOutcome {
        let slope = n * -dp;
        let len_n = slope.length();
        let len_p = c.axis_len();
        let len_b = base.length();

        let bound = if len_p < len_n { len_p } else { len_n };
        if len_b < bound {
            body.report_collision_vs_world(base, base / len_b);
            return CollisionOutcome::Other;
        }
        axis_or_slope(c, body, n, dp)
    }
}

impl TileProjectionApi for AabbProjection {
    fn full(c: &TileContact, body: &mut Body, _tile: &Tile) -> CollisionOutcome {
        push_axis(c, body)
    }

    fn half(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        project_plane(c, body, tile.pos, tile.sign())
    }

    fn deg45(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        project_plane(c, body, tile.pos, tile.shape.normal)
    }

    fn deg22_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let half = body.half_extents();
        let pen_y = tile.pos.y - (body.pos.y - sy * half.y);
        if pen_y * sy <= 0.0 {
            return CollisionOutcome::None;
        }
        let n = tile.shape.normal;
        let anchor = Vec2::new(tile.pos.x + sx * tile.xw, tile.pos.y - sy * tile.yw);
        let dp = (body.support_point(n) - anchor).dot(n);
        if dp >= 0.0 {
            return CollisionOutcome::None;
        }
        Self::base_or_slope(c, body, Vec2::new(0.0, pen_y), n, dp)
    }

    fn deg22_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let anchor = Vec2::new(
            tile.pos.x - tile.signx() * tile.xw,
            tile.pos.y + tile.signy() * tile.yw,
        );
        project_plane(c, body, anchor, tile.shape.normal)
    }

    fn deg67_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let half = body.half_extents();
        let pen_x = tile.pos.x - (body.pos.x - sx * half.x);
        if pen_x * sx <= 0.0 {
            return CollisionOutcome::None;
        }
        let n = tile.shape.normal;
        let anchor = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y + sy * tile.yw);
        let dp = (body.support_point(n) - anchor).dot(n);
        if dp >= 0.0 {
            return CollisionOutcome::None;
        }
        Self::base_or_slope(c, body, Vec2::new(pen_x, 0.0), n, dp)
    }

    fn deg67_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let anchor = Vec2::new(
            tile.pos.x + tile.signx() * tile.xw,
            tile.pos.y - tile.signy() * tile.yw,
        );
        project_plane(c, body, anchor, tile.shape.normal)
    }

    // The corner circle has radius equal to the full tile width and is
    // centered on the corner opposite the solid quadrant (convex) or on
    // the solid corner itself (concave).

    fn concave(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let sign = tile.sign();
        let center = tile.pos + sign * tile.half();
        let offset = center - body.support_point(sign);
        let len = offset.length();
        let pen = len - 2.0 * tile.xw;
        if pen <= 0.0 {
            return CollisionOutcome::None;
        }
        if c.axis_len() < pen {
            push_axis(c, body)
        } else {
            push_radial(body, offset, len, pen)
        }
    }

    fn convex(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let sign = tile.sign();
        let center = tile.pos - sign * tile.half();
        let offset = body.support_point(sign) - center;
        let len = offset.length();
        let pen = 2.0 * tile.xw - len;
        if sign.x * offset.x < 0.0 || sign.y * offset.y < 0.0 {
            push_axis(c, body)
        } else if pen > 0.0 {
            push_radial(body, offset, len, pen)
        } else {
            CollisionOutcome::None
        }
    }
}
