use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use super::{
    TileContact, project_plane, push_axis, push_face_x, push_face_y, push_from_corner,
    push_from_point, push_plane, push_radial, slope_or_vertex,
};
use crate::api::TileProjectionApi;
use crate::body::Body;
use crate::tile::Tile;
use crate::types::CollisionOutcome;

/// Tile projections for circles.
///
/// A circle can touch a tile while its center sits in one of the eight
/// neighbouring cells, so each class switches on `contact.region`:
/// in-cell contacts behave like the box projections, face neighbours push
/// straight out, and diagonal neighbours usually collide with a corner.
pub struct CircleProjection;

impl CircleProjection {
    /// Offset from the convex circle center, its length and the penetration.
    fn convex_radial(body: &Body, tile: &Tile) -> (Vec2, f32, f32) {
        let center = tile.pos - tile.sign() * tile.half();
        let offset = body.pos - center;
        let len = offset.length();
        let pen = 2.0 * tile.xw + body.radius() - len;
        (offset, len, pen)
    }

    fn push_convex(body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (offset, len, pen) = Self::convex_radial(body, tile);
        if pen > 0.0 {
            push_radial(body, offset, len, pen)
        } else {
            CollisionOutcome::None
        }
    }

    fn diagonal_away(c: &TileContact, tile: &Tile) -> bool {
        tile.signx() * c.region.x + tile.signy() * c.region.y > 0.0
    }
}

impl TileProjectionApi for CircleProjection {
    fn full(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        match (c.region.x == 0.0, c.region.y == 0.0) {
            (true, true) => push_axis(c, body),
            (true, false) => push_face_y(c, body),
            (false, true) => push_face_x(c, body),
            (false, false) => push_from_corner(c, body, tile),
        }
    }

    fn half(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        let celldp = oh * sx + ov * sy;
        if celldp > 0.0 {
            return CollisionOutcome::None;
        }
        match (oh == 0.0, ov == 0.0) {
            (true, true) => project_plane(c, body, tile.pos, tile.sign()),
            (true, false) => {
                if celldp != 0.0 {
                    return push_face_y(c, body);
                }
                // neighbour above/below a half tile facing sideways
                if (body.pos.x - tile.pos.x) * sx < 0.0 {
                    push_face_y(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x, tile.pos.y + ov * tile.yw);
                    push_from_point(body, vertex, Vec2::new(sx, ov) * FRAC_1_SQRT_2)
                }
            }
            (false, true) => {
                if celldp != 0.0 {
                    return push_face_x(c, body);
                }
                if (body.pos.y - tile.pos.y) * sy < 0.0 {
                    push_face_x(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x + oh * tile.xw, tile.pos.y);
                    push_from_point(body, vertex, Vec2::new(oh, sy) * FRAC_1_SQRT_2)
                }
            }
            (false, false) => push_from_corner(c, body, tile),
        }
    }

    fn deg45(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        match (oh == 0.0, ov == 0.0) {
            (true, true) => project_plane(c, body, tile.pos, tile.shape.normal),
            (true, false) => {
                if sy * ov < 0.0 {
                    push_face_y(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y + ov * tile.yw);
                    slope_or_vertex(body, tile, vertex, 1.0)
                }
            }
            (false, true) => {
                if sx * oh < 0.0 {
                    push_face_x(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x + oh * tile.xw, tile.pos.y - sy * tile.yw);
                    slope_or_vertex(body, tile, vertex, -1.0)
                }
            }
            (false, false) => {
                if Self::diagonal_away(c, tile) {
                    CollisionOutcome::None
                } else {
                    push_from_corner(c, body, tile)
                }
            }
        }
    }

    fn deg22_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        if sy * ov > 0.0 {
            return CollisionOutcome::None;
        }
        match (oh == 0.0, ov == 0.0) {
            (true, true) => {
                // the wedge's tip sits on the side edge at mid height
                let vertex = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y);
                let n = tile.shape.normal;
                let o = body.pos - vertex;
                let perp = o.x * -n.y + o.y * n.x;
                if perp * sx * sy > 0.0 {
                    push_from_point(body, vertex, n)
                } else {
                    project_plane(c, body, vertex, n)
                }
            }
            (true, false) => push_face_y(c, body),
            (false, true) => {
                if sx * oh < 0.0 {
                    let vertex = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y);
                    if (body.pos.y - vertex.y) * sy < 0.0 {
                        push_face_x(c, body)
                    } else {
                        push_from_point(body, vertex, c.region * FRAC_1_SQRT_2)
                    }
                } else {
                    let vertex = Vec2::new(tile.pos.x + oh * tile.xw, tile.pos.y - sy * tile.yw);
                    slope_or_vertex(body, tile, vertex, -1.0)
                }
            }
            (false, false) => push_from_corner(c, body, tile),
        }
    }

    fn deg22_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        let anchor = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y + sy * tile.yw);
        match (oh == 0.0, ov == 0.0) {
            (true, true) => project_plane(c, body, anchor, tile.shape.normal),
            (true, false) => {
                if sy * ov < 0.0 {
                    push_face_y(c, body)
                } else {
                    slope_or_vertex(body, tile, anchor, 1.0)
                }
            }
            (false, true) => {
                if sx * oh < 0.0 {
                    return push_face_x(c, body);
                }
                let vertex = Vec2::new(tile.pos.x + sx * tile.xw, tile.pos.y);
                if (body.pos.y - vertex.y) * sy < 0.0 {
                    push_face_x(c, body)
                } else {
                    slope_or_vertex(body, tile, vertex, -1.0)
                }
            }
            (false, false) => {
                if Self::diagonal_away(c, tile) {
                    push_plane(body, anchor, tile.shape.normal)
                } else {
                    push_from_corner(c, body, tile)
                }
            }
        }
    }

    fn deg67_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        if sx * oh > 0.0 {
            return CollisionOutcome::None;
        }
        match (oh == 0.0, ov == 0.0) {
            (true, true) => {
                let vertex = Vec2::new(tile.pos.x, tile.pos.y - sy * tile.yw);
                let n = tile.shape.normal;
                let o = body.pos - vertex;
                let perp = o.x * -n.y + o.y * n.x;
                if perp * sx * sy < 0.0 {
                    push_from_point(body, vertex, n)
                } else {
                    project_plane(c, body, vertex, n)
                }
            }
            (true, false) => {
                if sy * ov < 0.0 {
                    let vertex = Vec2::new(tile.pos.x, tile.pos.y - sy * tile.yw);
                    if (body.pos.x - vertex.x) * sx < 0.0 {
                        push_face_y(c, body)
                    } else {
                        push_from_point(body, vertex, c.region * FRAC_1_SQRT_2)
                    }
                } else {
                    let vertex = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y + ov * tile.yw);
                    slope_or_vertex(body, tile, vertex, 1.0)
                }
            }
            (false, true) => push_face_x(c, body),
            (false, false) => push_from_corner(c, body, tile),
        }
    }

    fn deg67_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        let anchor = Vec2::new(tile.pos.x + sx * tile.xw, tile.pos.y - sy * tile.yw);
        match (oh == 0.0, ov == 0.0) {
            (true, true) => project_plane(c, body, anchor, tile.shape.normal),
            (true, false) => {
                if sy * ov < 0.0 {
                    return push_face_y(c, body);
                }
                let vertex = Vec2::new(tile.pos.x, tile.pos.y + sy * tile.yw);
                if (body.pos.x - vertex.x) * sx < 0.0 {
                    push_face_y(c, body)
                } else {
                    slope_or_vertex(body, tile, vertex, 1.0)
                }
            }
            (false, true) => {
                if sx * oh < 0.0 {
                    push_face_x(c, body)
                } else {
                    slope_or_vertex(body, tile, anchor, -1.0)
                }
            }
            (false, false) => {
                if Self::diagonal_away(c, tile) {
                    push_plane(body, anchor, tile.shape.normal)
                } else {
                    push_from_corner(c, body, tile)
                }
            }
        }
    }

    fn concave(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        match (oh == 0.0, ov == 0.0) {
            (true, true) => {
                let center = tile.pos + tile.sign() * tile.half();
                let offset = center - body.pos;
                let len = offset.length();
                let pen = len + body.radius() - 2.0 * tile.xw;
                if pen <= 0.0 {
                    CollisionOutcome::None
                } else if c.axis_len() < pen || len == 0.0 {
                    push_axis(c, body)
                } else {
                    push_radial(body, offset, len, pen)
                }
            }
            (true, false) => {
                if sy * ov < 0.0 {
                    push_face_y(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x - sx * tile.xw, tile.pos.y + ov * tile.yw);
                    push_from_point(body, vertex, Vec2::new(0.0, ov))
                }
            }
            (false, true) => {
                if sx * oh < 0.0 {
                    push_face_x(c, body)
                } else {
                    let vertex = Vec2::new(tile.pos.x + oh * tile.xw, tile.pos.y - sy * tile.yw);
                    push_from_point(body, vertex, Vec2::new(oh, 0.0))
                }
            }
            (false, false) => {
                if Self::diagonal_away(c, tile) {
                    CollisionOutcome::None
                } else {
                    push_from_corner(c, body, tile)
                }
            }
        }
    }

    fn convex(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        let (sx, sy) = (tile.signx(), tile.signy());
        let (oh, ov) = (c.region.x, c.region.y);
        match (oh == 0.0, ov == 0.0) {
            (true, true) => {
                let (offset, len, pen) = Self::convex_radial(body, tile);
                if pen <= 0.0 {
                    CollisionOutcome::None
                } else if c.axis_len() < pen {
                    push_axis(c, body)
                } else {
                    push_radial(body, offset, len, pen)
                }
            }
            (true, false) => {
                if sy * ov < 0.0 {
                    push_face_y(c, body)
                } else {
                    Self::push_convex(body, tile)
                }
            }
            (false, true) => {
                if sx * oh < 0.0 {
                    push_face_x(c, body)
                } else {
                    Self::push_convex(body, tile)
                }
            }
            (false, false) => {
                if Self::diagonal_away(c, tile) {
                    Self::push_convex(body, tile)
                } else {
                    push_from_corner(c, body, tile)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile;
    use approx::assert_abs_diff_eq;

    fn tile_at_origin(id: u32) -> Tile {
        Tile::new(Vec2::ZERO, 16.0, 16.0, id).unwrap()
    }

    #[test]
    fn test_full_in_cell_and_face_neighbour() {
        let t = tile_at_origin(tile::FULL);
        let mut c = Body::circle(Vec2::new(6.0, 0.0), 3.0);
        // in cell: px = 8 + 3 - 6 = 5, py = 11 -> push +x by 5
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos, Vec2::new(11.0, 0.0), epsilon = 1e-5);

        let mut c = Body::circle(Vec2::new(0.0, -10.0), 3.0);
        // vertical neighbour above: region (0,-1), depth y = 1
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos, Vec2::new(0.0, -11.0), epsilon = 1e-5);
    }

    #[test]
    fn test_full_diagonal_corner() {
        let t = tile_at_origin(tile::FULL);
        let mut c = Body::circle(Vec2::new(10.0, 10.0), 3.0);
        // corner at (8,8), distance 2.83, pen 0.17
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let d = (c.pos - Vec2::splat(8.0)).length();
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-4);

        let mut far = Body::circle(Vec2::new(10.5, 10.5), 3.0);
        assert_eq!(far.collide_vs_tile(&t), CollisionOutcome::None);
    }

    #[test]
    fn test_convex_corner_penetration_depth() {
        // convex pp: bulge centered at (-8,-8), radius 16
        let t = tile_at_origin(tile::CONVEX_PP);
        let r = 4.0;
        let p = 0.5;
        let dir = Vec2::new(1.0, 1.0).normalize();
        let center = Vec2::splat(-8.0);
        let start = center + dir * (16.0 + r - p);
        let mut c = Body::circle(start, r);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let moved = c.pos - start;
        assert_abs_diff_eq!(moved.length(), p, epsilon = 1e-4);
        assert!(moved.normalize().dot(dir) > 0.999);
    }

    #[test]
    fn test_45_diagonal_in_normal_direction_is_none() {
        // pn normal points to +x/-y; the up-right diagonal neighbour can't touch the slope
        let t = tile_at_origin(tile::SLOPE_45_PN);
        let mut c = Body::circle(Vec2::new(9.0, -9.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
        assert_eq!(c.pos, Vec2::new(9.0, -9.0));
    }

    #[test]
    fn test_45_in_cell_slope() {
        let t = tile_at_origin(tile::SLOPE_45_PN);
        let mut c = Body::circle(Vec2::new(1.0, 0.0), 2.0);
        // innermost point (1,0) - n*2; dp = (1*0.707) - 2 = -1.29
        let before = c.pos;
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let moved = c.pos - before;
        let n = t.shape.normal;
        assert_abs_diff_eq!(moved, n * (2.0 - FRAC_1_SQRT_2), epsilon = 1e-4);
    }

    #[test]
    fn test_45_horizontal_neighbour_against_face() {
        let t = tile_at_origin(tile::SLOPE_45_PN);
        // left neighbour (oh = -1): signx * oh < 0 -> face
        let mut c = Body::circle(Vec2::new(-10.0, 4.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos.x, -11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_half_far_side_is_none() {
        // HALF_UP: solid upper half, normal (0,1) pushes down
        let t = tile_at_origin(tile::HALF_UP);
        // circle in the cell below: celldp = 1 -> none
        let mut c = Body::circle(Vec2::new(0.0, 10.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
        // inside the empty lower half, clear of the plane
        let mut c = Body::circle(Vec2::new(0.0, 5.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
        let mut c = Body::circle(Vec2::new(0.0, 2.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        assert_abs_diff_eq!(c.pos.y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_concave_in_cell_radial() {
        // concave nn: empty bowl around (-8,-8) with radius 16
        let t = tile_at_origin(tile::CONCAVE_NN);
        let mut c = Body::circle(Vec2::new(-2.0, -2.0), 2.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);

        let mut c = Body::circle(Vec2::new(2.0, 2.0), 4.0);
        // len 14.14, pen = 14.14 + 4 - 16 = 2.14; axis = 12 - 2 = 10
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let d = (Vec2::splat(-8.0) - c.pos).length();
        assert_abs_diff_eq!(d, 12.0, epsilon = 1e-3);
    }

    #[test]
    fn test_22_small_far_vertical_neighbour_is_none() {
        // 22 small pn sits on the bottom; cell above (ov = -1, signy = -1) -> none
        let t = tile_at_origin(tile::SLOPE_22_SMALL_PN);
        let mut c = Body::circle(Vec2::new(0.0, -10.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
        // cell below hits the flat underside
        let mut c = Body::circle(Vec2::new(0.0, 10.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos.y, 11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_67_small_far_horizontal_neighbour_is_none() {
        let t = tile_at_origin(tile::SLOPE_67_SMALL_PN);
        let mut c = Body::circle(Vec2::new(10.0, 0.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
        let mut c = Body::circle(Vec2::new(-10.0, 0.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
    }

    #[test]
    fn test_22_big_diagonal_uses_slope() {
        // 22 big pn: normal (1,-2)/sqrt5, line from (-8,-8) to (8,0)
        let t = tile_at_origin(tile::SLOPE_22_BIG_PN);
        let mut c = Body::circle(Vec2::new(8.5, -8.5), 3.0);
        // 7.83 from the line: out of reach
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);

        let start = Vec2::new(9.0, -9.0);
        let mut c = Body::circle(start, 10.0);
        // (17,-1).n = 8.497, pushed out along n by 10 - 8.497
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let n = t.shape.normal;
        assert_abs_diff_eq!(c.pos - start, n * (10.0 - 8.497_058), epsilon = 1e-4);
    }

    #[test]
    fn test_67_big_diagonal_uses_slope() {
        // 67 big pn: normal (2,-1)/sqrt5, line from (0,-8) to (8,8)
        let t = tile_at_origin(tile::SLOPE_67_BIG_PN);
        let start = Vec2::new(9.0, -9.0);
        let mut c = Body::circle(start, 10.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        let n = t.shape.normal;
        assert_abs_diff_eq!(c.pos - start, n * (10.0 - 8.497_058), epsilon = 1e-4);
    }

    #[test]
    fn test_concave_face_neighbours() {
        // concave nn: solid towards the (8,8) corner
        let t = tile_at_origin(tile::CONCAVE_NN);
        // cell below: flat underside, depth y = 1
        let mut c = Body::circle(Vec2::new(4.0, 10.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos, Vec2::new(4.0, 11.0), epsilon = 1e-5);
        // cell to the right: flat side, depth x = 1
        let mut c = Body::circle(Vec2::new(10.0, 4.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Axis);
        assert_abs_diff_eq!(c.pos, Vec2::new(11.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_concave_bowl_tips() {
        let t = tile_at_origin(tile::CONCAVE_NN);
        let off = 3.0 * FRAC_1_SQRT_2;
        // cell above, near the tip at (8,-8)
        let mut c = Body::circle(Vec2::new(6.0, -10.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        assert_abs_diff_eq!(c.pos, Vec2::new(8.0 - off, -8.0 - off), epsilon = 1e-4);
        // cell to the left, near the tip at (-8,8)
        let mut c = Body::circle(Vec2::new(-10.0, 6.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::Other);
        assert_abs_diff_eq!(c.pos, Vec2::new(-8.0 - off, 8.0 - off), epsilon = 1e-4);
        // same cell but clear of the tip
        let mut c = Body::circle(Vec2::new(-10.0, 4.0), 3.0);
        assert_eq!(c.collide_vs_tile(&t), CollisionOutcome::None);
    }

    #[test]
    fn test_67_big_in_cell() {
        let t = tile_at_origin(tile::SLOPE_67_BIG_PN);
        let mut c = Body::circle(Vec2::new(-4.0, 4.0), 2.0);
        assert_ne!(c.collide_vs_tile(&t), CollisionOutcome::None);
    }
}
