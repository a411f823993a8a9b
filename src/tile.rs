//! Tile shape ids and their collision classification.
//!
//! Ids are laid out in groups of four orientations (pn, nn, np, pp), where
//! the letters give the sign of the solid quadrant along x and y:
//!
//! | ids   | class                         |
//! |-------|-------------------------------|
//! | 0     | empty                         |
//! | 1     | full                          |
//! | 2-5   | 45 degree slope               |
//! | 6-9   | concave corner                |
//! | 10-13 | convex corner                 |
//! | 14-17 | 22 degree slope, small piece  |
//! | 18-21 | 22 degree slope, big piece    |
//! | 22-25 | 67 degree slope, small piece  |
//! | 26-29 | 67 degree slope, big piece    |
//! | 30-33 | half tile (down, right, up, left) |

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use log::warn;

use crate::error::CollisionError;
use crate::types::Rect;

pub const EMPTY: u32 = 0;
pub const FULL: u32 = 1;
pub const SLOPE_45_PN: u32 = 2;
pub const SLOPE_45_NN: u32 = 3;
pub const SLOPE_45_NP: u32 = 4;
pub const SLOPE_45_PP: u32 = 5;
pub const CONCAVE_PN: u32 = 6;
pub const CONCAVE_NN: u32 = 7;
pub const CONCAVE_NP: u32 = 8;
pub const CONCAVE_PP: u32 = 9;
pub const CONVEX_PN: u32 = 10;
pub const CONVEX_NN: u32 = 11;
pub const CONVEX_NP: u32 = 12;
pub const CONVEX_PP: u32 = 13;
pub const SLOPE_22_SMALL_PN: u32 = 14;
pub const SLOPE_22_SMALL_NN: u32 = 15;
pub const SLOPE_22_SMALL_NP: u32 = 16;
pub const SLOPE_22_SMALL_PP: u32 = 17;
pub const SLOPE_22_BIG_PN: u32 = 18;
pub const SLOPE_22_BIG_NN: u32 = 19;
pub const SLOPE_22_BIG_NP: u32 = 20;
pub const SLOPE_22_BIG_PP: u32 = 21;
pub const SLOPE_67_SMALL_PN: u32 = 22;
pub const SLOPE_67_SMALL_NN: u32 = 23;
pub const SLOPE_67_SMALL_NP: u32 = 24;
pub const SLOPE_67_SMALL_PP: u32 = 25;
pub const SLOPE_67_BIG_PN: u32 = 26;
pub const SLOPE_67_BIG_NN: u32 = 27;
pub const SLOPE_67_BIG_NP: u32 = 28;
pub const SLOPE_67_BIG_PP: u32 = 29;
pub const HALF_DOWN: u32 = 30;
pub const HALF_RIGHT: u32 = 31;
pub const HALF_UP: u32 = 32;
pub const HALF_LEFT: u32 = 33;

/// Number of defined shape ids.
pub const SHAPE_COUNT: usize = 34;

/// Geometric family of a tile shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileClass {
    Empty,
    Full,
    Deg45,
    Concave,
    Convex,
    /// 22.5 degree slope, wedge piece (wide base, short rise).
    Deg22Small,
    /// 22.5 degree slope, the solid piece under the wedge.
    Deg22Big,
    /// 67.5 degree slope, wedge piece.
    Deg67Small,
    Deg67Big,
    Half,
}

/// Classification of one shape id.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileShape {
    pub class: TileClass,
    /// Solid quadrant along x, in {-1, 0, 1}.
    pub signx: f32,
    pub signy: f32,
    /// Unit slope normal; zero for empty, full, concave and convex.
    pub normal: Vec2,
}

/// Tagged result of [`classify`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Classification {
    Unclassified { id: u32 },
    Classified(TileShape),
}

impl Classification {
    pub fn into_result(self) -> Result<TileShape, CollisionError> {
        match self {
            Classification::Classified(shape) => Ok(shape),
            Classification::Unclassified { id } => Err(CollisionError::UnclassifiedTile { id }),
        }
    }
}

const INV_SQRT5: f32 = 0.447_213_6;
const TWO_INV_SQRT5: f32 = 0.894_427_2;

const fn shape(class: TileClass, signx: f32, signy: f32, nx: f32, ny: f32) -> TileShape {
    TileShape { class, signx, signy, normal: Vec2::new(nx, ny) }
}

const fn deg45(sx: f32, sy: f32) -> TileShape {
    shape(TileClass::Deg45, sx, sy, sx * FRAC_1_SQRT_2, sy * FRAC_1_SQRT_2)
}

const fn corner(class: TileClass, sx: f32, sy: f32) -> TileShape {
    shape(class, sx, sy, 0.0, 0.0)
}

const fn deg22(class: TileClass, sx: f32, sy: f32) -> TileShape {
    shape(class, sx, sy, sx * INV_SQRT5, sy * TWO_INV_SQRT5)
}

const fn deg67(class: TileClass, sx: f32, sy: f32) -> TileShape {
    shape(class, sx, sy, sx * TWO_INV_SQRT5, sy * INV_SQRT5)
}

const fn half(sx: f32, sy: f32) -> TileShape {
    shape(TileClass::Half, sx, sy, sx, sy)
}

/// Id -> shape table, indexed by id.
pub static SHAPE_TABLE: [TileShape; SHAPE_COUNT] = [
    corner(TileClass::Empty, 0.0, 0.0),
    corner(TileClass::Full, 0.0, 0.0),
    deg45(1.0, -1.0),
    deg45(-1.0, -1.0),
    deg45(-1.0, 1.0),
    deg45(1.0, 1.0),
    corner(TileClass::Concave, 1.0, -1.0),
    corner(TileClass::Concave, -1.0, -1.0),
    corner(TileClass::Concave, -1.0, 1.0),
    corner(TileClass::Concave, 1.0, 1.0),
    corner(TileClass::Convex, 1.0, -1.0),
    corner(TileClass::Convex, -1.0, -1.0),
    corner(TileClass::Convex, -1.0, 1.0),
    corner(TileClass::Convex, 1.0, 1.0),
    deg22(TileClass::Deg22Small, 1.0, -1.0),
    deg22(TileClass::Deg22Small, -1.0, -1.0),
    deg22(TileClass::Deg22Small, -1.0, 1.0),
    deg22(TileClass::Deg22Small, 1.0, 1.0),
    deg22(TileClass::Deg22Big, 1.0, -1.0),
    deg22(TileClass::Deg22Big, -1.0, -1.0),
    deg22(TileClass::Deg22Big, -1.0, 1.0),
    deg22(TileClass::Deg22Big, 1.0, 1.0),
    deg67(TileClass::Deg67Small, 1.0, -1.0),
    deg67(TileClass::Deg67Small, -1.0, -1.0),
    deg67(TileClass::Deg67Small, -1.0, 1.0),
    deg67(TileClass::Deg67Small, 1.0, 1.0),
    deg67(TileClass::Deg67Big, 1.0, -1.0),
    deg67(TileClass::Deg67Big, -1.0, -1.0),
    deg67(TileClass::Deg67Big, -1.0, 1.0),
    deg67(TileClass::Deg67Big, 1.0, 1.0),
    half(0.0, -1.0),
    half(-1.0, 0.0),
    half(0.0, 1.0),
    half(1.0, 0.0),
];

/// Look up the collision class of a shape id.
pub fn classify(id: u32) -> Classification {
    match SHAPE_TABLE.get(id as usize) {
        Some(shape) => Classification::Classified(*shape),
        None => Classification::Unclassified { id },
    }
}

/// A classified tile placed in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    pub id: u32,
    pub shape: TileShape,
    /// Center of the cell.
    pub pos: Vec2,
    pub xw: f32,
    pub yw: f32,
}

impl Tile {
    /// Build a tile centered at `pos`. Slope and corner ids (2-29) need a
    /// square cell, so their height follows the width.
    pub fn new(pos: Vec2, width: f32, height: f32, id: u32) -> Result<Self, CollisionError> {
        let shape = classify(id).into_result().inspect_err(|e| warn!("{e}"))?;
        let height = if (2..30).contains(&id) { width } else { height };
        Ok(Self { id, shape, pos, xw: (width / 2.0).abs(), yw: (height / 2.0).abs() })
    }

    /// Change the shape id. On failure the tile keeps its previous id and shape.
    pub fn set_id(&mut self, id: u32) -> Result<(), CollisionError> {
        match classify(id) {
            Classification::Classified(shape) => {
                self.id = id;
                self.shape = shape;
                Ok(())
            }
            Classification::Unclassified { id } => {
                warn!("tile shape id {id} is unknown; keeping id {}", self.id);
                Err(CollisionError::UnclassifiedTile { id })
            }
        }
    }

    pub fn class(&self) -> TileClass {
        self.shape.class
    }

    pub fn signx(&self) -> f32 {
        self.shape.signx
    }

    pub fn signy(&self) -> f32 {
        self.shape.signy
    }

    pub fn sign(&self) -> Vec2 {
        Vec2::new(self.shape.signx, self.shape.signy)
    }

    pub fn half(&self) -> Vec2 {
        Vec2::new(self.xw, self.yw)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_half(self.pos, self.half())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_classifies_with_valid_signs() {
        for id in 0..SHAPE_COUNT as u32 {
            let shape = match classify(id) {
                Classification::Classified(s) => s,
                Classification::Unclassified { .. } => panic!("id {id} should classify"),
            };
            for s in [shape.signx, shape.signy] {
                assert!(s == -1.0 || s == 0.0 || s == 1.0);
            }
            let both_zero = shape.signx == 0.0 && shape.signy == 0.0;
            let expect_zero = matches!(shape.class, TileClass::Empty | TileClass::Full);
            assert_eq!(both_zero, expect_zero, "id {id}");
        }
    }

    #[test]
    fn test_unknown_id_is_unclassified() {
        assert_eq!(classify(34), Classification::Unclassified { id: 34 });
        assert_eq!(
            classify(500).into_result(),
            Err(CollisionError::UnclassifiedTile { id: 500 })
        );
    }

    #[test]
    fn test_normals_are_unit_or_zero() {
        for shape in SHAPE_TABLE.iter() {
            let len = shape.normal.length();
            match shape.class {
                TileClass::Empty | TileClass::Full | TileClass::Concave | TileClass::Convex => {
                    assert_eq!(len, 0.0)
                }
                _ => assert!((len - 1.0).abs() < 1e-5),
            }
        }
    }

    #[test]
    fn test_specific_orientations() {
        let s = classify(SLOPE_45_NP).into_result().unwrap();
        assert_eq!(s.class, TileClass::Deg45);
        assert!((s.normal.x + FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((s.normal.y - FRAC_1_SQRT_2).abs() < 1e-6);

        let s = classify(SLOPE_22_BIG_PN).into_result().unwrap();
        assert_eq!(s.class, TileClass::Deg22Big);
        assert!((s.normal.x - INV_SQRT5).abs() < 1e-6);
        assert!((s.normal.y + TWO_INV_SQRT5).abs() < 1e-6);

        let s = classify(SLOPE_67_SMALL_PP).into_result().unwrap();
        assert!((s.normal.x - TWO_INV_SQRT5).abs() < 1e-6);
        assert!((s.normal.y - INV_SQRT5).abs() < 1e-6);

        assert_eq!(classify(HALF_DOWN).into_result().unwrap().normal, Vec2::new(0.0, -1.0));
        assert_eq!(classify(HALF_RIGHT).into_result().unwrap().normal, Vec2::new(-1.0, 0.0));
        assert_eq!(classify(HALF_UP).into_result().unwrap().normal, Vec2::new(0.0, 1.0));
        assert_eq!(classify(HALF_LEFT).into_result().unwrap().normal, Vec2::new(1.0, 0.0));
        assert_eq!(classify(CONVEX_NN).into_result().unwrap().normal, Vec2::ZERO);
    }

    #[test]
    fn test_slope_tiles_are_square() {
        let t = Tile::new(Vec2::ZERO, 16.0, 32.0, SLOPE_45_PN).unwrap();
        assert_eq!(t.yw, 8.0);
        let t = Tile::new(Vec2::ZERO, 16.0, 32.0, FULL).unwrap();
        assert_eq!(t.yw, 16.0);
        let t = Tile::new(Vec2::ZERO, 16.0, 32.0, HALF_UP).unwrap();
        assert_eq!(t.yw, 16.0);
    }

    #[test]
    fn test_set_id_failure_keeps_previous_shape() {
        let mut t = Tile::new(Vec2::ZERO, 16.0, 16.0, CONCAVE_PP).unwrap();
        let before = t;
        assert!(t.set_id(99).is_err());
        assert_eq!(t, before);
        t.set_id(HALF_LEFT).unwrap();
        assert_eq!(t.class(), TileClass::Half);
        assert_eq!(t.sign(), Vec2::new(1.0, 0.0));
    }
}
