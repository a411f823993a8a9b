use crate::body::Body;
use crate::config::WorldConfig;
use crate::group::{Group, ObjectOrGroupMut};
use crate::narrowphase::TileContact;
use crate::quadtree::{NotifyFn, ProcessFn};
use crate::tile::{Tile, TileClass};
use crate::types::*;

pub trait PhysicsWorldApi {
    /// Construct a new world with the given configuration.
    fn new(cfg: WorldConfig) -> Self
    where
        Self: Sized;

    // --- Stepping ----------------------------------------------------------

    /// Integrate every existing body once. Does nothing while paused.
    fn step(&mut self, bodies: &mut Group<Body>);

    /// Integrate a single body.
    fn step_body(&mut self, body: &mut Body);

    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;

    // --- Body vs body ------------------------------------------------------

    /// Separate overlapping bodies of `a` (against `b`, or against each other
    /// when `b` is `None`). `process` may veto a pair before separation and
    /// `notify` sees every pair that was separated. Returns true if any was.
    fn collide(
        &mut self,
        a: ObjectOrGroupMut<'_, Body>,
        b: Option<ObjectOrGroupMut<'_, Body>>,
        process: Option<ProcessFn<'_, Body>>,
        notify: Option<NotifyFn<'_, Body>>,
    ) -> bool;

    /// Like `collide` but reports overlaps without moving anything.
    fn overlap(
        &mut self,
        a: ObjectOrGroupMut<'_, Body>,
        b: Option<ObjectOrGroupMut<'_, Body>>,
        process: Option<ProcessFn<'_, Body>>,
        notify: Option<NotifyFn<'_, Body>>,
    ) -> bool;
}

/// Anything the broadphase can hold.
pub trait Collidable {
    /// Destroyed or inactive objects are skipped at insert and test time.
    fn exists(&self) -> bool;

    /// Faces this object collides on; empty means never collide.
    fn collision_mask(&self) -> Faces;

    /// Bounds at the current position.
    fn bounds(&self) -> Rect;

    /// Bounds at the previous position.
    fn last_bounds(&self) -> Rect;

    /// Region swept between the previous and current position.
    fn swept_bounds(&self) -> Rect {
        self.bounds().union(&self.last_bounds())
    }
}

/// Per-class tile projection for one body shape.
///
/// Every resolver receives the contact already computed by
/// [`Body::collide_vs_tile`] and may call
/// [`Body::report_collision_vs_world`] at most once.
pub trait TileProjectionApi {
    // Flat shapes -----------------------------------------------------------

    fn full(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn half(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;

    // Slopes ----------------------------------------------------------------

    fn deg45(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn deg22_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn deg22_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn deg67_small(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn deg67_big(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;

    // Rounded corners -------------------------------------------------------

    fn concave(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;
    fn convex(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome;

    /// Dispatch on the tile's class.
    fn project(c: &TileContact, body: &mut Body, tile: &Tile) -> CollisionOutcome {
        match tile.class() {
            TileClass::Empty => CollisionOutcome::None,
            TileClass::Full => Self::full(c, body, tile),
            TileClass::Half => Self::half(c, body, tile),
            TileClass::Deg45 => Self::deg45(c, body, tile),
            TileClass::Deg22Small => Self::deg22_small(c, body, tile),
            TileClass::Deg22Big => Self::deg22_big(c, body, tile),
            TileClass::Deg67Small => Self::deg67_small(c, body, tile),
            TileClass::Deg67Big => Self::deg67_big(c, body, tile),
            TileClass::Concave => Self::concave(c, body, tile),
            TileClass::Convex => Self::convex(c, body, tile),
        }
    }
}
