use glam::Vec2;
use log::trace;

use crate::api::{Collidable, TileProjectionApi};
use crate::config::BodyMaterial;
use crate::narrowphase::{AabbProjection, CircleProjection, TileContact};
use crate::tile::Tile;
use crate::types::*;

/// Collision shape of a body, centered on its position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Aabb { half: Vec2 },
    Circle { radius: f32 },
}

/// Which integrator advances a body in [`crate::world::PhysicsWorld::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Position history with damping and a constant gravity bias.
    #[default]
    Verlet,
    /// Explicit velocity, acceleration and drag via [`crate::motion::PhysicsManager`].
    Arcade,
}

/// Explicit-velocity state used by the arcade integrator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionState {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub drag: Vec2,
    pub gravity: Vec2,
    /// Per-axis speed cap; infinite means unclamped.
    pub max_velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    pub angular_drag: f32,
    pub max_angular: f32,
    /// Displacement written by the last `update_motion`.
    pub delta: Vec2,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            drag: Vec2::ZERO,
            gravity: Vec2::ZERO,
            max_velocity: Vec2::splat(f32::INFINITY),
            rotation: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            angular_drag: 0.0,
            max_angular: f32::INFINITY,
            delta: Vec2::ZERO,
        }
    }
}

/// A box or circle body with Verlet position history.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub key: Option<ColKey>,
    pub shape: Shape,
    pub pos: Vec2,
    /// Position before the most recent integration step.
    pub oldpos: Vec2,
    /// Displacement produced by the last Verlet step.
    pub velocity: Vec2,
    pub material: BodyMaterial,
    pub touching: Faces,
    pub was_touching: Faces,
    pub facing: Facing,
    pub allow_collisions: Faces,
    pub exists: bool,
    pub immovable: bool,
    pub collide_world_bounds: bool,
    pub integrator: Integrator,
    pub motion: MotionState,
}

fn sign0(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Body {
    pub fn new(pos: Vec2, shape: Shape) -> Self {
        Self {
            key: None,
            shape,
            pos,
            oldpos: pos,
            velocity: Vec2::ZERO,
            material: BodyMaterial::default(),
            touching: Faces::empty(),
            was_touching: Faces::empty(),
            facing: Facing::None,
            allow_collisions: Faces::ANY,
            exists: true,
            immovable: false,
            collide_world_bounds: true,
            integrator: Integrator::Verlet,
            motion: MotionState::default(),
        }
    }

    pub fn aabb(pos: Vec2, half: Vec2) -> Self {
        Self::new(pos, Shape::Aabb { half })
    }

    pub fn circle(pos: Vec2, radius: f32) -> Self {
        Self::new(pos, Shape::Circle { radius })
    }

    pub fn with_key(mut self, key: ColKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_material(mut self, material: BodyMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn half_extents(&self) -> Vec2 {
        match self.shape {
            Shape::Aabb { half } => half,
            Shape::Circle { radius } => Vec2::splat(radius),
        }
    }

    /// Circle radius, or zero for boxes.
    pub fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Aabb { .. } => 0.0,
        }
    }

    /// Innermost point of the shape when pushed against a surface facing `dir`.
    ///
    /// Boxes use only the sign of each component, so `dir` may be a raw sign
    /// vector. Circles expect a unit vector.
    pub fn support_point(&self, dir: Vec2) -> Vec2 {
        match self.shape {
            Shape::Aabb { half } => self.pos - Vec2::new(sign0(dir.x) * half.x, sign0(dir.y) * half.y),
            Shape::Circle { radius } => self.pos - dir * radius,
        }
    }

    /// Advance one Verlet step; `gravity` is scaled by the material.
    pub fn integrate(&mut self, gravity: f32) {
        let prev = self.pos;
        let drag = self.material.drag;
        self.pos.x += drag * self.pos.x - drag * self.oldpos.x;
        self.pos.y += drag * self.pos.y - drag * self.oldpos.y + gravity * self.material.gravity_scale;
        self.velocity = self.pos - prev;
        self.oldpos = prev;
    }

    /// Move out of penetration by `correction` and, when travelling into the
    /// surface with `normal`, apply bounce and friction to the implied velocity.
    pub fn report_collision_vs_world(&mut self, correction: Vec2, normal: Vec2) {
        let v = self.pos - self.oldpos;
        let dp = v.dot(normal);
        let nv = normal * dp;
        let tv = v - nv;

        let mut response = Vec2::ZERO;
        if dp < 0.0 {
            let friction = tv * self.material.friction;
            let bounce = nv * (1.0 + self.material.bounce);
            response = bounce + friction;

            if normal.x == 1.0 {
                self.touching |= Faces::LEFT;
            } else if normal.x == -1.0 {
                self.touching |= Faces::RIGHT;
            }
            if normal.y == 1.0 {
                self.touching |= Faces::UP;
            } else if normal.y == -1.0 {
                self.touching |= Faces::DOWN;
            }
        }

        self.pos += correction;
        self.oldpos += correction + response;
    }

    /// Treat the world edges as solid walls. Left/top overflow wins over right/bottom.
    pub fn collide_world_bounds(&mut self, bounds: &Rect) {
        let half = self.half_extents();

        let dx = bounds.min.x - (self.pos.x - half.x);
        if dx > 0.0 {
            self.report_collision_vs_world(Vec2::new(dx, 0.0), Vec2::X);
        } else {
            let dx = (self.pos.x + half.x) - bounds.max.x;
            if dx > 0.0 {
                self.report_collision_vs_world(Vec2::new(-dx, 0.0), Vec2::NEG_X);
            }
        }

        let dy = bounds.min.y - (self.pos.y - half.y);
        if dy > 0.0 {
            self.report_collision_vs_world(Vec2::new(0.0, dy), Vec2::Y);
        } else {
            let dy = (self.pos.y + half.y) - bounds.max.y;
            if dy > 0.0 {
                self.report_collision_vs_world(Vec2::new(0.0, -dy), Vec2::NEG_Y);
            }
        }
    }

    /// Separate from a tile and route to the shape's projection for the tile class.
    pub fn collide_vs_tile(&mut self, tile: &Tile) -> CollisionOutcome {
        let Some(contact) = self.tile_contact(tile) else {
            return CollisionOutcome::None;
        };
        if tile.id == 0 {
            return CollisionOutcome::None;
        }
        let outcome = match self.shape {
            Shape::Aabb { .. } => AabbProjection::project(&contact, self, tile),
            Shape::Circle { .. } => CircleProjection::project(&contact, self, tile),
        };
        trace!("tile {} at {:?} -> {:?}", tile.id, tile.pos, outcome);
        outcome
    }

    /// Overlap of this body's bounding extent with the tile cell, if any.
    pub fn tile_contact(&self, tile: &Tile) -> Option<TileContact> {
        let half = self.half_extents();
        let offset = self.pos - tile.pos;
        let px = tile.xw + half.x - offset.x.abs();
        if px <= 0.0 {
            return None;
        }
        let py = tile.yw + half.y - offset.y.abs();
        if py <= 0.0 {
            return None;
        }
        Some(TileContact::new(offset, Vec2::new(px, py), tile))
    }

    /// Box-vs-box separation along the minimal axis. Circles use their bounding box.
    pub fn collide_vs_body(&mut self, other: &mut Body) -> CollisionOutcome {
        let offset = self.pos - other.pos;
        let ha = self.half_extents();
        let hb = other.half_extents();
        let px = ha.x + hb.x - offset.x.abs();
        if px <= 0.0 {
            return CollisionOutcome::None;
        }
        let py = ha.y + hb.y - offset.y.abs();
        if py <= 0.0 {
            return CollisionOutcome::None;
        }
        let correction = if px < py {
            Vec2::new(if offset.x < 0.0 { -px } else { px }, 0.0)
        } else {
            Vec2::new(0.0, if offset.y < 0.0 { -py } else { py })
        };
        let normal = correction / correction.length();
        self.report_collision_vs_body(correction, normal, other);
        CollisionOutcome::Axis
    }

    /// Split `correction` (pointing from `other` to `self`) by immovability.
    pub fn report_collision_vs_body(&mut self, correction: Vec2, normal: Vec2, other: &mut Body) {
        let self_into = (self.pos - self.oldpos).dot(normal) < 0.0;
        let other_into = (other.pos - other.oldpos).dot(-normal) < 0.0;

        match (self.immovable, other.immovable) {
            (true, true) => {
                let half = correction * 0.5;
                self.pos += half;
                self.oldpos = self.pos;
                other.pos -= half;
                other.oldpos = other.pos;
            }
            (false, false) => {
                let half = correction * 0.5;
                self.pos += half;
                other.pos -= half;
                if self_into {
                    self.reverse();
                }
                if other_into {
                    other.reverse();
                }
            }
            (false, true) => {
                self.pos += correction;
                if self_into {
                    self.reverse();
                }
            }
            (true, false) => {
                other.pos -= correction;
                if other_into {
                    other.reverse();
                }
            }
        }
    }

    /// Mirror the implied velocity.
    pub fn reverse(&mut self) {
        let v = self.pos - self.oldpos;
        self.oldpos = self.pos + v;
    }

    /// Latch and clear touching flags before a new step.
    pub fn pre_update(&mut self) {
        self.was_touching = self.touching;
        self.touching = Faces::empty();
    }

    /// Derive facing from the velocity of the active integrator. Vertical wins.
    pub fn post_update(&mut self) {
        let v = self.current_velocity();
        if v.x < 0.0 {
            self.facing = Facing::Left;
        } else if v.x > 0.0 {
            self.facing = Facing::Right;
        }
        if v.y < 0.0 {
            self.facing = Facing::Up;
        } else if v.y > 0.0 {
            self.facing = Facing::Down;
        }
    }

    pub fn current_velocity(&self) -> Vec2 {
        match self.integrator {
            Integrator::Verlet => self.velocity,
            Integrator::Arcade => self.motion.velocity,
        }
    }

    pub fn set_zero_velocity(&mut self) {
        self.oldpos = self.pos;
        self.motion.velocity = Vec2::ZERO;
    }

    /// Teleport and drop all velocity.
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.oldpos = pos;
        self.velocity = Vec2::ZERO;
        self.motion.velocity = Vec2::ZERO;
        self.motion.delta = Vec2::ZERO;
    }

    pub fn delta(&self) -> Vec2 {
        self.pos - self.oldpos
    }

    pub fn is_touching(&self, faces: Faces) -> bool {
        self.touching.intersects(faces)
    }

    pub fn move_left(&mut self, speed: f32, dt: f32) {
        self.push_axis_clamped(Vec2::new(-speed * dt, 0.0));
    }

    pub fn move_right(&mut self, speed: f32, dt: f32) {
        self.push_axis_clamped(Vec2::new(speed * dt, 0.0));
    }

    pub fn move_up(&mut self, speed: f32, dt: f32) {
        self.push_axis_clamped(Vec2::new(0.0, -speed * dt));
    }

    pub fn move_down(&mut self, speed: f32, dt: f32) {
        self.push_axis_clamped(Vec2::new(0.0, speed * dt));
    }

    /// Set the implied velocity to `speed * dt` along `angle_deg`.
    pub fn move_to(&mut self, speed: f32, angle_deg: f32, dt: f32) {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        self.pos = self.oldpos + Vec2::new(cos, sin) * (speed * dt);
    }

    /// Like [`Body::move_to`] but away from `angle_deg`.
    pub fn move_from(&mut self, speed: f32, angle_deg: f32, dt: f32) {
        self.move_to(-speed, angle_deg, dt);
    }

    fn push_axis_clamped(&mut self, impulse: Vec2) {
        let max = self.material.max_speed;
        let v = self.pos - self.oldpos;
        if impulse.x != 0.0 {
            self.pos.x = self.oldpos.x + (v.x + impulse.x).clamp(-max, max);
        }
        if impulse.y != 0.0 {
            self.pos.y = self.oldpos.y + (v.y + impulse.y).clamp(-max, max);
        }
    }
}

impl Collidable for Body {
    fn exists(&self) -> bool {
        self.exists
    }

    fn collision_mask(&self) -> Faces {
        self.allow_collisions
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_half(self.pos, self.half_extents())
    }

    fn last_bounds(&self) -> Rect {
        Rect::from_center_half(self.oldpos, self.half_extents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{self, Tile};
    use approx::assert_abs_diff_eq;

    fn still_box(pos: Vec2, half: f32) -> Body {
        Body::aabb(pos, Vec2::splat(half))
    }

    #[test]
    fn test_integrate_applies_drag_and_gravity() {
        let mut b = still_box(Vec2::new(10.0, 10.0), 1.0);
        b.oldpos = Vec2::new(9.0, 10.0);
        b.integrate(0.2);
        assert_abs_diff_eq!(b.pos, Vec2::new(11.0, 10.2), epsilon = 1e-5);
        assert_abs_diff_eq!(b.oldpos, Vec2::new(10.0, 10.0), epsilon = 1e-5);
        assert_abs_diff_eq!(b.velocity, Vec2::new(1.0, 0.2), epsilon = 1e-5);

        let mut damped = still_box(Vec2::new(10.0, 10.0), 1.0);
        damped.material.drag = 0.5;
        damped.material.gravity_scale = 0.0;
        damped.oldpos = Vec2::new(8.0, 10.0);
        damped.integrate(0.2);
        assert_abs_diff_eq!(damped.pos, Vec2::new(11.0, 10.0), epsilon = 1e-5);
    }

    #[test]
    fn test_report_moving_into_surface_bounces() {
        let mut b = still_box(Vec2::new(0.0, 10.0), 1.0);
        b.oldpos = Vec2::new(-1.0, 8.0); // moving (1, 2), down-right
        b.report_collision_vs_world(Vec2::new(0.0, -0.5), Vec2::NEG_Y);
        assert_abs_diff_eq!(b.pos, Vec2::new(0.0, 9.5), epsilon = 1e-5);
        // normal part (0,2) reflected with bounce 0.3, tangent (1,0) loses 5%
        let v = b.pos - b.oldpos;
        assert_abs_diff_eq!(v, Vec2::new(0.95, -0.6), epsilon = 1e-5);
        assert!(b.touching.contains(Faces::DOWN));
    }

    #[test]
    fn test_report_moving_away_only_corrects() {
        let mut b = still_box(Vec2::new(0.0, 10.0), 1.0);
        b.oldpos = Vec2::new(0.0, 11.0); // moving up, away from the floor
        b.report_collision_vs_world(Vec2::new(0.0, -0.5), Vec2::NEG_Y);
        assert_abs_diff_eq!(b.pos - b.oldpos, Vec2::new(0.0, -1.0), epsilon = 1e-5);
        assert!(b.touching.is_empty());
    }

    #[test]
    fn test_world_bounds_left_and_bottom() {
        let bounds = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let mut b = still_box(Vec2::new(0.5, 99.0), 2.0);
        b.collide_world_bounds(&bounds);
        assert_abs_diff_eq!(b.pos, Vec2::new(2.0, 98.0), epsilon = 1e-5);

        let mut c = Body::circle(Vec2::new(50.0, 50.0), 5.0);
        c.collide_world_bounds(&bounds);
        assert_eq!(c.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_box_inside_but_not_touching_full_tile_is_none() {
        let t = Tile::new(Vec2::new(8.0, 8.0), 16.0, 16.0, tile::FULL).unwrap();
        let mut b = still_box(Vec2::new(30.0, 8.0), 4.0);
        assert_eq!(b.collide_vs_tile(&t), CollisionOutcome::None);
        // exactly touching edges: px == 0
        let mut b = still_box(Vec2::new(20.0, 8.0), 4.0);
        assert_eq!(b.collide_vs_tile(&t), CollisionOutcome::None);
    }

    #[test]
    fn test_empty_tile_never_collides() {
        let t = Tile::new(Vec2::new(8.0, 8.0), 16.0, 16.0, tile::EMPTY).unwrap();
        let mut b = still_box(Vec2::new(8.0, 8.0), 4.0);
        assert_eq!(b.collide_vs_tile(&t), CollisionOutcome::None);
        assert_eq!(b.pos, Vec2::new(8.0, 8.0));
    }

    #[test]
    fn test_body_vs_body_split_and_immovable() {
        let mut a = still_box(Vec2::new(0.0, 0.0), 1.0);
        let mut b = still_box(Vec2::new(1.5, 0.0), 1.0);
        assert_eq!(a.collide_vs_body(&mut b), CollisionOutcome::Axis);
        assert_abs_diff_eq!(a.pos.x, -0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(b.pos.x, 1.75, epsilon = 1e-5);

        let mut wall = still_box(Vec2::new(1.5, 0.0), 1.0);
        wall.immovable = true;
        let mut mover = still_box(Vec2::new(0.0, 0.0), 1.0);
        mover.oldpos = Vec2::new(-1.0, 0.0);
        mover.collide_vs_body(&mut wall);
        assert_abs_diff_eq!(mover.pos.x, -0.5, epsilon = 1e-5);
        assert_eq!(wall.pos, Vec2::new(1.5, 0.0));
        // velocity was (+1,0) into the wall; now reversed
        assert!(mover.delta().x < 0.0);
    }

    #[test]
    fn test_move_helpers_clamp_to_max_speed() {
        let mut b = still_box(Vec2::ZERO, 1.0);
        b.material.max_speed = 2.0;
        b.move_right(600.0, 1.0 / 60.0);
        assert_abs_diff_eq!(b.delta().x, 2.0, epsilon = 1e-5);
        b.move_left(60.0, 1.0 / 60.0);
        assert_abs_diff_eq!(b.delta().x, 1.0, epsilon = 1e-5);
        b.move_to(60.0, 90.0, 1.0);
        assert_abs_diff_eq!(b.delta(), Vec2::new(0.0, 60.0), epsilon = 1e-3);
    }

    #[test]
    fn test_pre_and_post_update_track_flags_and_facing() {
        let mut b = still_box(Vec2::ZERO, 1.0);
        b.touching = Faces::DOWN;
        b.pre_update();
        assert_eq!(b.was_touching, Faces::DOWN);
        assert!(b.touching.is_empty());
        b.velocity = Vec2::new(-1.0, 0.0);
        b.post_update();
        assert_eq!(b.facing, Facing::Left);
        b.velocity = Vec2::new(-1.0, 2.0);
        b.post_update();
        assert_eq!(b.facing, Facing::Down);
    }

    #[test]
    fn test_support_point_by_shape() {
        let b = Body::aabb(Vec2::new(10.0, 10.0), Vec2::new(2.0, 3.0));
        assert_eq!(b.support_point(Vec2::new(1.0, -1.0)), Vec2::new(8.0, 13.0));
        assert_eq!(b.support_point(Vec2::new(0.0, 1.0)), Vec2::new(10.0, 7.0));
        let c = Body::circle(Vec2::new(10.0, 10.0), 2.0);
        assert_eq!(c.support_point(Vec2::new(0.0, -1.0)), Vec2::new(10.0, 12.0));
    }
}
