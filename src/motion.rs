//! Explicit-velocity integrator for bodies using [`Integrator::Arcade`].
//!
//! [`Integrator::Arcade`]: crate::body::Integrator::Arcade

use crate::body::Body;

/// Stateless arcade integrator.
#[derive(Copy, Clone, Debug, Default)]
pub struct PhysicsManager;

impl PhysicsManager {
    pub fn new() -> Self {
        Self
    }

    /// Advance one velocity component.
    ///
    /// Acceleration wins over drag. Drag moves the velocity toward zero by
    /// `drag * dt` without crossing it, after which `gravity` is added as is.
    /// With neither set the velocity is unchanged. A finite `max` clamps the
    /// result to `[-max, max]`.
    pub fn compute_velocity(&self, velocity: f32, gravity: f32, acceleration: f32, drag: f32, max: f32, dt: f32) -> f32 {
        let mut v = velocity;
        if acceleration != 0.0 {
            v += (acceleration + gravity) * dt;
        } else if drag != 0.0 {
            let d = drag * dt;
            if v - d > 0.0 {
                v -= d;
            } else if v + d < 0.0 {
                v += d;
            } else {
                v = 0.0;
            }
            v += gravity;
        }

        if v != 0.0 && max.is_finite() {
            v = v.clamp(-max, max);
        }
        v
    }

    /// Integrate rotation and position of `body` over `dt`.
    ///
    /// Each component takes half the velocity change before moving and the
    /// other half after, which averages the old and new velocities.
    pub fn update_motion(&self, body: &mut Body, dt: f32) {
        let m = &mut body.motion;

        let target = self.compute_velocity(
            m.angular_velocity,
            0.0,
            m.angular_acceleration,
            m.angular_drag,
            m.max_angular,
            dt,
        );
        let half = (target - m.angular_velocity) / 2.0;
        m.angular_velocity += half;
        m.rotation += m.angular_velocity * dt;
        m.angular_velocity += half;

        let prev = body.pos;
        for axis in 0..2 {
            let target = self.compute_velocity(
                m.velocity[axis],
                m.gravity[axis],
                m.acceleration[axis],
                m.drag[axis],
                m.max_velocity[axis],
                dt,
            );
            let half = (target - m.velocity[axis]) / 2.0;
            m.velocity[axis] += half;
            body.pos[axis] += m.velocity[axis] * dt;
            m.velocity[axis] += half;
        }
        m.delta = body.pos - prev;
        body.oldpos = prev;
    }
}
