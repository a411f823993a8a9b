use glam::Vec2;
use log::debug;

use crate::api::{Collidable, PhysicsWorldApi};
use crate::body::{Body, Integrator};
use crate::config::WorldConfig;
use crate::group::{Group, ObjectOrGroup, ObjectOrGroupMut};
use crate::motion::PhysicsManager;
use crate::quadtree::{NotifyFn, ProcessFn, QuadTree};
use crate::types::*;

/// Owns the configuration and integrator; bodies stay with the caller.
pub struct PhysicsWorld {
    pub cfg: WorldConfig,
    pub manager: PhysicsManager,
    pub frame_counter: u32,
    paused: bool,

    // Stats of the last broad-phase pass
    last_stats: Option<QuadTreeStats>,
}

/// Snapshot of a body handed to the quadtree, keyed by its slot in the
/// flattened body list.
struct Proxy {
    index: usize,
    bounds: Rect,
    last_bounds: Rect,
    mask: Faces,
    exists: bool,
}

impl Proxy {
    fn of(index: usize, body: &Body) -> Self {
        Self {
            index,
            bounds: body.bounds(),
            last_bounds: body.last_bounds(),
            mask: body.allow_collisions,
            exists: body.exists,
        }
    }
}

impl Collidable for Proxy {
    fn exists(&self) -> bool {
        self.exists
    }

    fn collision_mask(&self) -> Faces {
        self.mask
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn last_bounds(&self) -> Rect {
        self.last_bounds
    }
}

/// Two distinct elements of `bodies`, mutably.
fn pair_mut<'b>(bodies: &'b mut [&mut Body], i: usize, j: usize) -> (&'b mut Body, &'b mut Body) {
    debug_assert!(i != j, "a body cannot pair with itself");
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut *lo[i], &mut *hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut *hi[0], &mut *lo[j])
    }
}

impl PhysicsWorld {
    /// A box using the world's default material.
    pub fn aabb(&self, pos: Vec2, half: Vec2) -> Body {
        Body::aabb(pos, half).with_material(self.cfg.default_material)
    }

    /// A circle using the world's default material.
    pub fn circle(&self, pos: Vec2, radius: f32) -> Body {
        Body::circle(pos, radius).with_material(self.cfg.default_material)
    }

    pub fn last_stats(&self) -> Option<QuadTreeStats> {
        self.last_stats
    }

    /// Broad-phase pairs as indices into `proxies`. The first `split`
    /// proxies form list A; the rest form list B when `dual` is set.
    fn candidate_pairs(&mut self, proxies: &[Proxy], split: usize, dual: bool) -> Vec<(usize, usize)> {
        let mut tree = QuadTree::new(self.cfg.bounds, self.cfg.quadtree_divisions);
        let (a, b) = proxies.split_at(split);
        tree.load(ObjectOrGroup::Many(a), dual.then_some(ObjectOrGroup::Many(b)));

        let mut pairs = Vec::new();
        let mut record = |p: &Proxy, q: &Proxy| pairs.push((p.index, q.index));
        tree.execute(None, Some(&mut record));
        self.last_stats = Some(tree.stats());
        pairs
    }

    fn run_pairs(
        &mut self,
        a: ObjectOrGroupMut<'_, Body>,
        b: Option<ObjectOrGroupMut<'_, Body>>,
        mut process: Option<ProcessFn<'_, Body>>,
        mut notify: Option<NotifyFn<'_, Body>>,
        separate: bool,
    ) -> bool {
        let mut bodies: Vec<&mut Body> = Vec::new();
        a.collect_mut(&mut bodies);
        let split = bodies.len();
        let dual = b.is_some();
        if let Some(b) = b {
            b.collect_mut(&mut bodies);
        }

        let proxies: Vec<Proxy> = bodies.iter().enumerate().map(|(i, b)| Proxy::of(i, b)).collect();
        let pairs = self.candidate_pairs(&proxies, split, dual);
        debug!(
            "frame {}: {} bodies, {} candidate pairs (separate: {})",
            self.frame_counter,
            bodies.len(),
            pairs.len(),
            separate
        );

        let mut any = false;
        for (i, j) in pairs {
            let (x, y) = pair_mut(&mut bodies, i, j);
            if let Some(process) = process.as_deref_mut() {
                if !process(x, y) {
                    continue;
                }
            }
            if separate && !x.collide_vs_body(y).is_hit() {
                continue;
            }
            any = true;
            if let Some(notify) = notify.as_deref_mut() {
                notify(x, y);
            }
        }
        any
    }
}

impl PhysicsWorldApi for PhysicsWorld {
    fn new(cfg: WorldConfig) -> Self {
        Self { cfg, manager: PhysicsManager::new(), frame_counter: 0, paused: false, last_stats: None }
    }

    fn step(&mut self, bodies: &mut Group<Body>) {
        if self.paused {
            return;
        }
        self.frame_counter = self.frame_counter.wrapping_add(1);
        bodies.for_each_mut(&mut |body| self.step_body(body));
    }

    fn step_body(&mut self, body: &mut Body) {
        if self.paused || !body.exists {
            return;
        }
        body.pre_update();
        match body.integrator {
            Integrator::Verlet => body.integrate(self.cfg.gravity),
            Integrator::Arcade => self.manager.update_motion(body, self.cfg.dt),
        }
        if body.collide_world_bounds {
            body.collide_world_bounds(&self.cfg.bounds);
        }
        body.post_update();
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn collide(
        &mut self,
        a: ObjectOrGroupMut<'_, Body>,
        b: Option<ObjectOrGroupMut<'_, Body>>,
        process: Option<ProcessFn<'_, Body>>,
        notify: Option<NotifyFn<'_, Body>>,
    ) -> bool {
        self.run_pairs(a, b, process, notify, true)
    }

    fn overlap(
        &mut self,
        a: ObjectOrGroupMut<'_, Body>,
        b: Option<ObjectOrGroupMut<'_, Body>>,
        process: Option<ProcessFn<'_, Body>>,
        notify: Option<NotifyFn<'_, Body>>,
    ) -> bool {
        self.run_pairs(a, b, process, notify, false)
    }
}
