//! Quadtree broad-phase over two object lists.
//!
//! Objects are loaded into list A and, optionally, list B. A pass tests A
//! against B, or A against itself when no B list was loaded, and reports
//! every overlapping pair of swept bounds to the caller's closures.

use std::collections::HashSet;
use std::ptr;

use glam::Vec2;
use log::debug;

use crate::api::Collidable;
use crate::group::ObjectOrGroup;
use crate::types::{QuadTreeStats, Rect};

/// Which list an object is inserted into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum List {
    A,
    B,
}

/// Accepts or rejects an overlapping pair before it is reported.
pub type ProcessFn<'p, T> = &'p mut dyn FnMut(&T, &T) -> bool;
/// Receives every accepted pair.
pub type NotifyFn<'p, T> = &'p mut dyn FnMut(&T, &T);

const NW: usize = 0;
const NE: usize = 1;
const SE: usize = 2;
const SW: usize = 3;

struct QuadNode<'a, T> {
    bounds: Rect,
    depth: usize,
    can_subdivide: bool,
    list_a: Vec<&'a T>,
    list_b: Vec<&'a T>,
    children: [Option<Box<QuadNode<'a, T>>>; 4],
}

/// State for a single `execute` pass.
struct PassContext<'p, T> {
    use_both_lists: bool,
    seen: HashSet<(usize, usize)>,
    stats: QuadTreeStats,
    process: Option<ProcessFn<'p, T>>,
    notify: Option<NotifyFn<'p, T>>,
    any: bool,
}

pub struct QuadTree<'a, T> {
    root: QuadNode<'a, T>,
    /// Nodes no larger than this on both axes are leaves.
    min_size: f32,
    use_both_lists: bool,
    stats: QuadTreeStats,
}

fn addr<T>(obj: &T) -> usize {
    obj as *const T as usize
}

fn collides<T: Collidable>(obj: &T) -> bool {
    obj.exists() && !obj.collision_mask().is_empty()
}

impl<'a, T> QuadNode<'a, T> {
    fn new(bounds: Rect, depth: usize, min_size: f32) -> Self {
        Self {
            bounds,
            depth,
            can_subdivide: bounds.width() > min_size || bounds.height() > min_size,
            list_a: Vec::new(),
            list_b: Vec::new(),
            children: [None, None, None, None],
        }
    }

    fn quadrant(&self, q: usize) -> Rect {
        let half = self.bounds.size() * 0.5;
        let mid = self.bounds.min + half;
        let min = match q {
            NW => self.bounds.min,
            NE => Vec2::new(mid.x, self.bounds.min.y),
            SE => mid,
            _ => Vec2::new(self.bounds.min.x, mid.y),
        };
        Rect::new(min, min + half)
    }

    /// Child `q`, created on first use with a copy of this node's lists.
    fn child(&mut self, q: usize, min_size: f32, stats: &mut QuadTreeStats) -> &mut QuadNode<'a, T> {
        let bounds = self.quadrant(q);
        let depth = self.depth + 1;
        let (list_a, list_b) = (&self.list_a, &self.list_b);
        self.children[q].get_or_insert_with(|| {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            stats.entries += list_a.len() + list_b.len();
            let mut node = QuadNode::new(bounds, depth, min_size);
            node.list_a = list_a.clone();
            node.list_b = list_b.clone();
            Box::new(node)
        })
    }

    fn add_object(&mut self, obj: &'a T, rect: &Rect, list: List, min_size: f32, stats: &mut QuadTreeStats) {
        let b = self.bounds;
        let inside_object = b.min.x >= rect.min.x
            && b.max.x <= rect.max.x
            && b.min.y >= rect.min.y
            && b.max.y <= rect.max.y;
        if !self.can_subdivide || inside_object {
            self.add_to_list(obj, list, stats);
            return;
        }

        for q in [NW, SW, NE, SE] {
            if self.quadrant(q).contains_rect(rect) {
                self.child(q, min_size, stats).add_object(obj, rect, list, min_size, stats);
                return;
            }
        }

        // inclusive, so zero-area objects on a midline still land somewhere
        for q in [NW, NE, SE, SW] {
            if self.quadrant(q).intersects(rect) {
                self.child(q, min_size, stats).add_object(obj, rect, list, min_size, stats);
            }
        }
    }

    fn add_to_list(&mut self, obj: &'a T, list: List, stats: &mut QuadTreeStats) {
        match list {
            List::A => self.list_a.push(obj),
            List::B => self.list_b.push(obj),
        }
        stats.entries += 1;
        for child in self.children.iter_mut().flatten() {
            child.add_to_list(obj, list, stats);
        }
    }
}

impl<T: Collidable> QuadNode<'_, T> {
    fn execute(&self, ctx: &mut PassContext<'_, T>) {
        for (i, &a) in self.list_a.iter().enumerate() {
            if !collides(a) {
                continue;
            }
            let others = if ctx.use_both_lists { &self.list_b[..] } else { &self.list_a[i + 1..] };
            for &b in others {
                ctx.test_pair(a, b);
            }
        }
        for child in self.children.iter().flatten() {
            child.execute(ctx);
        }
    }
}

impl<T: Collidable> PassContext<'_, T> {
    fn test_pair(&mut self, a: &T, b: &T) {
        if ptr::eq(a, b) || !collides(b) {
            return;
        }
        let (ka, kb) = (addr(a), addr(b));
        if !self.seen.insert((ka.min(kb), ka.max(kb))) {
            return;
        }
        self.stats.pairs_tested += 1;
        if !a.swept_bounds().overlaps(&b.swept_bounds()) {
            return;
        }
        let accepted = match self.process.as_deref_mut() {
            Some(process) => process(a, b),
            None => true,
        };
        if !accepted {
            return;
        }
        self.stats.pairs_reported += 1;
        self.any = true;
        if let Some(notify) = self.notify.as_deref_mut() {
            notify(a, b);
        }
    }
}

impl<'a, T: Collidable> QuadTree<'a, T> {
    /// Empty tree over `root`. Leaves are no smaller than `(w + h) / (2 * divisions)`.
    pub fn new(root: Rect, divisions: u32) -> Self {
        let min_size = (root.width() + root.height()) / (2.0 * divisions.max(1) as f32);
        Self {
            root: QuadNode::new(root, 0, min_size),
            min_size,
            use_both_lists: false,
            stats: QuadTreeStats { nodes: 1, ..Default::default() },
        }
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Replace the contents with `a` and optionally `b`. Without `b` the next
    /// pass compares list A against itself.
    pub fn load(&mut self, a: ObjectOrGroup<'a, T>, b: Option<ObjectOrGroup<'a, T>>) {
        self.clear();
        self.use_both_lists = b.is_some();
        let mut objs = Vec::new();
        a.collect(&mut objs);
        for obj in objs.drain(..) {
            self.add(obj, List::A);
        }
        if let Some(b) = b {
            b.collect(&mut objs);
            for obj in objs {
                self.add(obj, List::B);
            }
        }
        debug!(
            "quadtree loaded: {} nodes, depth {}, {} entries",
            self.stats.nodes, self.stats.max_depth, self.stats.entries
        );
    }

    /// Insert one object. Objects that don't exist or have an empty mask are ignored.
    pub fn add(&mut self, obj: &'a T, list: List) {
        if !collides(obj) {
            return;
        }
        if list == List::B {
            self.use_both_lists = true;
        }
        let rect = obj.bounds();
        self.root.add_object(obj, &rect, list, self.min_size, &mut self.stats);
    }

    /// Run one overlap pass. Returns true if any pair was accepted.
    pub fn execute<'p>(&mut self, process: Option<ProcessFn<'p, T>>, notify: Option<NotifyFn<'p, T>>) -> bool {
        let mut ctx = PassContext {
            use_both_lists: self.use_both_lists,
            seen: HashSet::new(),
            stats: QuadTreeStats::default(),
            process,
            notify,
            any: false,
        };
        self.root.execute(&mut ctx);
        self.stats.pairs_tested = ctx.stats.pairs_tested;
        self.stats.pairs_reported = ctx.stats.pairs_reported;
        debug!(
            "quadtree pass: {} pairs tested, {} reported",
            ctx.stats.pairs_tested, ctx.stats.pairs_reported
        );
        ctx.any
    }

    pub fn stats(&self) -> QuadTreeStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.root = QuadNode::new(self.root.bounds, 0, self.min_size);
        self.use_both_lists = false;
        self.stats = QuadTreeStats { nodes: 1, ..Default::default() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::types::Faces;

    #[derive(Debug, Clone)]
    struct Probe {
        id: u32,
        rect: Rect,
        exists: bool,
        mask: Faces,
    }

    impl Probe {
        fn new(id: u32, x: f32, y: f32, w: f32, h: f32) -> Self {
            Self { id, rect: Rect::from_xywh(x, y, w, h), exists: true, mask: Faces::ANY }
        }
    }

    impl Collidable for Probe {
        fn exists(&self) -> bool {
            self.exists
        }
        fn collision_mask(&self) -> Faces {
            self.mask
        }
        fn bounds(&self) -> Rect {
            self.rect
        }
        fn last_bounds(&self) -> Rect {
            self.rect
        }
    }

    fn world() -> Rect {
        Rect::from_xywh(0.0, 0.0, 100.0, 100.0)
    }

    fn run(tree: &mut QuadTree<'_, Probe>) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        let mut notify = |a: &Probe, b: &Probe| pairs.push((a.id.min(b.id), a.id.max(b.id)));
        tree.execute(None, Some(&mut notify));
        pairs.sort();
        pairs
    }

    #[test]
    fn test_leaf_size_respects_divisions() {
        let mut tree: QuadTree<'_, Probe> = QuadTree::new(world(), 2);
        assert!((tree.min_size() - 50.0).abs() < 1e-6);
        let small = [Probe::new(1, 10.0, 10.0, 2.0, 2.0)];
        tree.load(ObjectOrGroup::Many(&small), None);
        let stats = tree.stats();
        // root subdivides once; 50x50 children are leaves
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_pair_spanning_many_nodes_reported_once() {
        let mut tree = QuadTree::new(world(), 8);
        // both straddle the center and land in all four quadrants
        let objs = vec![
            Probe::new(1, 45.0, 45.0, 10.0, 10.0),
            Probe::new(2, 48.0, 48.0, 10.0, 10.0),
            Probe::new(3, 80.0, 80.0, 5.0, 5.0),
        ];
        tree.load(ObjectOrGroup::from(&objs), None);
        assert!(tree.stats().entries > 2);
        assert_eq!(run(&mut tree), vec![(1, 2)]);
    }

    #[test]
    fn test_dual_lists_only_cross_pairs() {
        let mut tree = QuadTree::new(world(), 6);
        let a = vec![Probe::new(1, 10.0, 10.0, 10.0, 10.0), Probe::new(2, 12.0, 12.0, 10.0, 10.0)];
        let b = vec![Probe::new(10, 0.0, 0.0, 100.0, 100.0), Probe::new(11, 70.0, 70.0, 5.0, 5.0)];
        tree.load(ObjectOrGroup::from(&a), Some(ObjectOrGroup::from(&b)));
        // 1 and 2 overlap but share list A
        assert_eq!(run(&mut tree), vec![(1, 10), (2, 10)]);
    }

    #[test]
    fn test_skips_masked_missing_and_self() {
        let mut tree = QuadTree::new(world(), 6);
        let mut masked = Probe::new(2, 10.0, 10.0, 5.0, 5.0);
        masked.mask = Faces::empty();
        let mut gone = Probe::new(3, 10.0, 10.0, 5.0, 5.0);
        gone.exists = false;
        let objs = vec![Probe::new(1, 10.0, 10.0, 5.0, 5.0), masked, gone];
        tree.load(ObjectOrGroup::from(&objs), None);

        // same placement as a tree holding only the live object
        let live = vec![Probe::new(1, 10.0, 10.0, 5.0, 5.0)];
        let mut only_live = QuadTree::new(world(), 6);
        only_live.load(ObjectOrGroup::from(&live), None);
        // 10..15 straddles the 12.5 leaf edges on both axes
        assert_eq!(only_live.stats().entries, 4);
        assert_eq!(tree.stats().entries, only_live.stats().entries);
        assert_eq!(tree.stats().nodes, only_live.stats().nodes);

        assert!(run(&mut tree).is_empty());
        assert!(!tree.execute(None, None));
    }

    #[test]
    fn test_masked_object_inside_one_leaf_adds_nothing() {
        let mut tree = QuadTree::new(world(), 6);
        let mut masked = Probe::new(2, 1.0, 1.0, 5.0, 5.0);
        masked.mask = Faces::empty();
        let objs = vec![Probe::new(1, 1.0, 1.0, 5.0, 5.0), masked];
        tree.load(ObjectOrGroup::from(&objs), None);
        assert_eq!(tree.stats().entries, 1);
        assert!(run(&mut tree).is_empty());
    }

    #[test]
    fn test_zero_width_object_on_midline_is_paired() {
        let mut tree = QuadTree::new(world(), 6);
        let objs = vec![Probe::new(1, 50.0, 50.0, 0.0, 10.0), Probe::new(2, 45.0, 52.0, 10.0, 6.0)];
        assert!(objs[0].rect.overlaps(&objs[1].rect));
        tree.load(ObjectOrGroup::from(&objs), None);
        assert_eq!(run(&mut tree), vec![(1, 2)]);
        assert_eq!(tree.stats().pairs_reported, 1);
    }

    #[test]
    fn test_process_gates_notify() {
        let mut tree = QuadTree::new(world(), 6);
        let objs = vec![
            Probe::new(1, 10.0, 10.0, 10.0, 10.0),
            Probe::new(2, 15.0, 15.0, 10.0, 10.0),
            Probe::new(3, 60.0, 60.0, 10.0, 10.0),
            Probe::new(4, 65.0, 65.0, 10.0, 10.0),
        ];
        tree.load(ObjectOrGroup::from(&objs), None);
        let mut notified = Vec::new();
        let mut process = |a: &Probe, b: &Probe| a.id + b.id > 3;
        let mut notify = |a: &Probe, b: &Probe| notified.push(a.id.max(b.id));
        assert!(tree.execute(Some(&mut process), Some(&mut notify)));
        assert_eq!(notified, vec![4]);
        assert_eq!(tree.stats().pairs_reported, 1);
    }

    #[test]
    fn test_load_group_and_clear() {
        let mut g: Group<Probe> = Group::new();
        g.add(Probe::new(1, 5.0, 5.0, 4.0, 4.0));
        let mut inner = Group::new();
        inner.add(Probe::new(2, 6.0, 6.0, 4.0, 4.0));
        g.add_group(inner);
        let mut tree = QuadTree::new(world(), 6);
        tree.load(ObjectOrGroup::from(&g), None);
        assert_eq!(run(&mut tree), vec![(1, 2)]);
        tree.clear();
        assert_eq!(tree.stats().entries, 0);
        assert!(run(&mut tree).is_empty());
        assert_eq!(tree.bounds().center(), Vec2::splat(50.0));
    }
}
