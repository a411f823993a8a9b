use glam::Vec2;
use ninja_collide::*;

fn main() {
    env_logger::init();

    let bounds = Rect::from_xywh(0.0, 0.0, 640.0, 480.0);
    let mut rng: u32 = 0x2545_f491;
    let mut next = move || {
        rng ^= rng << 13;
        rng ^= rng >> 17;
        rng ^= rng << 5;
        (rng % 10_000) as f32 / 10_000.0
    };

    let bodies: Vec<Body> = (0..200)
        .map(|i| {
            let pos = Vec2::new(next() * bounds.width(), next() * bounds.height());
            let mut b = Body::aabb(pos, Vec2::splat(4.0 + next() * 8.0)).with_key(i);
            b.oldpos = pos - Vec2::new(next() - 0.5, next() - 0.5) * 6.0;
            b
        })
        .collect();
    let (players, enemies) = bodies.split_at(20);

    let mut tree = QuadTree::new(bounds, 6);

    tree.load(ObjectOrGroup::Many(players), Some(ObjectOrGroup::Many(enemies)));
    let mut hits = Vec::new();
    let mut notify = |a: &Body, b: &Body| hits.push((a.key, b.key));
    tree.execute(None, Some(&mut notify));
    let stats = tree.stats();
    println!(
        "players vs enemies: {} nodes, depth {}, {} entries, {} tested, {} reported",
        stats.nodes, stats.max_depth, stats.entries, stats.pairs_tested, stats.pairs_reported
    );
    for (a, b) in hits.iter().take(10) {
        println!("  {:?} <-> {:?}", a, b);
    }

    tree.load(ObjectOrGroup::from(&bodies), None);
    let mut accepted = 0usize;
    let mut only_same_kind = |a: &Body, b: &Body| (a.key < Some(20)) == (b.key < Some(20));
    let mut count = |_: &Body, _: &Body| accepted += 1;
    tree.execute(Some(&mut only_same_kind), Some(&mut count));
    let stats = tree.stats();
    println!(
        "all vs all: {} tested, {} same-kind pairs accepted",
        stats.pairs_tested, accepted
    );
}
