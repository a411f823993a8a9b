use glam::Vec2;
use ninja_collide::tile;
use ninja_collide::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // 0 empty, 1 solid, 2 45 degree ramp, 3 shallow ramp (small), 4 shallow ramp (big), 5 half tile
    let rows: [&[usize]; 8] = [
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[1, 0, 0, 0, 0, 0, 0, 0, 0, 5, 5, 1],
        &[1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        &[1, 1, 2, 0, 0, 0, 0, 0, 3, 4, 1, 1],
        &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];
    let mut map = TileMap::from_rows(&rows, Vec2::splat(16.0), 6)?;
    map.set_tile_shape(2, tile::SLOPE_45_PN)?;
    map.set_tile_shape(3, tile::SLOPE_22_SMALL_NN)?;
    map.set_tile_shape(4, tile::SLOPE_22_BIG_NN)?;
    map.set_tile_shape(5, tile::HALF_DOWN)?;
    map.set_collision_range(1, 6, Faces::ANY, true, true, true)?;
    map.set_collision_callback(Box::new(|body: &Body, hits: &[TileHit]| {
        log::trace!("{:?} hit {} tiles", body.key, hits.len());
    }));

    let cfg = WorldConfig {
        bounds: Rect::new(Vec2::ZERO, Vec2::new(map.width_in_pixels(), map.height_in_pixels())),
        ..WorldConfig::from_toml_str("gravity = 0.25")?
    };
    let mut world = PhysicsWorld::new(cfg);

    let mut bodies: Group<Body> = Group::new();
    bodies
        .add(world.circle(Vec2::new(30.0, 20.0), 5.0).with_key(1))
        .add(world.aabb(Vec2::new(140.0, 20.0), Vec2::splat(5.0)).with_key(2))
        .add(world.circle(Vec2::new(152.0, 30.0), 4.0).with_key(3))
        .add(world.aabb(Vec2::new(96.0, 10.0), Vec2::new(6.0, 4.0)).with_key(4));

    for frame in 0..240 {
        world.step(&mut bodies);
        map.collide(ObjectOrGroupMut::from(&mut bodies), None);
        world.collide(ObjectOrGroupMut::from(&mut bodies), None, None, None);
        if frame % 60 == 59 {
            bodies.for_each(&mut |b| {
                println!(
                    "frame {:3} body {:?}: pos=({:6.2},{:6.2}) touching={:?} facing={:?}",
                    frame + 1,
                    b.key.unwrap_or_default(),
                    b.pos.x,
                    b.pos.y,
                    b.touching,
                    b.facing
                );
            });
        }
    }
    Ok(())
}
