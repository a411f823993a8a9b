//! ninja-collide: tile-shape collision for 2D sprite worlds (Verlet boxes and circles, quadtree broad-phase)

pub mod types;
pub mod error;
pub mod config;
pub mod api;
pub mod tile;
pub mod body;
pub mod narrowphase;
pub mod group;
pub mod quadtree;
pub mod motion;
pub mod tilemap;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::{CollisionError, ConfigError};
pub use crate::config::{BodyMaterial, WorldConfig};
pub use crate::body::{Body, Integrator, Shape};
pub use crate::group::{Group, Member, ObjectOrGroup, ObjectOrGroupMut};
pub use crate::quadtree::QuadTree;
pub use crate::tile::{Tile, TileClass, TileShape};
pub use crate::tilemap::{TileHit, TileMap};
pub use crate::world::PhysicsWorld;
