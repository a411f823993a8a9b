//! Grid of tile indices resolved against bodies.
//!
//! Cells store an index into the tileset; each tileset entry names a shape
//! id and the faces it collides on. Entries with no faces never collide,
//! so index 0 is conventionally left empty.

use glam::Vec2;
use log::debug;

use crate::body::Body;
use crate::error::CollisionError;
use crate::group::ObjectOrGroupMut;
use crate::tile::{self, Tile, TileClass};
use crate::types::{CollisionOutcome, Faces};

/// Collision settings for one tileset index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileProperties {
    pub shape_id: u32,
    pub faces: Faces,
    pub separate_x: bool,
    pub separate_y: bool,
}

impl Default for TileProperties {
    fn default() -> Self {
        Self { shape_id: tile::FULL, faces: Faces::empty(), separate_x: true, separate_y: true }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileCell {
    pub x: usize,
    pub y: usize,
    pub index: usize,
}

/// A tile that moved a body during [`TileMap::collide`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileHit {
    pub cell: TileCell,
    pub outcome: CollisionOutcome,
}

pub type CollisionCallback = Box<dyn FnMut(&Body, &[TileHit])>;

pub struct TileMap {
    pub tiles_wide: usize,
    pub tiles_high: usize,
    pub tile_size: Vec2,
    /// World position of the map's top-left corner.
    pub origin: Vec2,
    cells: Vec<usize>,
    tileset: Vec<TileProperties>,
    callback: Option<CollisionCallback>,
}

impl TileMap {
    /// Empty map with `tileset_len` non-colliding tileset entries.
    pub fn new(tiles_wide: usize, tiles_high: usize, tile_size: Vec2, tileset_len: usize) -> Result<Self, CollisionError> {
        if !(tile_size.is_finite() && tile_size.x > 0.0 && tile_size.y > 0.0) {
            return Err(CollisionError::InvalidTileSize { width: tile_size.x, height: tile_size.y });
        }
        Ok(Self {
            tiles_wide,
            tiles_high,
            tile_size,
            origin: Vec2::ZERO,
            cells: vec![0; tiles_wide * tiles_high],
            tileset: vec![TileProperties::default(); tileset_len.max(1)],
            callback: None,
        })
    }

    /// Build from rows of tileset indices. The widest row sets the map width.
    pub fn from_rows(rows: &[&[usize]], tile_size: Vec2, tileset_len: usize) -> Result<Self, CollisionError> {
        let wide = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut map = Self::new(wide, rows.len(), tile_size, tileset_len)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, &index) in row.iter().enumerate() {
                map.put_tile(x, y, index)?;
            }
        }
        Ok(map)
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width_in_pixels(&self) -> f32 {
        self.tiles_wide as f32 * self.tile_size.x
    }

    pub fn height_in_pixels(&self) -> f32 {
        self.tiles_high as f32 * self.tile_size.y
    }

    pub fn tileset(&self) -> &[TileProperties] {
        &self.tileset
    }

    pub fn set_collision_callback(&mut self, callback: CollisionCallback) {
        self.callback = Some(callback);
    }

    /// Assign a shape id to a tileset entry.
    pub fn set_tile_shape(&mut self, index: usize, shape_id: u32) -> Result<(), CollisionError> {
        tile::classify(shape_id).into_result()?;
        let len = self.tileset.len();
        let props = self.tileset.get_mut(index).ok_or(CollisionError::TileIndexOutOfRange { index, len })?;
        props.shape_id = shape_id;
        Ok(())
    }

    /// Set collision faces on the listed tileset entries. With `reset` the
    /// faces replace the old ones, otherwise they are added. Nothing changes
    /// if any index is out of range.
    pub fn set_collision_by_index(
        &mut self,
        indices: &[usize],
        faces: Faces,
        reset: bool,
        separate_x: bool,
        separate_y: bool,
    ) -> Result<(), CollisionError> {
        let len = self.tileset.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(CollisionError::TileIndexOutOfRange { index, len });
        }
        for &index in indices {
            self.apply_collision(index, faces, reset, separate_x, separate_y);
        }
        debug!("collision faces {:?} set on {} tiles (reset: {})", faces, indices.len(), reset);
        Ok(())
    }

    /// Like [`TileMap::set_collision_by_index`] over `start..end`.
    pub fn set_collision_range(
        &mut self,
        start: usize,
        end: usize,
        faces: Faces,
        reset: bool,
        separate_x: bool,
        separate_y: bool,
    ) -> Result<(), CollisionError> {
        if start >= end {
            return Err(CollisionError::InvalidTileRange { start, end });
        }
        let len = self.tileset.len();
        if end > len {
            return Err(CollisionError::TileIndexOutOfRange { index: end - 1, len });
        }
        for index in start..end {
            self.apply_collision(index, faces, reset, separate_x, separate_y);
        }
        debug!("collision faces {:?} set on tiles {}..{} (reset: {})", faces, start, end, reset);
        Ok(())
    }

    fn apply_collision(&mut self, index: usize, faces: Faces, reset: bool, separate_x: bool, separate_y: bool) {
        let props = &mut self.tileset[index];
        if reset {
            props.faces = faces;
        } else {
            props.faces |= faces;
        }
        props.separate_x = separate_x;
        props.separate_y = separate_y;
    }

    pub fn put_tile(&mut self, x: usize, y: usize, index: usize) -> Result<(), CollisionError> {
        let cell = self.cell_index(x, y)?;
        let len = self.tileset.len();
        if index >= len {
            return Err(CollisionError::TileIndexOutOfRange { index, len });
        }
        self.cells[cell] = index;
        Ok(())
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Result<usize, CollisionError> {
        Ok(self.cells[self.cell_index(x, y)?])
    }

    fn cell_index(&self, x: usize, y: usize) -> Result<usize, CollisionError> {
        if x >= self.tiles_wide || y >= self.tiles_high {
            return Err(CollisionError::CellOutOfRange { x, y });
        }
        Ok(y * self.tiles_wide + x)
    }

    /// Classified tile for a cell, centered in world space.
    pub fn tile(&self, cell: &TileCell) -> Result<Tile, CollisionError> {
        let len = self.tileset.len();
        let props = self
            .tileset
            .get(cell.index)
            .ok_or(CollisionError::TileIndexOutOfRange { index: cell.index, len })?;
        let center = self.origin + (Vec2::new(cell.x as f32, cell.y as f32) + 0.5) * self.tile_size;
        Tile::new(center, self.tile_size.x, self.tile_size.y, props.shape_id)
    }

    /// Colliding cells under a body's bounds. Bodies not fully inside the
    /// map vertically, or with their left edge off the map, get nothing.
    pub fn tile_overlaps(&self, body: &Body) -> Vec<TileCell> {
        let half = body.half_extents();
        let min = body.pos - half - self.origin;
        let max = body.pos + half - self.origin;
        if min.x < 0.0 || min.x > self.width_in_pixels() || min.y < 0.0 || max.y > self.height_in_pixels() {
            return Vec::new();
        }

        let ts = self.tile_size;
        let tx = (min.x / ts.x).floor() as usize;
        let ty = (min.y / ts.y).floor() as usize;
        let tw = ((max.x - min.x) / ts.x).ceil() as usize + 1;
        let th = ((max.y - min.y) / ts.y).ceil() as usize + 1;

        let mut out = Vec::new();
        for y in ty..(ty + th).min(self.tiles_high) {
            for x in tx..(tx + tw).min(self.tiles_wide) {
                let index = self.cells[y * self.tiles_wide + x];
                if !self.tileset[index].faces.is_empty() {
                    out.push(TileCell { x, y, index });
                }
            }
        }
        out
    }

    /// Resolve bodies against the map. A given callback replaces the stored
    /// one and is invoked once per body that hit at least one tile.
    pub fn collide(&mut self, target: ObjectOrGroupMut<'_, Body>, callback: Option<CollisionCallback>) -> bool {
        if let Some(cb) = callback {
            self.callback = Some(cb);
        }
        let mut bodies = Vec::new();
        target.collect_mut(&mut bodies);

        let mut any = false;
        for body in bodies {
            if body.exists && !body.allow_collisions.is_empty() {
                any |= self.collide_body(body);
            }
        }
        any
    }

    fn collide_body(&mut self, body: &mut Body) -> bool {
        let mut hits = Vec::new();
        for cell in self.tile_overlaps(body) {
            let Ok(tile) = self.tile(&cell) else {
                continue;
            };
            let Some(contact) = body.tile_contact(&tile) else {
                continue;
            };
            if !self.allows_push(&cell, &tile, contact.axis) {
                continue;
            }
            let outcome = body.collide_vs_tile(&tile);
            if outcome.is_hit() {
                hits.push(TileHit { cell, outcome });
            }
        }

        if hits.is_empty() {
            return false;
        }
        if let Some(cb) = self.callback.as_mut() {
            cb(body, &hits);
        }
        true
    }

    /// Full tiles only push through solid faces; separation flags gate every shape.
    fn allows_push(&self, cell: &TileCell, tile: &Tile, axis: Vec2) -> bool {
        let props = &self.tileset[cell.index];
        if (axis.x != 0.0 && !props.separate_x) || (axis.y != 0.0 && !props.separate_y) {
            return false;
        }
        if tile.class() != TileClass::Full {
            return true;
        }
        let face = if axis.x > 0.0 {
            Faces::RIGHT
        } else if axis.x < 0.0 {
            Faces::LEFT
        } else if axis.y > 0.0 {
            Faces::DOWN
        } else {
            Faces::UP
        };
        props.faces.contains(face)
    }
}
