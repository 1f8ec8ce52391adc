//! Tile grid compiled from a tile matrix set.
//!
//! The grid holds one origin, resolution, matrix size and tile size per zoom
//! level. Origins are always east-first and rows count downward from the
//! origin, so a tile's extent is
//!
//! ```text
//! min_x = origin_x + col * resolution * tile_width
//! max_y = origin_y - row * resolution * tile_height
//! ```

use serde::Serialize;

use crate::{BoundingBox, TileCoord, TilesError, TilesResult};

/// Per-level tile grid shared by the renderer and the URL function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    origins: Vec<(f64, f64)>,
    resolutions: Vec<f64>,
    sizes: Vec<(u64, u64)>,
    tile_sizes: Vec<(u32, u32)>,
    min_zoom: u32,
    max_zoom: u32,
}

impl TileGrid {
    /// Build a grid from parallel per-level sequences.
    ///
    /// All four sequences must have the same, non-zero length. Resolutions
    /// must be positive and matrix and tile sizes non-zero.
    pub fn new(
        origins: Vec<(f64, f64)>,
        resolutions: Vec<f64>,
        sizes: Vec<(u64, u64)>,
        tile_sizes: Vec<(u32, u32)>,
    ) -> TilesResult<Self> {
        let levels = resolutions.len();
        if levels == 0 {
            return Err(TilesError::InvalidDocument(
                "tile matrix set has no tile matrices".to_string(),
            ));
        }
        if origins.len() != levels || sizes.len() != levels || tile_sizes.len() != levels {
            return Err(TilesError::InvalidDocument(format!(
                "tile grid level counts differ: {} origins, {} resolutions, {} sizes, {} tile sizes",
                origins.len(),
                levels,
                sizes.len(),
                tile_sizes.len()
            )));
        }
        if let Some(z) = resolutions.iter().position(|r| !r.is_finite() || *r <= 0.0) {
            return Err(TilesError::InvalidDocument(format!(
                "resolution at level {} must be a positive number",
                z
            )));
        }
        if let Some(z) = sizes.iter().position(|(w, h)| *w == 0 || *h == 0) {
            return Err(TilesError::InvalidDocument(format!(
                "matrix size at level {} must be non-zero, got {}x{}",
                z, sizes[z].0, sizes[z].1
            )));
        }
        if let Some(z) = tile_sizes.iter().position(|(w, h)| *w == 0 || *h == 0) {
            return Err(TilesError::InvalidDocument(format!(
                "tile size at level {} must be non-zero, got {}x{}",
                z, tile_sizes[z].0, tile_sizes[z].1
            )));
        }

        Ok(Self {
            origins,
            resolutions,
            sizes,
            tile_sizes,
            min_zoom: 0,
            max_zoom: (levels - 1) as u32,
        })
    }

    /// Restrict the usable zoom range.
    pub fn with_zoom_range(mut self, min_zoom: u32, max_zoom: u32) -> TilesResult<Self> {
        if min_zoom > max_zoom || max_zoom as usize >= self.resolutions.len() {
            return Err(TilesError::InvalidDocument(format!(
                "zoom range {}..={} is outside the {} grid levels",
                min_zoom,
                max_zoom,
                self.resolutions.len()
            )));
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        Ok(self)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }

    pub fn min_zoom(&self) -> u32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn origins(&self) -> &[(f64, f64)] {
        &self.origins
    }

    pub fn sizes(&self) -> &[(u64, u64)] {
        &self.sizes
    }

    pub fn tile_sizes(&self) -> &[(u32, u32)] {
        &self.tile_sizes
    }

    pub fn resolution(&self, z: u32) -> Option<f64> {
        self.resolutions.get(z as usize).copied()
    }

    pub fn origin(&self, z: u32) -> Option<(f64, f64)> {
        self.origins.get(z as usize).copied()
    }

    /// Matrix size (columns, rows) at level `z`.
    pub fn size(&self, z: u32) -> Option<(u64, u64)> {
        self.sizes.get(z as usize).copied()
    }

    /// Tile size in pixels (width, height) at level `z`.
    pub fn tile_size(&self, z: u32) -> Option<(u32, u32)> {
        self.tile_sizes.get(z as usize).copied()
    }

    /// Map-unit extent of a tile.
    pub fn tile_extent(&self, coord: &TileCoord) -> Option<BoundingBox> {
        let (ox, oy) = self.origin(coord.z)?;
        let (span_x, span_y) = self.tile_span(coord.z)?;

        let min_x = ox + coord.x as f64 * span_x;
        let max_y = oy - coord.y as f64 * span_y;

        Some(BoundingBox::new(min_x, max_y - span_y, min_x + span_x, max_y))
    }

    /// Find the tile at level `z` containing a coordinate.
    ///
    /// Returns `None` for unknown levels and non-finite coordinates.
    pub fn tile_coord_for_coordinate(&self, z: u32, x: f64, y: f64) -> Option<TileCoord> {
        let (ox, oy) = self.origin(z)?;
        let (span_x, span_y) = self.tile_span(z)?;

        let col = ((x - ox) / span_x).floor();
        let row = ((oy - y) / span_y).floor();
        if !col.is_finite() || !row.is_finite() {
            return None;
        }

        Some(TileCoord::new(z, col as i64, row as i64))
    }

    /// Level within the zoom range whose resolution is closest to `resolution`.
    pub fn zoom_for_resolution(&self, resolution: f64) -> u32 {
        let mut best = self.min_zoom;
        let mut best_diff = f64::INFINITY;
        for z in self.min_zoom..=self.max_zoom {
            let diff = (self.resolutions[z as usize] - resolution).abs();
            if diff < best_diff {
                best = z;
                best_diff = diff;
            }
        }
        best
    }

    fn tile_span(&self, z: u32) -> Option<(f64, f64)> {
        let resolution = self.resolution(z)?;
        let (width, height) = self.tile_size(z)?;
        Some((resolution * width as f64, resolution * height as f64))
    }
}
