//! OGC Two Dimensional Tile Matrix Set definitions.
//!
//! Mirrors the JSON encoding of OGC 17-083r4 (TileMatrixSet 2.0) as served by
//! OGC API – Tiles. Unknown members are ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::TilesError;

/// Standardized rendering pixel size in meters (0.28mm).
pub const STANDARD_PIXEL_SIZE: f64 = 0.00028;

/// A tile coordinate (z/x/y) in the host map engine's numbering.
///
/// Rows count downward from the level origin. For matrices whose origin is
/// the bottom-left corner this makes rows negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level (index into the tile matrix list)
    pub z: u32,
    /// Column
    pub x: i64,
    /// Row
    pub y: i64,
}

impl TileCoord {
    pub fn new(z: u32, x: i64, y: i64) -> Self {
        Self { z, x, y }
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Converts a `[z, col, row]` triple. Fails when `z` is not a valid zoom level.
impl TryFrom<[i64; 3]> for TileCoord {
    type Error = TilesError;

    fn try_from(value: [i64; 3]) -> Result<Self, Self::Error> {
        let z = u32::try_from(value[0]).map_err(|_| TilesError::InvalidTileCoord {
            coord: value,
            message: "zoom level out of range".to_string(),
        })?;
        Ok(Self::new(z, value[1], value[2]))
    }
}

/// Corner of the matrix that holds the point of origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CornerOfOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

/// A single tile matrix (zoom level) definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrix {
    /// Identifier substituted for `{tileMatrix}`
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_denominator: Option<f64>,

    /// Resolution in CRS units per pixel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<f64>,

    #[serde(default)]
    pub corner_of_origin: CornerOfOrigin,

    /// Origin in the CRS's declared axis order
    #[serde(alias = "topLeftCorner")]
    pub point_of_origin: [f64; 2],

    pub tile_width: u32,
    pub tile_height: u32,
    pub matrix_width: u64,
    pub matrix_height: u64,
}

impl TileMatrix {
    /// Resolution (units per pixel) for this matrix.
    ///
    /// Uses `cellSize` when present, otherwise derives it from the scale
    /// denominator and the CRS unit size.
    pub fn resolution(&self, meters_per_unit: f64) -> Option<f64> {
        self.cell_size.or_else(|| {
            self.scale_denominator
                .map(|scale| scale * STANDARD_PIXEL_SIZE / meters_per_unit)
        })
    }

    /// Whether row numbering starts at the bottom of the matrix.
    pub fn is_upside_down(&self) -> bool {
        self.corner_of_origin == CornerOfOrigin::BottomLeft
    }

    /// Convert a host row into this matrix's native row numbering.
    pub fn native_row(&self, row: i64) -> i64 {
        if self.is_upside_down() {
            -row - 1
        } else {
            row
        }
    }
}

/// CRS reference of a tile matrix set: a bare identifier or `{ "uri": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrsDescriptor {
    Identifier(String),
    Reference { uri: String },
}

impl CrsDescriptor {
    pub fn identifier(&self) -> &str {
        match self {
            CrsDescriptor::Identifier(id) => id,
            CrsDescriptor::Reference { uri } => uri,
        }
    }
}

/// A complete tile matrix set definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrixSet {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    pub crs: CrsDescriptor,

    /// Individual tile matrices, index = zoom level
    pub tile_matrices: Vec<TileMatrix>,
}

impl TileMatrixSet {
    pub fn crs_identifier(&self) -> &str {
        self.crs.identifier()
    }
}

/// Range of tiles available in one tile matrix, in native numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrixSetLimit {
    pub tile_matrix: String,
    pub min_tile_row: i64,
    pub max_tile_row: i64,
    pub min_tile_col: i64,
    pub max_tile_col: i64,
}

impl TileMatrixSetLimit {
    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= self.min_tile_col
            && col <= self.max_tile_col
            && row >= self.min_tile_row
            && row <= self.max_tile_row
    }
}

/// The WebMercatorQuad tile matrix set (levels 0 through `max_zoom`).
pub fn web_mercator_quad(max_zoom: u32) -> TileMatrixSet {
    let max_extent = 20037508.342789244;

    let tile_matrices = (0..=max_zoom)
        .map(|z| {
            let n = 1u64 << z;
            TileMatrix {
                id: z.to_string(),
                scale_denominator: Some(559082264.0287178 / n as f64),
                cell_size: Some(156543.03392804097 / n as f64),
                corner_of_origin: CornerOfOrigin::TopLeft,
                point_of_origin: [-max_extent, max_extent],
                tile_width: 256,
                tile_height: 256,
                matrix_width: n,
                matrix_height: n,
            }
        })
        .collect();

    TileMatrixSet {
        id: "WebMercatorQuad".to_string(),
        title: Some("Google Maps Compatible for the World".to_string()),
        uri: Some("http://www.opengis.net/def/tilematrixset/OGC/1.0/WebMercatorQuad".to_string()),
        crs: CrsDescriptor::Identifier("http://www.opengis.net/def/crs/EPSG/0/3857".to_string()),
        tile_matrices,
    }
}

/// The WorldCRS84Quad tile matrix set (2:1 grid, lon/lat axis order).
pub fn world_crs84_quad(max_zoom: u32) -> TileMatrixSet {
    let tile_matrices = (0..=max_zoom)
        .map(|z| {
            let n_rows = 1u64 << z;
            TileMatrix {
                id: z.to_string(),
                scale_denominator: Some(279541132.0143589 / n_rows as f64),
                cell_size: Some(0.703125 / n_rows as f64),
                corner_of_origin: CornerOfOrigin::TopLeft,
                point_of_origin: [-180.0, 90.0],
                tile_width: 256,
                tile_height: 256,
                matrix_width: n_rows * 2,
                matrix_height: n_rows,
            }
        })
        .collect();

    TileMatrixSet {
        id: "WorldCRS84Quad".to_string(),
        title: Some("CRS84 for the World".to_string()),
        uri: Some("http://www.opengis.net/def/tilematrixset/OGC/1.0/WorldCRS84Quad".to_string()),
        crs: CrsDescriptor::Identifier("http://www.opengis.net/def/crs/OGC/1.3/CRS84".to_string()),
        tile_matrices,
    }
}
