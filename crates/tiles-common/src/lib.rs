//! Common types shared by the OGC API Tiles crates.
//!
//! Wire documents (tile sets, tile matrix sets, links), the projection
//! registry, the compiled tile grid and URL templates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod link;
pub mod template;
pub mod tile;
pub mod tileset;

pub use bbox::BoundingBox;
pub use crs::{normalize_crs_identifier, AxisOrder, Projection, ProjectionRegistry};
pub use error::{TilesError, TilesResult};
pub use grid::TileGrid;
pub use link::Link;
pub use template::UrlTemplate;
pub use tile::{CornerOfOrigin, CrsDescriptor, TileCoord, TileMatrix, TileMatrixSet, TileMatrixSetLimit};
pub use tileset::{DataType, TileSet};
