//! Client-side resolution of OGC API Tiles tile sets.
//!
//! Given the URL of a tile set document, the resolver fetches it, picks the
//! tile URL template matching the preferred media type, loads the tile matrix
//! set (inline or referenced) and compiles it into a [`TileGrid`] plus a
//! [`TileUrlFunction`] mapping tile coordinates to tile URLs.
//!
//! ```no_run
//! # async fn run() -> tiles_common::TilesResult<()> {
//! use tiles_client::{ClientConfig, SourceInfo, TileSetResolver};
//! use tiles_common::TileCoord;
//!
//! let resolver = TileSetResolver::from_config(&ClientConfig::from_env())?;
//! let source = SourceInfo::new("https://maps.example.org/collections/a/map/tiles/WebMercatorQuad")
//!     .with_media_type("image/png");
//! let info = resolver.get_tile_set_info(&source).await?;
//! let url = info.url_function.url(Some(TileCoord::new(3, 4, 2)));
//! # let _ = url;
//! # Ok(())
//! # }
//! ```
//!
//! [`TileGrid`]: tiles_common::TileGrid

pub mod config;
pub mod matrix_set;
pub mod resolver;
pub mod select;
pub mod source;
pub mod transport;
pub mod url_function;

pub use config::ClientConfig;
pub use matrix_set::{parse_tile_matrix_set, TileSetInfo};
pub use resolver::{get_tile_set_info, TileSetResolver};
pub use select::{select_map_url_template, select_url_template, select_vector_url_template};
pub use source::SourceInfo;
pub use transport::{HttpTransport, MemoryTransport, Transport};
pub use url_function::TileUrlFunction;
