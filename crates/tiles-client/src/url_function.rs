//! Tile coordinate to tile URL mapping.

use std::collections::BTreeMap;
use std::sync::Arc;

use tiles_common::template::{TILE_COL, TILE_MATRIX, TILE_ROW};
use tiles_common::{TileCoord, TileMatrix, TileMatrixSetLimit, UrlTemplate};
use tracing::warn;
use url::Url;

/// Immutable, cheaply cloneable tile URL generator.
#[derive(Debug, Clone)]
pub struct TileUrlFunction {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    template: UrlTemplate,
    matrices: Vec<TileMatrix>,
    /// One entry per matrix when the tile set carries limits.
    limits: Option<Vec<Option<TileMatrixSetLimit>>>,
    base_url: Url,
    context: BTreeMap<String, String>,
    collections: Option<String>,
}

impl TileUrlFunction {
    pub(crate) fn new(
        template: UrlTemplate,
        matrices: Vec<TileMatrix>,
        limits: Option<Vec<Option<TileMatrixSetLimit>>>,
        base_url: Url,
        context: BTreeMap<String, String>,
        collections: &[String],
    ) -> Self {
        let collections = if collections.is_empty() {
            None
        } else {
            Some(collections.join(","))
        };

        Self {
            inner: Arc::new(Inner {
                template,
                matrices,
                limits,
                base_url,
                context,
                collections,
            }),
        }
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.inner.template
    }

    /// URL of the tile at `tile_coord`, or `None` when there is no tile to
    /// request (no coordinate, unknown zoom level, or outside the limits).
    pub fn url(&self, tile_coord: Option<TileCoord>) -> Option<String> {
        let coord = tile_coord?;
        let inner = &self.inner;
        let matrix = inner.matrices.get(coord.z as usize)?;
        let row = matrix.native_row(coord.y);

        if let Some(limits) = &inner.limits {
            match limits.get(coord.z as usize).and_then(Option::as_ref) {
                Some(limit) if limit.contains(coord.x, row) => {}
                _ => return None,
            }
        }

        let expanded = inner.template.expand(|name| {
            if let Some(value) = inner.context.get(name) {
                return Some(value.clone());
            }
            match name {
                TILE_MATRIX => Some(matrix.id.clone()),
                TILE_COL => Some(coord.x.to_string()),
                TILE_ROW => Some(row.to_string()),
                _ => None,
            }
        });

        let expanded = match expanded {
            Ok(expanded) => expanded,
            Err(e) => {
                warn!(tile = %coord.cache_key(), error = %e, "Failed to expand tile URL template");
                return None;
            }
        };

        let mut url = match inner.base_url.join(&expanded) {
            Ok(url) => url,
            Err(e) => {
                warn!(tile = %coord.cache_key(), url = %expanded, error = %e, "Invalid tile URL");
                return None;
            }
        };

        if let Some(collections) = &inner.collections {
            url.query_pairs_mut().append_pair("collections", collections);
        }

        Some(url.into())
    }
}
