//! Tile set resolution pipeline: fetch, negotiate, parse.

use std::sync::Arc;

use serde_json::Value;
use tiles_common::{ProjectionRegistry, TileMatrixSet, TileSet, TilesError, TilesResult};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::matrix_set::{parse_tile_matrix_set, TileSetInfo};
use crate::select::select_url_template;
use crate::source::SourceInfo;
use crate::transport::{HttpTransport, Transport};

/// Resolves tile set documents into [`TileSetInfo`].
///
/// Holds no mutable state; one instance can serve concurrent calls.
#[derive(Clone)]
pub struct TileSetResolver {
    transport: Arc<dyn Transport>,
    projections: Arc<ProjectionRegistry>,
}

impl TileSetResolver {
    /// Resolver over `transport` with the default projection registry.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            projections: Arc::new(ProjectionRegistry::with_defaults()),
        }
    }

    /// Resolver backed by an HTTP transport built from `config`.
    pub fn from_config(config: &ClientConfig) -> TilesResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_projections(mut self, projections: ProjectionRegistry) -> Self {
        self.projections = Arc::new(projections);
        self
    }

    pub fn projections(&self) -> &ProjectionRegistry {
        &self.projections
    }

    /// Fetch the tile set at `source.url` and build its grid and URL function.
    ///
    /// Inline tile matrix sets are parsed directly; referenced ones cost a
    /// second fetch, resolved against the tile set URL.
    #[instrument(skip(self, source), fields(url = %source.url))]
    pub async fn get_tile_set_info(&self, source: &SourceInfo) -> TilesResult<TileSetInfo> {
        let tile_set_url =
            Url::parse(&source.url).map_err(|e| TilesError::invalid_url(source.url.as_str(), e))?;

        let tile_set: TileSet = decode(self.transport.fetch_json(&tile_set_url).await?)?;
        let data_type = tile_set.data_type()?;
        let url_template =
            select_url_template(data_type, &tile_set.links, source.media_type.as_deref())?;

        debug!(
            data_type = %data_type,
            template = %url_template,
            inline = tile_set.tile_matrix_set.is_some(),
            "Selected tile URL template"
        );

        let mut info = match &tile_set.tile_matrix_set {
            Some(matrix_set) => parse_tile_matrix_set(
                matrix_set,
                source,
                &url_template,
                &tile_set.tile_matrix_set_limits,
                &self.projections,
            )?,
            None => {
                let reference = tile_set
                    .matrix_set_reference()
                    .ok_or(TilesError::MissingMatrixSet)?;
                let matrix_set_url = tile_set_url
                    .join(reference)
                    .map_err(|e| TilesError::invalid_url(reference, e))?;

                debug!(tile_matrix_set = %matrix_set_url, "Fetching tile matrix set");
                let matrix_set: TileMatrixSet =
                    decode(self.transport.fetch_json(&matrix_set_url).await?)?;

                parse_tile_matrix_set(
                    &matrix_set,
                    source,
                    &url_template,
                    &tile_set.tile_matrix_set_limits,
                    &self.projections,
                )?
            }
        };
        info.data_type = Some(data_type);

        info!(
            data_type = %data_type,
            crs = %info.projection,
            levels = info.grid.len(),
            "Resolved tile set"
        );

        Ok(info)
    }
}

impl std::fmt::Debug for TileSetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSetResolver")
            .field("projections", &self.projections.len())
            .finish_non_exhaustive()
    }
}

/// Resolve a tile set with the default projection registry.
pub async fn get_tile_set_info(
    transport: Arc<dyn Transport>,
    source: &SourceInfo,
) -> TilesResult<TileSetInfo> {
    TileSetResolver::new(transport).get_tile_set_info(source).await
}

fn decode<T: serde::de::DeserializeOwned>(document: Value) -> TilesResult<T> {
    Ok(serde_json::from_value(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use serde_json::json;
    use tiles_common::{DataType, Projection, TileCoord};

    const TILE_SET: &str = "https://tiles.example.org/collections/roads/tiles/Custom";

    fn custom_matrix_set(crs: &str) -> Value {
        json!({
            "id": "Custom",
            "crs": crs,
            "tileMatrices": [{
                "id": "0",
                "cellSize": 1000.0,
                "pointOfOrigin": [0.0, 0.0],
                "tileWidth": 512,
                "tileHeight": 512,
                "matrixWidth": 4,
                "matrixHeight": 4
            }]
        })
    }

    fn tile_set(matrix_set: Value) -> Value {
        json!({
            "dataType": "vector",
            "links": [{
                "rel": "item",
                "type": "application/vnd.mapbox-vector-tile",
                "href": "Custom/{tileMatrix}/{tileRow}/{tileCol}"
            }],
            "tileMatrixSet": matrix_set
        })
    }

    #[test]
    fn test_registered_projection_is_used() {
        let transport = MemoryTransport::new()
            .with_document(TILE_SET, tile_set(custom_matrix_set("EPSG:32633")));
        let mut registry = ProjectionRegistry::with_defaults();
        registry.register(Projection::new("EPSG:32633", "enu"));

        let resolver = TileSetResolver::new(Arc::new(transport)).with_projections(registry);
        let info = tokio_test::block_on(resolver.get_tile_set_info(&SourceInfo::new(TILE_SET))).unwrap();

        assert_eq!(info.data_type, Some(DataType::Vector));
        assert_eq!(info.projection.code(), "EPSG:32633");
        assert_eq!(info.grid.tile_size(0), Some((512, 512)));
        assert_eq!(
            info.url_function.url(Some(TileCoord::new(0, 1, 2))).unwrap(),
            "https://tiles.example.org/collections/roads/tiles/Custom/0/2/1"
        );
    }

    #[test]
    fn test_unregistered_projection() {
        let transport = MemoryTransport::new()
            .with_document(TILE_SET, tile_set(custom_matrix_set("EPSG:32633")));
        let resolver = TileSetResolver::new(Arc::new(transport));

        let err = tokio_test::block_on(resolver.get_tile_set_info(&SourceInfo::new(TILE_SET))).unwrap_err();
        assert!(matches!(err, TilesError::UnsupportedCrs(_)));
    }

    #[test]
    fn test_malformed_tile_set_document() {
        let transport =
            MemoryTransport::new().with_document(TILE_SET, json!({"dataType": "map", "links": "nope"}));

        let err = tokio_test::block_on(get_tile_set_info(Arc::new(transport), &SourceInfo::new(TILE_SET)))
            .unwrap_err();
        assert!(matches!(err, TilesError::InvalidDocument(_)));
    }

    #[test]
    fn test_invalid_source_url() {
        let resolver = TileSetResolver::new(Arc::new(MemoryTransport::new()));
        let err = tokio_test::block_on(resolver.get_tile_set_info(&SourceInfo::new("relative/path")))
            .unwrap_err();
        assert!(matches!(err, TilesError::InvalidUrl { .. }));
    }
}
