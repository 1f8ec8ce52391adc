//! End-to-end tests for tile set resolution over an in-memory transport.

use std::sync::Arc;

use serde_json::json;
use test_utils::fixtures::{self, urls, WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_RESOLUTION_0};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};
use tiles_client::{get_tile_set_info, MemoryTransport, SourceInfo, TileSetResolver};
use tiles_common::{DataType, TileCoord, TilesError};

fn map_server() -> Arc<MemoryTransport> {
    Arc::new(
        MemoryTransport::new()
            .with_document(urls::MAP_TILE_SET, fixtures::map_tile_set_json())
            .with_document(urls::WEB_MERCATOR_QUAD, fixtures::web_mercator_quad_json(29)),
    )
}

// ============================================================================
// Map tile sets
// ============================================================================

#[tokio::test]
async fn test_map_tile_set_without_preference() {
    let transport = map_server();
    let info = get_tile_set_info(transport.clone(), &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap();

    assert!(info.url_template.ends_with(".jpg"));
    assert_eq!(info.data_type, Some(DataType::Map));
    assert_eq!(info.grid.resolutions().len(), 30);
    assert_eq!(info.grid.tile_size(0), Some((256, 256)));
    assert_approx_eq!(info.grid.resolution(0).unwrap(), WEB_MERCATOR_RESOLUTION_0, 1e-9);
    assert_eq!(info.projection.code(), "EPSG:3857");

    assert_eq!(
        info.url_function.url(Some(TileCoord::new(1, 2, 3))).unwrap(),
        format!("{}/1/3/2.jpg", urls::MAP_TILE_SET)
    );
    assert_eq!(info.url_function.url(None), None);

    assert_eq!(
        transport.requests(),
        vec![urls::MAP_TILE_SET.to_string(), urls::WEB_MERCATOR_QUAD.to_string()]
    );
}

#[tokio::test]
async fn test_map_tile_set_preferred_png() {
    let source = SourceInfo::new(urls::MAP_TILE_SET).with_media_type("image/png");
    let info = get_tile_set_info(map_server(), &source).await.unwrap();

    assert!(info.url_template.ends_with(".png"));
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(4, 5, 6))).unwrap(),
        format!("{}/4/6/5.png", urls::MAP_TILE_SET)
    );
}

#[tokio::test]
async fn test_map_tile_set_unavailable_preference_falls_back() {
    let source = SourceInfo::new(urls::MAP_TILE_SET).with_media_type("image/avif");
    let info = get_tile_set_info(map_server(), &source).await.unwrap();
    assert!(info.url_template.ends_with(".jpg"));
}

#[tokio::test]
async fn test_inline_matrix_set_needs_one_request() {
    let transport = Arc::new(MemoryTransport::new().with_document(
        urls::MAP_TILE_SET,
        fixtures::map_tile_set_inline_json(fixtures::web_mercator_quad_json(5)),
    ));

    let info = get_tile_set_info(transport.clone(), &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap();
    assert_eq!(info.grid.len(), 6);
    assert_eq!(transport.requests().len(), 1);

    let extent = info.grid.tile_extent(&TileCoord::new(0, 0, 0)).unwrap();
    assert_coords_approx_eq!(
        (extent.min_x, extent.max_y),
        (-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT),
        1e-6
    );
}

#[tokio::test]
async fn test_northing_first_matrix_set() {
    let transport = Arc::new(MemoryTransport::new().with_document(
        urls::MAP_TILE_SET,
        fixtures::map_tile_set_inline_json(fixtures::world_epsg4326_quad_json(3)),
    ));

    let info = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap();
    assert_eq!(info.projection.code(), "EPSG:4326");
    assert_eq!(info.grid.origin(0), Some((-180.0, 90.0)));

    let extent = info.grid.tile_extent(&TileCoord::new(0, 1, 0)).unwrap();
    assert_coords_approx_eq!((extent.min_x, extent.min_y), (0.0, -90.0), 1e-9);
    assert_coords_approx_eq!((extent.max_x, extent.max_y), (180.0, 90.0), 1e-9);
}

#[tokio::test]
async fn test_bottom_left_matrices_from_document() {
    let mut matrix_set = fixtures::web_mercator_quad_json(2);
    for matrix in matrix_set["tileMatrices"].as_array_mut().unwrap() {
        matrix["cornerOfOrigin"] = json!("bottomLeft");
    }
    let transport = Arc::new(MemoryTransport::new().with_document(
        urls::MAP_TILE_SET,
        fixtures::map_tile_set_inline_json(matrix_set),
    ));

    let source = SourceInfo::new(urls::MAP_TILE_SET).with_media_type("image/png");
    let info = get_tile_set_info(transport, &source).await.unwrap();
    assert_eq!(info.grid.origin(0), Some((-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT)));

    assert_eq!(
        info.url_function.url(Some(TileCoord::new(2, 1, 3))).unwrap(),
        format!("{}/2/-4/1.png", urls::MAP_TILE_SET)
    );
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(2, 1, -4))).unwrap(),
        format!("{}/2/3/1.png", urls::MAP_TILE_SET)
    );
}

#[tokio::test]
async fn test_tiling_scheme_link_reference() {
    let tile_set = json!({
        "dataType": "map",
        "links": [
            {
                "rel": "http://www.opengis.net/def/rel/ogc/1.0/tiling-scheme",
                "type": "application/json",
                "href": urls::WEB_MERCATOR_QUAD
            },
            {
                "rel": "item",
                "type": "image/webp",
                "href": "{tileMatrix}/{tileRow}/{tileCol}.webp"
            }
        ]
    });
    let transport = Arc::new(
        MemoryTransport::new()
            .with_document(urls::MAP_TILE_SET, tile_set)
            .with_document(urls::WEB_MERCATOR_QUAD, fixtures::web_mercator_quad_json(3)),
    );

    let info = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap();
    assert_eq!(info.grid.len(), 4);
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(2, 1, 0))).unwrap(),
        "https://maps.example.org/ogcapi/collections/blueMarble/map/tiles/2/0/1.webp"
    );
}

#[tokio::test]
async fn test_limits_and_collections() {
    let mut tile_set = fixtures::map_tile_set_inline_json(fixtures::web_mercator_quad_json(4));
    tile_set["tileMatrixSetLimits"] = json!([
        {"tileMatrix": "1", "minTileRow": 0, "maxTileRow": 1, "minTileCol": 1, "maxTileCol": 1},
        {"tileMatrix": "2", "minTileRow": 0, "maxTileRow": 3, "minTileCol": 0, "maxTileCol": 3}
    ]);
    let transport = Arc::new(MemoryTransport::new().with_document(urls::MAP_TILE_SET, tile_set));

    let source = SourceInfo::new(urls::MAP_TILE_SET)
        .with_media_type("image/png")
        .with_collections(["coastlines", "rivers"]);
    let info = get_tile_set_info(transport, &source).await.unwrap();

    assert_eq!(info.grid.min_zoom(), 1);
    assert_eq!(info.grid.max_zoom(), 2);
    assert_eq!(info.url_function.url(Some(TileCoord::new(0, 0, 0))), None);
    assert_eq!(info.url_function.url(Some(TileCoord::new(1, 0, 0))), None);
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(1, 1, 1))).unwrap(),
        format!("{}/1/1/1.png?collections=coastlines%2Crivers", urls::MAP_TILE_SET)
    );
    assert_eq!(info.url_function.url(Some(TileCoord::new(3, 0, 0))), None);
}

#[tokio::test]
async fn test_context_fills_extra_placeholders() {
    let tile_set = json!({
        "dataType": "map",
        "tileMatrixSet": fixtures::web_mercator_quad_json(2),
        "links": [{
            "rel": "item",
            "type": "image/png",
            "href": "/styles/{styleId}/{tileMatrix}/{tileRow}/{tileCol}.png"
        }]
    });
    let transport = Arc::new(MemoryTransport::new().with_document(urls::MAP_TILE_SET, tile_set));

    let err = get_tile_set_info(transport.clone(), &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::UnresolvedPlaceholder(ref name) if name == "styleId"));

    let source = SourceInfo::new(urls::MAP_TILE_SET).with_context("styleId", "dark");
    let info = get_tile_set_info(transport, &source).await.unwrap();
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(2, 3, 1))).unwrap(),
        "https://maps.example.org/styles/dark/2/1/3.png"
    );
}

// ============================================================================
// Vector tile sets
// ============================================================================

#[tokio::test]
async fn test_vector_tile_set_without_preference() {
    let transport = Arc::new(
        MemoryTransport::new().with_document(urls::VECTOR_TILE_SET, fixtures::vector_tile_set_json(true)),
    );

    let info = get_tile_set_info(transport, &SourceInfo::new(urls::VECTOR_TILE_SET))
        .await
        .unwrap();
    assert_eq!(info.data_type, Some(DataType::Vector));
    assert!(info.url_template.ends_with(".json"));
    assert_eq!(
        info.url_function.url(Some(TileCoord::new(1, 2, 3))).unwrap(),
        format!("{}/1/3/2.json", urls::VECTOR_TILE_SET)
    );
}

#[tokio::test]
async fn test_vector_tile_set_preferred_mvt() {
    let transport = Arc::new(
        MemoryTransport::new().with_document(urls::VECTOR_TILE_SET, fixtures::vector_tile_set_json(true)),
    );

    let source =
        SourceInfo::new(urls::VECTOR_TILE_SET).with_media_type("application/vnd.mapbox-vector-tile");
    let info = TileSetResolver::new(transport).get_tile_set_info(&source).await.unwrap();
    assert!(info.url_template.ends_with(".mvt"));
    assert_eq!(info.grid.len(), 15);
}

#[tokio::test]
async fn test_vector_preference_missing_falls_back_to_geojson() {
    let transport = Arc::new(
        MemoryTransport::new().with_document(urls::VECTOR_TILE_SET, fixtures::vector_tile_set_json(false)),
    );

    let source =
        SourceInfo::new(urls::VECTOR_TILE_SET).with_media_type("application/vnd.mapbox-vector-tile");
    let info = get_tile_set_info(transport, &source).await.unwrap();
    assert!(info.url_template.ends_with(".json"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unknown_data_type() {
    let mut tile_set = fixtures::map_tile_set_json();
    tile_set["dataType"] = json!("coverage");
    let transport = Arc::new(MemoryTransport::new().with_document(urls::MAP_TILE_SET, tile_set));

    let err = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::InvalidDataType(ref value) if value == "coverage"));
}

#[tokio::test]
async fn test_missing_matrix_set() {
    let mut tile_set = fixtures::map_tile_set_json();
    tile_set
        .as_object_mut()
        .unwrap()
        .remove("tileMatrixSetDefinition");
    let transport = Arc::new(MemoryTransport::new().with_document(urls::MAP_TILE_SET, tile_set));

    let err = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::MissingMatrixSet));
}

#[tokio::test]
async fn test_no_item_link() {
    let mut tile_set = fixtures::map_tile_set_json();
    tile_set["links"] = json!([{"rel": "self", "type": "application/json", "href": "."}]);
    let transport = Arc::new(MemoryTransport::new().with_document(urls::MAP_TILE_SET, tile_set));

    let err = get_tile_set_info(transport.clone(), &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::NotFound(_)));
    assert!(err.to_string().contains("item"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_unsupported_crs() {
    let mut matrix_set = fixtures::web_mercator_quad_json(2);
    matrix_set["crs"] = json!("http://www.opengis.net/def/crs/EPSG/0/2056");
    let transport = Arc::new(MemoryTransport::new().with_document(
        urls::MAP_TILE_SET,
        fixtures::map_tile_set_inline_json(matrix_set),
    ));

    let err = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::UnsupportedCrs(_)));
}

#[tokio::test]
async fn test_tile_set_fetch_failure_propagates() {
    let transport = Arc::new(MemoryTransport::new());
    let err = get_tile_set_info(transport, &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::HttpStatus { status: 404, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_matrix_set_fetch_failure_propagates() {
    let transport = Arc::new(
        MemoryTransport::new().with_document(urls::MAP_TILE_SET, fixtures::map_tile_set_json()),
    );

    let err = get_tile_set_info(transport.clone(), &SourceInfo::new(urls::MAP_TILE_SET))
        .await
        .unwrap_err();
    assert!(matches!(err, TilesError::HttpStatus { ref url, status: 404 } if url == urls::WEB_MERCATOR_QUAD));
    assert_eq!(transport.requests().len(), 2);
}
