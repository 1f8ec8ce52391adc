//! OGC API Tiles documents used across the test suite.
//!
//! The documents follow the shape served by public OGC API – Tiles
//! endpoints, trimmed to the members the resolver reads plus a few it must
//! ignore.

use serde_json::{json, Value};

/// Well-known URLs of the fixture server.
pub mod urls {
    /// Map tile set, WebMercatorQuad.
    pub const MAP_TILE_SET: &str =
        "https://maps.example.org/ogcapi/collections/blueMarble/map/tiles/WebMercatorQuad";

    /// Vector tile set, WebMercatorQuad.
    pub const VECTOR_TILE_SET: &str =
        "https://maps.example.org/ogcapi/collections/ne_10m_admin_0_countries/tiles/WebMercatorQuad";

    /// Where `tileMatrixSetDefinition` of the map tile set resolves to.
    pub const WEB_MERCATOR_QUAD: &str =
        "https://maps.example.org/ogcapi/tileMatrixSets/WebMercatorQuad";

    /// Relative reference used by the map tile set.
    pub const WEB_MERCATOR_QUAD_REFERENCE: &str = "../../../../tileMatrixSets/WebMercatorQuad";
}

/// Resolution of WebMercatorQuad level 0 in meters per pixel.
pub const WEB_MERCATOR_RESOLUTION_0: f64 = 156543.03392804097;

/// Half the width of the Web Mercator square in meters.
pub const WEB_MERCATOR_MAX_EXTENT: f64 = 20037508.342789244;

/// WebMercatorQuad with levels `0..=max_zoom`.
pub fn web_mercator_quad_json(max_zoom: u32) -> Value {
    let tile_matrices: Vec<Value> = (0..=max_zoom)
        .map(|z| {
            let n = 2f64.powi(z as i32);
            json!({
                "id": z.to_string(),
                "scaleDenominator": 559082264.0287178 / n,
                "cellSize": WEB_MERCATOR_RESOLUTION_0 / n,
                "cornerOfOrigin": "topLeft",
                "pointOfOrigin": [-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT],
                "matrixWidth": n as u64,
                "matrixHeight": n as u64,
                "tileWidth": 256,
                "tileHeight": 256
            })
        })
        .collect();

    json!({
        "id": "WebMercatorQuad",
        "title": "Google Maps Compatible for the World",
        "uri": "http://www.opengis.net/def/tilematrixset/OGC/1.0/WebMercatorQuad",
        "crs": "http://www.opengis.net/def/crs/EPSG/0/3857",
        "orderedAxes": ["E", "N"],
        "wellKnownScaleSet": "http://www.opengis.net/def/wkss/OGC/1.0/GoogleMapsCompatible",
        "tileMatrices": tile_matrices
    })
}

/// A geographic EPSG:4326 quad. Origins are written latitude first, as the
/// CRS declares, so a correct parser must swap them.
pub fn world_epsg4326_quad_json(max_zoom: u32) -> Value {
    let tile_matrices: Vec<Value> = (0..=max_zoom)
        .map(|z| {
            let n = 2f64.powi(z as i32);
            json!({
                "id": z.to_string(),
                "scaleDenominator": 279541132.0143589 / n,
                "cellSize": 0.703125 / n,
                "pointOfOrigin": [90.0, -180.0],
                "matrixWidth": (n * 2.0) as u64,
                "matrixHeight": n as u64,
                "tileWidth": 256,
                "tileHeight": 256
            })
        })
        .collect();

    json!({
        "id": "WorldEPSG4326Quad",
        "crs": {"uri": "http://www.opengis.net/def/crs/EPSG/0/4326"},
        "orderedAxes": ["Lat", "Lon"],
        "tileMatrices": tile_matrices
    })
}

fn map_links() -> Value {
    json!([
        {
            "rel": "self",
            "type": "application/json",
            "href": urls::MAP_TILE_SET
        },
        {
            "rel": "item",
            "type": "image/png",
            "title": "PNG tiles",
            "href": format!("{}/{{tileMatrix}}/{{tileRow}}/{{tileCol}}.png", urls::MAP_TILE_SET),
            "templated": true
        },
        {
            "rel": "item",
            "type": "image/jpeg",
            "title": "JPEG tiles",
            "href": format!("{}/{{tileMatrix}}/{{tileRow}}/{{tileCol}}.jpg", urls::MAP_TILE_SET),
            "templated": true
        }
    ])
}

/// Map tile set referencing its tile matrix set by a relative URL.
pub fn map_tile_set_json() -> Value {
    json!({
        "title": "Blue Marble",
        "dataType": "map",
        "crs": "http://www.opengis.net/def/crs/EPSG/0/3857",
        "tileMatrixSetURI": "http://www.opengis.net/def/tilematrixset/OGC/1.0/WebMercatorQuad",
        "tileMatrixSetDefinition": urls::WEB_MERCATOR_QUAD_REFERENCE,
        "links": map_links()
    })
}

/// Map tile set with the tile matrix set inline.
pub fn map_tile_set_inline_json(matrix_set: Value) -> Value {
    json!({
        "title": "Blue Marble",
        "dataType": "map",
        "tileMatrixSet": matrix_set,
        "links": map_links()
    })
}

/// Vector tile set with an inline WebMercatorQuad.
///
/// The GeoJSON link is always present; the Mapbox Vector Tile link only
/// when `with_mvt` is set.
pub fn vector_tile_set_json(with_mvt: bool) -> Value {
    let mut links = vec![json!({
        "rel": "self",
        "type": "application/json",
        "href": "."
    })];
    if with_mvt {
        links.push(json!({
            "rel": "item",
            "type": "application/vnd.mapbox-vector-tile",
            "href": "WebMercatorQuad/{tileMatrix}/{tileRow}/{tileCol}.mvt",
            "templated": true
        }));
    }
    links.push(json!({
        "rel": "item",
        "type": "application/geo+json",
        "href": "WebMercatorQuad/{tileMatrix}/{tileRow}/{tileCol}.json",
        "templated": true
    }));

    json!({
        "title": "Countries",
        "dataType": "vector",
        "tileMatrixSet": web_mercator_quad_json(14),
        "layers": [{"id": "ne_10m_admin_0_countries", "geometryType": "polygons"}],
        "links": links
    })
}
