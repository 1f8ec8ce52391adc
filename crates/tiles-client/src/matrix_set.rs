//! Compiles a tile matrix set into a tile grid and a URL function.

use std::sync::Arc;

use tiles_common::template::TILE_PLACEHOLDERS;
use tiles_common::{
    AxisOrder, DataType, Projection, ProjectionRegistry, TileGrid, TileMatrixSet,
    TileMatrixSetLimit, TilesError, TilesResult, UrlTemplate,
};
use tracing::{debug, warn};
use url::Url;

use crate::source::SourceInfo;
use crate::url_function::TileUrlFunction;

/// A resolved tile set, ready for tile loading.
#[derive(Debug, Clone)]
pub struct TileSetInfo {
    /// Selected URL template, as written in the tile set document.
    pub url_template: String,
    pub grid: Arc<TileGrid>,
    pub url_function: TileUrlFunction,
    pub projection: Projection,
    pub data_type: Option<DataType>,
}

/// Build the grid and URL function for `matrix_set`.
///
/// `limits` are the tile set's `tileMatrixSetLimits`; pass an empty slice
/// when the tile set has none.
pub fn parse_tile_matrix_set(
    matrix_set: &TileMatrixSet,
    source: &SourceInfo,
    url_template: &str,
    limits: &[TileMatrixSetLimit],
    projections: &ProjectionRegistry,
) -> TilesResult<TileSetInfo> {
    let crs = matrix_set.crs_identifier();
    let projection = match &source.projection {
        Some(projection) => projection.clone(),
        None => projections
            .lookup(crs)
            .cloned()
            .ok_or_else(|| TilesError::UnsupportedCrs(crs.to_string()))?,
    };
    let backwards = projection.axis_order() == AxisOrder::YX;

    let template = UrlTemplate::parse(url_template);
    template.validate(|name| TILE_PLACEHOLDERS.contains(&name) || source.context.contains_key(name))?;

    let base_url = Url::parse(&source.url).map_err(|e| TilesError::invalid_url(source.url.as_str(), e))?;

    let levels = matrix_set.tile_matrices.len();
    let mut origins = Vec::with_capacity(levels);
    let mut resolutions = Vec::with_capacity(levels);
    let mut sizes = Vec::with_capacity(levels);
    let mut tile_sizes = Vec::with_capacity(levels);

    for matrix in &matrix_set.tile_matrices {
        let [a, b] = matrix.point_of_origin;
        origins.push(if backwards { (b, a) } else { (a, b) });

        let resolution = matrix
            .resolution(projection.meters_per_unit())
            .ok_or_else(|| TilesError::InvalidTileMatrix {
                matrix: matrix.id.clone(),
                message: "neither cellSize nor scaleDenominator is set".to_string(),
            })?;
        resolutions.push(resolution);
        sizes.push((matrix.matrix_width, matrix.matrix_height));
        tile_sizes.push((matrix.tile_width, matrix.tile_height));
    }

    let mut grid = TileGrid::new(origins, resolutions, sizes, tile_sizes)?;

    let level_limits = level_limits(matrix_set, limits);
    if let Some(per_level) = &level_limits {
        let limited: Vec<u32> = per_level
            .iter()
            .enumerate()
            .filter(|(_, limit)| limit.is_some())
            .map(|(z, _)| z as u32)
            .collect();
        if let (Some(&min_zoom), Some(&max_zoom)) = (limited.first(), limited.last()) {
            grid = grid.with_zoom_range(min_zoom, max_zoom)?;
        }
    }

    debug!(
        tile_matrix_set = %matrix_set.id,
        crs = %projection,
        levels,
        backwards,
        min_zoom = grid.min_zoom(),
        max_zoom = grid.max_zoom(),
        "Parsed tile matrix set"
    );

    let url_function = TileUrlFunction::new(
        template,
        matrix_set.tile_matrices.clone(),
        level_limits,
        base_url,
        source.context.clone(),
        &source.collections,
    );

    Ok(TileSetInfo {
        url_template: url_template.to_string(),
        grid: Arc::new(grid),
        url_function,
        projection,
        data_type: None,
    })
}

/// Align limits with zoom levels by tile matrix id.
///
/// Returns `None` when no limit matches any tile matrix.
fn level_limits(
    matrix_set: &TileMatrixSet,
    limits: &[TileMatrixSetLimit],
) -> Option<Vec<Option<TileMatrixSetLimit>>> {
    if limits.is_empty() {
        return None;
    }

    let per_level: Vec<Option<TileMatrixSetLimit>> = matrix_set
        .tile_matrices
        .iter()
        .map(|matrix| limits.iter().find(|l| l.tile_matrix == matrix.id).cloned())
        .collect();

    if per_level.iter().all(Option::is_none) {
        warn!(
            tile_matrix_set = %matrix_set.id,
            limits = limits.len(),
            "tileMatrixSetLimits match no tile matrix, ignoring them"
        );
        return None;
    }

    Some(per_level)
}
