//! Tile set inspection tool.
//!
//! Resolves an OGC API Tiles tile set and prints, as JSON:
//! - the selected tile URL template and data type
//! - the tile grid (origins, resolutions, matrix and tile sizes per level)
//! - the projection's valid extent, when known
//! - URLs, extents and centers for the tiles passed with `--tile`

mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tiles_client::{ClientConfig, SourceInfo, TileSetInfo, TileSetResolver};
use tiles_common::{Projection, TileCoord};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::SourcesConfig;

#[derive(Parser, Debug)]
#[command(name = "tileset-inspect")]
#[command(about = "Resolve an OGC API Tiles tile set and print its grid and tile URLs")]
struct Args {
    /// Tile set URL (omit when using --source)
    url: Option<String>,

    /// Named source from the sources file
    #[arg(short, long)]
    source: Option<String>,

    /// Sources file (YAML)
    #[arg(long, env = "TILESET_SOURCES", default_value = "config/tilesets.yaml")]
    config: PathBuf,

    /// Preferred tile media type (e.g. image/png)
    #[arg(short, long)]
    media_type: Option<String>,

    /// Projection code to use instead of the tile matrix set CRS
    #[arg(long)]
    crs: Option<String>,

    /// Axis orientation of --crs
    #[arg(long, default_value = "enu")]
    axis_orientation: String,

    /// Meters per unit of --crs
    #[arg(long)]
    meters_per_unit: Option<f64>,

    /// Extra URL template value, as key=value (repeatable)
    #[arg(long = "context", value_parser = parse_key_value)]
    context: Vec<(String, String)>,

    /// Collections to request, comma separated
    #[arg(long, value_delimiter = ',')]
    collections: Vec<String>,

    /// Tile to print a URL for, as z/x/y (repeatable)
    #[arg(short, long = "tile", value_parser = parse_tile_coord)]
    tiles: Vec<TileCoord>,

    /// Request timeout in seconds
    #[arg(long, env = "TILES_REQUEST_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    url: String,
    url_template: String,
    data_type: Option<String>,
    crs: String,
    axis_orientation: String,
    projection_extent: Option<[f64; 4]>,
    min_zoom: u32,
    max_zoom: u32,
    levels: Vec<LevelSummary>,
    tiles: Vec<TileSummary>,
}

#[derive(Debug, Serialize)]
struct LevelSummary {
    zoom: u32,
    origin: (f64, f64),
    resolution: f64,
    matrix_size: (u64, u64),
    tile_size: (u32, u32),
}

#[derive(Debug, Serialize)]
struct TileSummary {
    tile: String,
    url: Option<String>,
    extent: Option<[f64; 4]>,
    center: Option<(f64, f64)>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(&args.log_level, args.log_json)?;

    let source = build_source(&args)?;

    let mut client_config = ClientConfig::from_env();
    if let Some(secs) = args.timeout {
        client_config.request_timeout = Duration::from_secs(secs);
    }

    info!(url = %source.url, media_type = ?source.media_type, "Resolving tile set");

    let resolver = TileSetResolver::from_config(&client_config)?;
    let tile_set = resolver
        .get_tile_set_info(&source)
        .await
        .with_context(|| format!("Failed to resolve tile set {}", source.url))?;

    let summary = summarize(&source, &tile_set, &args.tiles);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout carries the summary
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Combine the named source (if any) with command line overrides.
fn build_source(args: &Args) -> Result<SourceInfo> {
    let mut source = match (&args.source, &args.url) {
        (Some(name), _) => {
            let sources = SourcesConfig::load(&args.config)?;
            let named = sources.find(name).ok_or_else(|| {
                anyhow!(
                    "Unknown source '{}' in {} (available: {})",
                    name,
                    args.config.display(),
                    sources.names().join(", ")
                )
            })?;
            let mut source = named.to_source_info();
            if let Some(url) = &args.url {
                source.url = url.clone();
            }
            source
        }
        (None, Some(url)) => SourceInfo::new(url.clone()),
        (None, None) => bail!("Either a tile set URL or --source is required"),
    };

    if let Some(media_type) = &args.media_type {
        source.media_type = Some(media_type.clone());
    }
    if let Some(code) = &args.crs {
        let projection = Projection::new(code.clone(), args.axis_orientation.clone());
        source.projection = Some(match args.meters_per_unit {
            Some(mpu) => projection.with_meters_per_unit(mpu),
            None => projection,
        });
    }
    for (key, value) in &args.context {
        source.context.insert(key.clone(), value.clone());
    }
    if !args.collections.is_empty() {
        source.collections = args.collections.clone();
    }

    Ok(source)
}

fn summarize(source: &SourceInfo, tile_set: &TileSetInfo, tiles: &[TileCoord]) -> Summary {
    let grid = &tile_set.grid;

    let levels = (0..grid.len() as u32)
        .filter_map(|z| {
            Some(LevelSummary {
                zoom: z,
                origin: grid.origin(z)?,
                resolution: grid.resolution(z)?,
                matrix_size: grid.size(z)?,
                tile_size: grid.tile_size(z)?,
            })
        })
        .collect();

    let tiles = tiles
        .iter()
        .map(|coord| {
            let extent = grid.tile_extent(coord);
            TileSummary {
                tile: coord.cache_key(),
                url: tile_set.url_function.url(Some(*coord)),
                extent: extent.as_ref().map(|bbox| bbox.to_array()),
                center: extent.as_ref().map(|bbox| bbox.center()),
            }
        })
        .collect();

    Summary {
        url: source.url.clone(),
        url_template: tile_set.url_template.clone(),
        data_type: tile_set.data_type.map(|dt| dt.to_string()),
        crs: tile_set.projection.code().to_string(),
        axis_orientation: tile_set.projection.axis_orientation().to_string(),
        projection_extent: tile_set.projection.extent().map(|bbox| bbox.to_array()),
        min_zoom: grid.min_zoom(),
        max_zoom: grid.max_zoom(),
        levels,
        tiles,
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn parse_tile_coord(s: &str) -> Result<TileCoord, String> {
    let parts: Vec<&str> = s.split('/').collect();
    let [z, x, y] = parts.as_slice() else {
        return Err(format!("expected z/x/y, got '{}'", s));
    };

    let z = z.parse::<i64>().map_err(|e| format!("invalid zoom '{}': {}", z, e))?;
    let x = x.parse::<i64>().map_err(|e| format!("invalid column '{}': {}", x, e))?;
    let y = y.parse::<i64>().map_err(|e| format!("invalid row '{}': {}", y, e))?;
    TileCoord::try_from([z, x, y]).map_err(|e| e.to_string())
}
