//! Media type negotiation over tile set links.
//!
//! Only links with relation `item` are considered. A link whose type equals
//! the preferred media type is returned as soon as it is seen. Otherwise the
//! last link of a known type is used, and for map tiles any `image/*` link is
//! accepted when no known type has been seen before it.

use tiles_common::link::{is_known_map_media_type, is_known_vector_media_type};
use tiles_common::{DataType, Link, TilesError, TilesResult};
use tracing::debug;

/// Pick the URL template for raster map tiles.
pub fn select_map_url_template(links: &[Link], media_type: Option<&str>) -> TilesResult<String> {
    let mut fallback: Option<&str> = None;

    for (link, link_type) in item_links(links) {
        if media_type.is_some_and(|preferred| link.has_media_type(preferred)) {
            return Ok(link.href.clone());
        }
        if is_known_map_media_type(link_type) {
            fallback = Some(link.href.as_str());
        } else if fallback.is_none() && link_type.starts_with("image/") {
            fallback = Some(link.href.as_str());
        }
    }

    finish(fallback, media_type)
}

/// Pick the URL template for vector tiles.
pub fn select_vector_url_template(
    links: &[Link],
    media_type: Option<&str>,
) -> TilesResult<String> {
    let mut fallback: Option<&str> = None;

    for (link, link_type) in item_links(links) {
        if media_type.is_some_and(|preferred| link.has_media_type(preferred)) {
            return Ok(link.href.clone());
        }
        if is_known_vector_media_type(link_type) {
            fallback = Some(link.href.as_str());
        }
    }

    finish(fallback, media_type)
}

/// Pick the URL template matching the tile set's data type.
pub fn select_url_template(
    data_type: DataType,
    links: &[Link],
    media_type: Option<&str>,
) -> TilesResult<String> {
    match data_type {
        DataType::Map => select_map_url_template(links, media_type),
        DataType::Vector => select_vector_url_template(links, media_type),
    }
}

fn item_links(links: &[Link]) -> impl Iterator<Item = (&Link, &str)> {
    links.iter().filter(|link| link.is_item()).filter_map(|link| {
        link.media_type
            .as_deref()
            .map(|media_type| (link, media_type))
    })
}

fn finish(fallback: Option<&str>, media_type: Option<&str>) -> TilesResult<String> {
    match fallback {
        Some(href) => {
            debug!(preferred = ?media_type, href, "Using fallback tile link");
            Ok(href.to_string())
        }
        None => Err(TilesError::item_link_not_found(media_type)),
    }
}
