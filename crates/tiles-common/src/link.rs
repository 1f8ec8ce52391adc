//! Link records and the media types used during negotiation.

use serde::{Deserialize, Serialize};

/// Link relation of tile URL templates.
pub const ITEM_REL: &str = "item";

/// Link relation pointing to a tile matrix set definition.
pub const TILING_SCHEME_REL: &str = "http://www.opengis.net/def/rel/ogc/1.0/tiling-scheme";

/// Raster tile media types accepted as a fallback.
pub const KNOWN_MAP_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Vector tile media types accepted as a fallback.
pub const KNOWN_VECTOR_MEDIA_TYPES: &[&str] = &[
    "application/vnd.mapbox-vector-tile",
    "application/geo+json",
];

/// A web link as found in OGC API documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl Link {
    pub fn new(rel: impl Into<String>, media_type: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            media_type: Some(media_type.into()),
            href: href.into(),
            title: None,
            templated: None,
        }
    }

    pub fn is_item(&self) -> bool {
        self.rel == ITEM_REL
    }

    pub fn has_media_type(&self, media_type: &str) -> bool {
        self.media_type.as_deref() == Some(media_type)
    }
}

pub fn is_known_map_media_type(media_type: &str) -> bool {
    KNOWN_MAP_MEDIA_TYPES.contains(&media_type)
}

pub fn is_known_vector_media_type(media_type: &str) -> bool {
    KNOWN_VECTOR_MEDIA_TYPES.contains(&media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_link() {
        let link: Link = serde_json::from_str(
            r#"{"rel": "item", "type": "image/png", "href": "tiles/{tileMatrix}/{tileRow}/{tileCol}.png", "templated": true}"#,
        )
        .unwrap();
        assert!(link.is_item());
        assert!(link.has_media_type("image/png"));
        assert_eq!(link.templated, Some(true));
    }

    #[test]
    fn test_link_without_type() {
        let link: Link = serde_json::from_str(r#"{"rel": "self", "href": "."}"#).unwrap();
        assert!(!link.is_item());
        assert!(link.media_type.is_none());
        assert!(!link.has_media_type("image/png"));
    }

    #[test]
    fn test_known_media_types() {
        assert!(is_known_map_media_type("image/webp"));
        assert!(!is_known_map_media_type("image/tiff"));
        assert!(is_known_vector_media_type("application/geo+json"));
        assert!(!is_known_vector_media_type("application/json"));
    }
}
