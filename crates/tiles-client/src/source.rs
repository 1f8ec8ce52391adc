//! Caller-supplied description of a tile set source.

use std::collections::BTreeMap;

use tiles_common::Projection;

/// Where to find a tile set and how to negotiate it.
#[derive(Debug, Clone, Default)]
pub struct SourceInfo {
    /// URL of the tile set metadata document.
    pub url: String,

    /// Preferred media type of the tiles.
    pub media_type: Option<String>,

    /// Projection to use instead of looking up the tile matrix set CRS.
    pub projection: Option<Projection>,

    /// Extra template values. These win over `tileMatrix`, `tileRow` and
    /// `tileCol` on collision.
    pub context: BTreeMap<String, String>,

    /// Collections appended as a `collections` query parameter.
    pub collections: Vec<String>,
}

impl SourceInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }
}
