//! Error types for tile-set resolution.

use thiserror::Error;

/// Result type alias using TilesError.
pub type TilesResult<T> = Result<T, TilesError>;

/// Primary error type for resolving OGC API Tiles metadata.
#[derive(Debug, Error)]
pub enum TilesError {
    // === Link negotiation ===
    #[error("{0}")]
    NotFound(String),

    // === Tile set / tile matrix set content ===
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid data type: {0}")]
    InvalidDataType(String),

    #[error("Expected tileMatrixSet or tileMatrixSetDefinition")]
    MissingMatrixSet,

    #[error("Unresolved URL template placeholder: {{{0}}}")]
    UnresolvedPlaceholder(String),

    #[error("Invalid tile matrix '{matrix}': {message}")]
    InvalidTileMatrix { matrix: String, message: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid tile coordinate {coord:?}: {message}")]
    InvalidTileCoord { coord: [i64; 3], message: String },

    // === Transport ===
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

impl TilesError {
    /// Create a NotFound error for a missing "item" link.
    pub fn item_link_not_found(media_type: Option<&str>) -> Self {
        match media_type {
            Some(media_type) => TilesError::NotFound(format!(
                "Could not find \"item\" link with media type {} or a supported fallback",
                media_type
            )),
            None => TilesError::NotFound(
                "Could not find \"item\" link with a supported media type".to_string(),
            ),
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, message: impl ToString) -> Self {
        TilesError::InvalidUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a Transport error.
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        TilesError::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error came from the transport rather than document content.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TilesError::Transport { .. } | TilesError::HttpStatus { .. }
        )
    }
}

impl From<serde_json::Error> for TilesError {
    fn from(err: serde_json::Error) -> Self {
        TilesError::InvalidDocument(err.to_string())
    }
}
