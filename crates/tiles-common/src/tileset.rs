//! Tile set metadata documents (`.../tiles/{tileMatrixSetId}`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::link::{Link, TILING_SCHEME_REL};
use crate::tile::{TileMatrixSet, TileMatrixSetLimit};
use crate::TilesError;

/// Kind of content served by a tile set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Map,
    Vector,
}

impl FromStr for DataType {
    type Err = TilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "map" => Ok(DataType::Map),
            "vector" => Ok(DataType::Vector),
            other => Err(TilesError::InvalidDataType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Map => write!(f, "map"),
            DataType::Vector => write!(f, "vector"),
        }
    }
}

/// A tile set metadata document.
///
/// `data_type` is kept as the raw string so that unsupported values surface
/// as [`TilesError::InvalidDataType`] rather than a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_matrix_set: Option<TileMatrixSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_matrix_set_definition: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tile_matrix_set_limits: Vec<TileMatrixSetLimit>,
}

impl TileSet {
    pub fn data_type(&self) -> Result<DataType, TilesError> {
        match self.data_type.as_deref() {
            Some(value) => value.parse(),
            None => Err(TilesError::InvalidDataType("<missing>".to_string())),
        }
    }

    /// Reference to a tile matrix set document, if the set is not inline.
    ///
    /// `tileMatrixSetDefinition` wins over a tiling-scheme link.
    pub fn matrix_set_reference(&self) -> Option<&str> {
        self.tile_matrix_set_definition.as_deref().or_else(|| {
            self.links
                .iter()
                .find(|link| link.rel == TILING_SCHEME_REL)
                .map(|link| link.href.as_str())
        })
    }
}
