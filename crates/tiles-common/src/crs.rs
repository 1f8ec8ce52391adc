//! Coordinate reference systems and the projection registry.
//!
//! Tile matrix sets name their CRS with an OGC URI
//! (`http://www.opengis.net/def/crs/EPSG/0/3857`), a URN
//! (`urn:ogc:def:crs:EPSG::4326`) or a short `AUTH:CODE` form. All of them are
//! normalized to `AUTH:CODE` before lookup.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Meters per degree on the WGS84 equatorial sphere.
pub const METERS_PER_DEGREE: f64 = 2.0 * PI * 6_378_137.0 / 360.0;

const WEB_MERCATOR_EXTENT: f64 = 20037508.342789244;

/// Axis order of a CRS as declared by its authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrder {
    /// Easting (x) first, northing (y) second
    XY,
    /// Northing (y) first, easting (x) second
    YX,
}

/// A projection as seen by the tile grid builder.
///
/// Only the properties needed to interpret tile matrix origins and
/// resolutions are modelled; reprojection lives in the host map engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    code: String,
    axis_orientation: String,
    meters_per_unit: f64,
    extent: Option<BoundingBox>,
}

impl Projection {
    /// Create a projection with the given code and axis orientation
    /// descriptor (e.g. `"enu"` or `"neu"`), measured in meters.
    pub fn new(code: impl Into<String>, axis_orientation: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            axis_orientation: axis_orientation.into(),
            meters_per_unit: 1.0,
            extent: None,
        }
    }

    pub fn with_meters_per_unit(mut self, meters_per_unit: f64) -> Self {
        self.meters_per_unit = meters_per_unit;
        self
    }

    pub fn with_extent(mut self, extent: BoundingBox) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn axis_orientation(&self) -> &str {
        &self.axis_orientation
    }

    pub fn meters_per_unit(&self) -> f64 {
        self.meters_per_unit
    }

    pub fn extent(&self) -> Option<&BoundingBox> {
        self.extent.as_ref()
    }

    /// Axis order derived from the first two characters of the orientation.
    pub fn axis_order(&self) -> AxisOrder {
        if self.axis_orientation.starts_with("en") {
            AxisOrder::XY
        } else {
            AxisOrder::YX
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Normalize a CRS identifier to its `AUTH:CODE` form.
///
/// Accepts formats like:
/// - "http://www.opengis.net/def/crs/EPSG/0/3857"
/// - "urn:ogc:def:crs:EPSG::4326"
/// - "epsg:3857"
/// - "CRS:84" (alias of OGC:CRS84)
pub fn normalize_crs_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let lower = trimmed.to_ascii_lowercase();

    let normalized = if let Some(pos) = lower.find("/def/crs/") {
        let parts: Vec<&str> = trimmed[pos + "/def/crs/".len()..]
            .split('/')
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [authority, _version, code] => format!("{}:{}", authority, code),
            [authority, code] => format!("{}:{}", authority, code),
            _ => trimmed.to_string(),
        }
    } else if lower.starts_with("urn:ogc:def:crs:") {
        let parts: Vec<&str> = trimmed["urn:ogc:def:crs:".len()..].split(':').collect();
        match parts.as_slice() {
            [authority, _version, code] => format!("{}:{}", authority, code),
            [authority, code] => format!("{}:{}", authority, code),
            _ => trimmed.to_string(),
        }
    } else {
        trimmed.to_string()
    };

    match normalized.to_ascii_uppercase().as_str() {
        "CRS:84" | "OGC:84" => "OGC:CRS84".to_string(),
        "EPSG:900913" | "EPSG:3785" => "EPSG:3857".to_string(),
        other => other.to_string(),
    }
}

/// Lookup table from CRS identifiers to projections.
#[derive(Debug, Clone)]
pub struct ProjectionRegistry {
    projections: HashMap<String, Projection>,
}

impl ProjectionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            projections: HashMap::new(),
        }
    }

    /// A registry pre-populated with the CRSs common in OGC tile matrix sets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let web_mercator =
            BoundingBox::new(-WEB_MERCATOR_EXTENT, -WEB_MERCATOR_EXTENT, WEB_MERCATOR_EXTENT, WEB_MERCATOR_EXTENT);
        let world = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        let polar = BoundingBox::new(-4000000.0, -4000000.0, 4000000.0, 4000000.0);

        registry.register(Projection::new("EPSG:3857", "enu").with_extent(web_mercator));
        registry.register(Projection::new("EPSG:3395", "enu").with_extent(web_mercator));
        registry.register(
            Projection::new("EPSG:4326", "neu")
                .with_meters_per_unit(METERS_PER_DEGREE)
                .with_extent(world),
        );
        registry.register(
            Projection::new("EPSG:4269", "neu")
                .with_meters_per_unit(METERS_PER_DEGREE)
                .with_extent(world),
        );
        registry.register(
            Projection::new("OGC:CRS84", "enu")
                .with_meters_per_unit(METERS_PER_DEGREE)
                .with_extent(world),
        );
        registry.register(Projection::new("EPSG:5070", "enu").with_extent(BoundingBox::new(
            -2500000.0, -2500000.0, 2500000.0, 2500000.0,
        )));
        registry.register(Projection::new("EPSG:3413", "enu").with_extent(polar));
        registry.register(Projection::new("EPSG:3031", "enu").with_extent(polar));

        registry
    }

    /// Add or replace a projection, keyed by its normalized code.
    pub fn register(&mut self, projection: Projection) {
        let key = normalize_crs_identifier(projection.code());
        self.projections.insert(key, projection);
    }

    /// Look up a projection by any accepted CRS identifier form.
    pub fn lookup(&self, identifier: &str) -> Option<&Projection> {
        self.projections.get(&normalize_crs_identifier(identifier))
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifiers() {
        assert_eq!(
            normalize_crs_identifier("http://www.opengis.net/def/crs/EPSG/0/3857"),
            "EPSG:3857"
        );
        assert_eq!(
            normalize_crs_identifier("https://www.opengis.net/def/crs/OGC/1.3/CRS84"),
            "OGC:CRS84"
        );
        assert_eq!(normalize_crs_identifier("urn:ogc:def:crs:EPSG::4326"), "EPSG:4326");
        assert_eq!(normalize_crs_identifier("epsg:900913"), "EPSG:3857");
        assert_eq!(normalize_crs_identifier("CRS:84"), "OGC:CRS84");
    }

    #[test]
    fn test_lookup_defaults() {
        let registry = ProjectionRegistry::with_defaults();

        let mercator = registry
            .lookup("http://www.opengis.net/def/crs/EPSG/0/3857")
            .unwrap();
        assert_eq!(mercator.axis_order(), AxisOrder::XY);
        assert_eq!(mercator.meters_per_unit(), 1.0);

        let geographic = registry.lookup("EPSG:4326").unwrap();
        assert_eq!(geographic.axis_order(), AxisOrder::YX);
        assert!((geographic.meters_per_unit() - 111319.49079327357).abs() < 1e-6);

        assert!(registry.lookup("EPSG:99999").is_none());
    }

    #[test]
    fn test_register_custom() {
        let mut registry = ProjectionRegistry::new();
        assert!(registry.is_empty());

        registry.register(Projection::new("EPSG:2056", "enu"));
        assert_eq!(registry.len(), 1);
        assert!(registry
            .lookup("http://www.opengis.net/def/crs/EPSG/0/2056")
            .is_some());
    }

    #[test]
    fn test_axis_order_only_checks_prefix() {
        assert_eq!(Projection::new("X:1", "enu").axis_order(), AxisOrder::XY);
        assert_eq!(Projection::new("X:2", "neu").axis_order(), AxisOrder::YX);
        assert_eq!(Projection::new("X:3", "wsu").axis_order(), AxisOrder::YX);
    }
}
