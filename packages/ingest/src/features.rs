//! Property and geometry extraction from `GeoJSON` features.
//!
//! Every accessor takes the feature's position in its collection so that
//! errors point at the offending record.

use civic_atlas_geometry::{LatLng, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;

use crate::IngestError;

/// Parses `text` as a `GeoJSON` `FeatureCollection`.
pub fn collection(text: &str) -> Result<FeatureCollection, IngestError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(IngestError::NotFeatureCollection { found: "Feature" }),
        GeoJson::Geometry(_) => Err(IngestError::NotFeatureCollection { found: "Geometry" }),
    }
}

fn required<'a>(
    feature: &'a Feature,
    index: usize,
    name: &'static str,
) -> Result<&'a Value, IngestError> {
    feature
        .property(name)
        .filter(|v| !v.is_null())
        .ok_or(IngestError::MissingProperty { index, name })
}

fn invalid(index: usize, name: &'static str, found: &Value) -> IngestError {
    IngestError::InvalidProperty {
        index,
        name,
        found: found.to_string(),
    }
}

/// A string property. Numeric identifiers are accepted and stringified.
pub fn string(feature: &Feature, index: usize, name: &'static str) -> Result<String, IngestError> {
    match required(feature, index, name)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(index, name, other)),
    }
}

/// A non-empty string property, or `None`.
pub fn optional_string(feature: &Feature, name: &str) -> Option<String> {
    feature
        .property(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numbers, and strings holding a number, as `f64`.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => other.as_f64(),
    }
}

/// A numeric property. Numeric strings are accepted.
pub fn number(feature: &Feature, index: usize, name: &'static str) -> Result<f64, IngestError> {
    let value = required(feature, index, name)?;
    as_number(value).ok_or_else(|| invalid(index, name, value))
}

/// A numeric property that may be absent or null.
pub fn optional_number(
    feature: &Feature,
    index: usize,
    name: &'static str,
) -> Result<Option<f64>, IngestError> {
    match feature.property(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_number(value).map(Some).ok_or_else(|| invalid(index, name, value)),
    }
}

/// A boolean property. `0`/`1` flags are accepted.
pub fn flag(feature: &Feature, index: usize, name: &'static str) -> Result<bool, IngestError> {
    let value = required(feature, index, name)?;
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v.abs() > f64::EPSILON)),
        _ => Err(invalid(index, name, value)),
    }
}

fn geometry(feature: &Feature, index: usize) -> Result<geo::Geometry<f64>, IngestError> {
    let geometry = feature
        .geometry
        .clone()
        .ok_or(IngestError::MissingGeometry { index })?;

    geo::Geometry::<f64>::try_from(geometry)
        .map_err(|source| IngestError::InvalidGeometry { index, source })
}

const fn kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

/// The feature's polygon. A `MultiPolygon` contributes its first member.
pub fn polygon(feature: &Feature, index: usize) -> Result<Polygon<f64>, IngestError> {
    match geometry(feature, index)? {
        geo::Geometry::Polygon(polygon) => Ok(polygon),
        geo::Geometry::MultiPolygon(multi) => {
            if multi.0.len() > 1 {
                log::debug!(
                    "Feature {index}: using first of {} polygons",
                    multi.0.len()
                );
            }
            multi
                .0
                .into_iter()
                .next()
                .ok_or(IngestError::UnsupportedGeometry {
                    index,
                    kind: "empty MultiPolygon",
                })
        }
        other => Err(IngestError::UnsupportedGeometry {
            index,
            kind: kind(&other),
        }),
    }
}

/// The feature's point location.
pub fn point(feature: &Feature, index: usize) -> Result<LatLng, IngestError> {
    match geometry(feature, index)? {
        geo::Geometry::Point(p) => Ok(LatLng::new(p.y(), p.x())),
        other => Err(IngestError::UnsupportedGeometry {
            index,
            kind: kind(&other),
        }),
    }
}
