//! Reshaping a provider route into the client's GeoJSON contract.
//!
//! The client always receives a single-feature `FeatureCollection`:
//!
//! ```text
//! {
//!   "type": "FeatureCollection",
//!   "bbox": [min_lng, min_lat, max_lng, max_lat],
//!   "features": [{
//!     "type": "Feature",
//!     "properties": { "segments": [..], "way_points": [0, n], "summary": {..} },
//!     "geometry": { "type": "LineString", "coordinates": [[lng, lat], ..] }
//!   }],
//!   "metadata": { "attribution": .., "service": .., "timestamp": .., "query": .. }
//! }
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::geometry::bounding_box;
use crate::ors::{DirectionsRequest, PrimaryRoute, RouteSummary, Step};
use crate::request::{Coordinate, RoutingProfile};

pub const ATTRIBUTION: &str = "openrouteservice.org | OpenStreetMap contributors";
pub const SERVICE_NAME: &str = "routing";

/// Canonical route produced from one provider response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRoute {
    pub geometry: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub steps: Vec<Step>,
    pub way_points: Vec<usize>,
    pub bounding_box: [f64; 4],
}

/// Combine the primary route with its decoded geometry.
///
/// An empty geometry has no bounding box and is rejected rather than
/// serialized with non-finite numbers.
pub fn reshape_route(
    route: &PrimaryRoute<'_>,
    geometry: Vec<Coordinate>,
) -> Result<NormalizedRoute, ProviderError> {
    let bounding_box = bounding_box(&geometry).ok_or(ProviderError::EmptyGeometry)?;

    let way_points = match route.way_points {
        Some(points) if !points.is_empty() => points.to_vec(),
        _ => vec![0, geometry.len() - 1],
    };

    Ok(NormalizedRoute {
        distance: route.summary.distance,
        duration: route.summary.duration,
        steps: route.steps().to_vec(),
        way_points,
        bounding_box,
        geometry,
    })
}

impl NormalizedRoute {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance: self.distance,
            duration: self.duration,
        }
    }

    /// Wrap the route as the response body returned to the client.
    pub fn into_feature_collection(self, metadata: RouteMetadata) -> RouteFeatureCollection {
        let summary = self.summary();
        let feature = RouteFeature {
            kind: "Feature",
            bbox: self.bounding_box,
            properties: RouteProperties {
                segments: vec![SegmentProperties {
                    distance: summary.distance,
                    duration: summary.duration,
                    steps: self.steps,
                }],
                way_points: self.way_points,
                summary,
            },
            geometry: LineString {
                kind: "LineString",
                coordinates: self.geometry,
            },
        };

        RouteFeatureCollection {
            kind: "FeatureCollection",
            bbox: self.bounding_box,
            features: vec![feature],
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteFeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub bbox: [f64; 4],
    pub features: Vec<RouteFeature>,
    pub metadata: RouteMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub bbox: [f64; 4],
    pub properties: RouteProperties,
    pub geometry: LineString,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteProperties {
    pub segments: Vec<SegmentProperties>,
    pub way_points: Vec<usize>,
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<Coordinate>,
}

/// Informational block; nothing downstream depends on it.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMetadata {
    pub attribution: &'static str,
    pub service: &'static str,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub query: RouteQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<Value>,
}

/// Echo of what was sent to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct RouteQuery {
    pub profile: RoutingProfile,
    #[serde(flatten)]
    pub request: DirectionsRequest,
}

impl RouteMetadata {
    pub fn new(
        profile: RoutingProfile,
        request: DirectionsRequest,
        engine: Option<Value>,
        timestamp: i64,
    ) -> Self {
        Self {
            attribution: ATTRIBUTION,
            service: SERVICE_NAME,
            timestamp,
            query: RouteQuery { profile, request },
            engine,
        }
    }
}
