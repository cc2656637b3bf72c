use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ProviderError;

/// Raw success body returned by the provider.
///
/// The provider answers either with a `routes` array (encoded polyline
/// geometry) or a GeoJSON `features` array. Both are parsed leniently since
/// the payload is only partially trusted; missing or `null` collections are
/// treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Vec<ProviderRoute>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<ProviderFeature>,
    #[serde(default)]
    pub metadata: Option<ProviderMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderRoute {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: RouteSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub way_points: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFeature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: RouteSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub way_points: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderMetadata {
    #[serde(default)]
    pub engine: Option<Value>,
}

/// Distance (meters) and duration (seconds) of a route or segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub step_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub way_points: Vec<usize>,
}

/// The route the response is built from, whichever variant it came in.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryRoute<'a> {
    pub geometry: &'a Value,
    pub summary: RouteSummary,
    pub segments: &'a [Segment],
    pub way_points: Option<&'a [usize]>,
}

impl PrimaryRoute<'_> {
    /// Steps of the first segment; empty when the provider sent none.
    pub fn steps(&self) -> &[Step] {
        self.segments
            .first()
            .map(|segment| segment.steps.as_slice())
            .unwrap_or(&[])
    }
}

impl DirectionsResponse {
    /// Parse an already-decoded JSON body.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Select `routes[0]`, falling back to `features[0]`.
    pub fn primary_route(&self) -> Result<PrimaryRoute<'_>, ProviderError> {
        if let Some(route) = self.routes.first() {
            return Ok(PrimaryRoute {
                geometry: &route.geometry,
                summary: route.summary,
                segments: &route.segments,
                way_points: route.way_points.as_deref(),
            });
        }

        if let Some(feature) = self.features.first() {
            return Ok(PrimaryRoute {
                geometry: &feature.geometry,
                summary: feature.properties.summary,
                segments: &feature.properties.segments,
                way_points: feature.properties.way_points.as_deref(),
            });
        }

        Err(ProviderError::NoRoute)
    }

    /// Engine block from the provider metadata, if any.
    pub fn engine(&self) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.engine.as_ref())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
