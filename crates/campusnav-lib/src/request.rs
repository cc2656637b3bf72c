//! Inbound route request validation.
//!
//! The routing endpoint accepts loosely-typed JSON from the mobile client.
//! [`validate_route_request`] is the only way into the pipeline: it either
//! yields a [`ValidatedRequest`] or a [`crate::Error::Validation`] with a
//! message that tells the caller exactly which part of the body was wrong.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::options::ClientOptions;

pub const MSG_COORDINATES_NOT_ARRAYS: &str = "start and end must be [lng, lat] arrays";
pub const MSG_COORDINATES_NOT_NUMERIC: &str = "start and end coordinates must be numbers";

/// A `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.lng, self.lat].serialize(serializer)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lng, self.lat)
    }
}

/// Travel modality understood by the routing provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingProfile {
    #[default]
    Wheelchair,
    DrivingCar,
    FootWalking,
    CyclingRegular,
}

impl RoutingProfile {
    pub const ALL: [RoutingProfile; 4] = [
        RoutingProfile::Wheelchair,
        RoutingProfile::DrivingCar,
        RoutingProfile::FootWalking,
        RoutingProfile::CyclingRegular,
    ];

    /// Provider path segment for this profile.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProfile::Wheelchair => "wheelchair",
            RoutingProfile::DrivingCar => "driving-car",
            RoutingProfile::FootWalking => "foot-walking",
            RoutingProfile::CyclingRegular => "cycling-regular",
        }
    }

    /// Exact, case-sensitive match against the allowed set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|profile| profile.as_str() == value)
    }

    pub fn is_wheelchair(self) -> bool {
        self == RoutingProfile::Wheelchair
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that passed validation and may be forwarded to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    pub profile: RoutingProfile,
    pub options: ClientOptions,
}

/// Validate a raw request body.
///
/// Checks run in a fixed order: body shape, profile, coordinate shape,
/// coordinate types, coordinate ranges, then options.
pub fn validate_route_request(body: &Value) -> Result<ValidatedRequest> {
    let Some(fields) = body.as_object() else {
        return Err(Error::validation("request body must be a JSON object"));
    };

    let profile = parse_profile(fields.get("mode"))?;

    let (start, end) = match (fields.get("start"), fields.get("end")) {
        (Some(Value::Array(start)), Some(Value::Array(end)))
            if start.len() == 2 && end.len() == 2 =>
        {
            (start, end)
        }
        _ => return Err(Error::validation(MSG_COORDINATES_NOT_ARRAYS)),
    };

    let start = parse_coordinate(start)?;
    let end = parse_coordinate(end)?;

    for coordinate in [start, end] {
        if !coordinate.is_valid() {
            return Err(Error::validation(format!(
                "coordinates out of range: {coordinate}"
            )));
        }
    }

    let options = parse_options(fields.get("options"))?;

    Ok(ValidatedRequest {
        start,
        end,
        profile,
        options,
    })
}

fn parse_coordinate(pair: &[Value]) -> Result<Coordinate> {
    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(lng), Some(lat)) => Ok(Coordinate::new(lng, lat)),
        _ => Err(Error::validation(MSG_COORDINATES_NOT_NUMERIC)),
    }
}

fn parse_profile(mode: Option<&Value>) -> Result<RoutingProfile> {
    match mode {
        None | Some(Value::Null) => Ok(RoutingProfile::default()),
        Some(Value::String(name)) => RoutingProfile::parse(name)
            .ok_or_else(|| Error::validation(format!("unsupported profile: {name}"))),
        Some(other) => Err(Error::validation(format!("unsupported profile: {other}"))),
    }
}

fn parse_options(options: Option<&Value>) -> Result<ClientOptions> {
    match options {
        None | Some(Value::Null) => Ok(ClientOptions::default()),
        Some(value) if value.is_object() => ClientOptions::deserialize(value)
            .map_err(|e| Error::validation(format!("invalid options: {e}"))),
        Some(_) => Err(Error::validation("options must be an object")),
    }
}
