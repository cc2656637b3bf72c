//! Campus navigation routing library.
//!
//! This crate turns a raw client routing request into a GeoJSON route by way
//! of the openrouteservice directions API. The pipeline is:
//!
//! 1. [`validate_route_request`] - shape, range and profile checks
//! 2. [`merge_options`] - client options layered over server defaults
//! 3. [`build_directions_request`] - provider request body
//! 4. [`DirectionsProvider::directions`] - one outbound call
//! 5. [`decode_geometry`] - polyline or GeoJSON into `[lng, lat]` points
//! 6. [`reshape_route`] - single-feature `FeatureCollection`
//!
//! [`RoutingService`] wires those steps together. HTTP front ends should only
//! depend on what is exported here.

pub mod config;
pub mod error;
pub mod geometry;
pub mod options;
pub mod ors;
pub mod request;
pub mod reshape;
pub mod service;

pub use config::{RoutingConfig, RoutingDefaults};
pub use error::{Error, ProviderError, Result};
pub use geometry::{bounding_box, decode_geometry, decode_polyline};
pub use options::{merge_options, ClientOptions, RoutingOptions, WheelchairConstraints};
pub use ors::{
    build_directions_request, DirectionsProvider, DirectionsRequest, DirectionsResponse, OrsClient,
};
pub use request::{validate_route_request, Coordinate, RoutingProfile, ValidatedRequest};
pub use reshape::{reshape_route, NormalizedRoute, RouteFeatureCollection, RouteMetadata};
pub use service::{RoutePlan, RoutingService};
