//! openrouteservice integration.
//!
//! This module provides:
//! - [`build_directions_request`] - map merged options onto the provider body
//! - [`DirectionsProvider`] / [`OrsClient`] - issue the outbound call
//! - [`DirectionsResponse`] - lenient view of the provider's reply
//!
//! # Field Names
//!
//! Clients send `maximum_gradient` and `maximum_sloped_kerb`; the provider
//! expects the wheelchair restrictions `maximum_incline` and
//! `maximum_sloped_kerb` under `options.profile_params.restrictions`.

mod client;
mod request;
mod response;

pub use client::{provider_error_message, DirectionsProvider, OrsClient};
pub use request::{
    build_directions_request, DirectionsOptions, DirectionsRequest, ProfileParams, Restrictions,
    AVOID_STEPS_FEATURE, INSTRUCTIONS_FORMAT,
};
pub use response::{
    DirectionsResponse, FeatureProperties, PrimaryRoute, ProviderFeature, ProviderMetadata,
    ProviderRoute, RouteSummary, Segment, Step,
};
