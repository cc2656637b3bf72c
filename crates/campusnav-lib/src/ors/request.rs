use serde::Serialize;

use crate::options::RoutingOptions;
use crate::request::{Coordinate, RoutingProfile};

/// Value of `instructions_format`; the client renders plain text.
pub const INSTRUCTIONS_FORMAT: &str = "text";

/// Provider feature excluded when the caller avoids steps.
pub const AVOID_STEPS_FEATURE: &str = "steps";

/// Body of the provider's `POST /{profile}` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    /// `[start, end]`, both `[lng, lat]`.
    pub coordinates: [Coordinate; 2],
    pub instructions: bool,
    pub instructions_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DirectionsOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectionsOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avoid_features: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_params: Option<ProfileParams>,
}

impl DirectionsOptions {
    fn is_empty(&self) -> bool {
        self.avoid_features.is_empty() && self.profile_params.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileParams {
    pub restrictions: Restrictions,
}

/// Wheelchair restrictions. Unset fields are omitted, never sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Restrictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_incline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_sloped_kerb: Option<f64>,
}

/// Map merged options onto the provider's request shape.
pub fn build_directions_request(
    profile: RoutingProfile,
    start: Coordinate,
    end: Coordinate,
    options: &RoutingOptions,
) -> DirectionsRequest {
    let mut provider_options = DirectionsOptions::default();

    if options.avoid_steps() {
        provider_options.avoid_features.push(AVOID_STEPS_FEATURE);
    }

    if let Some(constraints) = options.wheelchair_constraints {
        if profile.is_wheelchair() && constraints.has_restrictions() {
            provider_options.profile_params = Some(ProfileParams {
                restrictions: Restrictions {
                    maximum_incline: constraints.max_gradient,
                    maximum_sloped_kerb: constraints.max_sloped_kerb,
                },
            });
        }
    }

    DirectionsRequest {
        coordinates: [start, end],
        instructions: options.include_steps,
        instructions_format: INSTRUCTIONS_FORMAT,
        options: (!provider_options.is_empty()).then_some(provider_options),
    }
}
