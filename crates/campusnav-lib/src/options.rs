//! Merging client routing options with server defaults.
//!
//! Every field resolves independently, first defined wins:
//! client value, then the server default from [`RoutingDefaults`], then unset.
//! This is not a deep merge of arbitrary objects.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::RoutingDefaults;
use crate::request::RoutingProfile;

/// Options supplied by the client under the request's `options` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    #[serde(default)]
    pub include_steps: Option<bool>,
    #[serde(default)]
    pub wheelchair: Option<ClientWheelchairOptions>,
}

/// Wheelchair overrides as sent by the client.
///
/// `maximum_incline`, `maximum_sloped_curb` and `maximum_curb` are accepted
/// as aliases so older client builds keep working.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientWheelchairOptions {
    #[serde(default, rename = "avoidSteps")]
    pub avoid_steps: Option<bool>,
    #[serde(
        default,
        alias = "maximum_incline",
        deserialize_with = "finite_or_unset"
    )]
    pub maximum_gradient: Option<f64>,
    #[serde(
        default,
        alias = "maximum_sloped_curb",
        alias = "maximum_curb",
        deserialize_with = "finite_or_unset"
    )]
    pub maximum_sloped_kerb: Option<f64>,
}

fn finite_or_unset<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()))
}

/// Wheelchair-only restrictions after merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelchairConstraints {
    pub avoid_steps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gradient: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sloped_kerb: Option<f64>,
}

impl WheelchairConstraints {
    pub fn has_restrictions(&self) -> bool {
        self.max_gradient.is_some() || self.max_sloped_kerb.is_some()
    }
}

/// Canonical per-request routing options. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOptions {
    pub include_steps: bool,
    /// Present only for the wheelchair profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair_constraints: Option<WheelchairConstraints>,
}

impl RoutingOptions {
    pub fn avoid_steps(&self) -> bool {
        self.wheelchair_constraints
            .map(|c| c.avoid_steps)
            .unwrap_or(false)
    }
}

/// Merge client options with server defaults for `profile`.
pub fn merge_options(
    profile: RoutingProfile,
    client: &ClientOptions,
    defaults: &RoutingDefaults,
) -> RoutingOptions {
    let include_steps = client.include_steps.unwrap_or(true);

    let wheelchair_constraints = profile.is_wheelchair().then(|| {
        let overrides = client.wheelchair.clone().unwrap_or_default();
        WheelchairConstraints {
            avoid_steps: overrides
                .avoid_steps
                .or(defaults.avoid_steps)
                .unwrap_or(false),
            max_gradient: overrides.maximum_gradient.or(defaults.max_gradient),
            max_sloped_kerb: overrides.maximum_sloped_kerb.or(defaults.max_sloped_kerb),
        }
    });

    let merged = RoutingOptions {
        include_steps,
        wheelchair_constraints,
    };
    debug!(profile = %profile, options = ?merged, "merged routing options");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(value: serde_json::Value) -> ClientOptions {
        serde_json::from_value(value).unwrap()
    }

    fn server_defaults(gradient: Option<f64>) -> RoutingDefaults {
        RoutingDefaults {
            max_gradient: gradient,
            ..RoutingDefaults::default()
        }
    }

    #[test]
    fn test_no_options_includes_steps() {
        for profile in RoutingProfile::ALL {
            let merged = merge_options(profile, &ClientOptions::default(), &RoutingDefaults::default());
            assert!(merged.include_steps);
            assert_eq!(merged.wheelchair_constraints.is_some(), profile.is_wheelchair());
        }
    }

    #[test]
    fn test_client_can_disable_steps() {
        let merged = merge_options(
            RoutingProfile::FootWalking,
            &client(json!({"includeSteps": false})),
            &RoutingDefaults::default(),
        );
        assert!(!merged.include_steps);
    }

    #[test]
    fn test_client_gradient_beats_server_default() {
        let merged = merge_options(
            RoutingProfile::Wheelchair,
            &client(json!({"wheelchair": {"maximum_gradient": 0.08}})),
            &server_defaults(Some(0.05)),
        );
        let constraints = merged.wheelchair_constraints.unwrap();
        assert_eq!(constraints.max_gradient, Some(0.08));
    }

    #[test]
    fn test_server_default_fills_missing_client_value() {
        let merged = merge_options(
            RoutingProfile::Wheelchair,
            &ClientOptions::default(),
            &server_defaults(Some(0.05)),
        );
        let constraints = merged.wheelchair_constraints.unwrap();
        assert_eq!(constraints.max_gradient, Some(0.05));
        assert_eq!(constraints.max_sloped_kerb, None);
    }

    #[test]
    fn test_both_absent_stays_unset() {
        let merged = merge_options(
            RoutingProfile::Wheelchair,
            &ClientOptions::default(),
            &RoutingDefaults::default(),
        );
        let constraints = merged.wheelchair_constraints.unwrap();
        assert_eq!(constraints.max_gradient, None);
        assert_eq!(constraints.max_sloped_kerb, None);
        assert!(!constraints.avoid_steps);
        assert!(!constraints.has_restrictions());
    }

    #[test]
    fn test_fields_merge_independently() {
        let defaults = RoutingDefaults {
            avoid_steps: Some(true),
            max_gradient: Some(0.05),
            max_sloped_kerb: Some(0.03),
        };
        let merged = merge_options(
            RoutingProfile::Wheelchair,
            &client(json!({"wheelchair": {"avoidSteps": false, "maximum_sloped_kerb": 0.06}})),
            &defaults,
        );
        let constraints = merged.wheelchair_constraints.unwrap();
        assert!(!constraints.avoid_steps);
        assert_eq!(constraints.max_gradient, Some(0.05));
        assert_eq!(constraints.max_sloped_kerb, Some(0.06));
    }

    #[test]
    fn test_wheelchair_options_ignored_for_other_profiles() {
        let merged = merge_options(
            RoutingProfile::DrivingCar,
            &client(json!({"wheelchair": {"avoidSteps": true, "maximum_gradient": 0.08}})),
            &server_defaults(Some(0.05)),
        );
        assert!(merged.wheelchair_constraints.is_none());
        assert!(!merged.avoid_steps());
    }

    #[test]
    fn test_legacy_field_names_accepted() {
        let options = client(json!({"wheelchair": {"maximum_incline": 6, "maximum_sloped_curb": 0.04}}));
        let wheelchair = options.wheelchair.unwrap();
        assert_eq!(wheelchair.maximum_gradient, Some(6.0));
        assert_eq!(wheelchair.maximum_sloped_kerb, Some(0.04));

        let options = client(json!({"wheelchair": {"maximum_curb": 0.02}}));
        assert_eq!(options.wheelchair.unwrap().maximum_sloped_kerb, Some(0.02));
    }

    #[test]
    fn test_null_client_values_fall_through() {
        let merged = merge_options(
            RoutingProfile::Wheelchair,
            &client(json!({"includeSteps": null, "wheelchair": {"maximum_gradient": null}})),
            &server_defaults(Some(0.05)),
        );
        assert!(merged.include_steps);
        assert_eq!(merged.wheelchair_constraints.unwrap().max_gradient, Some(0.05));
    }
}
