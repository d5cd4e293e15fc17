//! Routing preferences supplied by the client.
//!
//! The custom model is opaque: rules are evaluated by the provider, never
//! here. The only local guarantee is that all three rule categories are
//! present in what goes out, in the order the caller gave them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::directions::error::RouteError;

/// Default maximum speed, in the provider's unit (km/h for GraphHopper).
pub const DEFAULT_MAX_SPEED: f64 = 25.0;

/// Provider-defined rule structure of conditional multipliers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CustomModel {
    #[serde(default)]
    pub priority: Vec<Value>,

    #[serde(default)]
    pub speed: Vec<Value>,

    #[serde(default)]
    pub distance: Vec<Value>,

    /// Any other keys (`areas`, `distance_influence`, ...) pass through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomModel {
    pub fn is_empty(&self) -> bool {
        self.priority.is_empty()
            && self.speed.is_empty()
            && self.distance.is_empty()
            && self.extra.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.priority.len() + self.speed.len() + self.distance.len()
    }
}

/// Validated routing preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPreferences {
    pub max_speed: f64,
    pub custom_model: CustomModel,
    /// Exclusion tags (e.g. `ferry`, `toll`) in caller order.
    pub exclude: Vec<String>,
}

impl Default for RoutingPreferences {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            custom_model: CustomModel::default(),
            exclude: Vec::new(),
        }
    }
}

impl RoutingPreferences {
    /// Build preferences from the optional request fields.
    pub fn from_parts(
        max_speed: Option<f64>,
        custom_model: Option<CustomModel>,
        exclude: Option<Vec<String>>,
    ) -> Result<Self, RouteError> {
        let max_speed = match max_speed {
            None => DEFAULT_MAX_SPEED,
            Some(speed) if speed.is_finite() && speed > 0.0 => speed,
            Some(speed) => {
                return Err(RouteError::invalid(format!(
                    "max_speed must be a positive number, got {speed}"
                )))
            }
        };

        let exclude = exclude.unwrap_or_default();
        for tag in &exclude {
            if tag.trim().is_empty() {
                return Err(RouteError::invalid("Exclusion tags must not be empty"));
            }
            if tag.contains(',') {
                return Err(RouteError::invalid(format!(
                    "Exclusion tag {tag:?} must not contain ','"
                )));
            }
        }

        Ok(Self {
            max_speed,
            custom_model: custom_model.unwrap_or_default(),
            exclude,
        })
    }

    /// Exclusion tags joined into a single `a,b` parameter, or `None` when
    /// there are none.
    pub fn exclude_param(&self) -> Option<String> {
        if self.exclude.is_empty() {
            None
        } else {
            Some(self.exclude.join(","))
        }
    }
}
