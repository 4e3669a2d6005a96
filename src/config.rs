// Engine configuration passed from JS. Every field has a default so `{}` is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::profile::{resolve_profile, KeyProfile, ProfileRequest};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Requested key profile: `"auto"` or an explicit profile name.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Overrides the detected device signature (normally `navigator.userAgent`).
    #[serde(default)]
    pub device_signature: Option<String>,
    /// localStorage key holding the user's explicit profile choice.
    #[serde(default = "default_preference_key")]
    pub preference_key: String,
    #[serde(default)]
    pub navigation: NavSettings,
}

fn default_profile() -> String {
    "auto".to_string()
}

fn default_preference_key() -> String {
    "keyProfile".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            profile: default_profile(),
            device_signature: None,
            preference_key: default_preference_key(),
            navigation: NavSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.navigation.validate()?;
        Ok(config)
    }

    /// Unknown profile names fall back to auto-detection.
    pub fn profile_request(&self) -> ProfileRequest {
        ProfileRequest::parse(&self.profile)
    }

    /// Resolve the key profile. A configured `device_signature` takes
    /// precedence over the platform-reported one.
    pub fn resolve_profile(&self, stored_override: Option<&str>, platform_signature: &str) -> KeyProfile {
        let signature = self
            .device_signature
            .as_deref()
            .unwrap_or(platform_signature);
        resolve_profile(self.profile_request(), stored_override, signature)
    }
}

/// Tunables for the directional search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavSettings {
    /// A candidate is admissible when its off-axis offset is below
    /// `cone_ratio` times its on-axis offset (2.0 is roughly ±63°).
    #[serde(default = "default_cone_ratio")]
    pub cone_ratio: f64,
    /// Off-axis offset (px) under which a candidate counts as same row/column.
    #[serde(default = "default_alignment_tolerance")]
    pub alignment_tolerance: f64,
    /// Distance multiplier applied to aligned candidates.
    #[serde(default = "default_alignment_weight")]
    pub alignment_weight: f64,
}

fn default_cone_ratio() -> f64 {
    2.0
}

fn default_alignment_tolerance() -> f64 {
    10.0
}

fn default_alignment_weight() -> f64 {
    0.5
}

impl Default for NavSettings {
    fn default() -> Self {
        NavSettings {
            cone_ratio: default_cone_ratio(),
            alignment_tolerance: default_alignment_tolerance(),
            alignment_weight: default_alignment_weight(),
        }
    }
}

impl NavSettings {
    pub fn validate(&self) -> Result<(), NavError> {
        if !(self.cone_ratio.is_finite() && self.cone_ratio > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "cone_ratio must be positive, got {}",
                self.cone_ratio
            )));
        }
        if !(self.alignment_tolerance.is_finite() && self.alignment_tolerance >= 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "alignment_tolerance must be non-negative, got {}",
                self.alignment_tolerance
            )));
        }
        if !(self.alignment_weight.is_finite() && self.alignment_weight > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "alignment_weight must be positive, got {}",
                self.alignment_weight
            )));
        }
        Ok(())
    }
}
