//! Persisted settings snapshots.
//!
//! The backend stores the last-applied settings per profile and replays
//! them when a session is restored. A snapshot is the complete state of
//! every unit parameter, unlike a [`ControlMessage`](crate::ControlMessage)
//! which carries only deltas.

use crate::message::Strategy;
use serde::{Deserialize, Serialize};

/// Gate parameters as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSettings {
    /// Gate on/off.
    pub enabled: bool,
    /// Open threshold in dB.
    pub threshold_db: f32,
    /// Hysteresis band width in dB.
    pub hysteresis_db: f32,
    /// Maximum attenuation in dB.
    pub reduction_db: f32,
    /// Attack time in ms.
    pub attack_ms: f32,
    /// Release time in ms.
    pub release_ms: f32,
    /// Hold time in ms.
    pub hold_ms: f32,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_db: -50.0,
            hysteresis_db: 6.0,
            reduction_db: 18.0,
            attack_ms: 5.0,
            release_ms: 120.0,
            hold_ms: 120.0,
        }
    }
}

/// Expander parameters as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpanderSettings {
    /// Expander on/off.
    pub enabled: bool,
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Knee width in dB.
    pub knee_db: f32,
    /// Expansion ratio.
    pub ratio: f32,
    /// Maximum attenuation in dB.
    pub reduction_db: f32,
    /// Attack time in ms.
    pub attack_ms: f32,
    /// Release time in ms.
    pub release_ms: f32,
}

impl Default for ExpanderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_db: -50.0,
            knee_db: 10.0,
            ratio: 2.0,
            reduction_db: 18.0,
            attack_ms: 5.0,
            release_ms: 120.0,
        }
    }
}

/// Pitch shifter parameters as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSettings {
    /// Target pitch ratio.
    pub target_ratio: f32,
}

impl Default for PitchSettings {
    fn default() -> Self {
        Self { target_ratio: 1.0 }
    }
}

/// Complete enhancement settings for one session.
///
/// # Example
///
/// ```rust
/// use clarivoz_control::EnhancerSettings;
///
/// let settings = EnhancerSettings::default();
/// let json = settings.to_json().unwrap();
/// let restored = EnhancerSettings::from_json(&json).unwrap();
/// assert_eq!(restored, settings);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EnhancerSettings {
    /// Active suppression strategy.
    #[serde(default)]
    pub strategy: Strategy,
    /// Gate parameters.
    #[serde(default)]
    pub gate: GateSettings,
    /// Expander parameters.
    #[serde(default)]
    pub expander: ExpanderSettings,
    /// Pitch shifter parameters.
    #[serde(default)]
    pub pitch: PitchSettings,
}

impl EnhancerSettings {
    /// Serialize for the persistence layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a stored snapshot. Missing sections fall back to
    /// defaults, so snapshots from older builds still load.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
