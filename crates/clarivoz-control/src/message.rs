//! Control message types and lenient decoding.
//!
//! The dashboard emits loosely-typed JSON: an `op` tag plus whatever fields
//! the touched slider produced. Rather than scattering type checks through
//! the processing path, everything dynamic is resolved here at the
//! deserialization boundary: each operation becomes one enum constructor,
//! absent or mistyped fields collapse to `None`, and numeric excursions are
//! clamped by the unit setters when the message is applied.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use clarivoz_effects::SuppressorKind;

/// Errors from decoding a control message.
///
/// Note the asymmetry with field handling: a malformed *message* is an
/// error the control thread can log, while a malformed *field* inside a
/// well-formed message is silently dropped.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The payload was not valid JSON.
    #[error("control message is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload carries no `op` tag.
    #[error("control message has no 'op' tag")]
    MissingOp,
    /// The `op` tag names no known operation.
    #[error("unknown control operation '{0}'")]
    UnknownOp(String),
}

/// Which suppression strategy the control plane selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Hard hysteresis gate.
    #[default]
    Gate,
    /// Soft-knee downward expander.
    Expander,
}

impl From<Strategy> for SuppressorKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Gate => SuppressorKind::Gate,
            Strategy::Expander => SuppressorKind::Expander,
        }
    }
}

impl From<SuppressorKind> for Strategy {
    fn from(kind: SuppressorKind) -> Self {
        match kind {
            SuppressorKind::Gate => Strategy::Gate,
            SuppressorKind::Expander => Strategy::Expander,
        }
    }
}

/// A parameter update from the control plane.
///
/// Every field is optional: a message carries only what the user touched,
/// and applying one never resets fields it does not mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Update gate parameters.
    SetGate {
        /// Gate on/off.
        enabled: Option<bool>,
        /// Open threshold in dB.
        threshold_db: Option<f32>,
        /// Hysteresis band width in dB.
        hysteresis_db: Option<f32>,
        /// Maximum attenuation in dB.
        reduction_db: Option<f32>,
        /// Attack time in ms.
        attack_ms: Option<f32>,
        /// Release time in ms.
        release_ms: Option<f32>,
        /// Hold time in ms.
        hold_ms: Option<f32>,
    },
    /// Update expander parameters.
    SetExpander {
        /// Expander on/off.
        enabled: Option<bool>,
        /// Threshold in dB.
        threshold_db: Option<f32>,
        /// Knee width in dB.
        knee_db: Option<f32>,
        /// Expansion ratio.
        ratio: Option<f32>,
        /// Maximum attenuation in dB.
        reduction_db: Option<f32>,
        /// Attack time in ms.
        attack_ms: Option<f32>,
        /// Release time in ms.
        release_ms: Option<f32>,
    },
    /// Update the pitch shifter.
    SetPitch {
        /// Target pitch ratio, clamped to [0.5, 2.0] on application.
        target_ratio: Option<f32>,
    },
    /// Select the active suppression strategy.
    SelectStrategy {
        /// The strategy to activate; `None` (absent or mistyped) is a no-op.
        strategy: Option<Strategy>,
    },
}

impl ControlMessage {
    /// Decode a message from the UI's JSON, tolerating bad fields.
    ///
    /// The `op` tag must be present and known; everything else is
    /// best-effort. A field of the wrong type is treated exactly like an
    /// absent field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clarivoz_control::ControlMessage;
    ///
    /// // "threshold_db" is mistyped and silently dropped
    /// let msg = ControlMessage::from_json(
    ///     r#"{"op":"set_gate","enabled":true,"threshold_db":"loud"}"#,
    /// ).unwrap();
    /// assert_eq!(
    ///     msg,
    ///     ControlMessage::SetGate {
    ///         enabled: Some(true),
    ///         threshold_db: None,
    ///         hysteresis_db: None,
    ///         reduction_db: None,
    ///         attack_ms: None,
    ///         release_ms: None,
    ///         hold_ms: None,
    ///     }
    /// );
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ControlError> {
        let value: Value = serde_json::from_str(text)?;
        let op = value
            .get("op")
            .and_then(Value::as_str)
            .ok_or(ControlError::MissingOp)?;

        match op {
            "set_gate" => Ok(Self::SetGate {
                enabled: bool_field(&value, "enabled"),
                threshold_db: num_field(&value, "threshold_db"),
                hysteresis_db: num_field(&value, "hysteresis_db"),
                reduction_db: num_field(&value, "reduction_db"),
                attack_ms: num_field(&value, "attack_ms"),
                release_ms: num_field(&value, "release_ms"),
                hold_ms: num_field(&value, "hold_ms"),
            }),
            "set_expander" => Ok(Self::SetExpander {
                enabled: bool_field(&value, "enabled"),
                threshold_db: num_field(&value, "threshold_db"),
                knee_db: num_field(&value, "knee_db"),
                ratio: num_field(&value, "ratio"),
                reduction_db: num_field(&value, "reduction_db"),
                attack_ms: num_field(&value, "attack_ms"),
                release_ms: num_field(&value, "release_ms"),
            }),
            "set_pitch" => Ok(Self::SetPitch {
                target_ratio: num_field(&value, "target_ratio"),
            }),
            "select_strategy" => Ok(Self::SelectStrategy {
                strategy: value
                    .get("strategy")
                    .and_then(Value::as_str)
                    .and_then(|name| match name {
                        "gate" => Some(Strategy::Gate),
                        "expander" => Some(Strategy::Expander),
                        _ => None,
                    }),
            }),
            other => Err(ControlError::UnknownOp(other.to_string())),
        }
    }
}

/// Extract a finite numeric field, ignoring absent or mistyped values.
fn num_field(value: &Value, key: &str) -> Option<f32> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
}

/// Extract a boolean field, ignoring absent or mistyped values.
fn bool_field(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}
