use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::LayerKind;

/// Errors returned by the layer decoders.
///
/// Every variant is local to one layer: the pipeline reports it and keeps
/// the layers decoded before it.
///
/// # Examples
/// ```
/// use pktscope_core::{DecodeError, LayerKind, StopReason};
///
/// let err = DecodeError::TooShort {
///     layer: LayerKind::Ethernet,
///     needed: 14,
///     actual: 13,
/// };
/// assert_eq!(err.reason(), StopReason::TooShort);
/// assert!(err.to_string().contains("need 14 bytes, got 13"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{layer} header too short: need {needed} bytes, got {actual}")]
    TooShort {
        layer: LayerKind,
        needed: usize,
        actual: usize,
    },
    #[error("malformed {layer} header: {reason}")]
    Malformed {
        layer: LayerKind,
        reason: MalformedReason,
    },
}

impl DecodeError {
    /// Layer whose decoder rejected the bytes.
    pub fn layer(&self) -> LayerKind {
        match self {
            DecodeError::TooShort { layer, .. } | DecodeError::Malformed { layer, .. } => *layer,
        }
    }

    pub fn reason(&self) -> StopReason {
        match self {
            DecodeError::TooShort { .. } => StopReason::TooShort,
            DecodeError::Malformed { .. } => StopReason::MalformedHeader,
        }
    }
}

/// Structural invariant a header failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("invalid version {version}")]
    InvalidVersion { version: u8 },
    #[error("invalid header length field {ihl} (minimum 5 words)")]
    InvalidHeaderLength { ihl: u8 },
}

/// Why the pipeline stopped before the last layer it could have reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Buffer smaller than a layer's minimum or declared header size.
    TooShort,
    /// Header failed a structural invariant.
    MalformedHeader,
    /// Recognized but undecoded protocol. Expected, not a failure.
    UnsupportedLayer,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::TooShort => "too_short",
            StopReason::MalformedHeader => "malformed_header",
            StopReason::UnsupportedLayer => "unsupported_layer",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
