//! Scene-specific error types.
//!
//! Setup code propagates failures through [`SceneError`] instead of panicking,
//! so a bad config value or a broken asset degrades to defaults with a clear
//! log line rather than a crash.
//!
//! ## Usage
//!
//! ```rust
//! use baubles::error::{validate_positive, SceneResult};
//!
//! fn check(radius: f32) -> SceneResult<()> {
//!     validate_positive("cursor_radius", radius)?;
//!     Ok(())
//! }
//! # assert!(check(2.0).is_ok());
//! ```

use std::fmt;

/// Top-level error enum for the bauble scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A configuration value is outside its safe operating range.
    InvalidConstant {
        /// Name of the setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A colour string in the config is not a valid hex colour.
    InvalidColor {
        name: &'static str,
        value: String,
    },

    /// A boundary plane's orientation does not produce a usable normal.
    DegeneratePlane {
        /// Index of the plane in the boundary table.
        index: usize,
    },

    /// An asset failed to load.
    AssetLoad {
        path: String,
        reason: String,
    },

    /// The config file exists but could not be parsed.
    ConfigParse {
        path: String,
        reason: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "setting '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SceneError::InvalidColor { name, value } => {
                write!(f, "setting '{}' = {:?} is not a hex colour", name, value)
            }
            SceneError::DegeneratePlane { index } => {
                write!(f, "boundary plane {} has a degenerate normal", index)
            }
            SceneError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset '{}': {}", path, reason)
            }
            SceneError::ConfigParse { path, reason } => {
                write!(f, "failed to parse {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Convenience alias: a `Result` using `SceneError` as the error type.
pub type SceneResult<T> = Result<T, SceneError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SceneResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in `[0, 1)`.
///
/// Used for per-second damping losses: 1.0 would stop a body dead in one
/// second and has no finite Rapier damping rate.
pub fn validate_fraction(name: &'static str, value: f32) -> SceneResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(SceneError::InvalidConstant {
            name,
            value,
            safe_range: "[0.0, 1.0)",
        })
    }
}

/// Returns an error naming the first non-finite component of `values`.
pub fn validate_finite(name: &'static str, values: &[f32]) -> SceneResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(SceneError::InvalidConstant {
            name,
            value,
            safe_range: "finite",
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", -1.0).is_err());
        assert!(validate_positive("x", f32::NAN).is_err());
        assert!(validate_positive("x", f32::INFINITY).is_err());
        assert!(validate_positive("x", 0.1).is_ok());
    }

    #[test]
    fn fraction_is_half_open() {
        assert!(validate_fraction("d", 0.0).is_ok());
        assert!(validate_fraction("d", 0.95).is_ok());
        assert!(validate_fraction("d", 1.0).is_err());
        assert!(validate_fraction("d", -0.1).is_err());
    }

    #[test]
    fn finite_rejects_any_nan_or_infinite_component() {
        assert!(validate_finite("p", &[0.0, 4.0, -2.5]).is_ok());
        assert!(validate_finite("p", &[0.0, f32::NAN, 1.0]).is_err());
        assert!(validate_finite("p", &[f32::NEG_INFINITY]).is_err());
    }

    #[test]
    fn display_names_the_setting() {
        let err = validate_positive("cursor_radius", -2.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cursor_radius"), "got {msg}");
        assert!(msg.contains("-2"), "got {msg}");
    }
}
