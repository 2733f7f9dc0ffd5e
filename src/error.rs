//! Game-specific error types.
//!
//! Systems should propagate errors through these types rather than panicking
//! where practical. The one place an error is allowed to stop the app is
//! startup validation of the hoop asset: a rig with missing parts is a
//! build-time mistake, and silently refusing to place a hoop at runtime would
//! be far harder to diagnose.

use std::fmt;

/// Top-level error enum for the hoopshot game.
#[derive(Debug, PartialEq)]
pub enum GameError {
    /// A required named sub-part is absent from the hoop asset description.
    /// The asset is malformed; reported at startup, never mid-session.
    MissingHoopPart {
        /// Name of the missing part ("rim", "board").
        part: &'static str,
    },

    /// A gameplay constant is outside its safe operating range.
    /// Returned by the validation helpers run against the loaded config.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::MissingHoopPart { part } => {
                write!(f, "hoop asset is missing required part '{}'", part)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `launch_power` is outside its validated safe range.
///
/// Values above 100 launch balls far faster than CCD can reliably track
/// through the thin sensor planes.
pub fn validate_launch_power(value: f32) -> GameResult<()> {
    if value <= 0.0 || value > 100.0 {
        Err(GameError::UnsafeConstant {
            name: "launch_power",
            value,
            safe_range: "(0.0, 100.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `ball_radius` is non-positive or too large to fit
/// through the rim ring.
pub fn validate_ball_radius(value: f32) -> GameResult<()> {
    let max = crate::constants::RIM_RADIUS - crate::constants::RIM_TUBE_RADIUS;
    if value <= 0.0 || value >= max {
        Err(GameError::UnsafeConstant {
            name: "ball_radius",
            value,
            safe_range: "(0.0, rim inner radius)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_launch_power_is_safe() {
        assert!(validate_launch_power(crate::constants::LAUNCH_POWER).is_ok());
    }

    #[test]
    fn extreme_launch_power_is_rejected() {
        assert!(validate_launch_power(0.0).is_err());
        assert!(validate_launch_power(500.0).is_err());
    }

    #[test]
    fn ball_radius_must_fit_through_rim() {
        assert!(validate_ball_radius(crate::constants::BALL_RADIUS).is_ok());
        assert!(validate_ball_radius(crate::constants::RIM_RADIUS).is_err());
        assert!(validate_ball_radius(-0.1).is_err());
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = GameError::MissingHoopPart { part: "rim" };
        assert!(err.to_string().contains("rim"));
    }
}
