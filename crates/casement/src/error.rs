//! Error taxonomy shared by every component of the crate
//!
//! Errors fall into two groups. Argument errors are raised synchronously,
//! before any cached state is touched. Backend errors are raised after the
//! local cache already changed, so the cache and the native state may disagree
//! afterwards. Nothing in this crate retries; every failure goes straight back
//! to the caller.

use crate::backend::Backend;
use crate::core::subsystems::Capabilities;
use thiserror::Error;

/// Errors produced by subsystem, window, renderer and event operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The caller supplied a value outside of the accepted domain
    ///
    /// Raised before any mutation. The caller recovers by adjusting the input.
    #[error("argument `{name}` out of range: {reason}")]
    ArgumentRange {
        /// Name of the offending argument
        name: &'static str,
        /// Human readable description of the violated bound
        reason: String,
    },

    /// A requested capability failed to initialize
    ///
    /// Capabilities that were already active before the failing call are left untouched.
    #[error("failed to initialize {capabilities:?}: {message}")]
    BackendInit {
        /// The capability that failed to come up
        capabilities: Capabilities,
        /// The backend's diagnostic text
        message: String,
    },

    /// An operation that needs initialized subsystems ran before `init`
    #[error("subsystems are not initialized")]
    NotInitialized,

    /// A backend call failed after the local cache was updated
    #[error("backend call failed: {0}")]
    Backend(String),

    /// Window or renderer creation returned an invalid handle
    #[error("failed to create {kind}: {message}")]
    HandleCreation {
        /// What was being created ("window" or "renderer")
        kind: &'static str,
        /// The backend's diagnostic text
        message: String,
    },
}

/// Result type used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Build an [`Error::Backend`] from the backend's last error, clearing it
    pub(crate) fn from_backend(backend: &dyn Backend) -> Self {
        Self::Backend(take_last_error(backend))
    }

    /// Build an [`Error::HandleCreation`] from the backend's last error, clearing it
    pub(crate) fn handle_creation(kind: &'static str, backend: &dyn Backend) -> Self {
        Self::HandleCreation {
            kind,
            message: take_last_error(backend),
        }
    }
}

/// Read and clear the backend's last error text
pub(crate) fn take_last_error(backend: &dyn Backend) -> String {
    let message = backend.last_error();
    backend.clear_error();
    message
}

/// Turn a native success flag into a `Result`
pub(crate) fn ensure(backend: &dyn Backend, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::from_backend(backend))
    }
}

/// Reject negative values
pub(crate) fn ensure_non_negative<T>(name: &'static str, value: T) -> Result<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value < T::default() {
        return Err(Error::ArgumentRange {
            name,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

/// Reject values that are zero or negative
pub(crate) fn ensure_positive<T>(name: &'static str, value: T) -> Result<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(Error::ArgumentRange {
            name,
            reason: format!("{value} must be greater than zero"),
        });
    }
    Ok(())
}

/// Reject NaN, infinities and negative values
pub(crate) fn ensure_finite_non_negative(name: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::ArgumentRange {
            name,
            reason: format!("{value} is not a finite number"),
        });
    }
    ensure_non_negative(name, value)
}

/// Reject values outside of `[min, max]`
pub(crate) fn ensure_within(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(Error::ArgumentRange {
            name,
            reason: format!("{value} is outside of [{min}, {max}]"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert!(ensure_non_negative("width", 0).is_ok());
        assert!(ensure_non_negative("ratio", 0.0_f32).is_ok());
    }

    #[test]
    fn test_non_negative_rejects_negative() {
        let err = ensure_non_negative("width", -1).unwrap_err();
        assert!(matches!(err, Error::ArgumentRange { name: "width", .. }));
    }

    #[test]
    fn test_finite_non_negative() {
        assert!(ensure_finite_non_negative("radius", 0.0).is_ok());
        assert!(ensure_finite_non_negative("radius", -0.5).is_err());
        assert!(ensure_finite_non_negative("radius", f32::NAN).is_err());
        assert!(ensure_finite_non_negative("radius", f32::INFINITY).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(ensure_positive("height", 0).is_err());
        assert!(ensure_positive("height", 1).is_ok());
    }

    #[test]
    fn test_within_bounds() {
        assert!(ensure_within("opacity", 0.0, 0.0, 1.0).is_ok());
        assert!(ensure_within("opacity", 1.0, 0.0, 1.0).is_ok());
        assert!(ensure_within("opacity", -0.1, 0.0, 1.0).is_err());
        assert!(ensure_within("opacity", 1.1, 0.0, 1.0).is_err());
        assert!(ensure_within("opacity", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_display_contains_backend_message() {
        let err = Error::Backend("Invalid window".to_string());
        assert_eq!(err.to_string(), "backend call failed: Invalid window");
    }
}
