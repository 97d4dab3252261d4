//! Core units, constants, and shared primitives for the transfer planner workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Earth's gravitational parameter (m³/s²).
    pub const MU_EARTH_M3_S2: f64 = 3.986_004_418e14;
    /// Moon's gravitational parameter (m³/s²).
    pub const MU_MOON_M3_S2: f64 = 4.904_869_5e12;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Split a duration into whole (days, hours, minutes).
    pub fn split_duration(seconds: f64) -> (i64, i64, i64) {
        let total = seconds.max(0.0);
        let days = (total / SECONDS_PER_DAY).floor();
        let remaining = total - days * SECONDS_PER_DAY;
        let hours = (remaining / SECONDS_PER_HOUR).floor();
        let minutes = ((remaining - hours * SECONDS_PER_HOUR) / 60.0).floor();
        (days as i64, hours as i64, minutes as i64)
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    use thiserror::Error;

    /// Alias for a 3D vector in metres or m/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Raised when raw input cannot be interpreted as a 3D vector.
    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum VectorError {
        #[error("expected 3 vector components, got {0}")]
        Dimension(usize),
    }

    /// Build a vector from a slice, rejecting anything that is not exactly three components.
    pub fn from_slice(values: &[f64]) -> Result<Vector3, VectorError> {
        match values {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(VectorError::Dimension(values.len())),
        }
    }

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

}
