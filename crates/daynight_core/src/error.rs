//! Error types for the day/night cycle.
//!
//! Every failure here is local and non-fatal: setters reject bad input and
//! leave state untouched, setup falls back to a static sky when the sky
//! inputs are incomplete.

/// Errors reported by the day/night cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DayNightError {
    /// `set_time` called with a value outside `[0, 24]`.
    InvalidTime(f32),
    /// `set_day` called with a negative day.
    InvalidDay(i64),
    /// Day window outside its allowed bounds or inverted.
    InvalidDayWindow { start: f32, end: f32 },
    /// A configuration value failed validation.
    InvalidConfig(String),
    /// No sky material parameter sink was provided.
    MissingSkyMaterial,
    /// One or more sky color curves were not provided.
    MissingCurves(Vec<&'static str>),
}

impl std::fmt::Display for DayNightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayNightError::InvalidTime(t) => {
                write!(f, "New time must be between 0 and 24, got {}", t)
            }
            DayNightError::InvalidDay(d) => write!(f, "New day must not be negative, got {}", d),
            DayNightError::InvalidDayWindow { start, end } => write!(
                f,
                "Invalid day window: start {} must be in [5, 7], end {} in [16, 22]",
                start, end
            ),
            DayNightError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            DayNightError::MissingSkyMaterial => write!(f, "Need a sky material to drive"),
            DayNightError::MissingCurves(names) => {
                write!(f, "Need all sky curves, missing: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for DayNightError {}

/// Result type for day/night operations.
pub type DayNightResult<T> = Result<T, DayNightError>;
