//! Look Angle
//!
//! A crate for pointing at satellites: finds a satellite's TLE by name in a
//! local catalog file and propagates it to an azimuth/elevation pair for a
//! ground observer.

use thiserror::Error;

pub mod propagation;
pub mod tle;

pub use propagation::{LookAngle, ObserverLocation, Satellite};
pub use tle::{find_tle_by_name, load_tle_by_name, TleRecord};

/// Result type alias for look angle operations.
pub type LookAngleResult<T> = Result<T, LookAngleError>;

/// Error types for look angle operations.
#[derive(Error, Debug, Clone)]
pub enum LookAngleError {
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("TLEError: {0}")]
    TLEError(String),
    #[error("CalculationError: {0}")]
    CalculationError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("IoError: {0}")]
    IoError(String),
}

impl LookAngleError {
    /// True when the requested satellite is absent from the catalog.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookAngleError::NotFound(_))
    }
}
