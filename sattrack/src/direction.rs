//! Pointing directions and the targets they are computed for.

use crate::model::SattrackResult;
use chrono::{DateTime, Utc};
use std::fmt;

/// Whitelist entry that parks the mount instead of tracking.
pub const PARK_NAME: &str = "None";

/// Azimuth/elevation pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    /// Clockwise from North, `[0, 360)`.
    pub azimuth: f64,
    /// Above the horizon, `[-90, 90]`.
    pub elevation: f64,
}

impl Direction {
    /// Straight down at North; where the mount rests when nothing is tracked.
    pub const PARK: Direction = Direction {
        azimuth: 0.0,
        elevation: -90.0,
    };

    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingSelection {
    Park,
    Target(String),
}

impl TrackingSelection {
    /// Maps a whitelist entry to a selection.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name == PARK_NAME {
            TrackingSelection::Park
        } else {
            TrackingSelection::Target(name.to_string())
        }
    }
}

impl fmt::Display for TrackingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingSelection::Park => f.write_str(PARK_NAME),
            TrackingSelection::Target(name) => f.write_str(name),
        }
    }
}

/// Ground station the directions are computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
}

/// Computes where a target is.
pub trait DirectionProvider {
    /// # Errors
    /// `SattrackError::TargetNotFound` when `target` is unknown to the
    /// provider's data source; any other error when it cannot be computed.
    fn resolve(
        &mut self,
        target: &str,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> SattrackResult<Direction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_entry_parks() {
        assert_eq!(TrackingSelection::from_name("None"), TrackingSelection::Park);
        assert_eq!(TrackingSelection::from_name(" None "), TrackingSelection::Park);
        assert_eq!(
            TrackingSelection::from_name("NOAA 19"),
            TrackingSelection::Target("NOAA 19".to_string())
        );
    }

    #[test]
    fn selection_displays_its_name() {
        assert_eq!(TrackingSelection::Park.to_string(), "None");
        assert_eq!(TrackingSelection::Target("ISS".into()).to_string(), "ISS");
    }
}
