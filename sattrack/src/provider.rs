//! Direction provider backed by a TLE catalog file.

use crate::{
    direction::{Direction, DirectionProvider, Observer},
    model::{SattrackError, SattrackResult},
};
use chrono::{DateTime, Utc};
use look_angle::{load_tle_by_name, ObserverLocation, Satellite};
use std::path::PathBuf;

/// Where the element set for a target comes from.
pub trait TleSource {
    fn load(&mut self, name: &str) -> SattrackResult<Satellite>;
}

/// Reads element sets from a catalog file on every load.
#[derive(Debug, Clone)]
pub struct TleFile {
    path: PathBuf,
}

impl TleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TleSource for TleFile {
    fn load(&mut self, name: &str) -> SattrackResult<Satellite> {
        let record = load_tle_by_name(&self.path, name)?;
        Ok(Satellite::from_record(&record)?)
    }
}

/// Propagates the selected satellite with SGP4.
///
/// The parsed satellite is kept while the same target keeps being
/// resolved; the catalog is only read again when the target changes or
/// the previous load failed.
pub struct TleDirectionProvider<S: TleSource = TleFile> {
    source: S,
    cached: Option<(String, Satellite)>,
}

impl TleDirectionProvider<TleFile> {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(TleFile::new(path))
    }
}

impl<S: TleSource> TleDirectionProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Target whose satellite is currently held, if any.
    pub fn cached_name(&self) -> Option<&str> {
        self.cached.as_ref().map(|(name, _)| name.as_str())
    }

    fn satellite_for(&mut self, target: &str) -> SattrackResult<&Satellite> {
        let key = target.trim();
        let hit = matches!(&self.cached, Some((name, _)) if name.eq_ignore_ascii_case(key));
        if !hit {
            self.cached = None;
            let satellite = self.source.load(key)?;
            log::info!("loaded element set {} for {}", satellite.name(), key);
            self.cached = Some((key.to_string(), satellite));
        }
        match &self.cached {
            Some((_, satellite)) => Ok(satellite),
            None => Err(SattrackError::TargetNotFound(key.to_string())),
        }
    }
}

impl<S: TleSource> DirectionProvider for TleDirectionProvider<S> {
    fn resolve(
        &mut self,
        target: &str,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> SattrackResult<Direction> {
        let satellite = self.satellite_for(target)?;
        let look = satellite.look(
            ObserverLocation {
                latitude: observer.latitude,
                longitude: observer.longitude,
                altitude: observer.altitude,
            },
            at,
        )?;
        Ok(Direction::new(look.azimuth, look.elevation))
    }
}
