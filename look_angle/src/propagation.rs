//! Propagation module.
//!
//! Turns a parsed element set into topocentric look angles using SGP4 for
//! the orbit and satkit for the TEME to ITRF frame rotation.

use crate::{LookAngleError, LookAngleResult, TleRecord};
use chrono::{DateTime, Datelike, Timelike, Utc};
use satkit::{frametransform, types::Vec3, ITRFCoord, Instant};
use sgp4::{Elements, Prediction};

/// Observer location on Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// Altitude in meters above sea level
    pub altitude: f64,
}

/// Direction from an observer to a satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngle {
    /// Azimuth in degrees, clockwise from North, 0-360
    pub azimuth: f64,
    /// Elevation in degrees above the horizon, negative below it
    pub elevation: f64,
}

/// A satellite whose element set has been parsed and is ready to propagate.
pub struct Satellite {
    name: String,
    elements: Elements,
}

impl Satellite {
    /// Parses the element lines of `record`.
    ///
    /// # Errors
    /// Returns `LookAngleError::TLEError` if sgp4 rejects the lines.
    pub fn from_record(record: &TleRecord) -> LookAngleResult<Self> {
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| LookAngleError::TLEError(format!("Failed to parse TLE: {e}")))?;

        Ok(Self {
            name: record.name.clone(),
            elements,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calculates the azimuth and elevation of the satellite at a given time.
    ///
    /// # Errors
    /// Returns `LookAngleError::CalculationError` if propagation or the frame
    /// conversion fails.
    pub fn look(
        &self,
        location: ObserverLocation,
        timestamp: DateTime<Utc>,
    ) -> LookAngleResult<LookAngle> {
        let constants = sgp4::Constants::from_elements(&self.elements).map_err(|e| {
            LookAngleError::CalculationError(format!("Failed to create constants: {e}"))
        })?;

        let tle_epoch = self.elements.datetime.and_utc();
        let duration = timestamp.signed_duration_since(tle_epoch);
        let minutes_since_epoch = duration.num_milliseconds() as f64 / 60_000.0;

        let prediction = constants.propagate(minutes_since_epoch).map_err(|e| {
            LookAngleError::CalculationError(format!("Propagation failed: {e}"))
        })?;

        teme_to_look_angle(prediction, location, timestamp)
    }
}

/// Rotates a TEME position into the observer's East-North-Up frame and
/// reads azimuth and elevation from it.
fn teme_to_look_angle(
    prediction: Prediction,
    location: ObserverLocation,
    timestamp: DateTime<Utc>,
) -> LookAngleResult<LookAngle> {
    let sat_pos = prediction.position;

    let naive = timestamp.naive_utc();
    let instant = Instant::from_datetime(
        naive.year(),
        naive.month() as i32,
        naive.day() as i32,
        naive.hour() as i32,
        naive.minute() as i32,
        naive.second() as f64 + naive.nanosecond() as f64 / 1e9,
    );

    let observer =
        ITRFCoord::from_geodetic_deg(location.latitude, location.longitude, location.altitude);

    // sgp4 works in km, satkit in m
    let pos_teme_m = Vec3::new(
        sat_pos[0] * 1000.0,
        sat_pos[1] * 1000.0,
        sat_pos[2] * 1000.0,
    );

    // qteme2itrf panics without Earth Orientation Parameters
    use satkit::earth_orientation_params;
    if earth_orientation_params::get(&instant).is_none() {
        return Err(LookAngleError::CalculationError(
            "Earth Orientation Parameters (EOP) data not available. Please run satkit::utils::update_datafiles() first.".to_string(),
        ));
    }
    let q_teme2itrf = frametransform::qteme2itrf(&instant);
    let pos_itrf_m = q_teme2itrf.to_rotation_matrix() * pos_teme_m;

    let sat_itrf = ITRFCoord::from_slice(pos_itrf_m.as_slice()).map_err(|e| {
        LookAngleError::CalculationError(format!("Failed to create ITRFCoord: {e}"))
    })?;

    let rel_itrf = sat_itrf.itrf - observer.itrf;
    let enu = observer.q_enu2itrf().conjugate() * rel_itrf;
    let (east, north, up) = (enu[0], enu[1], enu[2]);

    let horizontal_range = (east * east + north * north).sqrt();
    let range = (horizontal_range * horizontal_range + up * up).sqrt();
    if range < 1e-6 {
        return Err(LookAngleError::CalculationError(
            "Satellite is at observer location".to_string(),
        ));
    }

    Ok(LookAngle {
        azimuth: normalize_azimuth(east.atan2(north).to_degrees()),
        elevation: up.atan2(horizontal_range).to_degrees(),
    })
}

/// Wraps an azimuth into `[0, 360)`.
pub(crate) fn normalize_azimuth(azimuth: f64) -> f64 {
    let wrapped = azimuth.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
