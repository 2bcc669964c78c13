//! Mount command frames.
//!
//! The actuator controller reads three bytes per command: the azimuth step
//! count as a big-endian `u16`, then the elevation servo angle. Both
//! conversions truncate toward zero; the firmware relies on that.

use crate::{direction::Direction, model::SattrackResult};

pub const FRAME_LEN: usize = 3;

/// Why a direction could not be put on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeRejection {
    /// Step count outside `0..=65535`.
    AzimuthOverflow(f64),
    /// Servo byte outside `-128..=255`.
    ElevationOutOfRange(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub azimuth_steps: u16,
    pub elevation: u8,
}

impl ActuatorCommand {
    /// `steps = trunc(azimuth * degrees_to_steps)`,
    /// `elevation = trunc(elevation + servo_offset)`.
    ///
    /// Negative servo values down to -128 are sent as two's complement.
    pub fn encode(
        direction: Direction,
        degrees_to_steps: f64,
        servo_offset: i32,
    ) -> Result<Self, EncodeRejection> {
        let steps = (direction.azimuth * degrees_to_steps).trunc();
        if !(0.0..=f64::from(u16::MAX)).contains(&steps) {
            return Err(EncodeRejection::AzimuthOverflow(steps));
        }

        let servo = (direction.elevation + f64::from(servo_offset)).trunc() as i64;
        let elevation = match servo {
            0..=255 => servo as u8,
            -128..=-1 => (servo as i8) as u8,
            _ => return Err(EncodeRejection::ElevationOutOfRange(servo)),
        };

        Ok(Self {
            azimuth_steps: steps as u16,
            elevation,
        })
    }

    pub fn to_bytes(self) -> [u8; FRAME_LEN] {
        let [hi, lo] = self.azimuth_steps.to_be_bytes();
        [hi, lo, self.elevation]
    }
}

/// Where command frames go. Fire-and-forget: no acknowledgement is read.
pub trait Actuator {
    fn send(&mut self, frame: [u8; FRAME_LEN]) -> SattrackResult<()>;

    /// Gives the bus back at shutdown.
    fn release(&mut self) -> SattrackResult<()> {
        Ok(())
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn send(&mut self, frame: [u8; FRAME_LEN]) -> SattrackResult<()> {
        (**self).send(frame)
    }

    fn release(&mut self) -> SattrackResult<()> {
        (**self).release()
    }
}
