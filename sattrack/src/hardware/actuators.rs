use crate::{
    actuator::{Actuator, FRAME_LEN},
    model::{SattrackError, SattrackResult},
};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

/// Logs each frame instead of driving a mount.
#[derive(Debug, Default)]
pub struct LogActuator {
    address: u8,
    sent: u64,
}

impl LogActuator {
    pub fn new(address: u8) -> Self {
        Self { address, sent: 0 }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Actuator for LogActuator {
    fn send(&mut self, frame: [u8; FRAME_LEN]) -> SattrackResult<()> {
        self.sent += 1;
        log::info!(
            "actuator 0x{:02x} <- [{:02x} {:02x} {:02x}] (az {} steps, servo {})",
            self.address,
            frame[0],
            frame[1],
            frame[2],
            u16::from_be_bytes([frame[0], frame[1]]),
            frame[2]
        );
        Ok(())
    }
}

/// Writes raw frames to a device node or file, e.g. a serial port wired to
/// the actuator controller.
#[derive(Debug)]
pub struct FileActuator {
    file: File,
}

impl FileActuator {
    pub fn open(path: &Path) -> SattrackResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SattrackError::ActuatorError(format!("{}: {e}", path.display())))?;
        Ok(Self { file })
    }
}

impl Actuator for FileActuator {
    fn send(&mut self, frame: [u8; FRAME_LEN]) -> SattrackResult<()> {
        self.file
            .write_all(&frame)
            .and_then(|_| self.file.flush())
            .map_err(|e| SattrackError::ActuatorError(e.to_string()))
    }

    fn release(&mut self) -> SattrackResult<()> {
        self.file
            .sync_all()
            .map_err(|e| SattrackError::ActuatorError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_actuator_appends_frames() {
        let path = std::env::temp_dir().join("sattrack_actuator_frames.bin");
        let _ = std::fs::remove_file(&path);
        let mut actuator = FileActuator::open(&path).unwrap();
        actuator.send([0x0E, 0x10, 135]).unwrap();
        actuator.send([0x00, 0x00, 0]).unwrap();
        actuator.release().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x0E, 0x10, 135, 0, 0, 0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn log_actuator_counts_frames() {
        let mut actuator = LogActuator::new(0x08);
        actuator.send([0, 1, 2]).unwrap();
        assert_eq!(actuator.sent(), 1);
    }
}
