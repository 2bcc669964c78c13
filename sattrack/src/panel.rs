//! Operator input: encoder edges and the select button.
//!
//! Producers (a GPIO reader, the keyboard simulator) push events into a
//! queue; the tracking loop drains it only inside its blocking waits. That
//! keeps the menu single-threaded without a lock around the encoder path.

use crate::model::{SattrackError, SattrackResult};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// Falling edge of the encoder clock line with the data level at that instant.
    ClockFalling { data_high: bool },
    /// Falling edge of the push button.
    SelectPressed,
}

/// The interrupt source as seen by the core.
pub trait InputPanel {
    /// Starts or stops delivery of encoder edges. Button presses are always delivered.
    fn set_encoder_enabled(&mut self, enabled: bool);

    /// Blocks until the next deliverable event. `None` timeout waits forever;
    /// `Ok(None)` means the timeout elapsed.
    fn next_event(&mut self, timeout: Option<Duration>) -> SattrackResult<Option<PanelEvent>>;

    /// Gives back whatever the panel holds. Called once on shutdown.
    fn release(&mut self);
}

/// Producer end of a [`ChannelPanel`].
#[derive(Debug, Clone)]
pub struct PanelSender {
    tx: Sender<PanelEvent>,
}

impl PanelSender {
    /// Returns false once the panel is gone.
    pub fn send(&self, event: PanelEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Queue-backed [`InputPanel`].
#[derive(Debug)]
pub struct ChannelPanel {
    rx: Receiver<PanelEvent>,
    encoder_enabled: bool,
    released: bool,
}

impl ChannelPanel {
    pub fn new() -> (Self, PanelSender) {
        let (tx, rx) = unbounded();
        (
            Self {
                rx,
                encoder_enabled: false,
                released: false,
            },
            PanelSender { tx },
        )
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn deliverable(&self, event: &PanelEvent) -> bool {
        match event {
            PanelEvent::ClockFalling { .. } => self.encoder_enabled,
            PanelEvent::SelectPressed => true,
        }
    }
}

impl InputPanel for ChannelPanel {
    fn set_encoder_enabled(&mut self, enabled: bool) {
        if !enabled {
            // edges queued before the switch belong to the closed menu
            while let Ok(event) = self.rx.try_recv() {
                if event == PanelEvent::SelectPressed {
                    log::debug!("dropping select press queued while encoder was on");
                }
            }
        }
        self.encoder_enabled = enabled;
    }

    fn next_event(&mut self, timeout: Option<Duration>) -> SattrackResult<Option<PanelEvent>> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let event = match deadline {
                None => self.rx.recv().map_err(|_| SattrackError::InputClosed)?,
                Some(deadline) => match self.rx.recv_deadline(deadline) {
                    Ok(event) => event,
                    Err(RecvTimeoutError::Timeout) => return Ok(None),
                    Err(RecvTimeoutError::Disconnected) => return Err(SattrackError::InputClosed),
                },
            };
            if self.deliverable(&event) {
                return Ok(Some(event));
            }
        }
    }

    fn release(&mut self) {
        self.encoder_enabled = false;
        self.released = true;
        while self.rx.try_recv().is_ok() {}
    }
}
