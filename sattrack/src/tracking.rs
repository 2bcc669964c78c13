//! The tracking cycle and the operator menus hanging off it.

use crate::{
    actuator::{Actuator, ActuatorCommand, EncodeRejection},
    clock::Clock,
    config::Config,
    direction::{Direction, DirectionProvider, Observer, TrackingSelection},
    display::Display,
    encoder::EncoderTracker,
    menu::MenuState,
    model::{SattrackError, SattrackResult},
    panel::{InputPanel, PanelEvent},
};
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const OPTIONS_ITEMS: [&str; 3] = ["Back", "Change Target", "Quit"];

const NOT_FOUND_MESSAGE: &str = "SAT NOT IN TLE";
const RESOLVE_FAILED_MESSAGE: &str = "TRACKING ERROR";
const EXIT_MESSAGE: &str = "Exiting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionsChoice {
    Back,
    ChangeTarget,
    Quit,
}

impl OptionsChoice {
    fn from_index(index: usize) -> Self {
        match index {
            0 => OptionsChoice::Back,
            1 => OptionsChoice::ChangeTarget,
            _ => OptionsChoice::Quit,
        }
    }
}

/// State that lives across cycles.
#[derive(Debug, Clone)]
pub struct TrackingContext {
    pub selection: TrackingSelection,
    pub direction: Direction,
    pub exit: bool,
    pub cycles: u64,
}

/// What one cycle did, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub direction: Direction,
    pub frame: Option<[u8; 3]>,
    pub degraded: bool,
    pub options_opened: bool,
}

pub struct TrackingLoop<D, P, R, A, C>
where
    D: Display,
    P: InputPanel,
    R: DirectionProvider,
    A: Actuator,
    C: Clock,
{
    config: Config,
    observer: Observer,
    whitelist: Vec<String>,
    display: D,
    panel: P,
    provider: R,
    actuator: A,
    clock: C,
    encoder: EncoderTracker,
    context: TrackingContext,
}

impl<D, P, R, A, C> TrackingLoop<D, P, R, A, C>
where
    D: Display,
    P: InputPanel,
    R: DirectionProvider,
    A: Actuator,
    C: Clock,
{
    /// Starts out tracking the first whitelist entry.
    pub fn new(
        config: Config,
        display: D,
        panel: P,
        provider: R,
        actuator: A,
        clock: C,
    ) -> SattrackResult<Self> {
        config
            .validate()
            .map_err(|e| SattrackError::ConfigError(e.to_string()))?;

        let whitelist = config.tle.whitelist.clone();
        let selection = whitelist
            .first()
            .map(|name| TrackingSelection::from_name(name))
            .ok_or_else(|| SattrackError::ConfigError("empty whitelist".to_owned()))?;
        let observer = Observer {
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            altitude: config.location.altitude,
        };
        let encoder = EncoderTracker::new(config.motion.encoder_reversed);

        Ok(Self {
            config,
            observer,
            whitelist,
            display,
            panel,
            provider,
            actuator,
            clock,
            encoder,
            context: TrackingContext {
                selection,
                direction: Direction::PARK,
                exit: false,
                cycles: 0,
            },
        })
    }

    pub fn context(&self) -> &TrackingContext {
        &self.context
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn provider(&self) -> &R {
        &self.provider
    }

    /// Runs cycles until the operator quits, then shuts down.
    ///
    /// Shutdown happens whether the cycles ended normally or with an error;
    /// the cycle error wins over a shutdown error.
    pub fn run(&mut self) -> SattrackResult<()> {
        log::info!("tracking {}", self.context.selection);
        let result = self.run_cycles();
        if let Err(e) = &result {
            log::error!("tracking loop failed: {e}");
        }
        let shutdown = self.shutdown();
        result.and(shutdown)
    }

    fn run_cycles(&mut self) -> SattrackResult<()> {
        while !self.context.exit {
            let report = self.cycle()?;
            log::debug!("cycle {}: {:?}", self.context.cycles, report);
        }
        Ok(())
    }

    /// One pass: resolve, send, show, then give the operator a chance to
    /// open the options menu.
    pub fn cycle(&mut self) -> SattrackResult<CycleReport> {
        self.context.cycles += 1;
        let now = self.clock.now();

        let (direction, degraded) = self.resolve_direction(now)?;
        self.context.direction = direction;

        let frame = self.send_command(direction)?;
        self.render_status()?;

        let options_opened = self.wait_for_select()?;
        if options_opened {
            self.options()?;
        }

        Ok(CycleReport {
            direction,
            frame,
            degraded,
            options_opened,
        })
    }

    fn resolve_direction(&mut self, now: DateTime<Utc>) -> SattrackResult<(Direction, bool)> {
        let target = match &self.context.selection {
            TrackingSelection::Park => return Ok((Direction::PARK, false)),
            TrackingSelection::Target(name) => name.clone(),
        };

        match self.provider.resolve(&target, &self.observer, now) {
            Ok(direction) => Ok((direction, false)),
            Err(e) => {
                log::warn!("cannot track {target}, parking: {e}");
                let message = match e {
                    SattrackError::TargetNotFound(_) => NOT_FOUND_MESSAGE,
                    _ => RESOLVE_FAILED_MESSAGE,
                };
                self.display.clear()?;
                self.display.write(message)?;
                self.display.flush()?;
                self.clock.sleep(self.config.timing.settle());
                self.context.selection = TrackingSelection::Park;
                Ok((Direction::PARK, true))
            }
        }
    }

    fn send_command(&mut self, direction: Direction) -> SattrackResult<Option<[u8; 3]>> {
        let encoded = ActuatorCommand::encode(
            direction,
            self.config.degrees_to_steps(),
            self.config.motion.servo_offset,
        );
        match encoded {
            Ok(command) => {
                let frame = command.to_bytes();
                self.actuator.send(frame)?;
                Ok(Some(frame))
            }
            Err(EncodeRejection::AzimuthOverflow(steps)) => {
                log::debug!("azimuth {steps} steps does not fit 16 bits, command skipped");
                Ok(None)
            }
            Err(EncodeRejection::ElevationOutOfRange(value)) => {
                log::debug!("servo value {value} does not fit a byte, command skipped");
                Ok(None)
            }
        }
    }

    fn render_status(&mut self) -> SattrackResult<()> {
        let direction = self.context.direction;
        self.display.clear()?;
        self.display.write("Tracking:")?;
        self.display.newline()?;
        self.display.write(&self.context.selection.to_string())?;
        self.display.newline()?;
        self.display.write(&format!(
            "AZ: {:.1} EL: {:.1}",
            direction.azimuth, direction.elevation
        ))?;
        self.display.newline()?;
        self.display.flush()
    }

    /// True if select was pressed before the timeout.
    fn wait_for_select(&mut self) -> SattrackResult<bool> {
        let timeout = self.config.timing.select_timeout();
        let started = self.clock.now();
        loop {
            let elapsed = (self.clock.now() - started)
                .to_std()
                .unwrap_or(Duration::ZERO);
            let remaining = timeout.saturating_sub(elapsed);
            if remaining.is_zero() {
                return Ok(false);
            }
            match self.panel.next_event(Some(remaining))? {
                Some(PanelEvent::SelectPressed) => return Ok(true),
                Some(PanelEvent::ClockFalling { .. }) => continue,
                None => return Ok(false),
            }
        }
    }

    fn options(&mut self) -> SattrackResult<()> {
        let index = self.choose(&OPTIONS_ITEMS[..])?;
        match OptionsChoice::from_index(index) {
            OptionsChoice::Back => {}
            OptionsChoice::ChangeTarget => self.select_target()?,
            OptionsChoice::Quit => {
                log::info!("quit requested from the options menu");
                self.context.exit = true;
            }
        }
        Ok(())
    }

    fn select_target(&mut self) -> SattrackResult<()> {
        let whitelist = self.whitelist.clone();
        let index = self.choose(whitelist.as_slice())?;
        if let Some(name) = whitelist.get(index) {
            let selection = TrackingSelection::from_name(name);
            if selection != self.context.selection {
                log::info!("now tracking {selection}");
            }
            self.context.selection = selection;
        }
        Ok(())
    }

    /// Opens a menu over `items` and returns the index confirmed with select.
    fn choose<S: AsRef<str>>(&mut self, items: &[S]) -> SattrackResult<usize> {
        let mut menu = MenuState::new(items.iter().map(|item| item.as_ref().to_string()))?;
        menu.enable(&mut self.display, &mut self.panel)?;

        let chosen = loop {
            match self.panel.next_event(None)? {
                Some(PanelEvent::ClockFalling { data_high }) => {
                    let delta = self.encoder.on_clock_falling_edge(data_high);
                    menu.apply_delta(delta, &mut self.display)?;
                }
                Some(PanelEvent::SelectPressed) => break menu.selected(),
                None => {}
            }
        };

        menu.disable(&mut self.display, &mut self.panel)?;
        Ok(chosen)
    }

    /// Leaves the display blank and every collaborator released. An error
    /// on the exit screen does not stop the releases; the first error wins.
    pub fn shutdown(&mut self) -> SattrackResult<()> {
        let shown = self.exit_screen();
        self.panel.release();
        let display = self.display.release();
        let actuator = self.actuator.release();
        shown.and(display).and(actuator)
    }

    fn exit_screen(&mut self) -> SattrackResult<()> {
        self.display.clear()?;
        self.display.write(EXIT_MESSAGE)?;
        self.display.flush()?;
        self.clock.sleep(self.config.timing.exit_pause());
        self.display.clear()?;
        self.display.flush()
    }
}
