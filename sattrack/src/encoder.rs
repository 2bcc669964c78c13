//! Rotary encoder decoding.
//!
//! The panel only forwards falling edges of the clock line. At that moment
//! the data line tells the direction: high is one detent forward, low is one
//! detent backward. There is no debounce timer; delivery is serialised by
//! the panel's event queue, and `&mut self` rules out overlapping calls.
//! Both lines changing at the same instant is a hardware fault whose outcome
//! is undefined.

/// One detent of movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum EncoderDelta {
    Backward = -1,
    Still = 0,
    Forward = 1,
}

impl EncoderDelta {
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn reversed(self) -> Self {
        match self {
            EncoderDelta::Backward => EncoderDelta::Forward,
            EncoderDelta::Still => EncoderDelta::Still,
            EncoderDelta::Forward => EncoderDelta::Backward,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct EncoderTracker {
    reversed: bool,
    position: i64,
}

impl EncoderTracker {
    pub fn new(reversed: bool) -> Self {
        Self {
            reversed,
            position: 0,
        }
    }

    /// Decodes one falling clock edge.
    pub fn on_clock_falling_edge(&mut self, data_high: bool) -> EncoderDelta {
        let delta = if data_high {
            EncoderDelta::Forward
        } else {
            EncoderDelta::Backward
        };
        let delta = if self.reversed {
            delta.reversed()
        } else {
            delta
        };
        self.position += i64::from(delta.as_i8());
        delta
    }

    /// Net detents seen since construction.
    pub fn position(&self) -> i64 {
        self.position
    }
}

/// Raw quadrature line sampler.
///
/// Feeds on `(clk, dt)` level pairs and reports the data level at every
/// high-to-low transition of the clock. Rising edges and data-only changes
/// produce nothing.
#[derive(Debug, Clone)]
pub struct QuadratureSampler {
    last_clk: bool,
}

impl QuadratureSampler {
    /// Encoders idle with both lines pulled high.
    pub fn new() -> Self {
        Self { last_clk: true }
    }

    pub fn with_initial_clock(clk: bool) -> Self {
        Self { last_clk: clk }
    }

    /// Returns `Some(data_high)` on a falling clock edge.
    pub fn sample(&mut self, clk: bool, dt: bool) -> Option<bool> {
        let falling = self.last_clk && !clk;
        self.last_clk = clk;
        falling.then_some(dt)
    }
}

impl Default for QuadratureSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Line levels a clean detent produces, starting and ending at idle.
pub fn detent_waveform(forward: bool) -> [(bool, bool); 4] {
    if forward {
        [(true, true), (false, true), (false, false), (true, true)]
    } else {
        [(true, false), (false, false), (false, true), (true, true)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(
        tracker: &mut EncoderTracker,
        sampler: &mut QuadratureSampler,
        forward: bool,
    ) -> Vec<EncoderDelta> {
        detent_waveform(forward)
            .iter()
            .filter_map(|(clk, dt)| sampler.sample(*clk, *dt))
            .map(|data_high| tracker.on_clock_falling_edge(data_high))
            .collect()
    }

    #[test]
    fn data_level_selects_direction() {
        let mut tracker = EncoderTracker::new(false);
        assert_eq!(tracker.on_clock_falling_edge(true), EncoderDelta::Forward);
        assert_eq!(tracker.on_clock_falling_edge(false), EncoderDelta::Backward);
        assert_eq!(tracker.position(), 0);
    }

    #[test]
    fn reversed_tracker_mirrors_deltas() {
        let mut tracker = EncoderTracker::new(true);
        assert_eq!(tracker.on_clock_falling_edge(true), EncoderDelta::Backward);
        assert_eq!(tracker.on_clock_falling_edge(false), EncoderDelta::Forward);
    }

    #[test]
    fn steady_rotation_has_no_reversals_or_skips() {
        for forward in [true, false] {
            let mut tracker = EncoderTracker::new(false);
            let mut sampler = QuadratureSampler::new();
            let mut deltas = Vec::new();
            for _ in 0..25 {
                deltas.extend(decode(&mut tracker, &mut sampler, forward));
            }
            let expected = if forward {
                EncoderDelta::Forward
            } else {
                EncoderDelta::Backward
            };
            assert_eq!(deltas.len(), 25);
            assert!(deltas.iter().all(|d| *d == expected));
            assert_eq!(tracker.position(), if forward { 25 } else { -25 });
        }
    }

    #[test]
    fn sampler_ignores_rising_and_data_edges() {
        let mut sampler = QuadratureSampler::new();
        assert_eq!(sampler.sample(true, false), None);
        assert_eq!(sampler.sample(true, true), None);
        assert_eq!(sampler.sample(false, true), Some(true));
        assert_eq!(sampler.sample(false, false), None);
        assert_eq!(sampler.sample(true, false), None);
        assert_eq!(sampler.sample(false, false), Some(false));
    }

    #[test]
    fn sampler_starting_low_waits_for_a_full_cycle() {
        let mut sampler = QuadratureSampler::with_initial_clock(false);
        assert_eq!(sampler.sample(false, true), None);
        assert_eq!(sampler.sample(true, true), None);
        assert_eq!(sampler.sample(false, true), Some(true));
    }
}
