//! Echo sampler
//!
//! Runs the trigger-and-listen protocol of an HC-SR04 style ranging module
//! and returns the width of the echo pulse in counter ticks.
//!
//! # Protocol
//! - Trigger low for 2us, high for 10us, low again
//! - Wait for the echo line to rise, note the counter
//! - Wait for the echo line to fall, note the counter
//!
//! # Timeouts
//! Every wait is bounded by a tick budget measured from the moment the wait
//! began. An expired wait is not an error: the reading still carries the
//! ticks that passed, which is always more than the budget and therefore maps
//! to a distance far out of range. An unconnected or silent sensor thus
//! silences the alarm instead of hanging the measurement loop.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Highest value of the 16-bit free running counter
pub const COUNTER_MAX: u16 = 0xFFFF;

/// Time the trigger line is held low before the pulse (us)
const TRIGGER_SETTLE_US: u32 = 2;

/// Width of the trigger pulse (us)
const TRIGGER_PULSE_US: u32 = 10;

/// Free running 16-bit counter the echo is timed with
pub trait TickCounter {
    /// Current counter value, wrapping after [`COUNTER_MAX`]
    fn ticks(&mut self) -> u16;
}

/// Ticks between two counter readings, allowing for a single wraparound.
///
/// A wrapped interval counts `(COUNTER_MAX - start) + end`, one tick less
/// than `end.wrapping_sub(start)`. Distances are calibrated against this
/// count, keep it.
pub fn elapsed_ticks(start: u16, end: u16) -> u16 {
    if end >= start {
        end - start
    } else {
        (COUNTER_MAX - start) + end
    }
}

/// Result of one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoReading {
    /// Both edges seen, pulse width in ticks
    Pulse { ticks: u16 },
    /// An edge did not arrive within the budget; ticks up to giving up
    TimedOut { ticks: u16 },
}

impl EchoReading {
    /// Tick count to feed the distance estimate, whatever the outcome
    pub fn ticks(self) -> u16 {
        match self {
            Self::Pulse { ticks } | Self::TimedOut { ticks } => ticks,
        }
    }

    pub fn is_timeout(self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Pin faults while sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError<T, E> {
    /// Driving the trigger line failed
    Trigger(T),
    /// Reading the echo line failed
    Echo(E),
}

/// Outcome of waiting for a level on the echo line
enum Edge {
    Seen(u16),
    Expired(u16),
}

/// Ranging module driver with a single blocking measurement primitive
pub struct EchoSampler<TRIGPIN, ECHOPIN, DELAY, CLOCK> {
    trigger: TRIGPIN,
    echo: ECHOPIN,
    delay: DELAY,
    clock: CLOCK,
    budget: u16,
}

impl<TRIGPIN, ECHOPIN, DELAY, CLOCK> EchoSampler<TRIGPIN, ECHOPIN, DELAY, CLOCK>
where
    TRIGPIN: OutputPin,
    ECHOPIN: InputPin,
    DELAY: DelayNs,
    CLOCK: TickCounter,
{
    /// Creates a sampler giving up on an edge after `budget` ticks.
    pub fn new(trigger: TRIGPIN, echo: ECHOPIN, delay: DELAY, clock: CLOCK, budget: u16) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            budget,
        }
    }

    /// Triggers the module and times the echo pulse.
    ///
    /// Blocks for at most two tick budgets plus the trigger pulse.
    pub fn measure(
        &mut self,
    ) -> Result<EchoReading, SamplerError<TRIGPIN::Error, ECHOPIN::Error>> {
        self.trigger().map_err(SamplerError::Trigger)?;

        let armed = self.clock.ticks();
        let start = match self.wait_for(true, armed).map_err(SamplerError::Echo)? {
            Edge::Seen(at) => at,
            Edge::Expired(at) => {
                return Ok(EchoReading::TimedOut {
                    ticks: elapsed_ticks(armed, at),
                })
            }
        };

        let reading = match self.wait_for(false, start).map_err(SamplerError::Echo)? {
            Edge::Seen(end) => EchoReading::Pulse {
                ticks: elapsed_ticks(start, end),
            },
            Edge::Expired(end) => EchoReading::TimedOut {
                ticks: elapsed_ticks(start, end),
            },
        };
        Ok(reading)
    }

    /// Releases the pins, delay and counter
    pub fn release(self) -> (TRIGPIN, ECHOPIN, DELAY, CLOCK) {
        (self.trigger, self.echo, self.delay, self.clock)
    }

    fn trigger(&mut self) -> Result<(), TRIGPIN::Error> {
        self.trigger.set_low()?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high()?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low()
    }

    /// Polls the echo line until it reaches `high`, or the budget counted
    /// from `since` runs out.
    fn wait_for(&mut self, high: bool, since: u16) -> Result<Edge, ECHOPIN::Error> {
        loop {
            let now = self.clock.ticks();
            if self.echo.is_high()? == high {
                return Ok(Edge::Seen(now));
            }
            if elapsed_ticks(since, now) > self.budget {
                return Ok(Edge::Expired(now));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::to_distance_cm;
    use crate::tier::DistanceTier;
    use crate::AlarmConfig;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use rstest::rstest;
    use std::collections::VecDeque;

    struct OutputPinMock {
        levels: Vec<bool>,
        fail: bool,
    }

    impl OutputPinMock {
        fn new() -> Self {
            Self {
                levels: Vec::new(),
                fail: false,
            }
        }
    }

    impl ErrorType for OutputPinMock {
        type Error = ErrorKind;
    }

    impl OutputPin for OutputPinMock {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.levels.push(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.levels.push(true);
            Ok(())
        }
    }

    /// Echo line playing back a script of levels, the last one repeats
    struct InputPinMock {
        script: VecDeque<bool>,
        last: bool,
    }

    impl InputPinMock {
        fn new(lows: usize, highs: usize) -> Self {
            let script = core::iter::repeat(false)
                .take(lows)
                .chain(core::iter::repeat(true).take(highs))
                .collect();
            Self {
                script,
                last: false,
            }
        }

        fn stuck(level: bool, after_lows: usize) -> Self {
            Self {
                script: core::iter::repeat(false).take(after_lows).collect(),
                last: level,
            }
        }
    }

    impl ErrorType for InputPinMock {
        type Error = ErrorKind;
    }

    impl InputPin for InputPinMock {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.script.pop_front().unwrap_or(self.last))
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    struct BrokenInputPin;

    impl ErrorType for BrokenInputPin {
        type Error = ErrorKind;
    }

    impl InputPin for BrokenInputPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[derive(Default)]
    struct DelayMock {
        delays_ns: Vec<u32>,
    }

    impl DelayNs for DelayMock {
        fn delay_ns(&mut self, ns: u32) {
            self.delays_ns.push(ns);
        }
    }

    /// Counter advancing by a fixed step on every read
    struct ClockMock {
        now: u16,
        step: u16,
    }

    impl TickCounter for ClockMock {
        fn ticks(&mut self) -> u16 {
            let now = self.now;
            self.now = self.now.wrapping_add(self.step);
            now
        }
    }

    fn sampler(
        echo: InputPinMock,
        start: u16,
        step: u16,
    ) -> EchoSampler<OutputPinMock, InputPinMock, DelayMock, ClockMock> {
        EchoSampler::new(
            OutputPinMock::new(),
            echo,
            DelayMock::default(),
            ClockMock { now: start, step },
            AlarmConfig::DEFAULT.echo_tick_budget,
        )
    }

    #[rstest]
    #[case(65_000, 100, 635)]
    #[case(1_000, 1_635, 635)]
    #[case(0, 0, 0)]
    #[case(65_535, 0, 0)]
    #[case(65_535, 1, 1)]
    #[case(100, 99, 65_534)]
    fn elapsed_ticks_with_wraparound(#[case] start: u16, #[case] end: u16, #[case] expected: u16) {
        assert_eq!(elapsed_ticks(start, end), expected);
    }

    #[test]
    fn sends_trigger_pulse() {
        let mut sampler = sampler(InputPinMock::new(1, 2), 0, 1);
        sampler.measure().unwrap();

        let (trigger, _, delay, _) = sampler.release();
        assert_eq!(trigger.levels, vec![false, true, false]);
        assert_eq!(delay.delays_ns, vec![2_000, 10_000]);
    }

    #[test]
    fn measures_pulse_width() {
        // armed at 0, rises on the 4th read (tick 20), falls 10 reads later
        let mut sampler = sampler(InputPinMock::new(3, 10), 0, 5);
        assert_eq!(sampler.measure(), Ok(EchoReading::Pulse { ticks: 50 }));
    }

    #[test]
    fn measures_pulse_across_counter_wrap() {
        // rises at 65020, falls 127 reads later at tick 119 after the wrap
        let mut sampler = sampler(InputPinMock::new(3, 127), 65_000, 5);
        let reading = sampler.measure().unwrap();
        assert_eq!(
            reading,
            EchoReading::Pulse {
                ticks: elapsed_ticks(65_020, 119)
            }
        );
        assert!(!reading.is_timeout());
    }

    #[test]
    fn missing_rising_edge_times_out_out_of_range() {
        let mut sampler = sampler(InputPinMock::stuck(false, 0), 0, 1_000);
        let reading = sampler.measure().unwrap();

        assert_eq!(reading, EchoReading::TimedOut { ticks: 61_000 });
        assert_eq!(
            DistanceTier::classify(to_distance_cm(reading.ticks()), &AlarmConfig::DEFAULT),
            DistanceTier::OutOfRange
        );
    }

    #[test]
    fn missing_falling_edge_times_out_out_of_range() {
        // rises on the second poll at tick 2000 and never falls
        let mut sampler = sampler(InputPinMock::stuck(true, 1), 0, 1_000);
        let reading = sampler.measure().unwrap();

        assert_eq!(reading, EchoReading::TimedOut { ticks: 61_000 });
        assert!(reading.is_timeout());
        assert_eq!(
            DistanceTier::classify(to_distance_cm(reading.ticks()), &AlarmConfig::DEFAULT),
            DistanceTier::OutOfRange
        );
    }

    #[test]
    fn timeout_budget_holds_across_counter_wrap() {
        let mut sampler = sampler(InputPinMock::stuck(false, 0), 30_000, 1_000);
        let reading = sampler.measure().unwrap();
        assert!(reading.is_timeout());
        assert!(reading.ticks() > AlarmConfig::DEFAULT.echo_tick_budget);
    }

    #[test]
    fn trigger_fault_is_reported() {
        let mut trigger = OutputPinMock::new();
        trigger.fail = true;
        let mut sampler = EchoSampler::new(
            trigger,
            InputPinMock::new(1, 1),
            DelayMock::default(),
            ClockMock { now: 0, step: 1 },
            100,
        );
        assert_eq!(
            sampler.measure(),
            Err(SamplerError::Trigger(ErrorKind::Other))
        );
    }

    #[test]
    fn echo_fault_is_reported() {
        let mut sampler = EchoSampler::new(
            OutputPinMock::new(),
            BrokenInputPin,
            DelayMock::default(),
            ClockMock { now: 0, step: 1 },
            100,
        );
        assert_eq!(sampler.measure(), Err(SamplerError::Echo(ErrorKind::Other)));
    }
}
