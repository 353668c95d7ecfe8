//! Tick pacing.
//!
//! The controller never sleeps. A [`Runner`] calls it once per tick and asks
//! a [`Clock`] to wait out the interval in between, so tests can swap in a
//! [`ManualClock`] and run thousands of ticks without real delays.

use crate::epoch::EpochController;
use flowfield_core::{NoiseSampler, RenderSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The suspension point between ticks.
pub trait Clock {
    /// Blocks until `interval` has passed since the previous call returned.
    fn wait(&mut self, interval: Duration);
}

/// Wall-clock pacing at a fixed rate.
///
/// Deadlines are scheduled from the previous deadline rather than from "now",
/// so slow ticks do not accumulate drift. If a tick overruns a whole interval
/// the schedule restarts from the current instant instead of bursting.
#[derive(Debug, Default)]
pub struct SystemClock {
    deadline: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn wait(&mut self, interval: Duration) {
        let now = Instant::now();
        let target = match self.deadline {
            Some(prev) if prev + interval > now => prev + interval,
            _ => now + interval,
        };
        if let Some(remaining) = target.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }
        self.deadline = Some(target);
    }
}

/// Virtual time: `wait` returns immediately and only accumulates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    elapsed: Duration,
    waits: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time waited.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }
}

impl Clock for ManualClock {
    fn wait(&mut self, interval: Duration) {
        self.elapsed += interval;
        self.waits += 1;
    }
}

/// Drives a controller at a fixed tick interval.
#[derive(Debug)]
pub struct Runner<C> {
    clock: C,
    interval: Duration,
}

impl<C: Clock> Runner<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs exactly `ticks` ticks, waiting between consecutive ones.
    pub fn run_ticks<F, S>(&mut self, controller: &mut EpochController<F>, sink: &mut S, ticks: u64)
    where
        F: NoiseSampler,
        S: RenderSink + ?Sized,
    {
        for i in 0..ticks {
            if i > 0 {
                self.clock.wait(self.interval);
            }
            controller.tick(sink);
        }
    }

    /// Ticks until `stop` is raised, checking it before every tick.
    /// Returns the number of ticks run.
    pub fn run_until<F, S>(
        &mut self,
        controller: &mut EpochController<F>,
        sink: &mut S,
        stop: &AtomicBool,
    ) -> u64
    where
        F: NoiseSampler,
        S: RenderSink + ?Sized,
    {
        let mut ticks = 0;
        while !stop.load(Ordering::Acquire) {
            if ticks > 0 {
                self.clock.wait(self.interval);
                if stop.load(Ordering::Acquire) {
                    break;
                }
            }
            controller.tick(sink);
            ticks += 1;
        }
        log::debug!("runner stopped after {ticks} ticks");
        ticks
    }
}
