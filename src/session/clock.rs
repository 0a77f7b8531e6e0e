use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Source of tick times for the render loop.
pub trait FrameClock {
    /// Mark `t = 0`. Called once, right after the encode session starts.
    fn start(&mut self);
    /// Block until the next tick is due and return its elapsed seconds since `start`.
    fn next_tick(&mut self) -> f64;
}

/// Wall-clock pacing at the capture rate.
///
/// Ticks land on `n / fps` deadlines. A tick that arrives late skips the deadlines it missed
/// instead of bursting to catch up.
#[derive(Debug)]
pub struct RealtimeClock {
    fps: Fps,
    started: Option<Instant>,
    next: u64,
}

impl RealtimeClock {
    /// Clock ticking at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            started: None,
            next: 0,
        }
    }
}

impl FrameClock for RealtimeClock {
    fn start(&mut self) {
        self.started = Some(Instant::now());
        self.next = 0;
    }

    fn next_tick(&mut self) -> f64 {
        let started = *self.started.get_or_insert_with(Instant::now);
        let deadline = started + Duration::from_secs_f64(self.fps.frames_to_secs(self.next));
        let now = Instant::now();
        if now < deadline {
            std::thread::sleep(deadline - now);
        }
        let elapsed = started.elapsed().as_secs_f64();
        self.next = self.fps.secs_to_frames_floor(elapsed) + 1;
        elapsed
    }
}

/// Deterministic ticks at exactly `n / fps`, without sleeping.
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    fps: Fps,
    next: u64,
}

impl FixedStepClock {
    /// Clock stepping at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self { fps, next: 0 }
    }
}

impl FrameClock for FixedStepClock {
    fn start(&mut self) {
        self.next = 0;
    }

    fn next_tick(&mut self) -> f64 {
        let t = self.fps.frames_to_secs(self.next);
        self.next += 1;
        t
    }
}

/// Which clock a render is driven by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Paced by the wall clock, as a live capture would be.
    #[default]
    Realtime,
    /// As fast as frames can be composed, at exact frame times.
    FixedStep,
}

impl ClockMode {
    /// Build the clock for this mode.
    pub fn build(self, fps: Fps) -> Box<dyn FrameClock> {
        match self {
            Self::Realtime => Box::new(RealtimeClock::new(fps)),
            Self::FixedStep => Box::new(FixedStepClock::new(fps)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
