use std::time::{Duration, Instant};

/// Samples the wall clock once per frame and reports the delta in
/// milliseconds, the unit camera animations advance in.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    /// Upper bound on a single delta, so a stalled frame does not skip
    /// animations to their end.
    max_dt_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self {
            last: None,
            max_dt_ms,
        }
    }

    /// Milliseconds since the previous tick. The first tick returns 0.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        (dt.as_secs_f64() * 1000.0).min(self.max_dt_ms)
    }

    /// Forget the previous sample; the next tick returns 0.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(250.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn delta_in_milliseconds() {
        let mut clock = FrameClock::default();
        let start = Instant::now();
        clock.tick_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 16.0).abs() < 1e-9, "dt was {}", dt);
    }

    #[test]
    fn caps_long_frames() {
        let mut clock = FrameClock::new(100.0);
        let start = Instant::now();
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_secs(5)), 100.0);
    }

    #[test]
    fn clock_going_backwards_gives_zero() {
        let mut clock = FrameClock::default();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn reset_restarts() {
        let mut clock = FrameClock::default();
        let start = Instant::now();
        clock.tick_at(start);
        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_millis(40)), 0.0);
    }
}
