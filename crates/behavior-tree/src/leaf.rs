//! Reusable leaf behaviors that only need a [`Clock`] context.

use crate::{Behavior, Clock, Status};

/// Tolerance applied when comparing accumulated time against a duration.
pub const TIME_EPSILON: f64 = 1e-9;

/// Waits for a fixed duration of simulated time.
///
/// The tick that starts the wait records its start; elapsed time accumulates
/// from the following tick onward. A one second wait ticked every 0.5s is
/// therefore `Running` on the first two ticks and succeeds on the third.
///
/// Progress clears on completion and on [`Behavior::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Wait {
    duration: f64,
    elapsed: Option<f64>,
}

impl Wait {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time accumulated since the wait started, `None` when not started.
    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed
    }
}

impl<C: Clock> Behavior<C> for Wait {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let elapsed = match self.elapsed {
            None => 0.0,
            Some(elapsed) => elapsed + ctx.delta().max(0.0),
        };

        if elapsed + TIME_EPSILON >= self.duration {
            self.elapsed = None;
            Status::Success
        } else {
            self.elapsed = Some(elapsed);
            Status::Running
        }
    }

    fn reset(&mut self) {
        self.elapsed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Step(f64);

    impl Clock for Step {
        fn delta(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut wait = Wait::new(0.0);
        assert_eq!(wait.tick(&mut Step(0.5)), Status::Success);
    }

    #[test]
    fn counts_from_the_tick_after_start() {
        let mut wait = Wait::new(1.0);
        let mut step = Step(0.5);

        assert_eq!(wait.tick(&mut step), Status::Running);
        assert_eq!(wait.elapsed(), Some(0.0));
        assert_eq!(wait.tick(&mut step), Status::Running);
        assert_eq!(wait.tick(&mut step), Status::Success);
        assert_eq!(wait.elapsed(), None);
    }

    #[test]
    fn reset_restarts_the_wait() {
        let mut wait = Wait::new(1.0);
        let mut step = Step(0.75);

        assert_eq!(wait.tick(&mut step), Status::Running);
        assert_eq!(wait.tick(&mut step), Status::Running);
        Behavior::<Step>::reset(&mut wait);
        assert_eq!(wait.tick(&mut step), Status::Running);
        assert_eq!(wait.elapsed(), Some(0.0));
    }
}
