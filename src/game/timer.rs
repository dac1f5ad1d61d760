use std::time::{Duration, Instant};

/// A periodic timer as seen by the simulation: either stopped or running at
/// some period.
///
/// The simulation never looks at the clock.  Instead, every start or stop
/// bumps `generation`, and whatever is driving the simulation re-arms its
/// [`Alarm`] whenever it sees a generation it hasn't seen before.  Starting
/// a timer that is already running therefore restarts its period from now.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Timer {
    period: Option<f64>,
    generation: u64,
}

impl Timer {
    /// (Re)start the timer so that it next fires `period` seconds from now
    pub(crate) fn start(&mut self, period: f64) {
        self.period = Some(period);
        self.generation += 1;
    }

    pub(crate) fn stop(&mut self) {
        self.period = None;
        self.generation += 1;
    }

    pub(crate) fn period(&self) -> Option<f64> {
        self.period
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Wall-clock counterpart to a [`Timer`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Alarm {
    /// Generation of the `Timer` this alarm was last armed from
    seen: Option<u64>,
    period: Option<Duration>,
    deadline: Option<Instant>,
}

impl Alarm {
    /// Re-arm the alarm if `timer` has been started or stopped since the last
    /// call
    pub(crate) fn sync(&mut self, timer: &Timer, now: Instant) {
        if self.seen == Some(timer.generation()) {
            return;
        }
        self.seen = Some(timer.generation());
        self.period = timer
            .period()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        self.deadline = self.period.map(|p| now + p);
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// If the alarm is due as of `now`, schedule the next firing and return
    /// `true`.  Periods that were missed entirely are dropped rather than
    /// fired in a burst.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        let (Some(deadline), Some(period)) = (self.deadline, self.period) else {
            return false;
        };
        if deadline > now {
            return false;
        }
        let mut next = deadline + period;
        if next <= now {
            next = now + period;
        }
        self.deadline = Some(next);
        true
    }
}
