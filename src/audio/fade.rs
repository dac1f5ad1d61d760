use std::time::Duration;

/// Shortest fade the fader will perform; anything shorter is stretched to
/// this to keep the interpolation well-defined
const MIN_FADE: Duration = Duration::from_millis(1);

/// What to do to the music once a fade finishes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AfterFade {
    Nothing,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FadeJob {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    then: AfterFade,
}

/// A volume envelope that runs at most one fade at a time
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Fader {
    volume: f32,
    job: Option<FadeJob>,
}

impl Fader {
    pub(crate) fn new(volume: f32) -> Fader {
        Fader {
            volume: volume.clamp(0.0, 1.0),
            job: None,
        }
    }

    pub(crate) fn volume(&self) -> f32 {
        self.volume
    }

    /// The action that will be reported when the current fade completes, if
    /// a fade is in progress
    pub(crate) fn pending(&self) -> Option<AfterFade> {
        self.job.map(|job| job.then)
    }

    /// Jump straight to `volume`, cancelling any fade in progress
    pub(crate) fn set(&mut self, volume: f32) {
        self.job = None;
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Begin fading from the current volume to `target` over `duration`.
    /// Any fade already in progress is abandoned where it stands.
    pub(crate) fn fade_to(&mut self, target: f32, duration: Duration, then: AfterFade) {
        self.job = Some(FadeJob {
            from: self.volume,
            to: target.clamp(0.0, 1.0),
            duration: duration.max(MIN_FADE),
            elapsed: Duration::ZERO,
            then,
        });
    }

    /// Advance the current fade by `delta`.  When the fade completes, the job
    /// is cleared and its follow-up action is returned.
    pub(crate) fn advance(&mut self, delta: Duration) -> Option<AfterFade> {
        let job = self.job.as_mut()?;
        job.elapsed = job.elapsed.saturating_add(delta);
        let progress = (job.elapsed.as_secs_f32() / job.duration.as_secs_f32()).min(1.0);
        self.volume = (job.to - job.from)
            .mul_add(progress, job.from)
            .clamp(0.0, 1.0);
        let (to, then) = (job.elapsed >= job.duration).then_some((job.to, job.then))?;
        self.volume = to;
        self.job = None;
        Some(then)
    }
}
