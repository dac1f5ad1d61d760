//! Background music.
//!
//! The game only ever talks to music through the [`Soundtrack`] trait.  The
//! one implementation, [`Jukebox`], keeps track of which track should be
//! playing and at what volume, and plays a synthesized loop of that track on
//! the default audio device when one could be opened.
mod fade;
mod output;
mod synth;
use self::fade::{AfterFade, Fader};
use self::output::{Speaker, Voice};
use crate::consts;
use crate::difficulty::Difficulty;
use crate::game::sim::Phase;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Track {
    Menu,
    Herbs,
    Antidote,
}

impl Track {
    pub(crate) fn for_difficulty(difficulty: Difficulty) -> Track {
        match difficulty {
            Difficulty::Normal => Track::Herbs,
            Difficulty::Advanced => Track::Antidote,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Track::Menu => "menu",
            Track::Herbs => "herbs",
            Track::Antidote => "antidote",
        };
        f.pad(s)
    }
}

/// Something that can play background music
pub(crate) trait Soundtrack {
    /// Start playing `track` from the beginning, replacing whatever was
    /// playing before
    fn play(&mut self, track: Track, fade_in: Option<Duration>);

    fn stop(&mut self, fade_out: Option<Duration>);

    fn pause(&mut self);

    fn resume(&mut self);

    /// The track that is playing and not on its way out, if any
    fn now_playing(&self) -> Option<Track>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Playback {
    Stopped,
    Playing(Track),
    Paused(Track),
}

/// Background music player.  Clones share the same output device and
/// playing track.
#[derive(Clone, Debug)]
pub(crate) struct Jukebox {
    enabled: bool,
    playback: Playback,
    fader: Fader,

    /// `None` when the music is silent bookkeeping only
    speaker: Option<Rc<Speaker>>,

    /// The sound of the current track; dropping the last clone stops it
    voice: Option<Rc<Voice>>,
}

impl Jukebox {
    /// Create a jukebox that tracks the music without making any sound
    pub(crate) fn new(enabled: bool) -> Jukebox {
        Jukebox {
            enabled,
            playback: Playback::Stopped,
            fader: Fader::new(0.0),
            speaker: None,
            voice: None,
        }
    }

    /// Create a jukebox that plays through the default audio device.  If
    /// the device can't be opened, the jukebox stays silent.  Disabled music
    /// never touches the device.
    pub(crate) fn open(enabled: bool) -> Jukebox {
        let mut jukebox = Jukebox::new(enabled);
        if enabled {
            match Speaker::open() {
                Ok(speaker) => jukebox.speaker = Some(Rc::new(speaker)),
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output available; music will be silent");
                }
            }
        }
        jukebox
    }

    pub(crate) fn playback(&self) -> Playback {
        self.playback
    }

    pub(crate) fn volume(&self) -> f32 {
        self.fader.volume()
    }

    /// Let `elapsed` time pass, advancing any fade in progress.  Fades are
    /// frozen while the music is paused.
    pub(crate) fn update(&mut self, elapsed: Duration) {
        let Playback::Playing(track) = self.playback else {
            return;
        };
        match self.fader.advance(elapsed) {
            Some(AfterFade::Stop) => {
                tracing::debug!(%track, "music stopped after fade");
                self.playback = Playback::Stopped;
                self.voice = None;
            }
            Some(AfterFade::Nothing) => {
                tracing::trace!(%track, volume = self.volume(), "fade finished");
            }
            None => (),
        }
        if let Some(voice) = &self.voice {
            voice.set_volume(self.fader.volume());
        }
    }

    /// Start sounding `track` at the current volume, replacing whatever was
    /// sounding before
    fn sound(&mut self, track: Track) {
        self.voice = None;
        let Some(speaker) = &self.speaker else {
            return;
        };
        match speaker.start(track, self.fader.volume()) {
            Ok(voice) => self.voice = Some(Rc::new(voice)),
            Err(e) => tracing::warn!(%track, error = %e, "failed to play music"),
        }
    }
}

impl Default for Jukebox {
    fn default() -> Jukebox {
        Jukebox::new(true)
    }
}

impl Soundtrack for Jukebox {
    fn play(&mut self, track: Track, fade_in: Option<Duration>) {
        if !self.enabled {
            return;
        }
        tracing::debug!(%track, ?fade_in, "playing music");
        self.playback = Playback::Playing(track);
        match fade_in {
            Some(d) => {
                self.fader.set(0.0);
                self.fader.fade_to(1.0, d, AfterFade::Nothing);
            }
            None => self.fader.set(1.0),
        }
        self.sound(track);
    }

    fn stop(&mut self, fade_out: Option<Duration>) {
        let (Playback::Playing(track) | Playback::Paused(track)) = self.playback else {
            return;
        };
        tracing::debug!(%track, ?fade_out, "stopping music");
        if let (Playback::Playing(_), Some(d)) = (self.playback, fade_out) {
            self.fader.fade_to(0.0, d, AfterFade::Stop);
        } else {
            self.fader.set(0.0);
            self.playback = Playback::Stopped;
            self.voice = None;
        }
    }

    fn pause(&mut self) {
        if let Playback::Playing(track) = self.playback {
            tracing::debug!(%track, "pausing music");
            self.playback = Playback::Paused(track);
            if let Some(voice) = &self.voice {
                voice.pause();
            }
        }
    }

    fn resume(&mut self) {
        if let Playback::Paused(track) = self.playback {
            tracing::debug!(%track, "resuming music");
            self.playback = Playback::Playing(track);
            if let Some(voice) = &self.voice {
                voice.resume();
            }
        }
    }

    fn now_playing(&self) -> Option<Track> {
        match self.playback {
            Playback::Playing(track) if self.fader.pending() != Some(AfterFade::Stop) => {
                Some(track)
            }
            _ => None,
        }
    }
}

/// Change the music to suit the game entering `phase`
pub(crate) fn phase_cue<S: Soundtrack + ?Sized>(music: &mut S, difficulty: Difficulty, phase: Phase) {
    match phase {
        Phase::Countdown(_) => {
            let track = Track::for_difficulty(difficulty);
            if music.now_playing() != Some(track) {
                music.play(track, Some(consts::MUSIC_FADE_IN));
            }
        }
        Phase::Running => music.resume(),
        Phase::Paused => music.pause(),
        Phase::GameOver(_) => music.stop(Some(consts::GAME_OVER_FADE_OUT)),
    }
}
