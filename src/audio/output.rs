use super::synth;
use super::Track;
use rodio::{
    buffer::SamplesBuffer, OutputStream, OutputStreamHandle, PlayError, Sink, Source, StreamError,
};
use std::fmt;

/// The default audio output device, held open for the life of the program
pub(super) struct Speaker {
    // Dropping the stream closes the device
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Speaker {
    pub(super) fn open() -> Result<Speaker, StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Speaker {
            _stream: stream,
            handle,
        })
    }

    /// Start looping `track` at `volume`
    pub(super) fn start(&self, track: Track, volume: f32) -> Result<Voice, PlayError> {
        let sink = Sink::try_new(&self.handle)?;
        sink.set_volume(volume);
        sink.append(
            SamplesBuffer::new(1, u32::from(synth::SAMPLE_RATE), synth::render(track))
                .repeat_infinite(),
        );
        Ok(Voice { track, sink })
    }
}

impl fmt::Debug for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Speaker").finish_non_exhaustive()
    }
}

/// A track being played on a [`Speaker`].  Dropping it silences the track.
pub(super) struct Voice {
    track: Track,
    sink: Sink,
}

impl Voice {
    pub(super) fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    pub(super) fn pause(&self) {
        self.sink.pause();
    }

    pub(super) fn resume(&self) {
        self.sink.play();
    }
}

impl fmt::Debug for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voice")
            .field("track", &self.track)
            .field("volume", &self.sink.volume())
            .field("paused", &self.sink.is_paused())
            .finish_non_exhaustive()
    }
}
