//! Sound cue collaborator
//!
//! The simulation never touches playback state. It emits named cues in
//! `FrameEvents` and the `World` forwards them to an injected `AudioSink`.

use serde::{Deserialize, Serialize};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player fired a volley
    PlayerShoot,
    /// An enemy or boss fired
    EnemyShoot,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::PlayerShoot => "PlayerShoot",
            SoundCue::EnemyShoot => "EnemyShoot",
        }
    }
}

/// Playback side of the audio boundary
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

impl<F: FnMut(SoundCue)> AudioSink for F {
    fn play(&mut self, cue: SoundCue) {
        self(cue)
    }
}

/// Sink that discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink that logs cues instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LoggingAudio {
    muted: bool,
    played: u64,
}

impl LoggingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of cues that reached the sink while unmuted
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::trace!("cue {}", cue.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_receives_cues() {
        let mut heard = Vec::new();
        {
            let mut sink = |cue: SoundCue| heard.push(cue);
            sink.play(SoundCue::PlayerShoot);
            sink.play(SoundCue::EnemyShoot);
        }
        assert_eq!(heard, vec![SoundCue::PlayerShoot, SoundCue::EnemyShoot]);
    }

    #[test]
    fn test_muted_logging_sink_counts_nothing() {
        let mut sink = LoggingAudio::new();
        sink.play(SoundCue::EnemyShoot);
        sink.set_muted(true);
        sink.play(SoundCue::EnemyShoot);
        assert_eq!(sink.played(), 1);
    }
}
