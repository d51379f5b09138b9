//! Audio cue playback seam

/// Plays short audio cues
///
/// Playback is fire-and-forget: failures stay inside the player.
pub trait CuePlayer: Send + Sync {
    fn play(&self, uri: &str);
}
