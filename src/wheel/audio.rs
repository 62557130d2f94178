/// Reasons the acceleration sound could not be played
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Autoplay blocked")]
    Blocked,

    #[error("Audio unavailable: {0}")]
    Unavailable(String),
}

/// Sound played as the wheel picks up speed
pub trait AudioCue: Send + Sync {
    fn play_acceleration(&self) -> Result<(), AudioError>;
}

/// Cue for deployments where the client owns playback; it only records the event
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggedCue;

impl AudioCue for LoggedCue {
    fn play_acceleration(&self) -> Result<(), AudioError> {
        tracing::debug!(cue = "acceleration", "Wheel audio cue");
        Ok(())
    }
}

/// Plays the cue, swallowing failures
pub fn play_best_effort(cue: &dyn AudioCue) {
    if let Err(e) = cue.play_acceleration() {
        tracing::debug!(error = %e, "Acceleration cue failed");
    }
}
