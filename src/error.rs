use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Custom duration text was malformed or not positive.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("timer scheduler is no longer running")]
    SchedulerStopped,
}

impl TimerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TimerError::InvalidInput(message.into())
    }
}

/// Reasons an alert sound could not be played.
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("No audio output: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("Playback error: {0}")]
    Play(#[from] rodio::PlayError),
}
