pub mod audio;
pub mod clients;
pub mod desktop;
pub mod intent;
pub mod integration;
pub mod messages;
pub mod speech;
#[cfg(feature = "gui")]
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EiraError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Authorization error: {0}")]
    AuthError(String),

    #[error("Unexpected response: {0}")]
    ParseError(String),

    #[error("Not configured: {0}")]
    ConfigMissing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Desktop action error: {0}")]
    DesktopError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for EiraError {
    fn from(e: std::io::Error) -> Self {
        EiraError::IOError(e.to_string())
    }
}

impl From<reqwest::Error> for EiraError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            EiraError::ParseError(e.to_string())
        } else {
            EiraError::TransportError(e.to_string())
        }
    }
}

impl EiraError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            EiraError::AudioDeviceError(_) => false,
            // Credentials and settings need a restart with a fixed environment
            EiraError::AuthError(_) => false,
            EiraError::ConfigMissing(_) => false,
            EiraError::ConfigError(_) => false,
            EiraError::ChannelError(_) => false,
            // These are typically transient errors
            EiraError::RecognitionError(_) => true,
            EiraError::SynthesisError(_) => true,
            EiraError::PlaybackError(_) => true,
            EiraError::TransportError(_) => true,
            EiraError::ParseError(_) => true,
            EiraError::DesktopError(_) => true,
            EiraError::AudioProcessingError(_) => true,
            EiraError::IOError(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, EiraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: EiraError = io.into();
        assert!(matches!(err, EiraError::IOError(_)));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_recoverability() {
        assert!(EiraError::TransportError("timeout".into()).is_recoverable());
        assert!(!EiraError::ConfigMissing("chat".into()).is_recoverable());
        assert!(!EiraError::AudioDeviceError("no mic".into()).is_recoverable());
    }
}
