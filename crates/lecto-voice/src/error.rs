//! Speech engine error types.

/// Errors the speech service reports to its callers.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The host platform has no usable speech backend.
    #[error("Speech backend not supported on this platform")]
    BackendUnsupported,

    /// The service task has shut down and can no longer accept commands.
    #[error("Speech service is not running")]
    ServiceStopped,
}
