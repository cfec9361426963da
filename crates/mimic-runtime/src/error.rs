/// Failure to obtain a frame from the capture device.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The device cannot be used at all.
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
    /// No frame this cycle. Transient.
    #[error("no frame available")]
    Dropped,
}

/// The classifier asserted no emotion for a frame. Expected steady-state
/// condition; it turns into an absent reading, never into an error upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PerceptionMiss {
    #[error("no face in frame")]
    NoFace,
    #[error("classifier declined: {0}")]
    Declined(String),
    #[error("malformed classifier result: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("capture device cannot be opened: {0}")]
    ResourceUnavailable(#[source] CaptureError),
    #[error("failed to spawn perception thread: {0}")]
    Thread(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no game mode selected")]
    InvalidSelection,
    #[error("no hold target selection is pending")]
    NoPendingSelection,
    #[error("session is shut down")]
    Closed,
}
