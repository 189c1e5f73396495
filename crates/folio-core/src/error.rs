use thiserror::Error;

/// Failures raised at the platform seams.
///
/// None of these reach the user: services log them and degrade.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("malformed persisted state: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FolioError>;
