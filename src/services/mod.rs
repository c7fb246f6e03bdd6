pub mod analysis;
pub mod transcribe;

use thiserror::Error;

pub use analysis::{AnalysisProvider, HttpAnalysisProvider};
pub use transcribe::{HttpTranscriptionProvider, Transcript, TranscriptionProvider};

/// Errors from external provider calls. Providers are opaque remote
/// services; their failures are never surfaced verbatim to callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response missing field '{0}'")]
    MalformedResponse(&'static str),

    #[error("provider not configured: {0}")]
    NotConfigured(&'static str),
}
