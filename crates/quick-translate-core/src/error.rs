use thiserror::Error;

/// Unified error type for quick-translate-core
///
/// Every failure the library can report falls into one of the kinds exposed
/// by [`Error::kind`], so callers can route "not configured" separately from
/// everything else without matching on message text.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// Caller-supplied input was rejected before any work was done
    #[error("invalid input: {0}")]
    Validation(String),

    // ==========================================================================
    // Credential Errors
    // ==========================================================================
    /// No API credential has been stored yet
    #[error("API credential not configured")]
    MissingCredential,

    // ==========================================================================
    // Remote API Errors
    // ==========================================================================
    /// The model answered, but with nothing usable
    #[error("translation API returned an empty response")]
    EmptyResponse,

    /// Network, HTTP or decoding failure while talking to the API
    #[error("translation API request failed: {0}")]
    Transport(String),

    // ==========================================================================
    // Storage Errors
    // ==========================================================================
    /// Writing to persistent storage failed
    #[error("failed to write to storage: {0}")]
    Persistence(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    EmptyResponse,
    Persistence,
    Transport,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::MissingCredential | Self::ConfigLoad(_) => ErrorKind::Configuration,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Whether the caller should send the user to credential setup
    pub const fn is_not_configured(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
