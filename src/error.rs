use std::path::PathBuf;
use thiserror::Error;

/// Errores internos del cliente de la API de YouTube.
///
/// Nunca cruzan las operaciones públicas de [`crate::sources::YouTubeAPIv3Client`]:
/// se registran y se convierten en un resultado vacío.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("YouTube API key or channel id not configured")]
    MissingCredentials,

    #[error("transport error calling {resource}: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("YouTube API error on {resource}: {status} - {body}")]
    Status {
        resource: String,
        status: u16,
        body: String,
    },

    #[error("malformed {resource} response: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API url for {resource}: {source}")]
    Url {
        resource: String,
        #[source]
        source: url::ParseError,
    },
}

/// Duration token that does not look like `PT[nH][nM][nS]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO-8601 duration: {0:?}")]
pub struct DurationError(pub String);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt cache entry {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),
}
