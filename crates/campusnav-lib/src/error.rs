use thiserror::Error;

/// Convenient result alias for the routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The inbound request was malformed. Raised before any provider call.
    #[error("{message}")]
    Validation { message: String },

    /// The routing provider failed or returned something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Process configuration was missing or unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// True when the caller sent a bad request (HTTP 400 territory).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Short, low-cardinality label suitable for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::Provider(err) => err.reason(),
            Error::Config { .. } => "config_error",
        }
    }
}

/// Upstream failures surfaced to clients as server errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Neither `routes[0]` nor `features[0]` was present.
    #[error("no route found")]
    NoRoute,

    /// The route geometry was neither an encoded polyline nor a LineString.
    #[error("unknown geometry format")]
    UnknownGeometry,

    /// The encoded polyline was truncated or contained invalid characters.
    #[error("invalid encoded polyline at byte {offset}")]
    InvalidPolyline { offset: usize },

    /// A decoded coordinate was not a finite `[lng, lat]` pair within WGS84 bounds.
    #[error("invalid coordinate at index {index} in route geometry")]
    InvalidCoordinate { index: usize },

    /// The decoded geometry held no points, so no bounding box exists.
    #[error("route geometry is empty")]
    EmptyGeometry,

    /// The provider could not be reached.
    #[error("routing provider is unavailable")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response body was not valid JSON.
    #[error("routing provider returned an unreadable response")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn reason(&self) -> &'static str {
        match self {
            ProviderError::Status { .. } => "provider_status",
            ProviderError::NoRoute => "no_route",
            ProviderError::UnknownGeometry
            | ProviderError::InvalidPolyline { .. }
            | ProviderError::InvalidCoordinate { .. }
            | ProviderError::EmptyGeometry => "bad_geometry",
            ProviderError::Transport(_) => "transport",
            ProviderError::Decode(_) => "decode",
        }
    }
}
