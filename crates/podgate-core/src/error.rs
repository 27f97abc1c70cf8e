//! Error types for podgate-core.
//!
//! Expected steady states of access-control discovery (a probed document
//! that does not exist, or that the current agent may not read) are not
//! errors; they surface as [`Probe::Missing`](crate::Probe::Missing) and
//! [`Probe::Inaccessible`](crate::Probe::Inaccessible). Everything here is
//! a failure the caller has to see.

/// Result type alias for podgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or changing access.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The transport could not complete the exchange (connection refused,
    /// TLS failure, timeout, ...).
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered a required request with an unexpected status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A resource that had to exist was not found.
    #[error("Resource not found: {url}")]
    NotFound {
        /// Requested URL
        url: String,
    },

    /// WAC stores a single control mode, so control-read and control-write
    /// cannot be given different values.
    #[error(
        "Cannot set access on {resource}: WAC requires controlRead and controlWrite to be equal \
         (got controlRead={control_read}, controlWrite={control_write})"
    )]
    ControlModeMismatch {
        /// Resource the change was requested for
        resource: String,
        /// Requested control-read value
        control_read: bool,
        /// Requested control-write value
        control_write: bool,
    },

    /// The principal cannot be expressed in the resource's access scheme.
    #[error("Unsupported principal for {scheme}: {principal}")]
    UnsupportedPrincipal {
        /// Access scheme name
        scheme: &'static str,
        /// Principal description
        principal: String,
    },

    /// The operation has no meaning under the resource's access scheme.
    #[error("Cannot {operation}: not supported for {scheme} resources")]
    UnsupportedOperation {
        /// Access scheme name
        scheme: &'static str,
        /// What was attempted
        operation: String,
    },

    /// A string could not be used as a resource IRI.
    #[error("Invalid IRI '{iri}': {message}")]
    InvalidIri {
        /// Offending input
        iri: String,
        /// What went wrong
        message: String,
    },

    /// RDF payload could not be parsed or serialized.
    #[error("Parse error: {message}")]
    Parse {
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Returns whether retrying the same call may succeed.
    ///
    /// Only transport failures and server-side (5xx) statuses qualify. The
    /// library never retries on its own; this is for the caller's policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::Http { status, .. } => *status >= 500,
            Error::NotFound { .. } => false,
            Error::ControlModeMismatch { .. } => false,
            Error::UnsupportedPrincipal { .. } => false,
            Error::UnsupportedOperation { .. } => false,
            Error::InvalidIri { .. } => false,
            Error::Parse { .. } => false,
            Error::Config { .. } => false,
        }
    }

    /// Creates a new transport error with a message.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new transport error with a message and source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new HTTP status error.
    pub fn http(status: u16, url: impl Into<String>) -> Self {
        Error::Http {
            status,
            url: url.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new invalid-IRI error.
    pub fn invalid_iri(iri: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidIri {
            iri: iri.into(),
            message: message.into(),
        }
    }
}
