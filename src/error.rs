use std::panic::Location;
use std::time::Duration;

use mongodb::error::ErrorKind;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection error at {location}: {source}")]
    Connection {
        #[source]
        source: mongodb::error::Error,
        location: &'static Location<'static>,
    },

    #[error("Query error on {namespace} at {location}: {source}")]
    Query {
        namespace: String,
        #[source]
        source: QueryFailure,
        location: &'static Location<'static>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// A read on `namespace` that did not finish within `timeout`.
    #[track_caller]
    pub(crate) fn query_timeout(namespace: &str, timeout: Duration) -> Self {
        Self::Query {
            namespace: namespace.to_string(),
            source: QueryFailure::TimedOut(timeout),
            location: Location::caller(),
        }
    }

    /// Call-site location recorded when a driver error was wrapped.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self {
            Self::Connection { location, .. } | Self::Query { location, .. } => Some(*location),
            _ => None,
        }
    }
}

/// Cause of a failed find-all read
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("no complete result within {}ms", .0.as_millis())]
    TimedOut(Duration),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Wraps driver results into the crate error, recording where the wrap happened.
pub(crate) trait ResultExt<T> {
    /// A malformed URL is a configuration problem; anything else is a connection failure.
    fn or_connection(self) -> Result<T>;

    fn or_query(self, namespace: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, mongodb::error::Error> {
    #[track_caller]
    fn or_connection(self) -> Result<T> {
        let location = Location::caller();
        self.map_err(|source| {
            if let ErrorKind::InvalidArgument { message, .. } = source.kind.as_ref() {
                return Error::configuration(format!("invalid connection URL: {message}"));
            }
            Error::Connection { source, location }
        })
    }

    #[track_caller]
    fn or_query(self, namespace: &str) -> Result<T> {
        let location = Location::caller();
        self.map_err(|source| Error::Query {
            namespace: namespace.to_string(),
            source: source.into(),
            location,
        })
    }
}
