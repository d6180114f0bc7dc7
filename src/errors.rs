use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::validation::Issue;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum MoviesError {
    /// Represents a request body that failed validation.
    #[error("Invalid movie")]
    Invalid { issues: Vec<Issue> },

    /// Represents a request body that was not valid JSON.
    #[error("Malformed request body")]
    MalformedBody { source: serde_json::Error },

    /// Represents a lookup for an ID with no matching movie.
    #[error("Movie not found")]
    NotFound { id: String },

    /// Represents a cross-origin request from outside the allow-list.
    #[error("Origin {origin:?} is not allowed")]
    OriginNotAllowed { origin: String },

    /// Represents an insertion whose ID is already taken.
    #[error("Movie {id} already exists")]
    DuplicateId { id: Uuid },

    /// Represents a store whose lock was poisoned by a panicking writer.
    #[error("Movie store is unavailable")]
    StorePoisoned,
}

/// Enumerates errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Represents a variable that could not be parsed as a port number.
    #[error("could not parse {name}={value:?} as a port")]
    InvalidPort {
        name: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    /// Represents an allow-list variable with no usable origins.
    #[error("{name} does not list any origins")]
    EmptyAllowList { name: &'static str },

    /// Represents an allow-list entry no browser would send as an `Origin`.
    #[error("{name} entry {origin:?} is not an origin like https://example.com:8080")]
    InvalidOrigin { name: &'static str, origin: String },

    /// Represents a seed file that could not be read.
    #[error("could not read seed file {path:?}")]
    UnreadableSeed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents seed data that is not a JSON array of movies.
    #[error("could not parse seed data")]
    MalformedSeed { source: serde_json::Error },
}
