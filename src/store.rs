use futures::future::BoxFuture;
use uuid::Uuid;

use crate::errors::MoviesError;
use crate::movie::{Movie, MoviePatch};

pub mod memory;

pub use memory::InMemoryStore;

/// An ordered collection of movies. Each method is atomic with respect
/// to the others: a lookup and the write that depends on it never
/// interleave with another request.
pub trait MovieStore: Send + Sync {
    /// Lists movies in insertion order, keeping only those tagged with
    /// `genre` (ignoring case) if one is given.
    fn list(&self, genre: Option<String>) -> BoxFuture<Result<Vec<Movie>, MoviesError>>;

    /// Retrieves the movie with the given ID.
    fn get(&self, id: Uuid) -> BoxFuture<Result<Option<Movie>, MoviesError>>;

    /// Appends a movie. Fails if its ID is already taken.
    fn insert(&self, movie: Movie) -> BoxFuture<Result<Movie, MoviesError>>;

    /// Overlays `patch` onto the movie with the given ID without
    /// moving it. Returns the merged movie, or `None` if there’s no
    /// such movie.
    fn update(&self, id: Uuid, patch: MoviePatch) -> BoxFuture<Result<Option<Movie>, MoviesError>>;

    /// Removes the movie with the given ID. Returns whether it existed.
    fn delete(&self, id: Uuid) -> BoxFuture<Result<bool, MoviesError>>;
}
