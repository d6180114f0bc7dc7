use std::sync::RwLock;

use futures::future::{self, BoxFuture, FutureExt};
use uuid::Uuid;

use crate::errors::MoviesError;
use crate::movie::{Movie, MoviePatch};
use crate::store::MovieStore;

/// A store that keeps its movies in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a store holding `movies` in the given order.
    pub fn with_movies(movies: Vec<Movie>) -> Result<Self, MoviesError> {
        let store = InMemoryStore::new();

        for movie in movies {
            store.insert_now(movie)?;
        }

        Ok(store)
    }

    fn list_now(&self, genre: Option<String>) -> Result<Vec<Movie>, MoviesError> {
        let movies = self.movies.read().map_err(|_| MoviesError::StorePoisoned)?;

        let listed = match genre {
            Some(tag) => movies.iter().filter(|m| m.has_genre(&tag)).cloned().collect(),
            None => movies.clone(),
        };

        Ok(listed)
    }

    fn get_now(&self, id: Uuid) -> Result<Option<Movie>, MoviesError> {
        let movies = self.movies.read().map_err(|_| MoviesError::StorePoisoned)?;

        Ok(movies.iter().find(|m| m.id() == &id).cloned())
    }

    fn insert_now(&self, movie: Movie) -> Result<Movie, MoviesError> {
        let mut movies = self.movies.write().map_err(|_| MoviesError::StorePoisoned)?;

        if movies.iter().any(|m| m.id() == movie.id()) {
            return Err(MoviesError::DuplicateId { id: *movie.id() });
        }

        movies.push(movie.clone());

        Ok(movie)
    }

    fn update_now(&self, id: Uuid, patch: MoviePatch) -> Result<Option<Movie>, MoviesError> {
        let mut movies = self.movies.write().map_err(|_| MoviesError::StorePoisoned)?;

        Ok(movies.iter_mut().find(|m| m.id() == &id).map(|movie| {
            movie.apply(patch);
            movie.clone()
        }))
    }

    fn delete_now(&self, id: Uuid) -> Result<bool, MoviesError> {
        let mut movies = self.movies.write().map_err(|_| MoviesError::StorePoisoned)?;

        match movies.iter().position(|m| m.id() == &id) {
            Some(index) => {
                movies.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl MovieStore for InMemoryStore {
    fn list(&self, genre: Option<String>) -> BoxFuture<Result<Vec<Movie>, MoviesError>> {
        future::ready(self.list_now(genre)).boxed()
    }

    fn get(&self, id: Uuid) -> BoxFuture<Result<Option<Movie>, MoviesError>> {
        future::ready(self.get_now(id)).boxed()
    }

    fn insert(&self, movie: Movie) -> BoxFuture<Result<Movie, MoviesError>> {
        future::ready(self.insert_now(movie)).boxed()
    }

    fn update(&self, id: Uuid, patch: MoviePatch) -> BoxFuture<Result<Option<Movie>, MoviesError>> {
        future::ready(self.update_now(id, patch)).boxed()
    }

    fn delete(&self, id: Uuid) -> BoxFuture<Result<bool, MoviesError>> {
        future::ready(self.delete_now(id)).boxed()
    }
}
