use std::time::{Duration, Instant};

use bytes::Bytes;
use log::{debug, info};
use serde_json::Value;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::MoviesError;
use crate::movie::Movie;
use crate::routes::{
    query::ListQuery,
    rejection::{Context, Rejection},
    response::SuccessResponse,
    MOVIES_PATH,
};
use crate::validation::{validate_movie, validate_partial_movie};

pub(crate) const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

// failures carry their timing on the rejection for `format_rejection`
macro_rules! timed {
    ($body:block) => {{
        let start = Instant::now();

        let result = async { Ok::<_, Rejection>($body) }.await;
        let timing = format_server_timing(start.elapsed());

        match result {
            Ok(reply) => Ok(Box::new(with_header(reply, SERVER_TIMING_HEADER, timing)) as Box<dyn Reply>),
            Err(rejection) => Err(reject::custom(rejection.with_timing(timing))),
        }
    }};
}

pub async fn list(environment: Environment, query: ListQuery) -> RouteResult {
    timed!({
        // an empty filter is the same as none
        let genre = query.genre.filter(|g| !g.is_empty());
        debug!(environment.logger, "Listing movies..."; "genre" => genre.as_deref());

        let movies = environment
            .store
            .list(genre.clone())
            .await
            .map_err(|e| Rejection::new(Context::list(genre), e))?;

        json(&movies)
    })
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed!({
        let error_handler = |e: MoviesError| Rejection::new(Context::retrieve(id.clone()), e);

        debug!(environment.logger, "Retrieving movie..."; "id" => &id);
        let key = parse_id(&id).map_err(error_handler)?;

        let movie = environment
            .store
            .get(key)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(not_found(&id)))?;

        json(&movie)
    })
}

pub async fn create(environment: Environment, body: Bytes) -> RouteResult {
    timed!({
        let error_handler = |e: MoviesError| Rejection::new(Context::create(), e);

        debug!(environment.logger, "Validating new movie...");
        let value = parse_body(&body).map_err(error_handler)?;
        let details = validate_movie(&value)
            .map_err(|issues| error_handler(MoviesError::Invalid { issues }))?;

        let movie = environment
            .store
            .insert(Movie::new(Uuid::new_v4(), details))
            .await
            .map_err(error_handler)?;

        let id = movie.id().to_string();
        info!(environment.logger, "Created movie"; "id" => &id, "title" => &movie.details().title);

        with_header(
            with_status(json(&movie), StatusCode::CREATED),
            "location",
            format!("/{}/{}", MOVIES_PATH, id),
        )
    })
}

pub async fn update(environment: Environment, id: String, body: Bytes) -> RouteResult {
    timed!({
        let error_handler = |e: MoviesError| Rejection::new(Context::update(id.clone()), e);

        // validate before looking anything up, so a bad body is a 400
        // even for a missing movie
        debug!(environment.logger, "Validating movie update..."; "id" => &id);
        let value = parse_body(&body).map_err(error_handler)?;
        let patch = validate_partial_movie(&value)
            .map_err(|issues| error_handler(MoviesError::Invalid { issues }))?;

        let key = parse_id(&id).map_err(error_handler)?;
        let movie = environment
            .store
            .update(key, patch)
            .await
            .map_err(error_handler)?
            .ok_or_else(|| error_handler(not_found(&id)))?;

        info!(environment.logger, "Updated movie"; "id" => &id);

        json(&movie)
    })
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed!({
        let error_handler = |e: MoviesError| Rejection::new(Context::delete(id.clone()), e);

        debug!(environment.logger, "Deleting movie..."; "id" => &id);
        let key = parse_id(&id).map_err(error_handler)?;

        let existed = environment.store.delete(key).await.map_err(error_handler)?;

        if !existed {
            return Err(error_handler(not_found(&id)));
        }

        info!(environment.logger, "Deleted movie"; "id" => &id);

        json(&SuccessResponse::Message {
            message: "Movie deleted",
        })
    })
}

fn parse_body(body: &Bytes) -> Result<Value, MoviesError> {
    serde_json::from_slice(body).map_err(|source| MoviesError::MalformedBody { source })
}

/// IDs match exactly: only the lowercase hyphenated form a movie is
/// served under names it.
fn parse_id(id: &str) -> Result<Uuid, MoviesError> {
    Uuid::parse_str(id)
        .ok()
        .filter(|key| key.to_hyphenated().to_string() == id)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> MoviesError {
    MoviesError::NotFound { id: id.to_owned() }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
