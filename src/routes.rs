use std::sync::Arc;

use log::{debug, error, Logger};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reject;
use warp::filters::cors::CorsForbidden;
use warp::reply::{json, with_header, with_status, Reply};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::MoviesError;
use crate::origin;

mod handlers;
mod query;
pub(crate) mod rejection;
mod response;

pub use internal::*;

/// The collection’s path segment.
pub const MOVIES_PATH: &str = "movies";

/// The largest request body to accept.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

const VARY_HEADER: &str = "vary";

/// Assembles every route behind the origin check, plus the
/// health check outside it. CORS headers and preflight answers come
/// from warp’s wrapper, configured from the same allow-list.
pub fn make_api(environment: Environment) -> BoxedFilter<(Box<dyn Reply>,)> {
    let logger = environment.logger.clone();
    let logger2 = environment.logger.clone();

    let movies = make_list_route(environment.clone())
        .or(make_retrieve_route(environment.clone()))
        .unify()
        .or(make_create_route(environment.clone()))
        .unify()
        .or(make_update_route(environment.clone()))
        .unify()
        .or(make_delete_route(environment.clone()))
        .unify()
        .recover(move |r| format_rejection(logger.clone(), r))
        .unify()
        .with(origin::make_cors(&environment.origins).build())
        .map(|reply| with_header(reply, VARY_HEADER, "Origin"));

    let guarded = origin::make_origin_filter(environment.origins.clone())
        .and(movies)
        .map(|reply| Box::new(reply) as Box<dyn Reply>);

    make_healthz_route()
        .or(guarded)
        .unify()
        .recover(move |r| format_rejection(logger2.clone(), r))
        .unify()
        .boxed()
}

pub fn make_healthz_route() -> BoxedFilter<(Box<dyn Reply>,)> {
    use self::response::SuccessResponse;

    warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            Box::new(json(&SuccessResponse::Healthz {
                service: info::SERVICE_NAME,
                revision: info::REVISION,
                timestamp: info::BUILD_TIMESTAMP,
                version: info::VERSION,
            })) as Box<dyn Reply>
        })
        .boxed()
}

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<Box<dyn Reply>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_server_error() {
            error!(logger, "Movies error"; "context" => ?r.context, "error" => ?r.error, "status" => %status, "message" => %r.error);
        } else {
            debug!(logger, "Request rejected"; "context" => ?r.context, "status" => %status, "message" => %r.error);
        }

        let reply: Box<dyn Reply> = match r.body() {
            Some(body) => Box::new(with_status(json(&body), status)),
            None => Box::new(with_status(warp::reply(), status)),
        };

        let reply: Box<dyn Reply> = match &r.timing {
            Some(timing) => Box::new(with_header(
                reply,
                handlers::SERVER_TIMING_HEADER,
                timing.clone(),
            )),
            None => reply,
        };

        return Ok(reply);
    }

    // a preflight asking for a method or header outside the policy
    if let Some(e) = rej.find::<CorsForbidden>() {
        debug!(logger, "Preflight rejected"; "message" => %e);

        return Ok(Box::new(with_status(warp::reply(), StatusCode::FORBIDDEN)));
    }

    Err(rej)
}

fn status_code_for(e: &MoviesError) -> StatusCode {
    use MoviesError::*;

    match e {
        Invalid { .. } | MalformedBody { .. } => StatusCode::BAD_REQUEST,
        NotFound { .. } => StatusCode::NOT_FOUND,
        OriginNotAllowed { .. } => StatusCode::FORBIDDEN,
        DuplicateId { .. } | StorePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{
        body, delete, get as g, patch, path as p, path::param as par, post, query,
    };

    use super::{handlers, query as q, MAX_CONTENT_LENGTH, MOVIES_PATH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
        ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
        ($route_variable:ident; $first:expr, $($rest:expr),+) => (
            let $route_variable = $route_variable.and($first);
            route_filter!($route_variable; $($rest),+);
        )
    }

    macro_rules! route {
        ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
            pub fn $name(environment: Environment) -> Route {
                let $route_variable = warp::any()
                    .map(move || environment.clone())
                    .and(p(MOVIES_PATH));

                route_filter!($route_variable; $($filters),+);

                $route_variable.and_then(handlers::$handler)
                    .boxed()
            }
        );
    }

    route!(make_list_route => list, rt; end(), g(), query::<q::ListQuery>());
    route!(make_retrieve_route => retrieve, rt; par::<String>(), end(), g());
    route!(make_create_route => create, rt; end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::bytes());
    route!(make_update_route => update, rt; par::<String>(), end(), patch(), body::content_length_limit(MAX_CONTENT_LENGTH), body::bytes());
    route!(make_delete_route => delete, rt; par::<String>(), end(), delete());
}
