//! Cross-origin policy.
//!
//! Browsers send an `Origin` header on cross-origin requests. Requests
//! without one (same-origin pages, curl, other servers) are always
//! allowed; requests with one must name an origin on the allow-list,
//! compared exactly, scheme and port included.

use std::collections::HashSet;
use std::iter::FromIterator;
use std::sync::Arc;

use lazy_static::lazy_static;
use url::Url;
use warp::filters::cors::Builder;
use warp::reject;
use warp::Filter;

use crate::errors::MoviesError;
use crate::routes::rejection::{Context, Rejection};

/// Methods a cross-origin caller may use.
pub const ALLOWED_METHODS: [&str; 4] = ["GET", "POST", "PATCH", "DELETE"];

/// Request headers a cross-origin caller may send.
pub const ALLOWED_HEADERS: [&str; 1] = ["content-type"];

const EXPOSED_HEADERS: [&str; 2] = ["location", "server-timing"];

lazy_static! {
    pub static ref DEFAULT_ALLOWED_ORIGINS: AllowList = AllowList::from_iter(&[
        "http://localhost:8080",
        "http://localhost:123",
        "http://movies.com",
        "http://midu.dev",
        "https://nodetestmovies-production.up.railway.app",
        "https://nodetestmovies-production.up.railway.app:8080",
    ]);
}

/// A set of origins permitted to read responses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllowList(HashSet<String>);

impl AllowList {
    /// Parses a comma-separated list, skipping blank entries.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.contains(origin)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Entries that can never equal a browser’s `Origin` header.
    pub fn malformed(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|origin| !is_serialized_origin(origin))
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AllowList(iter.into_iter().map(|s| s.as_ref().to_owned()).collect())
    }
}

/// Decides whether a request carrying `origin` may see the response.
pub fn is_origin_allowed(origin: Option<&str>, allowed: &AllowList) -> bool {
    match origin {
        None => true,
        Some(origin) => allowed.contains(origin),
    }
}

/// Whether `origin` is written the way browsers send it:
/// `scheme://host[:port]`, lowercase, no default port, no path.
pub fn is_serialized_origin(origin: &str) -> bool {
    Url::parse(origin)
        .map(|url| url.origin().ascii_serialization() == origin)
        .unwrap_or(false)
}

/// Rejects requests whose `Origin` is outside `allowed`.
pub fn make_origin_filter(
    allowed: Arc<AllowList>,
) -> impl Filter<Extract = (), Error = reject::Rejection> + Clone {
    warp::header::optional::<String>("origin")
        .and_then(move |origin: Option<String>| {
            let allowed = allowed.clone();

            async move { check_origin(origin, &allowed) }
        })
        .untuple_one()
}

/// Configures warp’s CORS wrapper from the same allow-list, for the
/// response headers and preflight answers. Malformed entries are skipped
/// since warp can’t represent them and no browser would send them.
pub fn make_cors(allowed: &AllowList) -> Builder {
    warp::cors()
        .allow_origins(allowed.iter().filter(|origin| is_serialized_origin(origin)))
        .allow_methods(ALLOWED_METHODS.iter().copied())
        .allow_headers(ALLOWED_HEADERS.iter().copied())
        .expose_headers(EXPOSED_HEADERS.iter().copied())
}

fn check_origin(origin: Option<String>, allowed: &AllowList) -> Result<(), reject::Rejection> {
    if is_origin_allowed(origin.as_deref(), allowed) {
        return Ok(());
    }

    let context = Context::origin(origin.clone());
    let error = MoviesError::OriginNotAllowed {
        origin: origin.unwrap_or_default(),
    };

    Err(reject::custom(Rejection::new(context, error)))
}
