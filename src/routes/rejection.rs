use serde::Serialize;
use warp::reject;

use crate::errors::MoviesError;
use crate::validation::Issue;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: MoviesError,
    /// The `server-timing` value of the handler that failed, if one ran.
    pub(crate) timing: Option<String>,
}

impl Rejection {
    pub fn new(context: Context, error: MoviesError) -> Self {
        Rejection {
            context,
            error,
            timing: None,
        }
    }

    pub fn with_timing(self, timing: String) -> Self {
        Rejection {
            timing: Some(timing),
            ..self
        }
    }

    /// The JSON body sent back to the client, if any. Origin failures
    /// deliberately carry none.
    pub fn body(&self) -> Option<ErrorBody> {
        use MoviesError::*;

        match &self.error {
            Invalid { issues } => Some(ErrorBody::Issues {
                error: issues.clone(),
            }),
            MalformedBody { source } => Some(ErrorBody::Issues {
                error: vec![Issue::malformed(source)],
            }),
            OriginNotAllowed { .. } => None,
            e => Some(ErrorBody::Message {
                message: format!("{}", e),
            }),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Issues { error: Vec<Issue> },
    Message { message: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Create,
    Delete { id: String },
    List { genre: Option<String> },
    Origin { origin: Option<String> },
    Retrieve { id: String },
    Update { id: String },
}

impl Context {
    pub fn create() -> Context {
        Context::Create
    }

    pub fn delete(id: String) -> Context {
        Context::Delete { id }
    }

    pub fn list(genre: Option<String>) -> Context {
        Context::List { genre }
    }

    pub fn origin(origin: Option<String>) -> Context {
        Context::Origin { origin }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn update(id: String) -> Context {
        Context::Update { id }
    }
}
