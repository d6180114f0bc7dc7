//! Request-body validation for movies.
//!
//! Each field is checked against a static constraint table. Every
//! failing field is reported, so a client can fix a submission in one
//! round trip. Unknown fields (including `id`) are ignored.

use std::convert::TryFrom;

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::movie::{Genre, MovieDetails, MoviePatch};

/// The rate given to new movies that don’t specify one.
pub const DEFAULT_RATE: f64 = 5.0;

/// A single validation failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    fn new(code: IssueCode, path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Issue {
            code,
            path,
            message: message.into(),
        }
    }

    fn at(field: Field, code: IssueCode, message: impl Into<String>) -> Self {
        Issue::new(code, vec![PathSegment::Field(field.name())], message)
    }

    /// An issue describing a body that isn’t JSON at all.
    pub fn malformed(error: &serde_json::Error) -> Self {
        Issue::new(IssueCode::InvalidJson, vec![], error.to_string())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    InvalidEnumValue,
    InvalidJson,
}

/// One step into the request body: a field name or an array index.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Title,
    Year,
    Director,
    Duration,
    Poster,
    Genre,
    Rate,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Year => "year",
            Field::Director => "director",
            Field::Duration => "duration",
            Field::Poster => "poster",
            Field::Genre => "genre",
            Field::Rate => "rate",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Constraint {
    Text,
    Integer { min: i64, max: i64 },
    Number { min: f64, max: f64 },
    Url,
    Genres,
}

struct Rule {
    field: Field,
    constraint: Constraint,
    /// Used on creation when the field is absent.
    default: Option<f64>,
    required_message: &'static str,
    type_message: &'static str,
}

/// Integer maxima only reflect the storage types.
const RULES: &[Rule] = &[
    Rule {
        field: Field::Title,
        constraint: Constraint::Text,
        default: None,
        required_message: "Movie title is required",
        type_message: "Movie title must be a string",
    },
    Rule {
        field: Field::Year,
        constraint: Constraint::Integer {
            min: 1900,
            max: i32::MAX as i64,
        },
        default: None,
        required_message: "Movie year is required",
        type_message: "Movie year must be an integer",
    },
    Rule {
        field: Field::Director,
        constraint: Constraint::Text,
        default: None,
        required_message: "Movie director is required",
        type_message: "Movie director must be a string",
    },
    Rule {
        field: Field::Duration,
        constraint: Constraint::Integer {
            min: 1,
            max: u32::MAX as i64,
        },
        default: None,
        required_message: "Movie duration is required",
        type_message: "Movie duration must be an integer",
    },
    Rule {
        field: Field::Poster,
        constraint: Constraint::Url,
        default: None,
        required_message: "Movie poster is required",
        type_message: "Poster must be a valid URL",
    },
    Rule {
        field: Field::Genre,
        constraint: Constraint::Genres,
        default: None,
        required_message: "Movie genre is required",
        type_message: "Movie genre must be an array of enum Genre",
    },
    Rule {
        field: Field::Rate,
        constraint: Constraint::Number {
            min: 0.0,
            max: 10.0,
        },
        default: Some(DEFAULT_RATE),
        required_message: "Movie rate is required",
        type_message: "Movie rate must be a number",
    },
];

enum Checked {
    Text(String),
    Integer(i64),
    Number(f64),
    Genres(Vec<Genre>),
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Create,
    Update,
}

/// Validates a complete movie for creation. `rate` defaults to 5.
pub fn validate_movie(body: &Value) -> Result<MovieDetails, Vec<Issue>> {
    let patch = check(body, Mode::Create)?;
    let details = complete(patch);

    // create mode either fills every field or reports it missing
    debug_assert!(details.is_some(), "constraint table left a field unset");

    details.ok_or_else(|| {
        vec![Issue::new(
            IssueCode::InvalidType,
            vec![],
            "Incomplete movie",
        )]
    })
}

/// Validates a partial update. Every field is optional, but present
/// fields obey the same constraints as on creation.
pub fn validate_partial_movie(body: &Value) -> Result<MoviePatch, Vec<Issue>> {
    check(body, Mode::Update)
}

fn check(body: &Value, mode: Mode) -> Result<MoviePatch, Vec<Issue>> {
    let object = as_object(body)?;
    let mut patch = MoviePatch::default();
    let mut issues = vec![];

    for rule in RULES {
        match object.get(rule.field.name()) {
            Some(value) => match check_value(rule, value) {
                Ok(checked) => assign(&mut patch, rule.field, checked),
                Err(mut found) => issues.append(&mut found),
            },
            None if mode == Mode::Create => match rule.default {
                Some(default) => assign(&mut patch, rule.field, Checked::Number(default)),
                None => issues.push(Issue::at(
                    rule.field,
                    IssueCode::InvalidType,
                    rule.required_message,
                )),
            },
            None => {}
        }
    }

    if issues.is_empty() {
        Ok(patch)
    } else {
        Err(issues)
    }
}

fn complete(patch: MoviePatch) -> Option<MovieDetails> {
    Some(MovieDetails {
        title: patch.title?,
        year: patch.year?,
        director: patch.director?,
        duration: patch.duration?,
        poster: patch.poster?,
        genre: patch.genre?,
        rate: patch.rate?,
    })
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<Issue>> {
    body.as_object().ok_or_else(|| {
        vec![Issue::new(
            IssueCode::InvalidType,
            vec![],
            format!("Expected object, received {}", type_name(body)),
        )]
    })
}

fn check_value(rule: &Rule, value: &Value) -> Result<Checked, Vec<Issue>> {
    let field = rule.field;
    let single = |code: IssueCode, message: String| vec![Issue::at(field, code, message)];
    let wrong_type = || single(IssueCode::InvalidType, rule.type_message.to_owned());

    match rule.constraint {
        Constraint::Text => value
            .as_str()
            .map(|s| Checked::Text(s.to_owned()))
            .ok_or_else(wrong_type),
        Constraint::Url => {
            let s = value.as_str().ok_or_else(wrong_type)?;

            match Url::parse(s) {
                Ok(_) => Ok(Checked::Text(s.to_owned())),
                Err(_) => Err(single(
                    IssueCode::InvalidString,
                    rule.type_message.to_owned(),
                )),
            }
        }
        Constraint::Integer { min, max } => {
            let n = as_integer(value).ok_or_else(wrong_type)?;

            if n < min {
                Err(single(IssueCode::TooSmall, at_least(min)))
            } else if n > max {
                Err(single(IssueCode::TooBig, at_most(max)))
            } else {
                Ok(Checked::Integer(n))
            }
        }
        Constraint::Number { min, max } => {
            let n = value.as_f64().ok_or_else(wrong_type)?;

            if n < min {
                Err(single(IssueCode::TooSmall, at_least(min)))
            } else if n > max {
                Err(single(IssueCode::TooBig, at_most(max)))
            } else {
                Ok(Checked::Number(n))
            }
        }
        Constraint::Genres => check_genres(rule, value),
    }
}

fn check_genres(rule: &Rule, value: &Value) -> Result<Checked, Vec<Issue>> {
    let field = rule.field;
    let elements = value.as_array().ok_or_else(|| {
        vec![Issue::at(
            field,
            IssueCode::InvalidType,
            rule.type_message,
        )]
    })?;

    if elements.is_empty() {
        return Err(vec![Issue::at(
            field,
            IssueCode::TooSmall,
            "Array must contain at least 1 element(s)",
        )]);
    }

    let mut genres = Vec::with_capacity(elements.len());
    let mut issues = vec![];

    for (index, element) in elements.iter().enumerate() {
        let path = vec![PathSegment::Field(field.name()), PathSegment::Index(index)];

        match element.as_str() {
            Some(tag) => match tag.parse::<Genre>() {
                Ok(genre) => genres.push(genre),
                Err(_) => issues.push(Issue::new(
                    IssueCode::InvalidEnumValue,
                    path,
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        expected_genres(),
                        tag
                    ),
                )),
            },
            None => issues.push(Issue::new(
                IssueCode::InvalidType,
                path,
                format!("Expected string, received {}", type_name(element)),
            )),
        }
    }

    if issues.is_empty() {
        Ok(Checked::Genres(genres))
    } else {
        Err(issues)
    }
}

/// Accepts integral floats such as `2021.0`, like JSON itself does.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if value.is_u64() {
        return Some(i64::MAX);
    }

    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

// the constraint table pairs each field with its own kind, so other
// combinations can’t occur
fn assign(patch: &mut MoviePatch, field: Field, checked: Checked) {
    match (field, checked) {
        (Field::Title, Checked::Text(s)) => patch.title = Some(s),
        (Field::Director, Checked::Text(s)) => patch.director = Some(s),
        (Field::Poster, Checked::Text(s)) => patch.poster = Some(s),
        (Field::Year, Checked::Integer(n)) => patch.year = i32::try_from(n).ok(),
        (Field::Duration, Checked::Integer(n)) => patch.duration = u32::try_from(n).ok(),
        (Field::Rate, Checked::Number(n)) => patch.rate = Some(n),
        (Field::Genre, Checked::Genres(g)) => patch.genre = Some(g),
        (field, _) => debug_assert!(false, "{:?} checked as the wrong kind", field),
    }
}

fn at_least(min: impl std::fmt::Display) -> String {
    format!("Number must be greater than or equal to {}", min)
}

fn at_most(max: impl std::fmt::Display) -> String {
    format!("Number must be less than or equal to {}", max)
}

fn expected_genres() -> String {
    Genre::ALL
        .iter()
        .map(|g| format!("'{}'", g))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
