use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single movie in the collection.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Movie {
    /// Assigned on creation and never changed afterwards.
    id: Uuid,

    #[serde(flatten)]
    details: MovieDetails,
}

impl Movie {
    pub fn new(id: Uuid, details: MovieDetails) -> Self {
        Movie { id, details }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn details(&self) -> &MovieDetails {
        &self.details
    }

    /// Whether any of the movie’s genres matches `tag`, ignoring case.
    pub fn has_genre(&self, tag: &str) -> bool {
        self.details.genre.iter().any(|g| g.matches(tag))
    }

    /// Overlays the fields present in `patch`. The ID is untouched.
    pub fn apply(&mut self, patch: MoviePatch) {
        let MoviePatch {
            title,
            year,
            director,
            duration,
            poster,
            genre,
            rate,
        } = patch;
        let details = &mut self.details;

        if let Some(title) = title {
            details.title = title;
        }
        if let Some(year) = year {
            details.year = year;
        }
        if let Some(director) = director {
            details.director = director;
        }
        if let Some(duration) = duration {
            details.duration = duration;
        }
        if let Some(poster) = poster {
            details.poster = poster;
        }
        if let Some(genre) = genre {
            details.genre = genre;
        }
        if let Some(rate) = rate {
            details.rate = rate;
        }
    }
}

/// Everything about a movie except its ID.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub year: i32,
    pub director: String,

    /// Running time in minutes.
    pub duration: u32,

    /// Absolute URL of the poster image, kept as submitted.
    pub poster: String,

    /// Never empty.
    pub genre: Vec<Genre>,

    /// Between 0 and 10 inclusive.
    pub rate: f64,
}

/// A validated partial update. Absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
    pub rate: Option<f64>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self == &MoviePatch::default()
    }
}

/// The closed set of genre tags. Stored and serialized in lowercase.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    SciFi,
    Crime,
    Animation,
    Biography,
}

impl Genre {
    pub const ALL: [Genre; 11] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Crime,
        Genre::Animation,
        Genre::Biography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Fantasy => "fantasy",
            Genre::Horror => "horror",
            Genre::Thriller => "thriller",
            Genre::SciFi => "sci-fi",
            Genre::Crime => "crime",
            Genre::Animation => "animation",
            Genre::Biography => "biography",
        }
    }

    pub fn matches(self, tag: &str) -> bool {
        self.as_str() == tag.to_lowercase()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag is not one of the known genres.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownGenre(pub String);

impl fmt::Display for UnknownGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown genre {:?}", self.0)
    }
}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.matches(s))
            .ok_or_else(|| UnknownGenre(s.to_owned()))
    }
}

impl TryFrom<String> for Genre {
    type Error = UnknownGenre;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.as_str().to_owned()
    }
}
