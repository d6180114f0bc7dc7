use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::movie::Movie;

/// The catalogue served when no seed file is configured.
const DEFAULT_SEED: &str = include_str!("../data/movies.json");

/// Loads the initial movies from `path`, or the built-in catalogue.
pub fn load(path: Option<&Path>) -> Result<Vec<Movie>, ConfigError> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::UnreadableSeed {
                path: path.to_owned(),
                source,
            })?;

            parse(&raw)
        }
        None => parse(DEFAULT_SEED),
    }
}

fn parse(raw: &str) -> Result<Vec<Movie>, ConfigError> {
    serde_json::from_str(raw).map_err(|source| ConfigError::MalformedSeed { source })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::movie::Genre;

    #[test]
    fn built_in_catalogue_parses() {
        let movies = load(None).expect("parse built-in catalogue");
        assert!(!movies.is_empty());

        let ids: HashSet<_> = movies.iter().map(|m| *m.id()).collect();
        assert_eq!(ids.len(), movies.len(), "IDs are unique");

        for movie in &movies {
            let details = movie.details();
            assert!(!details.genre.is_empty(), "{} has a genre", details.title);
            assert!(details.year >= 1900);
            assert!(details.rate >= 0.0 && details.rate <= 10.0);
        }
    }

    #[test]
    fn seed_genres_are_case_insensitive() {
        let raw = r#"[{
            "id": "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf",
            "title": "Paddington",
            "year": 2014,
            "director": "Paul King",
            "duration": 95,
            "poster": "https://example.com/paddington.jpg",
            "genre": ["Comedy", "ADVENTURE"],
            "rate": 7.2
        }]"#;

        let movies = parse(raw).unwrap();
        assert_eq!(movies[0].details().genre, vec![Genre::Comedy, Genre::Adventure]);
    }

    #[test]
    fn malformed_seeds_are_reported() {
        assert!(matches!(parse("{}"), Err(ConfigError::MalformedSeed { .. })));
        assert!(matches!(
            parse(r#"[{"title": "No ID"}]"#),
            Err(ConfigError::MalformedSeed { .. })
        ));
    }

    #[test]
    fn missing_seed_files_are_reported() {
        let result = load(Some(Path::new("/nonexistent/movies.json")));
        assert!(matches!(result, Err(ConfigError::UnreadableSeed { .. })));
    }
}
