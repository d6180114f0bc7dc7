use std::env;
use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::origin::{AllowList, DEFAULT_ALLOWED_ORIGINS};

pub const DEFAULT_PORT: u16 = 1234;

const PORT_VARIABLE: &str = "PORT";
const ORIGINS_VARIABLE: &str = "MOVIES_ALLOWED_ORIGINS";
const SEED_VARIABLE: &str = "MOVIES_SEED_PATH";

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub allowed_origins: AllowList,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_VARIABLE) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort {
                    name: PORT_VARIABLE,
                    value: value.clone(),
                    source,
                })?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = match get(ORIGINS_VARIABLE) {
            Some(list) => {
                let allowed = AllowList::parse(&list);

                if allowed.is_empty() {
                    return Err(ConfigError::EmptyAllowList {
                        name: ORIGINS_VARIABLE,
                    });
                }

                if let Some(origin) = allowed.malformed().next() {
                    return Err(ConfigError::InvalidOrigin {
                        name: ORIGINS_VARIABLE,
                        origin: origin.to_owned(),
                    });
                }

                allowed
            }
            None => DEFAULT_ALLOWED_ORIGINS.clone(),
        };

        let seed_path = get(SEED_VARIABLE).map(PathBuf::from);

        Ok(Config {
            port,
            allowed_origins,
            seed_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.allowed_origins, *DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(config.seed_path, None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("PORT", " "), ("MOVIES_SEED_PATH", "")]).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.seed_path, None);
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("MOVIES_ALLOWED_ORIGINS", "http://a.test,http://b.test"),
            ("MOVIES_SEED_PATH", "/tmp/movies.json"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.allowed_origins.contains("http://b.test"));
        assert!(!config.allowed_origins.contains("http://movies.com"));
        assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/movies.json")));
    }

    #[test]
    fn bad_ports_are_reported() {
        let result = config_from(&[("PORT", "99999")]);
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));

        let result = config_from(&[("PORT", "http")]);
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn empty_allow_lists_are_reported() {
        let result = config_from(&[("MOVIES_ALLOWED_ORIGINS", ",,")]);
        assert!(matches!(result, Err(ConfigError::EmptyAllowList { .. })));
    }

    #[test]
    fn malformed_origins_are_reported() {
        let result = config_from(&[("MOVIES_ALLOWED_ORIGINS", "http://a.test,a.test/")]);

        match result {
            Err(ConfigError::InvalidOrigin { origin, .. }) => assert_eq!(origin, "a.test/"),
            other => panic!("expected InvalidOrigin, got {:?}", other),
        }
    }
}
