//! Environment configuration helpers

use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is absent or blank
    #[error("{0} environment variable is not set")]
    Missing(String),

    /// A variable is present but could not be parsed
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },

    /// The `.env` file exists but could not be loaded
    #[error("failed to load env file {path}: {message}")]
    EnvFile { path: String, message: String },
}

/// Load a `.env` file into the process environment.
///
/// With an explicit path the file must exist. Without one, `.env` is looked
/// up from the current directory upwards and silently skipped when absent.
/// Returns the path that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, EnvError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| EnvError::EnvFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(loaded) => Ok(Some(loaded)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(EnvError::EnvFile {
                path: ".env".to_string(),
                message: e.to_string(),
            }),
        },
    }
}

fn process_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Typed access to configuration variables
///
/// Backed by the process environment in production and by any lookup
/// closure in tests, so tests never mutate global state.
pub struct EnvVars<F = fn(&str) -> Option<String>> {
    lookup: F,
}

impl EnvVars {
    /// Read from the process environment
    pub fn process() -> Self {
        Self {
            lookup: process_var,
        }
    }
}

impl<F> EnvVars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Read through a custom lookup
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Get a variable; blank values count as absent
    pub fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a variable that must be set
    pub fn required(&self, name: &str) -> Result<String, EnvError> {
        self.get(name)
            .ok_or_else(|| EnvError::Missing(name.to_string()))
    }

    /// Parse an optional variable
    pub fn parse_opt<T>(&self, name: &str) -> Result<Option<T>, EnvError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|value| {
                value.parse::<T>().map_err(|e| EnvError::Invalid {
                    name: name.to_string(),
                    reason: e.to_string(),
                    value,
                })
            })
            .transpose()
    }

    /// Parse a variable, falling back to `default` when absent
    pub fn parse_or<T>(&self, name: &str, default: T) -> Result<T, EnvError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_opt(name)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvVars::with_lookup(move |name| map.get(name).cloned())
    }

    #[test]
    fn test_required_present_and_missing() {
        let env = vars(&[("TELEGRAM_TOKEN", "abc"), ("BLANK", "   ")]);
        assert_eq!(env.required("TELEGRAM_TOKEN").unwrap(), "abc");
        assert_eq!(
            env.required("BLANK"),
            Err(EnvError::Missing("BLANK".to_string()))
        );
        assert!(env.required("NOPE").is_err());
    }

    #[test]
    fn test_parse_or_uses_default() {
        let env = vars(&[("CAPTION_BUDGET", "800")]);
        assert_eq!(env.parse_or("CAPTION_BUDGET", 1000usize).unwrap(), 800);
        assert_eq!(env.parse_or("INLINE_CACHE_TIME", 300u32).unwrap(), 300);
    }

    #[test]
    fn test_parse_invalid_value() {
        let env = vars(&[("MY_CHAT_ID", "not-a-number")]);
        let err = env.parse_opt::<i64>("MY_CHAT_ID").unwrap_err();
        assert!(err.to_string().starts_with("MY_CHAT_ID has an invalid value"));
    }

    #[test]
    fn test_missing_explicit_env_file() {
        let result = load_env_file(Some(Path::new("/definitely/not/here/.env")));
        assert!(matches!(result, Err(EnvError::EnvFile { .. })));
    }
}
