use std::env;

use crate::config::ConfigError;

pub(crate) fn require_non_empty_env(key: &str) -> Result<String, ConfigError> {
    optional_trimmed_env(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()))
}

pub(crate) fn parse_u32_env(key: &str, default: u32) -> Result<u32, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::ParseInt {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

pub(crate) fn parse_optional_u64_env(key: &str) -> Result<Option<u64>, ConfigError> {
    parse_optional_u64(key, optional_trimmed_env(key))
}

fn parse_optional_u64(key: &str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|raw| {
        raw.parse::<u64>().map_err(|_| ConfigError::ParseInt {
            key: key.to_string(),
            value: raw,
        })
    })
    .transpose()
}

pub(crate) fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::ParseBool(key.to_string())),
        None => Ok(default),
    }
}

pub(crate) fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, parse_optional_u64};
    use crate::config::ConfigError;

    #[test]
    fn parses_common_boolean_spellings() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn unset_optional_integer_stays_unset() {
        assert_eq!(parse_optional_u64("GEMINI_TIMEOUT_MS", None).ok(), Some(None));
        assert_eq!(
            parse_optional_u64("GEMINI_TIMEOUT_MS", Some("1500".to_string())).ok(),
            Some(Some(1500))
        );
        assert!(matches!(
            parse_optional_u64("GEMINI_TIMEOUT_MS", Some("soon".to_string())),
            Err(ConfigError::ParseInt { key, value }) if key == "GEMINI_TIMEOUT_MS" && value == "soon"
        ));
    }
}
