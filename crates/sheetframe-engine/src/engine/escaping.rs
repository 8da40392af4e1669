//! Quote-escaping policy for text cell literals.
//!
//! When values are submitted with user-entered interpretation, a leading `'`
//! marks the rest of the cell as a text literal. [`StringEscaping`] decides
//! which strings get that prefix.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::EscapingError;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Which strings are prefixed with `'` before submission.
#[derive(Clone, Default)]
pub enum StringEscaping {
    /// Only strings that already start with `'`, so the quote survives as data.
    #[default]
    Default,
    /// Never escape; a leading `'` is consumed by the destination.
    Off,
    /// Escape every string.
    Full,
    /// Escape strings for which the predicate returns true.
    Predicate(Predicate),
}

impl StringEscaping {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        StringEscaping::Predicate(Arc::new(f))
    }

    /// Escape strings the regex matches anywhere.
    pub fn matching(re: Regex) -> Self {
        Self::predicate(move |s| re.is_match(s))
    }

    /// Apply the policy to a string.
    pub fn apply(&self, value: String) -> String {
        if value.is_empty() {
            return value;
        }
        let escape = match self {
            StringEscaping::Default => value.starts_with('\''),
            StringEscaping::Off => false,
            StringEscaping::Full => true,
            StringEscaping::Predicate(f) => f(&value),
        };
        if escape { format!("'{}", value) } else { value }
    }
}

impl fmt::Debug for StringEscaping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringEscaping::Default => f.write_str("Default"),
            StringEscaping::Off => f.write_str("Off"),
            StringEscaping::Full => f.write_str("Full"),
            StringEscaping::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl FromStr for StringEscaping {
    type Err = EscapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(StringEscaping::Default),
            "off" => Ok(StringEscaping::Off),
            "full" => Ok(StringEscaping::Full),
            other => Err(EscapingError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Config form: a tag (`"default"`, `"off"`, `"full"`) or `{ pattern = "..." }`.
///
/// Deserializing this never fails on an unknown tag or a bad pattern; those
/// surface as [`EscapingError`] from `StringEscaping::try_from`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EscapingConfig {
    Tag(String),
    Pattern { pattern: String },
}

impl TryFrom<EscapingConfig> for StringEscaping {
    type Error = EscapingError;

    fn try_from(repr: EscapingConfig) -> Result<Self, Self::Error> {
        match repr {
            EscapingConfig::Tag(tag) => tag.parse(),
            EscapingConfig::Pattern { pattern } => Ok(Self::matching(Regex::new(&pattern)?)),
        }
    }
}

impl<'de> Deserialize<'de> for StringEscaping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = EscapingConfig::deserialize(deserializer)?;
        StringEscaping::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_escapes_leading_quote_only() {
        let policy = StringEscaping::Default;
        assert_eq!(policy.apply("'hello".to_string()), "''hello");
        assert_eq!(policy.apply("hello".to_string()), "hello");
    }

    #[test]
    fn test_off_and_full() {
        assert_eq!(StringEscaping::Off.apply("'hello".to_string()), "'hello");
        assert_eq!(StringEscaping::Full.apply("hello".to_string()), "'hello");
        assert_eq!(StringEscaping::Full.apply("'hello".to_string()), "''hello");
    }

    #[test]
    fn test_empty_string_is_never_escaped() {
        assert_eq!(StringEscaping::Full.apply(String::new()), "");
    }

    #[test]
    fn test_regex_predicate() {
        let policy = StringEscaping::matching(Regex::new(r"^\d+$").unwrap());
        assert_eq!(policy.apply("0012".to_string()), "'0012");
        assert_eq!(policy.apply("a12".to_string()), "a12");
    }

    #[test]
    fn test_unknown_tag_is_configuration_error() {
        let err = "sometimes".parse::<StringEscaping>().unwrap_err();
        assert!(matches!(err, EscapingError::UnknownPolicy(ref tag) if tag == "sometimes"));
    }

    #[test]
    fn test_deserialize_tag_and_pattern() {
        let off: StringEscaping = serde_json::from_str(r#""off""#).unwrap();
        assert!(matches!(off, StringEscaping::Off));

        let pattern: StringEscaping = serde_json::from_str(r#"{"pattern": "^x"}"#).unwrap();
        assert_eq!(pattern.apply("xyz".to_string()), "'xyz");

        assert!(serde_json::from_str::<StringEscaping>(r#""loud""#).is_err());
        assert!(serde_json::from_str::<StringEscaping>(r#"{"pattern": "("}"#).is_err());
    }

    #[test]
    fn test_config_defers_validation_to_conversion() {
        let config: EscapingConfig = serde_json::from_str(r#""loud""#).unwrap();
        assert_eq!(config, EscapingConfig::Tag("loud".to_string()));
        let err = StringEscaping::try_from(config).unwrap_err();
        assert!(matches!(err, EscapingError::UnknownPolicy(ref tag) if tag == "loud"));

        let bad_pattern = EscapingConfig::Pattern {
            pattern: "(".to_string(),
        };
        assert!(matches!(
            StringEscaping::try_from(bad_pattern),
            Err(EscapingError::InvalidPattern(_))
        ));
    }
}
