use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Skill level. Levels start at 1; foundation checks for level `n` cover `1..n`.
pub type Level = u32;

/// Rejects level 0.
pub fn check_level(level: Level) -> Result<Level, ValidationError> {
    if level == 0 {
        return Err(ValidationError::OutOfBounds {
            field: "level",
            value: level.to_string(),
        });
    }
    Ok(level)
}

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                let s = value.into();
                let re = PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"));
                if !re.is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

newtype!(
    LearnerId,
    "Stable learner identifier (pattern: `[A-Za-z0-9][A-Za-z0-9_.:-]{0,127}`).",
    r"^[A-Za-z0-9][A-Za-z0-9_.:-]{0,127}$"
);
newtype!(
    ContextTag,
    "Situational context a breadth exercise was set in, e.g. `time_pressured`.",
    r"^[a-z][a-z0-9_]{0,63}$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learner_id_accepts_typical_ids() {
        assert!(LearnerId::parse("learner-42").is_ok());
        assert!(LearnerId::parse("org:acme.u_7").is_ok());
    }

    #[test]
    fn learner_id_rejects_empty_and_spaces() {
        assert!(LearnerId::parse("").is_err());
        assert!(LearnerId::parse("has space").is_err());
        assert!(LearnerId::parse("-leading").is_err());
    }

    #[test]
    fn level_zero_is_rejected() {
        assert!(check_level(0).is_err());
        assert_eq!(check_level(1).unwrap(), 1);
    }

    #[test]
    fn context_tag_is_lowercase_snake() {
        assert!(ContextTag::parse("time_pressured").is_ok());
        assert!(ContextTag::parse("Formal").is_err());
        assert!(ContextTag::parse("9lives").is_err());
    }

    #[test]
    fn deserialization_applies_the_pattern() {
        let tag: ContextTag = serde_json::from_str("\"formal\"").unwrap();
        assert_eq!(tag.as_str(), "formal");
        assert!(serde_json::from_str::<ContextTag>("\"Not A Tag!!\"").is_err());
        assert!(serde_json::from_str::<ContextTag>("\"Formal\"").is_err());
        assert!(serde_json::from_str::<LearnerId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = LearnerId::parse("ada").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ada\"");
    }
}
