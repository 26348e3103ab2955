use ffserial::forces::torch::GlobalParameter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid assignment '{0}'. Expected 'KEY=VALUE'.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in assignment '{0}'.")]
    EmptyKey(String),

    #[error("Invalid number '{value}' for '{name}'.")]
    InvalidNumber { name: String, value: String },

    #[error("Invalid boolean '{value}' for '{name}'. Expected 'true' or 'false'.")]
    InvalidBool { name: String, value: String },
}

/// Splits `KEY=VALUE` at the first `=`, trimming whitespace around both halves.
pub fn parse_key_value(s: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(s.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(s.to_string()));
    }
    Ok((key, value.trim()))
}

/// Parses a `NAME=DEFAULT` global parameter, e.g. `k=1.5`.
pub fn parse_global_parameter(s: &str) -> Result<GlobalParameter, ParseError> {
    let (name, value) = parse_key_value(s)?;
    let default_value = value.parse().map_err(|_| ParseError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    Ok(GlobalParameter {
        name: name.to_string(),
        default_value,
    })
}

pub fn parse_bool(name: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_int(name: &str, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_at_the_first_equals_sign() {
        assert_eq!(
            parse_key_value("document.root-name=A=B").unwrap(),
            ("document.root-name", "A=B")
        );
        assert_eq!(parse_key_value(" k = 1 ").unwrap(), ("k", "1"));
        assert_eq!(parse_key_value("k=").unwrap(), ("k", ""));
    }

    #[test]
    fn key_value_requires_a_separator_and_a_key() {
        assert_eq!(
            parse_key_value("novalue"),
            Err(ParseError::MissingSeparator("novalue".to_string()))
        );
        assert_eq!(
            parse_key_value("=1.0"),
            Err(ParseError::EmptyKey("=1.0".to_string()))
        );
    }

    #[test]
    fn global_parameter_is_parsed_from_name_and_default() {
        let param = parse_global_parameter("r0=0.25").unwrap();
        assert_eq!(param.name, "r0");
        assert_eq!(param.default_value, 0.25);

        let param = parse_global_parameter("scale=2").unwrap();
        assert_eq!(param.default_value, 2.0);
    }

    #[test]
    fn global_parameter_rejects_non_numeric_defaults() {
        assert_eq!(
            parse_global_parameter("k=soft").unwrap_err(),
            ParseError::InvalidNumber {
                name: "k".to_string(),
                value: "soft".to_string(),
            }
        );
    }

    #[test]
    fn bool_accepts_only_canonical_spellings() {
        assert!(parse_bool("flag", "true").unwrap());
        assert!(!parse_bool("flag", "false").unwrap());
        assert!(matches!(
            parse_bool("flag", "yes"),
            Err(ParseError::InvalidBool { .. })
        ));
    }

    #[test]
    fn int_rejects_fractions() {
        assert_eq!(parse_int("group", "7").unwrap(), 7);
        assert!(parse_int("group", "7.5").is_err());
    }
}
