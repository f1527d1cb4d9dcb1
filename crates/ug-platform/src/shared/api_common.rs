//! Common API types and utilities

use serde::{Deserialize, Serialize};

use crate::principal::pager::DEFAULT_PAGE_SIZE;
use crate::shared::error::{PlatformError, Result};

pub(crate) mod string_or_number {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNum<N> {
        Num(N),
        Str(String),
    }

    pub fn deserialize_u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<StringOrNum<u32>>::deserialize(deserializer)? {
            Some(StringOrNum::Num(n)) => Ok(Some(n)),
            Some(StringOrNum::Str(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }

    /// IDs arrive as JSON numbers or as strings.
    pub fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match StringOrNum::<i64>::deserialize(deserializer)? {
            StringOrNum::Num(n) => Ok(n),
            StringOrNum::Str(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}

/// Relay-style forward pagination arguments.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectionParams {
    #[serde(default, deserialize_with = "string_or_number::deserialize_u32_opt")]
    pub first: Option<u32>,
    #[serde(default)]
    pub after: Option<String>,
}

impl ConnectionParams {
    pub fn page_size(&self) -> u32 {
        self.first.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|c| !c.is_empty())
    }
}

/// Parse an id taken from a URL path segment.
pub fn parse_path_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| PlatformError::validation(format!("Invalid id: {}", raw)))
}

/// Body carrying a freshly issued session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Target {
        #[serde(deserialize_with = "string_or_number::deserialize_i64")]
        user_id: i64,
    }

    #[test]
    fn test_user_id_string_or_number() {
        let t: Target = serde_json::from_value(json!({"userId": 7})).unwrap();
        assert_eq!(t.user_id, 7);
        let t: Target = serde_json::from_value(json!({"userId": "12"})).unwrap();
        assert_eq!(t.user_id, 12);
        assert!(serde_json::from_value::<Target>(json!({"userId": "abc"})).is_err());
    }

    #[test]
    fn test_parse_path_id() {
        assert_eq!(parse_path_id("42").unwrap(), 42);
        assert!(matches!(parse_path_id("abc"), Err(PlatformError::Validation { .. })));
        assert!(parse_path_id("").is_err());
    }

    #[test]
    fn test_connection_params_defaults() {
        let params: ConnectionParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.cursor(), None);

        let params: ConnectionParams = serde_json::from_value(json!({"first": "3", "after": ""})).unwrap();
        assert_eq!(params.page_size(), 3);
        assert_eq!(params.cursor(), None);
    }
}
