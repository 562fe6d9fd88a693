//! JSON text fallback for field types the store cannot hold natively.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FieldError;

pub fn to_text<T: Serialize + ?Sized>(value: &T) -> Result<String, FieldError> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_text<T: DeserializeOwned>(text: &str) -> Result<T, FieldError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn nested_values_survive_text() {
        let mut tags = BTreeMap::new();
        tags.insert("genre".to_string(), vec!["biography".to_string()]);
        let text = to_text(&tags).unwrap();
        assert_eq!(text, r#"{"genre":["biography"]}"#);
        let back: BTreeMap<String, Vec<String>> = from_text(&text).unwrap();
        assert_eq!(back, tags);
    }

    #[test]
    fn mismatched_text_is_a_json_error() {
        let err = from_text::<Vec<i32>>(r#"{"a":1}"#).unwrap_err();
        assert!(matches!(err, FieldError::Json(_)));
    }
}
