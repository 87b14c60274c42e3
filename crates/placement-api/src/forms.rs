use placement_types::models::normalize_optional;
use serde::Deserialize;

use crate::error::ApiError;

/// `?search=` on the list views. Matched verbatim, untrimmed.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// Trimmed value of a required field, or a 400 naming the field.
pub fn required(field: &str, value: &str) -> Result<String, ApiError> {
    normalize_optional(Some(value))
        .ok_or_else(|| ApiError::Invalid(format!("{} is required", field)))
}

/// Trimmed non-blank entries, in order. Blank entries are dropped silently.
pub fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| normalize_optional(Some(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("da_name", "  Priya ").unwrap(), "Priya");
        let err = required("da_name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "da_name is required");
    }

    #[test]
    fn non_blank_skips_empty_entries() {
        let texts = vec![
            "What is a CTE?".to_string(),
            " ".to_string(),
            " Explain joins ".to_string(),
            String::new(),
        ];
        assert_eq!(non_blank(&texts), vec!["What is a CTE?", "Explain joins"]);
    }
}
