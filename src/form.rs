//! Parsing of the HTML prediction form into a [`PredictionRequest`].

use crate::types::request::{PredictionRequest, FEATURE_COUNT, FIELD_NAMES};
use thiserror::Error;

/// Reasons a submitted form cannot be turned into a request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("missing form field '{0}'")]
    MissingField(&'static str),

    #[error("form field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parse the seven required fields from submitted name/value pairs.
/// A repeated field takes its first value. Unknown fields are ignored.
pub fn parse_form(fields: &[(String, String)]) -> Result<PredictionRequest, FormError> {
    let mut values = [0.0; FEATURE_COUNT];

    for (slot, field) in values.iter_mut().zip(FIELD_NAMES) {
        let raw = fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
            .ok_or(FormError::MissingField(field))?;
        *slot = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| FormError::InvalidNumber {
                field,
                value: raw.clone(),
            })?;
    }

    Ok(PredictionRequest::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Nitrogen", "90"),
            ("Phosphorus", "42"),
            ("Potassium", "43"),
            ("Temperature", "20.8"),
            ("Humidity", "82"),
            ("ph", "6.5"),
            ("Rainfall", "202.9"),
        ]
    }

    #[test]
    fn test_parse_valid_form() {
        let req = parse_form(&form(&valid_pairs())).unwrap();
        assert_eq!(
            req,
            PredictionRequest::from_values([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9])
        );
    }

    #[test]
    fn test_whitespace_and_extra_fields() {
        let mut pairs = valid_pairs();
        pairs[0] = ("Nitrogen", "  90 ");
        pairs.push(("submit", "Predict"));

        let req = parse_form(&form(&pairs)).unwrap();
        assert_eq!(req.nitrogen, 90.0);
    }

    #[test]
    fn test_repeated_field_keeps_first() {
        let mut pairs = valid_pairs();
        pairs.push(("ph", "15"));

        let req = parse_form(&form(&pairs)).unwrap();
        assert_eq!(req.ph, 6.5);
    }

    #[test]
    fn test_missing_field() {
        let pairs: Vec<_> = valid_pairs()
            .into_iter()
            .filter(|(k, _)| *k != "ph")
            .collect();

        assert_eq!(
            parse_form(&form(&pairs)),
            Err(FormError::MissingField("ph"))
        );
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = valid_pairs();
        pairs[4] = ("Humidity", "wet");

        assert_eq!(
            parse_form(&form(&pairs)),
            Err(FormError::InvalidNumber {
                field: "Humidity",
                value: "wet".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_value_is_invalid() {
        let mut pairs = valid_pairs();
        pairs[6] = ("Rainfall", "");

        assert!(matches!(
            parse_form(&form(&pairs)),
            Err(FormError::InvalidNumber { field: "Rainfall", .. })
        ));
    }
}
