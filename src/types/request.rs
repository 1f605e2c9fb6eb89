//! Soil and climate measurements submitted for a crop prediction

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of features the classifier expects
pub const FEATURE_COUNT: usize = 7;

/// Form field names, in feature vector order
pub const FIELD_NAMES: [&str; FEATURE_COUNT] = [
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "Temperature",
    "Humidity",
    "ph",
    "Rainfall",
];

/// Message returned to the user whenever validation fails
pub const REJECTION_MESSAGE: &str =
    "Sorry...  Error in entered values in the form Please check the values and fill it again";

/// Range check that a request failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("pH must be in (0, 14], got {0}")]
    PhOutOfRange(f64),

    #[error("temperature must be below 100, got {0}")]
    TemperatureTooHigh(f64),

    #[error("humidity must be above 0, got {0}")]
    HumidityNotPositive(f64),
}

/// One set of measurements to classify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Nitrogen content of the soil (kg/ha)
    #[serde(rename = "Nitrogen", alias = "nitrogen")]
    pub nitrogen: f64,

    /// Phosphorus content of the soil (kg/ha)
    #[serde(rename = "Phosphorus", alias = "phosphorus")]
    pub phosphorus: f64,

    /// Potassium content of the soil (kg/ha)
    #[serde(rename = "Potassium", alias = "potassium")]
    pub potassium: f64,

    /// Temperature (°C)
    #[serde(rename = "Temperature", alias = "temperature")]
    pub temperature: f64,

    /// Relative humidity (%)
    #[serde(rename = "Humidity", alias = "humidity")]
    pub humidity: f64,

    /// Soil pH
    #[serde(rename = "ph", alias = "pH", alias = "Ph")]
    pub ph: f64,

    /// Rainfall (mm)
    #[serde(rename = "Rainfall", alias = "rainfall")]
    pub rainfall: f64,
}

impl PredictionRequest {
    /// Build a request from values in feature vector order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        let [nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall] = values;
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }

    /// Check the ranges the model can be trusted with.
    ///
    /// Only pH, temperature and humidity are checked. NaN fails every
    /// comparison and is therefore rejected for those three fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.ph > 0.0 && self.ph <= 14.0) {
            return Err(ValidationError::PhOutOfRange(self.ph));
        }
        if !(self.temperature < 100.0) {
            return Err(ValidationError::TemperatureTooHigh(self.temperature));
        }
        if !(self.humidity > 0.0) {
            return Err(ValidationError::HumidityNotPositive(self.humidity));
        }
        Ok(())
    }

    /// Feature vector in the order the classifier was trained on
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        [
            self.nitrogen as f32,
            self.phosphorus as f32,
            self.potassium as f32,
            self.temperature as f32,
            self.humidity as f32,
            self.ph as f32,
            self.rainfall as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PredictionRequest {
        PredictionRequest::from_values([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9])
    }

    #[test]
    fn test_valid_sample() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_ph_bounds() {
        let mut req = sample();

        req.ph = 14.0;
        assert!(req.validate().is_ok());

        req.ph = 15.0;
        assert_eq!(req.validate(), Err(ValidationError::PhOutOfRange(15.0)));

        req.ph = 0.0;
        assert_eq!(req.validate(), Err(ValidationError::PhOutOfRange(0.0)));
    }

    #[test]
    fn test_temperature_bound() {
        let mut req = sample();

        req.temperature = 99.9;
        assert!(req.validate().is_ok());

        req.temperature = 100.0;
        assert_eq!(
            req.validate(),
            Err(ValidationError::TemperatureTooHigh(100.0))
        );
    }

    #[test]
    fn test_humidity_bound() {
        let mut req = sample();
        req.humidity = 0.0;
        assert_eq!(
            req.validate(),
            Err(ValidationError::HumidityNotPositive(0.0))
        );
    }

    #[test]
    fn test_unchecked_fields() {
        let req = PredictionRequest::from_values([-5.0, 1e6, -1.0, 20.0, 50.0, 7.0, -300.0]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_nan_rejected() {
        let mut req = sample();
        req.ph = f64::NAN;
        assert!(matches!(req.validate(), Err(ValidationError::PhOutOfRange(_))));
    }

    #[test]
    fn test_feature_order() {
        let features = sample().to_features();
        assert_eq!(features, [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
    }

    #[test]
    fn test_json_field_names() {
        let json = r#"{"nitrogen":90,"phosphorus":42,"potassium":43,"temperature":20.8,"humidity":82,"pH":6.5,"rainfall":202.9}"#;
        let req: PredictionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req, sample());

        let value = serde_json::to_value(&req).unwrap();
        for name in FIELD_NAMES {
            assert!(value.get(name).is_some(), "missing {name}");
        }
    }
}
