use serde::{Deserialize, Serialize};

use crate::domain::FieldSet;

/// Request body posted to the prediction service.
pub type PredictRequest = FieldSet;

/// The four trait estimates returned by the prediction service.
///
/// Every field is required; a body missing one fails to deserialize rather than
/// producing a partial result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_yield: f64,
    pub predicted_quality: f64,
    pub predicted_stress: f64,
    pub predicted_agronomic: f64,
}

impl PredictionResult {
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}
