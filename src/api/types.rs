//! Wire DTOs for the boundary operations.

use serde::{Deserialize, Serialize};

use crate::extraction::DrugName;
use crate::interactions::InteractionVerdict;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    #[serde(rename = "drugCount")]
    pub drug_count: usize,
    pub drugs: Vec<DrugName>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Optional so an absent field maps to `MissingInput` instead of a
    /// deserialization rejection.
    #[serde(rename = "newDrug")]
    pub new_drug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FragmentRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FragmentResponse {
    /// Candidate drug name extracted from the fragment, if any.
    pub candidate: Option<String>,
    /// Whether the detection fired (false: none, or suppressed repeat).
    pub fired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<InteractionVerdict>,
}
