//! Generic response wrapper used by every status endpoint.
//!
//! Success: `{"status":"success","data":...,"warnings":[...]}`
//! Failure: `{"status":"error","errorType":"...","error":"..."}`

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, warnings: Vec<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            error_type: None,
            error: None,
            warnings,
        }
    }

    pub fn error(error_type: &'static str, message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            error_type: Some(error_type),
            error: Some(message),
            warnings: Vec::new(),
        }
    }
}
