use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Unavailable,
    Upstream,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_travel_in_snake_case() {
        let err = ApiError::new(ErrorCode::NotFound, "no such route");
        let value = serde_json::to_value(&err).expect("json");
        assert_eq!(
            value,
            serde_json::json!({ "code": "not_found", "message": "no such route" })
        );
        assert_eq!(
            serde_json::from_value::<ApiError>(value).expect("decode"),
            err
        );
    }
}
