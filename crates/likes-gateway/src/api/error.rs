// HTTP mapping for core errors.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use likes_core::error::{ClientCode, LikesError};

#[derive(Debug)]
pub struct ApiError(pub LikesError);

impl From<LikesError> for ApiError {
    fn from(e: LikesError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::InvalidKey => StatusCode::BAD_REQUEST,
            ClientCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
