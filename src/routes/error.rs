use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::store::StoreError;

#[derive(thiserror::Error)]
pub enum SubscriptionApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for SubscriptionApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;

        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            write!(f, "\nCaused by:\n\t{}", cause)?;
            source = cause.source();
        }

        Ok(())
    }
}

impl ResponseError for SubscriptionApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscriptionApiError::StoreError(err) => match err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
                StoreError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Consistency { .. } | StoreError::Unexpected(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
