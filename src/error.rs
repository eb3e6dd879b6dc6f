use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestration::PricingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// The checkout caller must receive the literal calculation error message;
/// it must never fabricate a fee to let checkout proceed silently.
impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidRequest(msg) => AppError::BadRequest(msg),
            PricingError::Configuration(_)
            | PricingError::CatalogMismatch(_)
            | PricingError::DeliveryRadiusExceeded { .. } => {
                AppError::Unprocessable(err.to_string())
            }
            PricingError::DistanceUnavailable(_) | PricingError::DeliveryQuote(_) => {
                AppError::UpstreamUnavailable(err.to_string())
            }
            PricingError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DistanceUnit, Money};

    #[test]
    fn test_pricing_error_mapping() {
        let err: AppError = PricingError::InvalidRequest("cart is empty".to_string()).into();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err: AppError = PricingError::DistanceUnavailable("timeout".to_string()).into();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));

        let err: AppError = PricingError::DeliveryRadiusExceeded {
            address: "2 Side St".to_string(),
            radius: Money::from_str_canonical("10").unwrap(),
            unit: DistanceUnit::Km,
            distance: Money::from_str_canonical("12").unwrap(),
        }
        .into();
        match &err {
            AppError::Unprocessable(msg) => {
                assert_eq!(msg, "2 Side St is outside the 10km delivery radius");
            }
            other => panic!("expected Unprocessable, got {:?}", other),
        }
    }
}
