//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use orderhub_campaign::RedemptionError;
use orderhub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// Infrastructure or request-shape failure.
    App(AppError),
    /// The ledger refused the redemption.
    Redemption(RedemptionError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<RedemptionError> for ApiError {
    fn from(err: RedemptionError) -> Self {
        match err {
            RedemptionError::Store(inner) => Self::App(inner),
            other => Self::Redemption(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::App(err) => app_error_response(err),
            Self::Redemption(err) => redemption_response(err),
        }
    }
}

fn app_error_response(err: AppError) -> Response {
    let (status, error_code) = match err.kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Internal
        | ErrorKind::Store
        | ErrorKind::Configuration
        | ErrorKind::Serialization => {
            tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    let body = ApiErrorResponse {
        error: error_code.to_string(),
        message: err.message,
        details: None,
    };

    (status, Json(body)).into_response()
}

fn redemption_response(err: RedemptionError) -> Response {
    let (status, details) = match &err {
        RedemptionError::NotFound { code } => (StatusCode::NOT_FOUND, Some(json!({ "code": code }))),
        RedemptionError::Expired(reason) => (StatusCode::GONE, Some(json!({ "reason": reason }))),
        RedemptionError::BelowMinimum { minimum, total } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Some(json!({ "minimumPurchase": minimum, "totalAmount": total })),
        ),
        RedemptionError::UserLimitReached => (StatusCode::CONFLICT, None),
        RedemptionError::InvalidAmount => (StatusCode::UNPROCESSABLE_ENTITY, None),
        RedemptionError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    let body = ApiErrorResponse {
        error: err.reason_code().to_string(),
        message: err.to_string(),
        details,
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use orderhub_campaign::InvalidityReason;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_expired_maps_to_gone() {
        let response =
            ApiError::from(RedemptionError::Expired(InvalidityReason::UsageLimitReached)).into_response();
        assert_eq!(response.status(), StatusCode::GONE);

        let body = body_json(response).await;
        assert_eq!(body["error"], "EXPIRED");
        assert_eq!(body["details"]["reason"], "usage_limit_reached");
    }

    #[tokio::test]
    async fn test_rejection_statuses() {
        let cases = [
            (RedemptionError::NotFound { code: "X".into() }, StatusCode::NOT_FOUND),
            (RedemptionError::UserLimitReached, StatusCode::CONFLICT),
            (RedemptionError::InvalidAmount, StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let err = RedemptionError::Store(AppError::store("connection reset"));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "INTERNAL_ERROR");
    }
}
