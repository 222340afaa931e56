// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::amount::AmountError;
use crate::backend::BackendError;
use crate::transfer::TransferError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", message)
    }

    /// The caller has not completed the self-custody acknowledgment.
    pub fn acknowledgment_required() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "acknowledgment_required",
            "Complete the self-custody security acknowledgment first",
        )
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let message = e.to_string();
        match e {
            TransferError::InvalidAmount(_) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_amount", message)
            }
            TransferError::InvalidDestination => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_destination", message)
            }
            TransferError::NoWalletsAvailable => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_wallets_available",
                message,
            ),
            TransferError::SubmissionInFlight => {
                Self::new(StatusCode::CONFLICT, "submission_in_flight", message)
            }
            TransferError::ExternalFailure(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "external_failure", message)
            }
        }
    }
}

impl From<AmountError> for ApiError {
    fn from(e: AmountError) -> Self {
        TransferError::InvalidAmount(e).into()
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        let message = e.to_string();
        match e {
            BackendError::Rejected(_) | BackendError::InvalidResponse(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "external_failure", message)
            }
            BackendError::Unavailable(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let down = ApiError::service_unavailable("missing");
        assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.code, "bad_request");

        let gate = ApiError::acknowledgment_required();
        assert_eq!(gate.status, StatusCode::FORBIDDEN);
        assert_eq!(gate.code, "acknowledgment_required");
    }

    #[test]
    fn transfer_errors_map_to_statuses() {
        let cases = [
            (
                TransferError::InvalidAmount(AmountError::Empty),
                StatusCode::BAD_REQUEST,
            ),
            (TransferError::InvalidDestination, StatusCode::BAD_REQUEST),
            (
                TransferError::NoWalletsAvailable,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (TransferError::SubmissionInFlight, StatusCode::CONFLICT),
            (
                TransferError::ExternalFailure("down".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn external_failure_message_is_untouched() {
        let err = ApiError::from(TransferError::ExternalFailure(
            "Insufficient platform balance".to_string(),
        ));
        assert_eq!(err.message, "Insufficient platform balance");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data","errorCode":"bad_request"}"#);
    }
}
