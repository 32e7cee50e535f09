//! API error type and its single mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foyer_mediator::MediatorError;
use foyer_store::StoreError;
use foyer_types::MemberId;
use foyer_verification::VerificationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authorization required: {0}")]
    AuthorizationRequired(String),
    #[error("unknown member {0}")]
    UnknownMember(MemberId),
    #[error("the verification code could not be delivered")]
    CodeDeliveryFailed,
    #[error("{0}")]
    NotSupported(&'static str),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Mediator(#[from] MediatorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// The one place where API failures become HTTP statuses. Domain
    /// failures all surface as 500, matching what existing clients of
    /// the legacy endpoint already handle; only authorization gets a
    /// distinct status.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::AuthorizationRequired(_) => {
                (StatusCode::FORBIDDEN, "authorization_required")
            }
            ApiError::UnknownMember(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unknown_member"),
            ApiError::CodeDeliveryFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "code_delivery_failed")
            }
            ApiError::NotSupported(_) => (StatusCode::INTERNAL_SERVER_ERROR, "not_supported"),
            ApiError::Verification(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, verification_code(err))
            }
            ApiError::Mediator(err) => (StatusCode::INTERNAL_SERVER_ERROR, mediator_code(err)),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
        }
    }
}

fn verification_code(err: &VerificationError) -> &'static str {
    match err {
        VerificationError::InvalidEmailFormat(_) => "invalid_email_format",
        VerificationError::InvalidInput(_) => "invalid_input",
        VerificationError::AlreadySubmitted => "already_submitted",
        VerificationError::NotSubmitted => "not_submitted",
        VerificationError::AlreadyConfirmed => "already_confirmed",
        VerificationError::MarkedSpam => "marked_spam",
        VerificationError::WrongCode => "wrong_code",
        VerificationError::Store(_) => "store_error",
    }
}

fn mediator_code(err: &MediatorError) -> &'static str {
    match err {
        MediatorError::EmailNotConfirmed => "email_not_confirmed",
        MediatorError::UnknownMember(_) => "unknown_member",
        MediatorError::MissingVisitorEmail => "missing_visitor_email",
        MediatorError::DeliveryFailed(_) => "delivery_failed",
        MediatorError::Verification(err) => verification_code(err),
        MediatorError::Store(_) => "store_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
