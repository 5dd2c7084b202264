//! Custom error types for the rental service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::BookingStatus;

/// Custom error type for the rental service
#[derive(Error, Debug)]
pub enum ApiError {
    /// An account with the same email already exists
    #[error("User already exists")]
    DuplicateAccount,

    /// No account matches the submitted email/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An OTP was requested without a target email
    #[error("Please enter your email address")]
    MissingEmail,

    /// No code was issued for this email, or the challenge has lapsed
    #[error("OTP expired or invalid. Please request a new OTP.")]
    NoActiveChallenge,

    /// The submitted code does not match the issued one
    #[error("Invalid OTP. Please try again.")]
    InvalidCode,

    /// A fresh code was requested before the resend window elapsed
    #[error("OTP already sent. Please wait before requesting a new one.")]
    ResendCooldown,

    /// The booking window is empty or runs backwards
    #[error("Booking end time must be after the start time")]
    InvalidWindow,

    #[error("Booking not found")]
    NotFound,

    /// The requested status change is not in the allowed set
    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Confirmation attempted before both verification flags were set
    #[error("Both OTP and Government ID verification are required before approving")]
    VerificationIncomplete,

    /// The profile store rejected a write
    #[error("Failed to save changes. Please try again.")]
    Persistence(#[from] common::error::StorageError),

    /// A stored or submitted record could not be encoded or decoded
    #[error("Internal server error")]
    Encoding(#[from] serde_json::Error),

    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// The OTP email could not be delivered
    #[error("Failed to send OTP. Please try again.")]
    OtpDelivery,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Administrator access required")]
    Forbidden,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::DuplicateAccount => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::MissingEmail => StatusCode::BAD_REQUEST,
            ApiError::NoActiveChallenge => StatusCode::BAD_REQUEST,
            ApiError::InvalidCode => StatusCode::BAD_REQUEST,
            ApiError::ResendCooldown => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidWindow => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::IllegalTransition { .. } => StatusCode::CONFLICT,
            ApiError::VerificationIncomplete => StatusCode::CONFLICT,
            ApiError::Persistence(err) => {
                tracing::error!("Storage failure: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Encoding(err) => {
                tracing::error!("Encoding failure: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::OtpDelivery => StatusCode::BAD_GATEWAY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for rental service results
pub type ApiResult<T> = Result<T, ApiError>;
