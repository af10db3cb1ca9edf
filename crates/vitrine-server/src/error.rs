use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vitrine_icns::IcnsError;

/// Request-boundary errors. Each variant maps to exactly one HTTP status and
/// a safe, user-facing message; internal detail stays in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-image or undecodable upload. User-correctable.
    #[error("invalid or undecodable image; accepted formats include PNG, JPEG and WebP")]
    InvalidImage,

    #[error("payload too large; uploads are capped at 20 MiB")]
    PayloadTooLarge,

    /// All conversion slots are taken. Transient; retry later.
    #[error("server busy converting other icons; try again shortly")]
    ServerBusy,

    /// Conversion failed for a reason the user cannot fix.
    #[error("icon conversion failed")]
    Conversion,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidImage => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServerBusy => StatusCode::SERVICE_UNAVAILABLE,
            Self::Conversion => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<IcnsError> for ApiError {
    fn from(err: IcnsError) -> Self {
        match err {
            IcnsError::InvalidImage(_) => Self::InvalidImage,
            IcnsError::Encode(_) | IcnsError::Packager(_) | IcnsError::Io(_) => Self::Conversion,
        }
    }
}
