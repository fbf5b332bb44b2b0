// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::registry::RegistryError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_argument", message)
    }

    /// Maps a registry error for single-envelope lookups (get, delete).
    ///
    /// These endpoints answer a missing envelope with 400 rather than 404.
    pub fn lookup(err: RegistryError) -> Self {
        let mut api_error = Self::from(err);
        if api_error.status == StatusCode::NOT_FOUND {
            api_error.status = StatusCode::BAD_REQUEST;
        }
        api_error
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let (status, code) = match &err {
            RegistryError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
            RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            RegistryError::InsufficientFunds { .. } => {
                (StatusCode::BAD_REQUEST, "insufficient_funds")
            }
        };
        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(
            status = %self.status,
            error_code = self.code,
            "Request rejected: {}",
            self.message
        );
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}
