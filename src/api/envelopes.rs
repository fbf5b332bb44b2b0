// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Envelope API endpoints.
//!
//! Handlers convert raw JSON fields into typed registry inputs, run the
//! registry operation under the appropriate lock, and map failures to
//! [`ApiError`]. Lookups (get, delete) answer a missing envelope with 400;
//! update and transfer answer it with 404.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{
        CreateEnvelopeRequest, DeleteEnvelopeResponse, Envelope, EnvelopeId, TransferRequest,
        TransferResponse, UpdateEnvelopeRequest,
    },
    registry::EnvelopeUpdate,
    state::AppState,
};

const INVALID_CREATE: &str = "Invalid request. Please provide a title and a positive budget.";
const INVALID_TITLE: &str = "Invalid title. It must be a non-empty string.";

fn envelope_id(path: Result<Path<u64>, PathRejection>) -> Result<EnvelopeId, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::bad_request(format!("Invalid envelope ID: {e}")))?;
    Ok(EnvelopeId(id))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(request)
}

fn title_field(value: Option<Value>) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(Value::String(title)) => Ok(Some(title)),
        Some(_) => Err(ApiError::invalid_argument(INVALID_TITLE)),
    }
}

fn amount_field(value: Option<Value>, field: &str) -> Result<Option<f64>, ApiError> {
    match value {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            ApiError::invalid_argument(format!("Invalid {field}. It must be a positive number."))
        }),
    }
}

#[utoipa::path(
    post,
    path = "/envelopes",
    request_body = CreateEnvelopeRequest,
    tag = "Envelopes",
    responses(
        (status = 200, description = "Envelope created", body = Envelope),
        (status = 400, description = "Missing title or non-positive budget")
    )
)]
pub async fn create_envelope(
    State(state): State<AppState>,
    payload: Result<Json<CreateEnvelopeRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let request = body(payload)?;
    let title =
        title_field(request.title).map_err(|_| ApiError::invalid_argument(INVALID_CREATE))?;
    let budget = amount_field(request.budget, "budget")
        .map_err(|_| ApiError::invalid_argument(INVALID_CREATE))?;
    let (Some(title), Some(budget)) = (title, budget) else {
        return Err(ApiError::invalid_argument(INVALID_CREATE));
    };

    let mut registry = state.registry.write().await;
    let envelope = registry.create(&title, budget)?;
    Ok(Json(envelope))
}

#[utoipa::path(
    get,
    path = "/envelopes",
    tag = "Envelopes",
    responses((status = 200, description = "All envelopes in creation order", body = [Envelope]))
)]
pub async fn list_envelopes(State(state): State<AppState>) -> Json<Vec<Envelope>> {
    let registry = state.registry.read().await;
    let envelopes = registry.list();
    tracing::debug!(count = envelopes.len(), "Listed envelopes");
    Json(envelopes)
}

#[utoipa::path(
    get,
    path = "/envelopes/{id}",
    params(("id" = u64, Path, description = "Envelope ID")),
    tag = "Envelopes",
    responses(
        (status = 200, description = "Envelope details", body = Envelope),
        (status = 400, description = "Envelope not found or invalid ID")
    )
)]
pub async fn get_envelope(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let id = envelope_id(path)?;
    let registry = state.registry.read().await;
    let envelope = registry.get(id).map_err(ApiError::lookup)?;
    Ok(Json(envelope))
}

#[utoipa::path(
    put,
    path = "/envelopes/{id}",
    params(("id" = u64, Path, description = "Envelope ID")),
    request_body = UpdateEnvelopeRequest,
    tag = "Envelopes",
    responses(
        (status = 200, description = "Updated envelope", body = Envelope),
        (status = 400, description = "Invalid field or insufficient budget"),
        (status = 404, description = "Envelope not found")
    )
)]
pub async fn update_envelope(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateEnvelopeRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let id = envelope_id(path)?;
    let request = body(payload)?;

    let mut registry = state.registry.write().await;
    // A missing envelope takes precedence over malformed fields.
    registry.get(id)?;

    let update = EnvelopeUpdate {
        title: title_field(request.title)?,
        budget: amount_field(request.budget, "budget")?,
        subtract: amount_field(request.subtract, "subtract value")?,
    };
    let envelope = registry.update(id, update)?;
    Ok(Json(envelope))
}

#[utoipa::path(
    delete,
    path = "/envelopes/{id}",
    params(("id" = u64, Path, description = "Envelope ID")),
    tag = "Envelopes",
    responses(
        (status = 200, description = "Envelope deleted", body = DeleteEnvelopeResponse),
        (status = 400, description = "Envelope not found or invalid ID")
    )
)]
pub async fn delete_envelope(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<DeleteEnvelopeResponse>, ApiError> {
    let id = envelope_id(path)?;
    let mut registry = state.registry.write().await;
    let removed = registry.delete(id).map_err(ApiError::lookup)?;

    Ok(Json(DeleteEnvelopeResponse {
        message: "Envelope deleted successfully".to_string(),
        envelope_id: removed.id,
    }))
}

#[utoipa::path(
    post,
    path = "/envelopes/transfer/{from}/{to}",
    params(
        ("from" = u64, Path, description = "Source envelope ID"),
        ("to" = u64, Path, description = "Destination envelope ID")
    ),
    request_body = TransferRequest,
    tag = "Envelopes",
    responses(
        (status = 200, description = "Funds transferred", body = TransferResponse),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 404, description = "Source or destination envelope not found")
    )
)]
pub async fn transfer_funds(
    State(state): State<AppState>,
    path: Result<Path<(u64, u64)>, PathRejection>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Path((from, to)) =
        path.map_err(|e| ApiError::bad_request(format!("Invalid envelope ID: {e}")))?;
    let (from, to) = (EnvelopeId(from), EnvelopeId(to));
    let request = body(payload)?;

    let mut registry = state.registry.write().await;
    registry.get(from)?;
    registry.get(to)?;

    let amount = amount_field(request.amount, "amount")?.ok_or_else(|| {
        ApiError::invalid_argument("Invalid amount. It must be a positive number.")
    })?;
    let (from_envelope, to_envelope) = registry.transfer(from, to, amount)?;

    Ok(Json(TransferResponse {
        message: format!(
            "Successfully transferred {amount} from envelope ID {from} to envelope ID {to}"
        ),
        from_envelope,
        to_envelope,
    }))
}
