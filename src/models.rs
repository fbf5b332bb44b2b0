// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the envelope type held by the registry and the
//! request and response structures used by the REST API. All wire types
//! derive `ToSchema` for OpenAPI documentation.
//!
//! ## Envelope Identifier Type
//!
//! The [`EnvelopeId`] newtype wraps the integer identifier assigned by the
//! registry. Identifiers are handed out in increasing order and never reused.
//!
//! ## Request Bodies
//!
//! Request fields are kept as raw JSON values. A title that is not a string
//! or an amount that is not a number must surface as an invalid-argument
//! error rather than a deserialization failure, so the handlers check the
//! field types themselves.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// Envelope Identifier Type
// =============================================================================

/// Registry-assigned envelope identifier.
///
/// Serializes as a bare integer.
///
/// # Example
///
/// ```rust,ignore
/// let id = EnvelopeId::from(1);
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct EnvelopeId(pub u64);

impl EnvelopeId {
    /// The identifier that follows this one.
    pub fn next(self) -> Self {
        EnvelopeId(self.0 + 1)
    }
}

impl std::fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EnvelopeId {
    fn from(value: u64) -> Self {
        EnvelopeId(value)
    }
}

impl From<EnvelopeId> for u64 {
    fn from(value: EnvelopeId) -> Self {
        value.0
    }
}

// =============================================================================
// Envelope Model
// =============================================================================

/// A named budget envelope.
///
/// The budget is never negative once an operation completes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Envelope {
    /// Unique identifier, assigned at creation.
    pub id: EnvelopeId,
    /// Envelope name, stored trimmed.
    pub title: String,
    /// Remaining budget.
    pub budget: f64,
}

// =============================================================================
// Request Models
// =============================================================================

/// Request to create a new envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateEnvelopeRequest {
    /// Envelope name. Must be a non-blank string.
    #[schema(value_type = String)]
    pub title: Option<Value>,
    /// Initial budget. Must be a number greater than zero.
    #[schema(value_type = f64)]
    pub budget: Option<Value>,
}

/// Request to update an existing envelope.
///
/// Present fields are applied in order: title, budget, subtract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEnvelopeRequest {
    /// New envelope name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    /// New absolute budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub budget: Option<Value>,
    /// Amount to subtract from the budget (after any new budget is set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub subtract: Option<Value>,
}

/// Request to move funds between two envelopes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Amount to move. Must be a number greater than zero.
    #[schema(value_type = f64)]
    pub amount: Option<Value>,
}

// =============================================================================
// Response Models
// =============================================================================

/// Response after a successful transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Human-readable summary of the transfer.
    pub message: String,
    /// Source envelope after the debit.
    pub from_envelope: Envelope,
    /// Destination envelope after the credit.
    pub to_envelope: Envelope,
}

/// Response after deleting an envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteEnvelopeResponse {
    /// Message indicating success.
    pub message: String,
    /// The ID of the deleted envelope.
    pub envelope_id: EnvelopeId,
}
