// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Envelope Budget Server - In-Memory Envelope Budgeting Service
//!
//! This crate provides an HTTP service for managing named budget envelopes.
//! Envelopes live in an in-memory [`registry::EnvelopeRegistry`] shared by all
//! requests; funds can be moved between envelopes atomically.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and OpenAPI document
//! - `registry` - Envelope registry and its validation rules
//! - `config` - Environment configuration
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod state;
pub mod telemetry;
