// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderName, Request},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CreateEnvelopeRequest, DeleteEnvelopeResponse, Envelope, EnvelopeId, TransferRequest,
        TransferResponse, UpdateEnvelopeRequest,
    },
    state::AppState,
};

pub mod envelopes;
pub mod health;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let envelope_routes = Router::new()
        .route(
            "/envelopes",
            get(envelopes::list_envelopes).post(envelopes::create_envelope),
        )
        .route(
            "/envelopes/{id}",
            get(envelopes::get_envelope)
                .put(envelopes::update_envelope)
                .delete(envelopes::delete_envelope),
        )
        .route(
            "/envelopes/transfer/{from}/{to}",
            post(envelopes::transfer_funds),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/", get(index))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(envelope_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or("-");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive()),
        )
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Greeting", body = String))
)]
pub async fn index() -> &'static str {
    "Hello World!"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index,
        envelopes::create_envelope,
        envelopes::list_envelopes,
        envelopes::get_envelope,
        envelopes::update_envelope,
        envelopes::delete_envelope,
        envelopes::transfer_funds,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            Envelope,
            EnvelopeId,
            CreateEnvelopeRequest,
            UpdateEnvelopeRequest,
            TransferRequest,
            TransferResponse,
            DeleteEnvelopeResponse,
            health::ReadyResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Envelopes", description = "Envelope budgeting and transfers"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
