// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth,
    models::{AccountResponse, CreateAccountRequest, UpdateAccountRequest},
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod tokens;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/tokens", post(tokens::issue_token))
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/accounts/me", get(accounts::get_current_account))
        .route(
            "/accounts/{account_id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route(
            "/accounts/{account_id}/favorite",
            post(accounts::favorite_account),
        )
        .route(
            "/accounts/{account_id}/favorites",
            get(accounts::list_favorites),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state.clone())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // The gate runs on every route; anonymous requests continue and the
        // handlers' extractors decide whether that is acceptable.
        .layer(middleware::from_fn_with_state(
            state,
            auth::middleware::authenticate,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::create_account,
        accounts::list_accounts,
        accounts::get_current_account,
        accounts::get_account,
        accounts::update_account,
        accounts::delete_account,
        accounts::favorite_account,
        accounts::list_favorites,
        tokens::issue_token,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AccountResponse,
            CreateAccountRequest,
            UpdateAccountRequest,
            tokens::TokenRequest,
            tokens::TokenResponse,
            health::ReadyResponse,
            health::HealthResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Account directory and favorites"),
        (name = "Tokens", description = "Bearer token issuance"),
        (name = "Health", description = "Service probes")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
