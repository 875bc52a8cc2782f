// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::{from_fn, from_fn_with_state},
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
    auth::{
        middleware::{authenticate, require_authenticated},
        AuthorityGroup,
    },
    error::ApiResponse,
    models::{LoginRequest, LoginResponse, RegisterRequest, UserMeResponse, UserView},
    state::AppState,
};

pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/users/login", post(users::login));

    // Everything below needs an authenticated principal; role checks are
    // done by the handlers' extractors.
    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/register", post(users::register))
        .route("/users/me", get(users::current_user))
        .route("/users/{username}", get(users::get_user))
        .route_layer(from_fn(require_authenticated));

    let v1_routes = public_routes.merge(protected_routes);

    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Registers the bearer scheme referenced by `security(("bearer" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        users::login,
        users::register,
        users::get_user,
        users::list_users,
        users::current_user
    ),
    components(
        schemas(
            ApiResponse,
            AuthorityGroup,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            UserView,
            UserMeResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Login and user administration"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
