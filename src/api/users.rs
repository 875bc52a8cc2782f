// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: login, administration and the current principal.

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::{
    auth::{password::hash_password_blocking, AdminOnly, Auth, AuthError},
    error::ApiError,
    models::{LoginRequest, LoginResponse, RegisterRequest, UserMeResponse, UserView, TOKEN_TYPE},
    state::AppState,
    store::Credential,
};

/// Exchange username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/v1/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "User authentication failed", body = crate::error::ApiResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let principal = state
        .resolver
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state
        .codec
        .issue(principal.username(), principal.authority_labels(), Utc::now())
        .map_err(|err| AuthError::Internal(err.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: state.codec.validity().as_secs(),
    }))
}

/// Register a new user with the default authority group.
#[utoipa::path(
    post,
    path = "/v1/users/register",
    tag = "Users",
    security(("bearer" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Blank username or password", body = crate::error::ApiResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = crate::error::ApiResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ApiResponse),
        (status = 409, description = "Username already exists", body = crate::error::ApiResponse),
    )
)]
pub async fn register(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, [(axum::http::HeaderName, String); 1], Json<UserView>), ApiError> {
    let username = request.username.trim();
    if username.is_empty() || request.password.trim().is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    if state.store.find_by_username(username).await?.is_some() {
        return Err(ApiError::conflict(format!("User {username} already exists")));
    }

    let password_hash = hash_password_blocking(request.password).await.map_err(|err| {
        tracing::error!(error = %err, "failed to hash password");
        ApiError::internal("Failed to register user")
    })?;

    let mut credential = Credential::new(
        username,
        password_hash,
        [state.resolver.mapper().default_group()],
    );
    credential.first_name = request.first_name;
    credential.last_name = request.last_name;
    credential.email = request.email;

    let created = state.store.insert(credential).await?;
    tracing::info!(
        username = %created.username,
        registered_by = admin.username(),
        "user registered"
    );

    let location = format!("/v1/users/{}", created.username);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(UserView::from(&created)),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/users/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User found", body = UserView),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ApiResponse),
        (status = 404, description = "No such user", body = crate::error::ApiResponse),
    )
)]
pub async fn get_user(
    AdminOnly(_admin): AdminOnly,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserView>, ApiError> {
    let credential = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {username} not found")))?;
    Ok(Json(UserView::from(&credential)))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = [UserView]),
        (status = 204, description = "No users"),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ApiResponse),
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let users: Vec<UserView> = state.store.list().await?.iter().map(UserView::from).collect();
    if users.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(users).into_response())
}

/// Get the current authenticated principal.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = crate::error::ApiResponse),
    )
)]
pub async fn current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(UserMeResponse::from(&principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{password::hash_password, AuthorityGroup, Principal};
    use std::collections::BTreeSet;

    fn admin() -> AdminOnly {
        AdminOnly(Principal::new(
            "root",
            BTreeSet::from([AuthorityGroup::Admin.authority()]),
        ))
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn login_success_issues_verifiable_token() {
        let state = AppState::for_tests();
        state
            .store
            .insert(Credential::new(
                "alice",
                hash_password("pw").unwrap(),
                [AuthorityGroup::User],
            ))
            .await
            .unwrap();

        let Json(response) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "pw".into(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 300);

        let claims = state.codec.decode(&response.token, Utc::now()).unwrap();
        assert_eq!(claims.subject(), "alice");
        assert_eq!(claims.authorities(), ["ROLE_USER"]);
    }

    #[tokio::test]
    async fn login_unknown_user_fails() {
        let state = AppState::for_tests();
        let result = login(
            State(state),
            Json(LoginRequest {
                username: "nobody".into(),
                password: "pw".into(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AuthError::NoCredentialFound)));
    }

    #[tokio::test]
    async fn register_creates_user_with_default_group() {
        let state = AppState::for_tests();
        let (status, headers, Json(view)) = register(
            admin(),
            State(state.clone()),
            Json(register_request("bob", "pw")),
        )
        .await
        .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[0].1, "/v1/users/bob");
        assert_eq!(view.username, "bob");
        assert_eq!(view.first_name.as_deref(), Some("Ada"));
        assert_eq!(view.groups, BTreeSet::from([AuthorityGroup::User]));

        let stored = state.store.find_by_username("bob").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw");
        assert!(state.resolver.authenticate("bob", "pw").await.is_ok());
    }

    #[tokio::test]
    async fn register_duplicate_is_conflict() {
        let state = AppState::for_tests();
        register(admin(), State(state.clone()), Json(register_request("bob", "pw")))
            .await
            .unwrap();
        let err = register(admin(), State(state), Json(register_request("bob", "other")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_blank_fields_is_bad_request() {
        let state = AppState::for_tests();
        let err = register(admin(), State(state), Json(register_request("  ", "pw")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let state = AppState::for_tests();
        let err = get_user(admin(), Path("ghost".to_string()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_users_empty_is_no_content() {
        let state = AppState::for_tests();
        let response = list_users(admin(), State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn current_user_reports_authorities() {
        let principal = Principal::new("alice", BTreeSet::from([AuthorityGroup::User.authority()]));
        let Json(response) = current_user(Auth(principal)).await;
        assert_eq!(response.username, "alice");
        assert_eq!(response.authorities, BTreeSet::from(["ROLE_USER".to_string()]));
    }
}
