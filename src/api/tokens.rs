// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.
//!
//! Exchanges account credentials for a signed bearer token. Unknown email
//! and wrong password are deliberately indistinguishable to the caller.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::password,
    error::ApiError,
    models::Email,
    state::AppState,
};

/// Request for POST /v1/tokens
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Account email address.
    pub email: Email,
    /// Plain-text password.
    pub password: String,
}

/// Response for POST /v1/tokens
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

#[utoipa::path(
    post,
    path = "/v1/tokens",
    request_body = TokenRequest,
    tag = "Tokens",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let account = {
        let store = state.store.read().await;
        store.find_by_email(&request.email)
    };

    let Some(account) = account else {
        return Err(ApiError::unauthorized("Invalid email or password."));
    };

    if !password::verify_password(&request.password, &account.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password."));
    }

    let issued = state
        .codec
        .issue(account.email.as_str())
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::CreateAccountRequest;
    use axum::http::StatusCode;

    async fn seed_with_password(state: &AppState, email: &str, plain: &str) {
        let hash = password::hash_password(plain).expect("hashing succeeds");
        state
            .store
            .write()
            .await
            .create_account(
                CreateAccountRequest {
                    email: Email::new(email),
                    password: plain.into(),
                    nickname: "user".into(),
                    one_line_introduce: None,
                    image: None,
                },
                hash,
                Role::Member,
            )
            .expect("account creation succeeds");
    }

    #[tokio::test]
    async fn valid_credentials_yield_a_decodable_token() {
        let state = AppState::default();
        seed_with_password(&state, "user@example.com", "correct horse battery staple").await;

        let Json(response) = issue_token(
            State(state.clone()),
            Json(TokenRequest {
                email: Email::new("user@example.com"),
                password: "correct horse battery staple".into(),
            }),
        )
        .await
        .expect("token issuance succeeds");

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);

        let claims = state.codec.decode(&response.access_token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let state = AppState::default();
        seed_with_password(&state, "user@example.com", "correct horse battery staple").await;

        let err = issue_token(
            State(state),
            Json(TokenRequest {
                email: Email::new("user@example.com"),
                password: "Tr0ub4dor&3".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_email_is_indistinguishable_from_wrong_password() {
        let state = AppState::default();
        seed_with_password(&state, "user@example.com", "correct horse battery staple").await;

        let known = issue_token(
            State(state.clone()),
            Json(TokenRequest {
                email: Email::new("user@example.com"),
                password: "wrong password".into(),
            }),
        )
        .await
        .unwrap_err();

        let unknown = issue_token(
            State(state),
            Json(TokenRequest {
                email: Email::new("ghost@example.com"),
                password: "wrong password".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(known.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status, known.status);
        assert_eq!(unknown.message, known.message);
    }
}
