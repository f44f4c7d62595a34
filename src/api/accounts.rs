// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{password, Authenticated, Principal, Role},
    error::ApiError,
    models::{AccountResponse, CreateAccountRequest, UpdateAccountRequest},
    state::AppState,
};

/// Minimum accepted password length for sign-up.
const MIN_PASSWORD_CHARS: usize = 8;

fn ensure_owner_or_admin(principal: &Principal, account_id: Uuid) -> Result<(), ApiError> {
    if principal.account_id == account_id || principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("You may only manage your own account."))
    }
}

#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    tag = "Accounts",
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    if !request.email.as_str().contains('@') {
        return Err(ApiError::bad_request("A valid email address is required."));
    }
    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters long.",
        ));
    }
    if request.nickname.trim().is_empty() {
        return Err(ApiError::bad_request("A nickname is required."));
    }

    let password_hash = password::hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to process password: {e}")))?;

    let mut store = state.store.write().await;
    let account = store.create_account(request, password_hash, Role::Member)?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

#[utoipa::path(
    get,
    path = "/v1/accounts",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All accounts, newest first", body = [AccountResponse]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_accounts(
    Authenticated(_principal): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let store = state.store.read().await;
    let accounts = store
        .list_newest_first()
        .iter()
        .map(AccountResponse::from)
        .collect();
    Ok(Json(accounts))
}

/// Get the current authenticated caller's own account.
#[utoipa::path(
    get,
    path = "/v1/accounts/me",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's account", body = AccountResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_account(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let store = state.store.read().await;
    let account = store.get(principal.account_id)?;
    Ok(Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}",
    params(
        ("account_id" = Uuid, Path, description = "Identifier of the account to fetch")
    ),
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The account", body = AccountResponse),
        (status = 404, description = "Account not found"),
    )
)]
pub async fn get_account(
    Authenticated(_principal): Authenticated,
    Path(account_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let store = state.store.read().await;
    let account = store.get(account_id)?;
    Ok(Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    put,
    path = "/v1/accounts/{account_id}",
    params(
        ("account_id" = Uuid, Path, description = "Identifier of the account to update")
    ),
    request_body = UpdateAccountRequest,
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "Account not found"),
    )
)]
pub async fn update_account(
    Authenticated(principal): Authenticated,
    Path(account_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    ensure_owner_or_admin(&principal, account_id)?;

    let mut store = state.store.write().await;
    let account = store.update_account(account_id, request)?;
    Ok(Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    delete,
    path = "/v1/accounts/{account_id}",
    params(
        ("account_id" = Uuid, Path, description = "Identifier of the account to delete")
    ),
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "Account not found"),
    )
)]
pub async fn delete_account(
    Authenticated(principal): Authenticated,
    Path(account_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    ensure_owner_or_admin(&principal, account_id)?;

    let mut store = state.store.write().await;
    store.delete_account(account_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the caller's favorite mark on the target account.
#[utoipa::path(
    post,
    path = "/v1/accounts/{account_id}/favorite",
    params(
        ("account_id" = Uuid, Path, description = "Identifier of the account to favorite")
    ),
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Target account after the toggle", body = AccountResponse),
        (status = 404, description = "Account not found"),
    )
)]
pub async fn favorite_account(
    Authenticated(principal): Authenticated,
    Path(account_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let mut store = state.store.write().await;
    let account = store.toggle_favorite(account_id, principal.account_id)?;
    Ok(Json(AccountResponse::from(&account)))
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}/favorites",
    params(
        ("account_id" = Uuid, Path, description = "Identifier of the favorited account")
    ),
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Accounts that favorited the target", body = [AccountResponse]),
        (status = 404, description = "Account not found"),
    )
)]
pub async fn list_favorites(
    Authenticated(_principal): Authenticated,
    Path(account_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let store = state.store.read().await;
    let favorites = store
        .favorites_of(account_id)?
        .iter()
        .map(AccountResponse::from)
        .collect();
    Ok(Json(favorites))
}
