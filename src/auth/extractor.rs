// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors over the per-request authentication context.
//!
//! The gate in [`middleware`](super::middleware) is the single writer of
//! the context; these extractors are its readers. They never re-verify
//! tokens: by the time a handler runs, authentication has already happened
//! (or deliberately not happened). What the extractors decide is
//! *authorization*, i.e. whether this particular handler tolerates an
//! anonymous caller.
//!
//! - [`CurrentPrincipal`] never rejects; handlers that serve both anonymous
//!   and authenticated callers read it and branch themselves.
//! - [`Authenticated`] rejects anonymous requests with `401`.
//! - [`AdminOnly`] additionally rejects non-admin principals with `403`.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::Principal;
use super::error::AuthError;

/// The current principal, if the gate bound one.
///
/// ```rust,ignore
/// async fn handler(CurrentPrincipal(principal): CurrentPrincipal) -> impl IntoResponse {
///     // principal is Option<Principal>
/// }
/// ```
pub struct CurrentPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentPrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

/// Extractor that requires an authenticated principal.
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Extractor that requires an admin principal.
pub struct AdminOnly(pub Principal);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(principal) = Authenticated::from_request_parts(parts, state).await?;

        if !principal.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::Email;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            account_id: Uuid::new_v4(),
            subject: Email::new("user@example.com"),
            authorities: role.authorities(),
        }
    }

    fn parts_with(principal: Option<Principal>) -> Parts {
        let mut parts = axum::http::Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(principal) = principal {
            parts.extensions.insert(principal);
        }
        parts
    }

    #[tokio::test]
    async fn current_principal_is_none_without_binding() {
        let mut parts = parts_with(None);
        let CurrentPrincipal(current) = CurrentPrincipal::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn current_principal_reads_the_bound_principal() {
        let bound = principal(Role::Member);
        let mut parts = parts_with(Some(bound.clone()));

        let CurrentPrincipal(current) = CurrentPrincipal::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(current, Some(bound));
    }

    #[tokio::test]
    async fn authenticated_rejects_anonymous_requests() {
        let mut parts = parts_with(None);
        let result = Authenticated::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn authenticated_returns_the_bound_principal() {
        let bound = principal(Role::Member);
        let mut parts = parts_with(Some(bound.clone()));

        let Authenticated(current) = Authenticated::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(current, bound);
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let mut parts = parts_with(Some(principal(Role::Member)));
        let result = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let mut parts = parts_with(Some(principal(Role::Admin)));
        let result = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn extractors_never_authenticate_by_themselves() {
        // A bearer header alone must not authenticate: only the gate binds
        // principals, extractors just read.
        let mut parts = axum::http::Request::builder()
            .uri("/test")
            .header("authorization", "Bearer some.jwt.token")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let CurrentPrincipal(current) = CurrentPrincipal::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(current.is_none());

        let result = Authenticated::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn principal_equality_covers_authorities() {
        let a = principal(Role::Member);
        let mut b = a.clone();
        b.authorities = BTreeSet::from([Role::Admin, Role::Member]);
        assert_ne!(a, b);
    }
}
