// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! The gate runs once per request, in front of every route:
//!
//! 1. extract the credential from the configured header (`Authorization:
//!    Bearer <token>` by default);
//! 2. verify it with the [`TokenCodec`](super::TokenCodec);
//! 3. resolve the subject to a [`Principal`] through the store;
//! 4. bind the principal into the request's extensions, unless one is
//!    already bound.
//!
//! Authentication is deliberately separated from authorization: the gate
//! only establishes *who* the caller is. Every failure (absent header,
//! wrong scheme, malformed, tampered or expired token, unknown subject)
//! degrades to "proceed unauthenticated" and the request continues down the
//! chain. Whether an unauthenticated caller is acceptable is decided later
//! by the extractors in [`extractor`](super::extractor). The gate itself
//! never aborts the pipeline and never produces an error response.
//!
//! Nothing here is shared between requests: the principal lives in the
//! request's own extension map and is dropped with the request.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::config::GateSettings;
use crate::state::AppState;

use super::claims::Principal;

/// Authentication gate middleware.
///
/// Apply with `axum::middleware::from_fn_with_state(state, authenticate)`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&state.gate, request.headers()) {
        match state.codec.decode(token) {
            Ok(claims) => match state.resolver.resolve(&claims.sub).await {
                Ok(principal) => {
                    // Subject double-check before binding: the token must
                    // belong to the identity we just resolved.
                    if state.codec.validate(token, principal.subject.as_str()) {
                        bind(&mut request, principal);
                    } else {
                        tracing::warn!(
                            subject = %claims.sub,
                            "token subject mismatch after resolution; proceeding unauthenticated"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        error_code = err.error_code(),
                        subject = %claims.sub,
                        "token subject did not resolve; proceeding unauthenticated"
                    );
                }
            },
            Err(err) => {
                tracing::warn!(
                    error_code = err.error_code(),
                    "bearer token rejected; proceeding unauthenticated"
                );
            }
        }
    }

    next.run(request).await
}

/// Extract the raw token from the configured header.
///
/// An absent header or a different scheme is not an error: the request is
/// simply anonymous. Only an informational log is emitted.
fn bearer_token<'a>(gate: &GateSettings, headers: &'a HeaderMap) -> Option<&'a str> {
    let Some(value) = headers.get(gate.header.as_str()) else {
        tracing::debug!(header = %gate.header, "no credential header; proceeding unauthenticated");
        return None;
    };

    let value = value.to_str().ok()?;
    match value
        .strip_prefix(gate.scheme.as_str())
        .and_then(|rest| rest.strip_prefix(' '))
    {
        Some(token) => Some(token.trim()),
        None => {
            tracing::debug!(
                scheme = %gate.scheme,
                "credential does not use the expected scheme; proceeding unauthenticated"
            );
            None
        }
    }
}

/// Bind the principal to the request, writing at most once.
///
/// A context already bound by an earlier gate pass is never overwritten.
fn bind(request: &mut Request, principal: Principal) {
    if request.extensions().get::<Principal>().is_none() {
        request.extensions_mut().insert(principal);
    }
}
