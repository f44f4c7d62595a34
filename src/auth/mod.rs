// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the accounts API.
//!
//! ## Auth Flow
//!
//! 1. Client exchanges credentials for a token at `POST /v1/tokens`
//! 2. Client sends `Authorization: Bearer <token>` on every request
//! 3. The gate middleware, once per request:
//!    - verifies signature and expiry with the process-local HS256 key
//!    - resolves the `sub` claim to an account and its authorities
//!    - binds the resulting principal into the request's extensions
//! 4. Handlers read the principal through the extractors and decide what
//!    an unauthenticated or under-privileged caller may do
//!
//! ## Security
//!
//! - Tokens are self-contained; no server-side session state exists
//! - Every request is authenticated independently; principals are never
//!   cached or shared across requests
//! - Gate failures degrade to an unauthenticated request, never a crash;
//!   authorization decisions stay with the extractors
//! - The signing secret is loaded at startup and never mutated; a missing
//!   secret prevents startup

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod roles;

pub use claims::{Claims, Principal};
pub use codec::TokenCodec;
pub use error::AuthError;
pub use extractor::{AdminOnly, Authenticated, CurrentPrincipal};
pub use resolver::PrincipalResolver;
pub use roles::Role;
