// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Subject-to-principal resolution.
//!
//! A verified claim set only proves that the token was signed by us; it says
//! nothing about whether the account still exists or what it may do. The
//! resolver turns a subject into a live [`Principal`] by a read-only lookup
//! against the account store. The lookup is the authentication pass's only
//! suspension point; abandoning it mid-flight (request cancellation) has no
//! side effects.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Email;
use crate::store::AccountStore;

use super::claims::Principal;
use super::error::AuthError;

/// Resolves token subjects to authenticated principals.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<RwLock<AccountStore>>,
}

impl PrincipalResolver {
    pub fn new(store: Arc<RwLock<AccountStore>>) -> Self {
        Self { store }
    }

    /// Resolve `subject` to a principal.
    ///
    /// Any lookup failure is a resolution failure; there is no anonymous-
    /// but-authenticated fallback.
    pub async fn resolve(&self, subject: &str) -> Result<Principal, AuthError> {
        let email = Email::new(subject);
        let store = self.store.read().await;
        let account = store
            .find_by_email(&email)
            .ok_or(AuthError::UnknownSubject)?;
        Ok(Principal::for_account(&account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::CreateAccountRequest;

    async fn resolver_with_account(email: &str) -> PrincipalResolver {
        let store = Arc::new(RwLock::new(AccountStore::new()));
        store
            .write()
            .await
            .create_account(
                CreateAccountRequest {
                    email: Email::new(email),
                    password: "correct horse battery staple".into(),
                    nickname: "user".into(),
                    one_line_introduce: None,
                    image: None,
                },
                "hash".into(),
                Role::Member,
            )
            .expect("account creation succeeds");
        PrincipalResolver::new(store)
    }

    #[tokio::test]
    async fn resolves_known_subject_to_principal() {
        let resolver = resolver_with_account("user@example.com").await;

        let principal = resolver.resolve("user@example.com").await.unwrap();
        assert_eq!(principal.subject.as_str(), "user@example.com");
        assert!(principal.has_authority(Role::Member));
        assert!(!principal.is_admin());
    }

    #[tokio::test]
    async fn resolve_canonicalizes_the_subject() {
        let resolver = resolver_with_account("user@example.com").await;

        let principal = resolver.resolve(" User@Example.COM ").await.unwrap();
        assert_eq!(principal.subject.as_str(), "user@example.com");
    }

    #[tokio::test]
    async fn unknown_subject_fails_resolution() {
        let resolver = resolver_with_account("user@example.com").await;

        let err = resolver.resolve("ghost@example.com").await.unwrap_err();
        assert_eq!(err, AuthError::UnknownSubject);
    }
}
