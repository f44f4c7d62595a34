// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the resolved principal.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Account, Email};

use super::roles::Role;

/// Claims carried by an issued token.
///
/// Tokens are self-contained: these three claims plus the signature are the
/// entire authentication state. Claims are immutable once issued; they are
/// only ever verified or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's canonical email address.
    pub sub: String,
    /// Issued-at timestamp (seconds since the Unix epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since the Unix epoch).
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` issued at `issued_at`, expiring `ttl_secs`
    /// later.
    pub fn new(subject: &str, issued_at: DateTime<Utc>, ttl_secs: u64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.to_string(),
            iat,
            exp: iat + ttl_secs as i64,
        }
    }
}

/// The authenticated identity bound to a request.
///
/// Constructed fresh per request from the store lookup; never cached across
/// requests. Authorities are a plain capability set rather than a type
/// hierarchy, so downstream checks are simple set membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    /// Account identifier.
    pub account_id: Uuid,
    /// Canonical email address; equals the token's `sub` claim.
    pub subject: Email,
    /// Granted authorities.
    pub authorities: BTreeSet<Role>,
}

impl Principal {
    /// Build the principal for a resolved account.
    pub fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            subject: account.email.clone(),
            authorities: account.role.authorities(),
        }
    }

    /// Check whether this principal holds the given authority.
    pub fn has_authority(&self, role: Role) -> bool {
        self.authorities.contains(&role)
    }

    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.has_authority(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_expiry_is_issue_time_plus_ttl() {
        let issued_at = Utc::now();
        let claims = Claims::new("user@example.com", issued_at, 3600);
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn principal_for_admin_account_holds_both_authorities() {
        let account = Account {
            id: Uuid::new_v4(),
            email: Email::new("admin@example.com"),
            nickname: "admin".into(),
            one_line_introduce: None,
            image: None,
            role: Role::Admin,
            password_hash: String::new(),
            created_at: Utc::now(),
            favorited_by: BTreeSet::new(),
        };

        let principal = Principal::for_account(&account);
        assert_eq!(principal.account_id, account.id);
        assert_eq!(principal.subject, account.email);
        assert!(principal.is_admin());
        assert!(principal.has_authority(Role::Member));
    }

    #[test]
    fn member_principal_is_not_admin() {
        let account = Account {
            id: Uuid::new_v4(),
            email: Email::new("user@example.com"),
            nickname: "user".into(),
            one_line_introduce: None,
            image: None,
            role: Role::Member,
            password_hash: String::new(),
            created_at: Utc::now(),
            favorited_by: BTreeSet::new(),
        };

        let principal = Principal::for_account(&account);
        assert!(!principal.is_admin());
        assert!(principal.has_authority(Role::Member));
    }
}
