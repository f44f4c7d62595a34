// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the account entity and the request and response data
//! structures used by the REST API. Wire types derive `Serialize`,
//! `Deserialize`, and `ToSchema` for automatic JSON handling and OpenAPI
//! documentation.
//!
//! ## Email Type
//!
//! The [`Email`] newtype wraps the account's email address, which doubles as
//! the token subject. Construction canonicalizes the value (NFKC
//! normalization, trimming, lowercasing) so that lookups never miss an
//! account because of presentation differences in the address.
//!
//! ## Model Categories
//!
//! - **Account**: the directory entry itself (internal representation)
//! - **Requests**: sign-up and profile-update payloads
//! - **Responses**: the public projection of an account

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// =============================================================================
// Email Type
// =============================================================================

/// Canonicalized email address.
///
/// Acts as the account's natural key and as the `sub` claim of issued
/// tokens. Two addresses that differ only in case, surrounding whitespace,
/// or Unicode normalization form compare equal.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

impl Email {
    /// Canonicalize a raw address: NFKC normalization, trim, lowercase.
    pub fn new(raw: &str) -> Self {
        let normalized: String = raw.trim().nfkc().collect();
        Email(normalized.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Deserialization must go through canonicalization, so requests can never
// smuggle in a non-canonical address.
impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Email::new(&raw))
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Email {
    fn from(value: &str) -> Self {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

// =============================================================================
// Account Entity
// =============================================================================

/// A directory account as held by the store.
///
/// Not a wire type: the password hash must never leave the process, so the
/// API works with [`AccountResponse`] projections instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique identifier for this account.
    pub id: Uuid,
    /// Canonical email address; token subject.
    pub email: Email,
    /// Display name.
    pub nickname: String,
    /// Short self-introduction shown in listings.
    pub one_line_introduce: Option<String>,
    /// Profile image URL.
    pub image: Option<String>,
    /// Authorization role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Ids of accounts that favorited this account.
    pub favorited_by: BTreeSet<Uuid>,
}

// =============================================================================
// Request Models
// =============================================================================

/// Request to create a new account (sign-up).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Email address; becomes the token subject.
    pub email: Email,
    /// Plain-text password; hashed before storage, never persisted as-is.
    pub password: String,
    /// Display name.
    pub nickname: String,
    /// Short self-introduction.
    #[serde(default)]
    pub one_line_introduce: Option<String>,
    /// Profile image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Request to update an existing account.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    /// New display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// New self-introduction.
    #[serde(default)]
    pub one_line_introduce: Option<String>,
    /// New profile image URL.
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Response Models
// =============================================================================

/// Public projection of an account.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct AccountResponse {
    /// Unique identifier for this account.
    pub id: Uuid,
    /// Canonical email address.
    pub email: Email,
    /// Display name.
    pub nickname: String,
    /// Short self-introduction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_line_introduce: Option<String>,
    /// Profile image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Authorization role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// How many accounts favorited this one.
    pub favorite_count: usize,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            nickname: account.nickname.clone(),
            one_line_introduce: account.one_line_introduce.clone(),
            image: account.image.clone(),
            role: account.role,
            created_at: account.created_at,
            favorite_count: account.favorited_by.len(),
        }
    }
}
