// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory account store.
//!
//! The store is the persistence collaborator behind the API and the
//! principal resolver. All access goes through the `RwLock` held in
//! `AppState`, so individual methods take `&self`/`&mut self` and never
//! lock internally.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::ApiError;
use crate::models::{Account, CreateAccountRequest, Email, UpdateAccountRequest};

#[derive(Default)]
pub struct AccountStore {
    accounts: HashMap<Uuid, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account from a sign-up request.
    ///
    /// The password arrives pre-hashed; the store never sees plain-text
    /// credentials. Duplicate canonical emails conflict.
    pub fn create_account(
        &mut self,
        request: CreateAccountRequest,
        password_hash: String,
        role: Role,
    ) -> Result<Account, ApiError> {
        if self.find_by_email(&request.email).is_some() {
            return Err(ApiError::conflict("An account with this email already exists."));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: request.email,
            nickname: request.nickname,
            one_line_introduce: request.one_line_introduce,
            image: request.image,
            role,
            password_hash,
            created_at: Utc::now(),
            favorited_by: BTreeSet::new(),
        };
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Look up an account by canonical email (the token subject).
    pub fn find_by_email(&self, email: &Email) -> Option<Account> {
        self.accounts
            .values()
            .find(|account| &account.email == email)
            .cloned()
    }

    pub fn get(&self, account_id: Uuid) -> Result<Account, ApiError> {
        self.accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Account not found"))
    }

    /// All accounts, newest first.
    pub fn list_newest_first(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        accounts
    }

    /// Apply a partial update. Absent fields are left unchanged.
    pub fn update_account(
        &mut self,
        account_id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<Account, ApiError> {
        let Some(account) = self.accounts.get_mut(&account_id) else {
            return Err(ApiError::not_found("Account not found"));
        };

        if let Some(nickname) = request.nickname {
            account.nickname = nickname;
        }
        if let Some(one_line_introduce) = request.one_line_introduce {
            account.one_line_introduce = Some(one_line_introduce);
        }
        if let Some(image) = request.image {
            account.image = Some(image);
        }

        Ok(account.clone())
    }

    /// Delete an account and scrub it from other accounts' favorite sets.
    pub fn delete_account(&mut self, account_id: Uuid) -> Result<Account, ApiError> {
        let removed = self
            .accounts
            .remove(&account_id)
            .ok_or_else(|| ApiError::not_found("Account not found"))?;

        for account in self.accounts.values_mut() {
            account.favorited_by.remove(&account_id);
        }

        Ok(removed)
    }

    /// Toggle `by`'s favorite mark on the target account.
    pub fn toggle_favorite(&mut self, target_id: Uuid, by: Uuid) -> Result<Account, ApiError> {
        let Some(target) = self.accounts.get_mut(&target_id) else {
            return Err(ApiError::not_found("Account not found"));
        };

        if !target.favorited_by.insert(by) {
            target.favorited_by.remove(&by);
        }

        Ok(target.clone())
    }

    /// Accounts that favorited the target, newest first.
    pub fn favorites_of(&self, target_id: Uuid) -> Result<Vec<Account>, ApiError> {
        let target = self.get(target_id)?;

        let mut favorites: Vec<Account> = target
            .favorited_by
            .iter()
            .filter_map(|id| self.accounts.get(id).cloned())
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(favorites)
    }
}
