// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{PrincipalResolver, TokenCodec};
use crate::config::GateSettings;
use crate::store::AccountStore;

/// Shared application state.
///
/// Everything here is read-mostly and safe for concurrent access: the codec
/// key is never mutated at runtime, the gate settings are fixed at startup,
/// and the store guards itself with a `RwLock` checked out per call.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<AccountStore>>,
    pub codec: Arc<TokenCodec>,
    pub resolver: PrincipalResolver,
    pub gate: Arc<GateSettings>,
}

impl AppState {
    pub fn new(codec: TokenCodec, gate: GateSettings) -> Self {
        let store = Arc::new(RwLock::new(AccountStore::new()));
        Self {
            resolver: PrincipalResolver::new(store.clone()),
            store,
            codec: Arc::new(codec),
            gate: Arc::new(gate),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Test-only state with a fixed signing secret and default gate
    /// settings.
    fn default() -> Self {
        use crate::config::TokenSettings;

        let codec = TokenCodec::new(&TokenSettings {
            secret: "test-secret-key-that-is-long-enough".to_string(),
            ttl_secs: 3600,
            leeway_secs: 0,
        });
        Self::new(codec, GateSettings::default())
    }
}
