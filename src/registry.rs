// ABOUTME: Read-only registry of OAuth clients with lookup and credential validation
// ABOUTME: Seeded once at construction; absence is represented, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Credo Project

use crate::models::Client;
use std::collections::HashMap;

/// Registry of known OAuth clients.
///
/// Read-only after construction, so it needs no locking even though the
/// engine is called concurrently.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Client>,
}

impl ClientRegistry {
    /// Build a registry from the given clients, keyed by `client_id`.
    #[must_use]
    pub fn new(clients: impl IntoIterator<Item = Client>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|c| (c.client_id.clone(), c))
                .collect(),
        }
    }

    /// Look up a client by id.
    #[must_use]
    pub fn get(&self, client_id: &str) -> Option<&Client> {
        self.clients.get(client_id)
    }

    /// True iff the client exists and both secret and redirect URI match
    /// exactly.
    #[must_use]
    pub fn validate(&self, client_id: &str, client_secret: &str, redirect_uri: &str) -> bool {
        self.get(client_id)
            .is_some_and(|c| c.client_secret == client_secret && c.redirect_uri == redirect_uri)
    }
}
