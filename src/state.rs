// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::registry::EnvelopeRegistry;

/// Shared handle to the envelope registry.
///
/// Mutating handlers hold the write lock for the whole operation, so readers
/// never observe a transfer with only one side applied.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<EnvelopeRegistry>>,
}

impl AppState {
    pub fn new(registry: EnvelopeRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EnvelopeRegistry::new())
    }
}
