//! Session port and a fixed-identity adapter.

use super::Identity;
use std::sync::{Arc, RwLock};

/// Source of the currently signed-in user.
pub trait SessionProvider: Send + Sync {
    /// Returns the signed-in identity, or `None` when the session is absent
    /// or no longer valid.
    fn current_identity(&self) -> Option<Identity>;
}

/// Session provider holding an explicitly set identity.
///
/// Used by embedders that resolve authentication up front and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    identity: Arc<RwLock<Option<Identity>>>,
}

impl StaticSessionProvider {
    /// Creates a provider that reports the given identity.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Arc::new(RwLock::new(Some(identity))),
        }
    }

    /// Creates a provider with no signed-in user.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Replaces the reported identity.
    pub fn set_identity(&self, identity: Option<Identity>) {
        let mut guard = self
            .identity
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = identity;
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
