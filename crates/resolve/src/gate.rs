//! Process-wide gate serializing upstream calls.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::ProviderError;

/// Counting gate around the upstream provider.
///
/// Built once at startup and shared by handle. With a single permit, at most
/// one attempt talks to the provider at any moment.
#[derive(Debug, Clone)]
pub struct ResolveGate {
    permits: Arc<Semaphore>,
}

impl ResolveGate {
    /// A gate that admits one attempt at a time.
    pub fn serial() -> Self {
        Self::with_permits(1)
    }

    /// A gate that admits up to `permits` concurrent attempts.
    pub fn with_permits(permits: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(permits.max(1))),
        }
    }

    /// Wait for a permit. Dropping the returned permit releases the gate.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ProviderError> {
        self.permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ProviderError::Transient("resolve gate closed".into()))
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for ResolveGate {
    fn default() -> Self {
        Self::serial()
    }
}
