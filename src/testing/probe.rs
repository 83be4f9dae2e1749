//! Liveness gate run before any stateful scenario

use crate::register::{RegisterClient, RetryPolicy};

/// Whether the instance answers a single CSR read.
///
/// One attempt only: a dead instance should cost one invocation, not a retry cycle.
pub async fn is_alive(client: &RegisterClient<'_>) -> bool {
    let alive = client.read_csr(RetryPolicy::single()).await.is_some();
    tracing::debug!(instance = client.instance().name(), alive, "liveness probe");
    alive
}
