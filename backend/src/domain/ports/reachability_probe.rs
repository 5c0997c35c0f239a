//! Port abstraction for liveness probes against external collaborators.

use async_trait::async_trait;

use crate::domain::health::ProbeTarget;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by reachability probe adapters.
    pub enum ProbeError {
        /// The target did not answer with a success status.
        Unreachable { message: String } => "probe target unreachable: {message}",
    }
}

/// Synthetic-request port used by the health service to assess whether an
/// external dependency is reachable.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Ping the target once; `Ok(())` means "up".
    async fn ping(&self, target: &ProbeTarget) -> Result<(), ProbeError>;
}
