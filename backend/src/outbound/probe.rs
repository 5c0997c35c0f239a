//! HTTP reachability probe backed by `reqwest`.
//!
//! Implements the [`ReachabilityProbe`] port by issuing a GET request to the
//! target URL. Any transport failure or non-success status counts as
//! unreachable; response bodies are never read.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ProbeTarget;
use crate::domain::ports::{ProbeError, ReachabilityProbe};

/// Reachability probe that performs a real HTTP GET against the target.
#[derive(Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Build a probe whose requests abort after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] when the client cannot be
    /// constructed (for example when the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProbe {
    async fn ping(&self, target: &ProbeTarget) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(target.url().clone())
            .send()
            .await
            .map_err(|err| {
                debug!(target = target.name(), error = %err, "probe request failed");
                ProbeError::unreachable(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            debug!(target = target.name(), %status, "probe returned non-success status");
            Err(ProbeError::unreachable(format!(
                "{} responded with status {status}",
                target.url()
            )))
        }
    }
}
