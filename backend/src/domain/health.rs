//! Health service aggregating reachability probes.
//!
//! Purely a liveness signal: each configured target is pinged once through
//! the [`ReachabilityProbe`] port and the outcomes are folded into a single
//! structured report. Overall status is `ok` only when every probe is up.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use url::Url;
use utoipa::ToSchema;

use crate::domain::ports::ReachabilityProbe;

/// Named probe destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    name: String,
    url: Url,
}

impl ProbeTarget {
    /// Create a target from a report key and an endpoint URL.
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Key under which this probe appears in the report.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint the probe pings.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Per-probe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    Up,
    Down,
}

/// Outcome of a single probe as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProbeStatus {
    /// Whether the target answered.
    pub status: ProbeState,
    /// Failure message, present only for down probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeStatus {
    fn up() -> Self {
        Self {
            status: ProbeState::Up,
            message: None,
        }
    }

    fn down(message: String) -> Self {
        Self {
            status: ProbeState::Down,
            message: Some(message),
        }
    }
}

/// Overall report state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Ok,
    Error,
}

/// Aggregated health report.
///
/// Successful probes appear under `info`, failed ones under `error`, and
/// every probe appears under `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    /// `ok` only when all probes are up.
    pub status: ReportStatus,
    /// Probes that answered.
    pub info: BTreeMap<String, ProbeStatus>,
    /// Probes that failed.
    pub error: BTreeMap<String, ProbeStatus>,
    /// Every probe, regardless of outcome.
    pub details: BTreeMap<String, ProbeStatus>,
}

impl HealthReport {
    /// True when every probe resolved.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ReportStatus::Ok)
    }
}

/// Runs the configured probes and aggregates the report.
#[derive(Clone)]
pub struct HealthService {
    probe: Arc<dyn ReachabilityProbe>,
    targets: Vec<ProbeTarget>,
}

impl HealthService {
    /// Create a service pinging the given targets through the given adapter.
    pub fn new(probe: Arc<dyn ReachabilityProbe>, targets: Vec<ProbeTarget>) -> Self {
        Self { probe, targets }
    }

    /// Run every probe once and fold the outcomes into a report.
    ///
    /// Probe failures never escape as errors; they are embedded in the
    /// report so the HTTP adapter can pick the status code from it.
    pub async fn check(&self) -> HealthReport {
        let mut info = BTreeMap::new();
        let mut error = BTreeMap::new();
        let mut details = BTreeMap::new();

        for target in &self.targets {
            let status = match self.probe.ping(target).await {
                Ok(()) => ProbeStatus::up(),
                Err(err) => {
                    warn!(probe = target.name(), error = %err, "health probe failed");
                    ProbeStatus::down(err.to_string())
                }
            };
            details.insert(target.name().to_owned(), status.clone());
            match status.status {
                ProbeState::Up => info.insert(target.name().to_owned(), status),
                ProbeState::Down => error.insert(target.name().to_owned(), status),
            };
        }

        let status = if error.is_empty() {
            ReportStatus::Ok
        } else {
            ReportStatus::Error
        };

        HealthReport {
            status,
            info,
            error,
            details,
        }
    }
}
