//! Bootstrap reports and outcomes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use base3_container::Container;

use crate::hooks::DispatchReport;

/// What one bootstrap did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// Id of the request that triggered the bootstrap.
    pub request_id: Uuid,
    /// When the bootstrap started.
    pub started_at: DateTime<Utc>,
    /// When the finish event returned.
    pub finished_at: Option<DateTime<Utc>>,
    /// Hook listeners registered, in order.
    pub listeners: Vec<String>,
    /// Plugins initialized, in order.
    pub plugins: Vec<String>,
    /// Service ids published to the host.
    pub published: Vec<String>,
    /// Service ids left alone because the host already held them.
    pub host_owned: Vec<String>,
    /// One report per lifecycle event, in firing order.
    pub dispatches: Vec<DispatchReport>,
}

impl BootstrapReport {
    /// Creates an empty report for a request.
    pub fn new(request_id: Uuid) -> Self {
        Self {
            request_id,
            started_at: Utc::now(),
            finished_at: None,
            listeners: Vec::new(),
            plugins: Vec::new(),
            published: Vec::new(),
            host_owned: Vec::new(),
            dispatches: Vec::new(),
        }
    }
}

/// A completed bootstrap.
#[derive(Debug)]
pub struct Bootstrapped {
    /// The container built for this request.
    pub container: Arc<Container>,
    /// What happened.
    pub report: BootstrapReport,
}

/// Result of asking for a bootstrap.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// The bootstrap ran.
    Completed(Box<Bootstrapped>),
    /// The process was already bootstrapped; nothing was done.
    AlreadyBootstrapped,
}

impl BootstrapOutcome {
    /// Returns the completed bootstrap, if this call ran it.
    pub fn completed(&self) -> Option<&Bootstrapped> {
        match self {
            Self::Completed(done) => Some(done),
            Self::AlreadyBootstrapped => None,
        }
    }

    /// Returns whether this call was a no-op.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::AlreadyBootstrapped)
    }
}
