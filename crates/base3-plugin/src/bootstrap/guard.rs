//! Process-wide "already bootstrapped" flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use base3_core::error::AppError;
use base3_core::result::AppResult;

/// The single authoritative guard of this process.
static PROCESS_GUARD: LazyLock<Arc<BootstrapGuard>> =
    LazyLock::new(|| Arc::new(BootstrapGuard::new()));

/// Ensures the bootstrap runs at most once.
///
/// Claiming is a single atomic check-and-set. Once claimed the guard stays
/// claimed, also when the bootstrap that claimed it failed.
#[derive(Debug, Default)]
pub struct BootstrapGuard {
    claimed: AtomicBool,
}

impl BootstrapGuard {
    /// Creates an unclaimed guard.
    pub fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// Returns the guard shared by the whole process.
    pub fn process() -> Arc<Self> {
        Arc::clone(&PROCESS_GUARD)
    }

    /// Claims the guard. Fails with `DuplicateBootstrap` if already claimed.
    pub fn claim(&self) -> AppResult<()> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| AppError::duplicate_bootstrap("Bootstrap already ran in this process"))
    }

    /// Returns whether the guard has been claimed.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}
