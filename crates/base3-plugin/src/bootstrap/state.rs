//! Bootstrap phases.

use serde::{Deserialize, Serialize};

use base3_core::error::AppError;
use base3_core::result::AppResult;

/// Phases of one bootstrap, in strict order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    /// Nothing built yet.
    Uninitialized,
    /// Container built; hook listeners are being discovered.
    Discovering,
    /// Listeners registered; plugins are being initialized.
    PluginInit,
    /// Plugins initialized; services are being published to the host.
    Publishing,
    /// Services published. Terminal.
    Finished,
}

impl BootstrapState {
    /// Returns the phase that follows this one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::Discovering),
            Self::Discovering => Some(Self::PluginInit),
            Self::PluginInit => Some(Self::Publishing),
            Self::Publishing => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Moves from `self` to `to`, which must be the immediate successor.
    pub fn advance(self, to: Self) -> AppResult<Self> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(AppError::invalid_state(format!(
                "Bootstrap cannot move from {self:?} to {to:?}"
            )))
        }
    }

    /// Fails unless the current phase is `expected`.
    pub fn ensure(self, expected: Self) -> AppResult<()> {
        if self == expected {
            Ok(())
        } else {
            Err(AppError::invalid_state(format!(
                "Bootstrap step for {expected:?} called in {self:?}"
            )))
        }
    }
}
