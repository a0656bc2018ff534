//! One-shot bootstrap of the embedded framework for a host request.

pub mod guard;
pub mod report;
pub mod sequencer;
pub mod state;

pub use guard::BootstrapGuard;
pub use report::{BootstrapOutcome, BootstrapReport, Bootstrapped};
pub use sequencer::Bootstrapper;
pub use state::BootstrapState;
