//! Optional observability hooks for pool stats refreshes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every recompute in a `pool_stats.refresh` span carrying the
//!   `trigger` field (the counter name, or `snapshot`) and to log failed recomputes at `warn`.
//! - Enable `metrics` to increment the `pool_stats_refresh_total` counter for every
//!   attempt/success/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// A reader won the gate and is about to recompute.
	Attempt,
	/// The recompute finished and the counters hold fresh values.
	Success,
	/// The recompute failed; the error went back to the triggering reader.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
