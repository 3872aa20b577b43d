// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::RefreshOutcome;

/// Per-outcome tallies of recomputes triggered through the gate.
///
/// Mirrors the `pool_stats_refresh_total` metric so callers can inspect outcomes without
/// installing a recorder.
#[derive(Debug, Default)]
pub struct RecomputeMetrics {
	by_outcome: [AtomicU64; 3],
}
impl RecomputeMetrics {
	/// Returns how many recomputes ended with `outcome` (or started, for
	/// [`RefreshOutcome::Attempt`]).
	pub fn count(&self, outcome: RefreshOutcome) -> u64 {
		self.by_outcome[Self::slot(outcome)].load(Ordering::Relaxed)
	}

	/// Returns the total number of recomputes started.
	pub fn attempts(&self) -> u64 {
		self.count(RefreshOutcome::Attempt)
	}

	/// Returns the number of recomputes that completed.
	pub fn successes(&self) -> u64 {
		self.count(RefreshOutcome::Success)
	}

	/// Returns the number of recomputes that failed.
	pub fn failures(&self) -> u64 {
		self.count(RefreshOutcome::Failure)
	}

	/// Returns recomputes that started but have not finished yet.
	pub fn in_flight(&self) -> u64 {
		self.attempts().saturating_sub(self.successes() + self.failures())
	}

	pub(crate) fn record(&self, outcome: RefreshOutcome) {
		self.by_outcome[Self::slot(outcome)].fetch_add(1, Ordering::Relaxed);
	}

	const fn slot(outcome: RefreshOutcome) -> usize {
		match outcome {
			RefreshOutcome::Attempt => 0,
			RefreshOutcome::Success => 1,
			RefreshOutcome::Failure => 2,
		}
	}
}
