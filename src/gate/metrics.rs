// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing how the refresh gate has been answering.
#[derive(Debug, Default)]
pub struct GateMetrics {
	grants: AtomicU64,
	denials: AtomicU64,
	contentions: AtomicU64,
}
impl GateMetrics {
	/// Returns the number of calls that were handed refresh responsibility.
	pub fn grants(&self) -> u64 {
		self.grants.load(Ordering::Relaxed)
	}

	/// Returns the number of calls turned away because the window had not elapsed.
	pub fn denials(&self) -> u64 {
		self.denials.load(Ordering::Relaxed)
	}

	/// Returns the number of lost compare-and-swap races that forced a retry.
	pub fn contentions(&self) -> u64 {
		self.contentions.load(Ordering::Relaxed)
	}

	pub(crate) fn record_grant(&self) {
		self.grants.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_denial(&self) {
		self.denials.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_contention(&self) {
		self.contentions.fetch_add(1, Ordering::Relaxed);
	}
}
