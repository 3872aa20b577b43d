//! Lock-free gate that hands out refresh responsibility at most once per window.
//!
//! The gate keeps a single "next allowed reload" timestamp. A caller that observes the window as
//! elapsed tries to push the timestamp to `now + timeout` with a compare-and-swap; the one caller
//! whose swap lands owns the refresh, everyone else reads whatever is cached. A failed swap means
//! a competitor advanced the timestamp, so the loop always makes global progress and nobody ever
//! waits on the winner.

mod metrics;

pub use metrics::GateMetrics;

// self
use crate::{
	_prelude::*,
	clock::{Clock, MonotonicClock, Timestamp},
	config::RefreshTimeout,
};

/// Read-only view of the gate's per-window state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateState {
	/// The window elapsed; the next caller will be granted the refresh.
	Open,
	/// A refresh was granted recently; callers read cached values.
	CoolDown,
}
impl GateState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GateState::Open => "open",
			GateState::CoolDown => "cool_down",
		}
	}
}
impl Display for GateState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Rate limiter for a shared, expensive refresh.
pub struct RefreshGate<K = MonotonicClock>
where
	K: ?Sized + Clock,
{
	clock: Arc<K>,
	timeout: RefreshTimeout,
	next_allowed_reload: AtomicU64,
	metrics: GateMetrics,
}
impl RefreshGate {
	/// Creates a gate driven by a fresh [`MonotonicClock`].
	pub fn new(timeout: RefreshTimeout) -> Self {
		Self::with_clock(timeout, Arc::new(MonotonicClock::new()))
	}
}
impl<K> RefreshGate<K>
where
	K: ?Sized + Clock,
{
	/// Creates a gate driven by the caller-provided clock.
	///
	/// The gate starts open: its first caller always wins.
	pub fn with_clock(timeout: RefreshTimeout, clock: Arc<K>) -> Self {
		Self {
			clock,
			timeout,
			next_allowed_reload: AtomicU64::new(Timestamp::ZERO.as_nanos()),
			metrics: GateMetrics::default(),
		}
	}

	/// Decides whether the caller is responsible for refreshing now.
	///
	/// Returns `true` to at most one caller per window. When it does, the window has already been
	/// advanced; the caller is expected to run the refresh itself.
	pub fn should_refresh(&self) -> bool {
		loop {
			let now = self.clock.now();
			let current = self.next_allowed_reload.load(Ordering::Acquire);

			if current > now.as_nanos() {
				self.metrics.record_denial();

				return false;
			}

			let next = self.clock.plus(now, self.timeout.as_duration());

			match self.next_allowed_reload.compare_exchange(
				current,
				next.as_nanos(),
				Ordering::AcqRel,
				Ordering::Acquire,
			) {
				Ok(_) => {
					self.metrics.record_grant();

					return true;
				},
				Err(_) => self.metrics.record_contention(),
			}
		}
	}

	/// Reports whether the next caller would be granted the refresh, without claiming it.
	pub fn state(&self) -> GateState {
		if self.next_allowed_reload.load(Ordering::Acquire) > self.clock.now().as_nanos() {
			GateState::CoolDown
		} else {
			GateState::Open
		}
	}

	/// Returns the earliest instant at which the next refresh may be granted.
	pub fn next_allowed_reload(&self) -> Timestamp {
		Timestamp::from_nanos(self.next_allowed_reload.load(Ordering::Acquire))
	}

	/// Returns the configured window.
	pub fn timeout(&self) -> RefreshTimeout {
		self.timeout
	}

	/// Returns the clock driving the gate.
	pub fn clock(&self) -> &Arc<K> {
		&self.clock
	}

	/// Returns the gate's decision counters.
	pub fn metrics(&self) -> &GateMetrics {
		&self.metrics
	}
}
impl<K> Debug for RefreshGate<K>
where
	K: ?Sized + Clock,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshGate")
			.field("timeout", &self.timeout)
			.field("next_allowed_reload", &self.next_allowed_reload())
			.finish()
	}
}
