//! Monotonic time sources consumed by the refresh gate.

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Point on a monotonic timeline, measured in nanoseconds since the owning clock's origin.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);
impl Timestamp {
	/// Origin of every timeline; the refresh gate uses it as its "never reloaded" sentinel.
	pub const ZERO: Self = Self(0);

	/// Builds a timestamp from raw nanoseconds since the clock origin.
	pub const fn from_nanos(nanos: u64) -> Self {
		Self(nanos)
	}

	/// Returns the raw nanoseconds since the clock origin.
	pub const fn as_nanos(self) -> u64 {
		self.0
	}

	/// Adds a duration, saturating at both ends of the timeline.
	pub fn saturating_add(self, duration: Duration) -> Self {
		if duration.is_negative() {
			return self;
		}

		let nanos = u64::try_from(duration.whole_nanoseconds()).unwrap_or(u64::MAX);

		Self(self.0.saturating_add(nanos))
	}
}
impl Debug for Timestamp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Timestamp({}ns)", self.0)
	}
}

/// Monotonic time source.
///
/// Implementations must never move backwards and must be safe to call from any thread. The gate
/// calls [`Clock::now`] on every read, so it should be cheap.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current point on the timeline.
	fn now(&self) -> Timestamp;

	/// Returns `at` shifted forward by `duration`.
	fn plus(&self, at: Timestamp, duration: Duration) -> Timestamp {
		at.saturating_add(duration)
	}
}

/// Production clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
	origin: Instant,
}
impl MonotonicClock {
	/// Creates a clock whose timeline starts now.
	pub fn new() -> Self {
		Self { origin: Instant::now() }
	}
}
impl Default for MonotonicClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for MonotonicClock {
	fn now(&self) -> Timestamp {
		let elapsed = self.origin.elapsed().as_nanos();

		Timestamp(u64::try_from(elapsed).unwrap_or(u64::MAX))
	}
}

/// Clock that only moves when told to.
///
/// Useful for deterministic tests and for owners that already maintain their own notion of time.
#[derive(Debug, Default)]
pub struct ManualClock {
	nanos: AtomicU64,
}
impl ManualClock {
	/// Creates a clock positioned at [`Timestamp::ZERO`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward by `duration`. Negative durations are ignored.
	pub fn advance(&self, duration: Duration) -> Timestamp {
		let step = Timestamp::ZERO.saturating_add(duration).as_nanos();
		let previous = self
			.nanos
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| Some(now.saturating_add(step)))
			.unwrap_or_else(|now| now);

		Timestamp(previous.saturating_add(step))
	}

	/// Moves the clock to `at`, unless that would move it backwards.
	pub fn set(&self, at: Timestamp) -> Timestamp {
		let previous = self.nanos.fetch_max(at.0, Ordering::AcqRel);

		Timestamp(previous.max(at.0))
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Timestamp {
		Timestamp(self.nanos.load(Ordering::Acquire))
	}
}
