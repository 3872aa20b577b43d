//! Pool stats: four lazily refreshed counters behind a refresh gate.
//!
//! Every accessor asks the [`RefreshGate`] whether its caller owns the next refresh. The single
//! winner per window runs the pool's [`Recompute`] strategy on its own thread and then reads the
//! fresh value; every other caller returns the stored value straight away. A failed recompute is
//! returned to the winner only, and the window it opened stays closed until it elapses.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use pool_stats::{CountersSnapshot, PoolCounters, PoolStats, recompute_fn};
//! use time::Duration;
//!
//! let stats = PoolStats::new(
//! 	Duration::seconds(1),
//! 	recompute_fn(|c: &PoolCounters| {
//! 		c.store(CountersSnapshot { total: 10, idle: 4, active: 6, pending_threads: 2 });
//!
//! 		Ok::<_, Infallible>(())
//! 	}),
//! )?;
//!
//! assert_eq!(stats.active_connections()?, 6);
//! // Same window: served from the cached counters.
//! assert_eq!(stats.idle_connections()?, 4);
//! assert_eq!(stats.metrics().attempts(), 1);
//! # Ok::<_, pool_stats::Error>(())
//! ```

mod metrics;

pub use metrics::RecomputeMetrics;

// self
use crate::{
	_prelude::*,
	clock::{Clock, MonotonicClock},
	config::{RefreshTimeout, StatsConfig},
	gate::RefreshGate,
	obs::{self, RefreshOutcome, RefreshSpan},
	recompute::Recompute,
	snapshot::{Counter, CountersSnapshot, PoolCounters},
};

const SNAPSHOT_TRIGGER: &str = "snapshot";

/// Rate-limited view of a pool's connection counters.
///
/// Values are never older than one refresh window, except that a reader racing with an
/// in-flight recompute may see a mix of old and new values across counters.
pub struct PoolStats<R, K = MonotonicClock>
where
	R: Recompute,
	K: ?Sized + Clock,
{
	gate: RefreshGate<K>,
	counters: PoolCounters,
	recompute: R,
	metrics: RecomputeMetrics,
}
impl<R> PoolStats<R>
where
	R: Recompute,
{
	/// Creates stats refreshed at most once per `timeout`.
	///
	/// Negative or unrepresentable timeouts are rejected here; reads never fail on configuration.
	pub fn new(timeout: Duration, recompute: R) -> Result<Self> {
		let timeout = RefreshTimeout::new(timeout)?;

		Ok(Self::with_clock(timeout, recompute, Arc::new(MonotonicClock::new())))
	}

	/// Creates stats from a parsed configuration.
	pub fn from_config(config: &StatsConfig, recompute: R) -> Self {
		Self::with_clock(config.refresh_timeout, recompute, Arc::new(MonotonicClock::new()))
	}
}
impl<R, K> PoolStats<R, K>
where
	R: Recompute,
	K: ?Sized + Clock,
{
	/// Creates stats driven by the caller-provided clock.
	pub fn with_clock(timeout: RefreshTimeout, recompute: R, clock: Arc<K>) -> Self {
		Self {
			gate: RefreshGate::with_clock(timeout, clock),
			counters: PoolCounters::default(),
			recompute,
			metrics: RecomputeMetrics::default(),
		}
	}

	/// Returns the number of connections owned by the pool.
	pub fn total_connections(&self) -> Result<u32> {
		self.read(Counter::Total)
	}

	/// Returns the number of idle connections.
	pub fn idle_connections(&self) -> Result<u32> {
		self.read(Counter::Idle)
	}

	/// Returns the number of borrowed connections.
	pub fn active_connections(&self) -> Result<u32> {
		self.read(Counter::Active)
	}

	/// Returns the number of threads waiting for a connection.
	pub fn pending_threads(&self) -> Result<u32> {
		self.read(Counter::PendingThreads)
	}

	/// Returns `counter`, recomputing first if this caller wins the refresh window.
	pub fn read(&self, counter: Counter) -> Result<u32> {
		self.refresh_if_due(counter.as_str())?;

		Ok(self.counters.get(counter))
	}

	/// Returns all four counters after a single gate check.
	///
	/// The counters are still loaded one at a time, so the snapshot can be torn by a concurrent
	/// recompute just like four separate reads.
	pub fn snapshot(&self) -> Result<CountersSnapshot> {
		self.refresh_if_due(SNAPSHOT_TRIGGER)?;

		Ok(self.counters.load())
	}

	/// Returns the refresh gate.
	pub fn gate(&self) -> &RefreshGate<K> {
		&self.gate
	}

	/// Returns the counter cells without consulting the gate.
	pub fn counters(&self) -> &PoolCounters {
		&self.counters
	}

	/// Returns the pool's recompute strategy.
	pub fn recompute(&self) -> &R {
		&self.recompute
	}

	/// Returns the recompute outcome counters.
	pub fn metrics(&self) -> &RecomputeMetrics {
		&self.metrics
	}

	fn refresh_if_due(&self, trigger: &'static str) -> Result<()> {
		if !self.gate.should_refresh() {
			return Ok(());
		}

		let _span = RefreshSpan::new(trigger).entered();

		obs::log_refresh_granted(trigger);
		self.record(RefreshOutcome::Attempt);

		match self.recompute.recompute(&self.counters) {
			Ok(()) => {
				self.record(RefreshOutcome::Success);

				Ok(())
			},
			Err(err) => {
				obs::log_refresh_failure(trigger, &err);
				self.record(RefreshOutcome::Failure);

				Err(Error::recompute(trigger, err))
			},
		}
	}

	fn record(&self, outcome: RefreshOutcome) {
		obs::record_refresh_outcome(outcome);
		self.metrics.record(outcome);
	}
}
impl<R, K> Debug for PoolStats<R, K>
where
	R: Recompute,
	K: ?Sized + Clock,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PoolStats")
			.field("gate", &self.gate)
			.field("counters", &self.counters.load())
			.finish()
	}
}
