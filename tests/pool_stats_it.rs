// std
use std::{
	convert::Infallible,
	sync::{
		Arc, Barrier,
		atomic::{AtomicU32, Ordering},
	},
	thread,
	time::Duration as StdDuration,
};
// crates.io
use thiserror::Error as ThisError;
use time::Duration;
// self
use pool_stats::{
	Clock, Counter, CountersSnapshot, Error, ManualClock, PoolCounters, PoolStats, Recompute,
	RefreshTimeout, Timestamp, recompute_fn,
};

#[derive(Debug, ThisError)]
#[error("pool is closed")]
struct PoolClosed;

/// Stand-in for a pool's internals; counts how often it was asked to recompute.
#[derive(Debug, Default)]
struct LivePool {
	total: AtomicU32,
	idle: AtomicU32,
	active: AtomicU32,
	pending: AtomicU32,
	recomputes: AtomicU32,
}
impl LivePool {
	fn with(snapshot: CountersSnapshot) -> Arc<Self> {
		let pool = Self::default();

		pool.total.store(snapshot.total, Ordering::SeqCst);
		pool.idle.store(snapshot.idle, Ordering::SeqCst);
		pool.active.store(snapshot.active, Ordering::SeqCst);
		pool.pending.store(snapshot.pending_threads, Ordering::SeqCst);

		Arc::new(pool)
	}

	fn publish(&self, counters: &PoolCounters) -> Result<(), Infallible> {
		self.recomputes.fetch_add(1, Ordering::SeqCst);
		counters.set_total(self.total.load(Ordering::SeqCst));
		counters.set_idle(self.idle.load(Ordering::SeqCst));
		counters.set_active(self.active.load(Ordering::SeqCst));
		counters.set_pending_threads(self.pending.load(Ordering::SeqCst));

		Ok(())
	}

	fn recomputes(&self) -> u32 {
		self.recomputes.load(Ordering::SeqCst)
	}
}

fn window(millis: i64) -> RefreshTimeout {
	RefreshTimeout::from_millis(millis).expect("Test window should be valid.")
}

fn live_stats(
	pool: &Arc<LivePool>,
	timeout: Duration,
) -> PoolStats<impl Recompute<Error = Infallible>> {
	let pool = pool.clone();

	PoolStats::new(timeout, recompute_fn(move |c: &PoolCounters| pool.publish(c)))
		.expect("Stats should build.")
}

fn manual_stats(
	pool: &Arc<LivePool>,
	timeout_ms: i64,
	clock: Arc<ManualClock>,
) -> PoolStats<impl Recompute<Error = Infallible>, ManualClock> {
	let pool = pool.clone();

	PoolStats::with_clock(
		window(timeout_ms),
		recompute_fn(move |c: &PoolCounters| pool.publish(c)),
		clock,
	)
}

fn sample() -> CountersSnapshot {
	CountersSnapshot { total: 10, idle: 4, active: 6, pending_threads: 2 }
}

#[test]
fn concurrent_readers_in_one_window_trigger_one_recompute() {
	const READERS: usize = 24;

	let pool = LivePool::with(sample());
	let clock = Arc::new(ManualClock::new());
	let stats = manual_stats(&pool, 1_000, clock);
	let barrier = Barrier::new(READERS);

	thread::scope(|scope| {
		for i in 0..READERS {
			let stats = &stats;
			let barrier = &barrier;

			scope.spawn(move || {
				barrier.wait();
				stats.read(Counter::ALL[i % Counter::ALL.len()]).expect("Read should succeed.");
			});
		}
	});

	assert_eq!(pool.recomputes(), 1);
	assert_eq!(stats.gate().metrics().grants(), 1);
	assert_eq!(stats.gate().metrics().denials(), READERS as u64 - 1);
}

#[test]
fn triggers_never_come_closer_than_one_window() {
	let pool = LivePool::with(sample());
	let clock = Arc::new(ManualClock::new());
	let stats = manual_stats(&pool, 50, clock.clone());
	let mut triggers = Vec::new();

	for _ in 0..=40 {
		let before = pool.recomputes();

		stats.total_connections().expect("Read should succeed.");

		if pool.recomputes() > before {
			triggers.push(clock.now());
		}

		clock.advance(Duration::milliseconds(7));
	}

	// Reads land every 7ms, so the first read at or after each deadline is at most 6ms late.
	let expected = [0, 56, 112, 168, 224, 280].map(|ms| Timestamp::from_nanos(ms * 1_000_000));

	assert_eq!(triggers, expected);
}

#[test]
fn losers_do_not_wait_for_in_flight_recompute() {
	let entered = Barrier::new(2);
	let release = Barrier::new(2);
	let clock = Arc::new(ManualClock::new());
	let stats = PoolStats::with_clock(
		window(50),
		recompute_fn(|c: &PoolCounters| {
			entered.wait();
			release.wait();
			c.store(sample());

			Ok::<_, Infallible>(())
		}),
		clock,
	);

	thread::scope(|scope| {
		let winner = scope.spawn(|| stats.total_connections());

		entered.wait();

		// The winner is parked inside the recompute; these reads must not block on it.
		assert_eq!(stats.idle_connections().expect("Loser read should succeed."), 0);
		assert_eq!(
			stats.snapshot().expect("Loser snapshot should succeed."),
			CountersSnapshot::default()
		);

		assert_eq!(stats.metrics().in_flight(), 1);

		release.wait();

		let total = winner
			.join()
			.expect("Winner thread should not panic.")
			.expect("Winner read should succeed.");

		assert_eq!(total, 10);
	});

	assert_eq!(stats.metrics().attempts(), 1);
	assert_eq!(stats.metrics().in_flight(), 0);
}

#[test]
fn idle_stats_never_recompute() {
	let pool = LivePool::with(sample());
	let stats = live_stats(&pool, Duration::milliseconds(1));

	thread::sleep(StdDuration::from_millis(20));

	assert_eq!(pool.recomputes(), 0);
	assert_eq!(stats.metrics().attempts(), 0);
	assert_eq!(stats.counters().load(), CountersSnapshot::default());
}

#[test]
fn first_read_on_fresh_stats_recomputes() {
	for counter in Counter::ALL {
		let pool = LivePool::with(sample());
		let stats = live_stats(&pool, Duration::hours(1));

		assert_eq!(stats.read(counter).expect("Read should succeed."), sample().get(counter));
		assert_eq!(pool.recomputes(), 1);
	}
}

#[test]
fn failed_recompute_defers_retry_to_next_window() {
	let attempts = AtomicU32::new(0);
	let clock = Arc::new(ManualClock::new());
	let stats = PoolStats::with_clock(
		window(100),
		recompute_fn(|_: &PoolCounters| {
			attempts.fetch_add(1, Ordering::SeqCst);

			Err(PoolClosed)
		}),
		clock.clone(),
	);
	let err = stats.total_connections().expect_err("Recompute failure must reach the trigger.");

	assert!(matches!(err, Error::Recompute { trigger: "total", .. }));
	assert_eq!(
		std::error::Error::source(&err).map(ToString::to_string).as_deref(),
		Some("pool is closed")
	);
	assert_eq!(stats.counters().load(), CountersSnapshot::default());

	clock.advance(Duration::milliseconds(99));

	assert_eq!(stats.total_connections().expect("Same-window read should not retry."), 0);
	assert_eq!(attempts.load(Ordering::SeqCst), 1);

	clock.advance(Duration::milliseconds(1));

	assert!(stats.active_connections().is_err());
	assert_eq!(attempts.load(Ordering::SeqCst), 2);
	assert_eq!(stats.metrics().failures(), 2);
	assert_eq!(stats.metrics().successes(), 0);
}

#[test]
fn partial_writes_survive_failed_recompute() {
	let clock = Arc::new(ManualClock::new());
	let stats = PoolStats::with_clock(
		window(100),
		recompute_fn(|c: &PoolCounters| {
			c.set_total(7);

			Err(PoolClosed)
		}),
		clock,
	);

	assert!(stats.idle_connections().is_err());
	assert_eq!(stats.total_connections().expect("Same-window read should not retry."), 7);
	assert_eq!(stats.idle_connections().expect("Same-window read should not retry."), 0);
}

#[test]
fn readers_follow_pool_across_windows() {
	let pool = LivePool::with(sample());
	let clock = Arc::new(ManualClock::new());
	let stats = manual_stats(&pool, 50, clock.clone());

	// Caller A at t=0.
	assert_eq!(stats.total_connections().expect("Read should succeed."), 10);

	// Caller B at t=10ms sees the values A's refresh just wrote.
	clock.set(Timestamp::from_nanos(10_000_000));
	pool.idle.store(1, Ordering::SeqCst);

	assert_eq!(stats.idle_connections().expect("Read should succeed."), 4);

	// Caller C at t=60ms reopens the gate.
	clock.set(Timestamp::from_nanos(60_000_000));
	pool.active.store(8, Ordering::SeqCst);

	assert_eq!(stats.active_connections().expect("Read should succeed."), 8);
	assert_eq!(pool.recomputes(), 2);
}

#[test]
fn monotonic_clock_reopens_after_real_window() {
	let pool = LivePool::with(sample());
	let stats = live_stats(&pool, Duration::milliseconds(5));

	stats.pending_threads().expect("Read should succeed.");
	thread::sleep(StdDuration::from_millis(10));
	stats.pending_threads().expect("Read should succeed.");

	assert_eq!(pool.recomputes(), 2);
}
