//! Counter cells shared between the recompute winner and concurrent readers.
//!
//! Each counter lives in its own atomic cell. Stores are `Release` and loads `Acquire`, so a
//! reader that sees a counter written by a recompute also sees every counter that recompute wrote
//! before it. Writes still land one counter at a time, so a reader racing with a refresh may
//! observe some counters from before and some from after it (a torn read). Callers that need the
//! four values to agree with each other must not rely on this type for that.

// self
use crate::_prelude::*;

/// Identifies one of the tracked pool counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
	/// Connections owned by the pool, idle or in use.
	Total,
	/// Connections waiting in the pool for a borrower.
	Idle,
	/// Connections currently borrowed.
	Active,
	/// Threads blocked waiting for a connection.
	PendingThreads,
}
impl Counter {
	/// Every counter, in declaration order.
	pub const ALL: [Self; 4] = [Self::Total, Self::Idle, Self::Active, Self::PendingThreads];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Counter::Total => "total",
			Counter::Idle => "idle",
			Counter::Active => "active",
			Counter::PendingThreads => "pending_threads",
		}
	}
}
impl Display for Counter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Plain copy of the four counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountersSnapshot {
	/// Connections owned by the pool.
	pub total: u32,
	/// Idle connections.
	pub idle: u32,
	/// Borrowed connections.
	pub active: u32,
	/// Threads waiting for a connection.
	pub pending_threads: u32,
}
impl CountersSnapshot {
	/// Returns the value recorded for `counter`.
	pub const fn get(&self, counter: Counter) -> u32 {
		match counter {
			Counter::Total => self.total,
			Counter::Idle => self.idle,
			Counter::Active => self.active,
			Counter::PendingThreads => self.pending_threads,
		}
	}
}
impl Display for CountersSnapshot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"total={} idle={} active={} pending_threads={}",
			self.total, self.idle, self.active, self.pending_threads
		)
	}
}

/// Independently readable and writable counter cells.
///
/// All cells start at zero, which is a valid initial snapshot.
#[derive(Debug, Default)]
pub struct PoolCounters {
	total: AtomicU32,
	idle: AtomicU32,
	active: AtomicU32,
	pending_threads: AtomicU32,
}
impl PoolCounters {
	/// Creates counters preloaded with `snapshot`.
	pub fn new(snapshot: CountersSnapshot) -> Self {
		let counters = Self::default();

		counters.store(snapshot);

		counters
	}

	/// Returns the current value of `counter`.
	pub fn get(&self, counter: Counter) -> u32 {
		self.cell(counter).load(Ordering::Acquire)
	}

	/// Overwrites `counter`.
	pub fn set(&self, counter: Counter, value: u32) {
		self.cell(counter).store(value, Ordering::Release);
	}

	/// Overwrites the total connection count.
	pub fn set_total(&self, value: u32) {
		self.set(Counter::Total, value);
	}

	/// Overwrites the idle connection count.
	pub fn set_idle(&self, value: u32) {
		self.set(Counter::Idle, value);
	}

	/// Overwrites the active connection count.
	pub fn set_active(&self, value: u32) {
		self.set(Counter::Active, value);
	}

	/// Overwrites the pending thread count.
	pub fn set_pending_threads(&self, value: u32) {
		self.set(Counter::PendingThreads, value);
	}

	/// Writes all four counters, one cell at a time.
	pub fn store(&self, snapshot: CountersSnapshot) {
		for counter in Counter::ALL {
			self.set(counter, snapshot.get(counter));
		}
	}

	/// Reads all four counters, one cell at a time.
	pub fn load(&self) -> CountersSnapshot {
		CountersSnapshot {
			total: self.get(Counter::Total),
			idle: self.get(Counter::Idle),
			active: self.get(Counter::Active),
			pending_threads: self.get(Counter::PendingThreads),
		}
	}

	fn cell(&self, counter: Counter) -> &AtomicU32 {
		match counter {
			Counter::Total => &self.total,
			Counter::Idle => &self.idle,
			Counter::Active => &self.active,
			Counter::PendingThreads => &self.pending_threads,
		}
	}
}
