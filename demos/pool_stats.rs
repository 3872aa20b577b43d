//! Simulates a busy pool whose stats are polled by many threads; only one poll per window pays
//! for the recompute.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
	thread,
	time::Duration as StdDuration,
};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use pool_stats::{PoolCounters, PoolStats, StatsConfig, recompute_fn};

#[derive(Debug, Default)]
struct Pool {
	borrowed: AtomicU32,
	waiting: AtomicU32,
	scans: AtomicU32,
}
impl Pool {
	const SIZE: u32 = 16;

	fn scan(&self, counters: &PoolCounters) -> Result<(), std::io::Error> {
		let borrowed = self.borrowed.load(Ordering::Relaxed).min(Self::SIZE);

		self.scans.fetch_add(1, Ordering::Relaxed);
		// Pretend walking the connection list is expensive.
		thread::sleep(StdDuration::from_millis(2));
		counters.set_total(Self::SIZE);
		counters.set_idle(Self::SIZE - borrowed);
		counters.set_active(borrowed);
		counters.set_pending_threads(self.waiting.load(Ordering::Relaxed));

		Ok(())
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let config: StatsConfig = r#"{"refresh_timeout_ms":25}"#.parse()?;
	let pool = Arc::new(Pool::default());
	let stats = {
		let pool = pool.clone();

		PoolStats::from_config(&config, recompute_fn(move |c: &PoolCounters| pool.scan(c)))
	};

	thread::scope(|scope| -> Result<()> {
		let workers = (0..8_u32)
			.map(|i| {
				let pool = &pool;
				let stats = &stats;

				scope.spawn(move || -> Result<u32> {
					let mut seen = 0;

					for round in 0..50 {
						let demand = (i + round) % 20;

						pool.borrowed.store(demand, Ordering::Relaxed);
						pool.waiting.store(demand.saturating_sub(Pool::SIZE), Ordering::Relaxed);
						seen = seen.max(stats.active_connections()?);
						thread::sleep(StdDuration::from_millis(1));
					}

					Ok(seen)
				})
			})
			.collect::<Vec<_>>();

		for worker in workers {
			let seen = worker.join().map_err(|_| eyre!("Worker thread panicked."))??;

			println!("worker saw up to {seen} active connections");
		}

		Ok(())
	})?;

	println!("last snapshot: {}", stats.snapshot()?);
	println!(
		"{} reads, {} scans",
		stats.gate().metrics().grants() + stats.gate().metrics().denials(),
		pool.scans.load(Ordering::Relaxed)
	);

	Ok(())
}
