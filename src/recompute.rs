//! Contract for the pool-specific operation that refreshes the counters.

// self
use crate::{_prelude::*, snapshot::PoolCounters};

/// Strategy supplied by the owning pool to overwrite the counters with fresh values.
///
/// Implementations should write all four counters or none of them. Nothing enforces this: a
/// strategy that fails halfway leaves the counters it already wrote in place.
pub trait Recompute
where
	Self: Send + Sync,
{
	/// Pool-specific failure.
	type Error: 'static + Send + Sync + StdError;

	/// Recomputes the counters from the pool's internals.
	fn recompute(&self, counters: &PoolCounters) -> Result<(), Self::Error>;
}
impl<R> Recompute for Arc<R>
where
	R: ?Sized + Recompute,
{
	type Error = R::Error;

	fn recompute(&self, counters: &PoolCounters) -> Result<(), Self::Error> {
		(**self).recompute(counters)
	}
}

/// [`Recompute`] implementation backed by a closure; see [`recompute_fn`].
#[derive(Clone, Copy)]
pub struct RecomputeFn<F>(F);
impl<F, E> Recompute for RecomputeFn<F>
where
	F: Send + Sync + Fn(&PoolCounters) -> Result<(), E>,
	E: 'static + Send + Sync + StdError,
{
	type Error = E;

	fn recompute(&self, counters: &PoolCounters) -> Result<(), Self::Error> {
		(self.0)(counters)
	}
}
impl<F> Debug for RecomputeFn<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RecomputeFn(..)")
	}
}

/// Wraps a closure as a [`Recompute`] strategy.
pub fn recompute_fn<F, E>(f: F) -> RecomputeFn<F>
where
	F: Send + Sync + Fn(&PoolCounters) -> Result<(), E>,
	E: 'static + Send + Sync + StdError,
{
	RecomputeFn(f)
}

/// Runs the inner strategy under a mutex so two recomputes never overlap.
///
/// The gate alone allows a second recompute to start when the first one outlives the window.
/// Pools whose recompute cannot run concurrently wrap it here; a late winner then waits for the
/// in-flight recompute to finish before starting its own. Readers that lose the gate are not
/// affected.
#[derive(Debug, Default)]
pub struct Serialized<R> {
	inner: R,
	lock: Mutex<()>,
}
impl<R> Serialized<R>
where
	R: Recompute,
{
	/// Wraps `inner`.
	pub fn new(inner: R) -> Self {
		Self { inner, lock: Mutex::new(()) }
	}

	/// Returns the wrapped strategy.
	pub fn get_ref(&self) -> &R {
		&self.inner
	}

	/// Unwraps the strategy.
	pub fn into_inner(self) -> R {
		self.inner
	}
}
impl<R> Recompute for Serialized<R>
where
	R: Recompute,
{
	type Error = R::Error;

	fn recompute(&self, counters: &PoolCounters) -> Result<(), Self::Error> {
		let _guard = self.lock.lock();

		self.inner.recompute(counters)
	}
}
