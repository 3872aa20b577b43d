// self
use crate::_prelude::*;

/// A span wrapping one recompute.
#[derive(Clone, Debug)]
pub struct RefreshSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RefreshSpan {
	/// Creates a new span tagged with the read that triggered the refresh.
	pub fn new(trigger: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("pool_stats.refresh", trigger);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = trigger;

			Self {}
		}
	}

	/// Enters the span for the duration of the recompute.
	pub fn entered(self) -> RefreshSpanGuard {
		#[cfg(feature = "tracing")]
		{
			RefreshSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			RefreshSpanGuard {}
		}
	}
}

/// RAII guard returned by [`RefreshSpan::entered`].
pub struct RefreshSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for RefreshSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RefreshSpanGuard(..)")
	}
}

/// Logs a granted refresh (when tracing is enabled).
pub fn log_refresh_granted(trigger: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(trigger, "refresh window elapsed, recomputing pool counters");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = trigger;
	}
}

/// Logs a failed recompute (when tracing is enabled).
pub fn log_refresh_failure(trigger: &'static str, error: &(dyn StdError + 'static)) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(trigger, error = error, "pool recompute failed");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (trigger, error);
	}
}
