//! Crate-level error types shared by the gate, the configuration layer, and pool stats.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type-erased error produced by a pool's recompute strategy.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem, raised at construction time only.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The pool's recompute strategy failed while refreshing the counters.
	#[error("Pool recompute triggered by `{trigger}` failed.")]
	Recompute {
		/// Label of the read that triggered the refresh (a counter name or `snapshot`).
		trigger: &'static str,
		/// Pool-specific failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a pool-specific recompute failure.
	pub fn recompute(trigger: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Recompute { trigger, source: Box::new(src) }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Refresh timeout is below zero.
	#[error("Refresh timeout must not be negative, got {millis} ms.")]
	NegativeTimeout {
		/// Rejected timeout in milliseconds.
		millis: i128,
	},
	/// Refresh timeout cannot be represented on the monotonic timeline.
	#[error("Refresh timeout exceeds the supported range.")]
	TimeoutOutOfRange,
	/// Configuration document could not be parsed.
	#[error("Stats configuration is malformed.")]
	Parse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Configuration document continues past the end of the config object.
	#[error("Stats configuration has trailing characters.")]
	TrailingInput {
		/// Underlying JSON failure, with line and column.
		#[source]
		source: serde_json::Error,
	},
}
