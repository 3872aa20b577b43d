//! Validated configuration for pool stats.

// self
use crate::{_prelude::*, error::ConfigError};

/// Non-negative refresh window that fits on the nanosecond timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RefreshTimeout(Duration);
impl RefreshTimeout {
	/// Window used when no explicit timeout is configured.
	pub const DEFAULT: Self = Self(Duration::SECOND);
	/// Window that grants every read a fresh recompute.
	pub const ZERO: Self = Self(Duration::ZERO);

	/// Validates the provided duration.
	pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
		if timeout.is_negative() {
			return Err(ConfigError::NegativeTimeout { millis: timeout.whole_milliseconds() });
		}
		if u64::try_from(timeout.whole_nanoseconds()).is_err() {
			return Err(ConfigError::TimeoutOutOfRange);
		}

		Ok(Self(timeout))
	}

	/// Validates a timeout expressed in milliseconds.
	pub fn from_millis(millis: i64) -> Result<Self, ConfigError> {
		Self::new(Duration::milliseconds(millis))
	}

	/// Returns the window as a [`Duration`].
	pub const fn as_duration(self) -> Duration {
		self.0
	}

	/// Returns the window in whole milliseconds.
	pub fn as_millis(self) -> i64 {
		// Range checked on construction.
		self.0.whole_milliseconds() as i64
	}
}
impl Default for RefreshTimeout {
	fn default() -> Self {
		Self::DEFAULT
	}
}
impl TryFrom<i64> for RefreshTimeout {
	type Error = ConfigError;

	fn try_from(millis: i64) -> Result<Self, Self::Error> {
		Self::from_millis(millis)
	}
}
impl TryFrom<Duration> for RefreshTimeout {
	type Error = ConfigError;

	fn try_from(timeout: Duration) -> Result<Self, Self::Error> {
		Self::new(timeout)
	}
}
impl From<RefreshTimeout> for i64 {
	fn from(value: RefreshTimeout) -> Self {
		value.as_millis()
	}
}
impl Display for RefreshTimeout {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}ms", self.as_millis())
	}
}

/// Serializable configuration for [`PoolStats`](crate::stats::PoolStats).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsConfig {
	/// Refresh window in milliseconds.
	#[serde(rename = "refresh_timeout_ms", default)]
	pub refresh_timeout: RefreshTimeout,
}
impl StatsConfig {
	/// Creates a configuration with the provided window.
	pub fn new(refresh_timeout: RefreshTimeout) -> Self {
		Self { refresh_timeout }
	}

	/// Parses a JSON document, reporting the offending path on failure.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let config = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;

		deserializer.end().map_err(|source| ConfigError::TrailingInput { source })?;

		Ok(config)
	}
}
impl FromStr for StatsConfig {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_json_str(s)
	}
}
