//! Lock-free, rate-limited snapshot cache for resource pool counters: readers stay cheap while the
//! pool's expensive recompute runs at most once per refresh window.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod obs;
pub mod recompute;
pub mod snapshot;
pub mod stats;

pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use config::{RefreshTimeout, StatsConfig};
pub use error::{ConfigError, Error, Result};
pub use gate::{GateState, RefreshGate};
pub use recompute::{Recompute, RecomputeFn, Serialized, recompute_fn};
pub use snapshot::{Counter, CountersSnapshot, PoolCounters};
pub use stats::PoolStats;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::{
			Arc,
			atomic::{AtomicU32, AtomicU64, Ordering},
		},
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {color_eyre as _, rand as _, tokio as _};
