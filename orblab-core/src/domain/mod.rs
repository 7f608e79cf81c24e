//! Domain types: bars, session windows, ranges, configs, keys, and the
//! output trade record.

mod bar;
mod config;
mod error;
mod key;
mod range;
mod session;
mod trade;

pub use bar::{is_strictly_ordered, Bar};
pub use config::{ConfigError, RiskAnchor, StopMode, TimeoutPolicy, TradeConfig};
pub use error::SimError;
pub use key::{KeyHash, SimKey};
pub use range::OpeningRange;
pub use session::SessionWindow;
pub use trade::{Direction, ExitReason, Outcome, SimulatedTrade, SkipReason};
