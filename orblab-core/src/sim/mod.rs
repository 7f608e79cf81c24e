//! The simulator stages: range window → breakout → risk → scan → classify.
//!
//! Every stage is a pure function over immutable inputs. The pipeline module
//! composes them for one (day, session, config) key.

pub mod breakout;
pub mod classify;
pub mod executor;
pub mod pipeline;
pub mod range_window;
pub mod risk;

pub use breakout::Breakout;
pub use classify::Entry;
pub use executor::ScanResult;
pub use pipeline::simulate_session;
pub use risk::RiskPlan;
