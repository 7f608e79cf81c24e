//! ORB Lab Core — the opening range breakout trade simulator.
//!
//! This crate is the single implementation of the trade pipeline:
//! - Domain types (bars, session windows, ranges, configs, trade records)
//! - Range window calculator
//! - Close-based breakout detector with consecutive-bar confirmation
//! - Risk model (full/half stop modes, buffer clamping, anchoring conventions)
//! - Forward-scan trade executor with MAE/MFE tracking
//! - Outcome classifier
//! - A narrow read-only `BarStore` capability (CSV-backed and in-memory)
//!
//! Everything here is deterministic and side-effect free: the same key over
//! the same bars always produces the identical record.

pub mod data;
pub mod domain;
pub mod sim;
