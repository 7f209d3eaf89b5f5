//! Monthly sales-compensation closing ("fechamento") core.
//!
//! Turns a compensation plan and a month of realized activity into an
//! itemized, auditable payout, and derives funnel targets from a single
//! daily booking figure.

pub mod audit;
pub mod calendar;
pub mod employees;
pub mod errors;
pub mod kpi;
pub mod memory;
pub mod metrics;
pub mod payouts;
pub mod plans;
pub mod settings;
pub mod targets;

pub use errors::{Error, Result};
