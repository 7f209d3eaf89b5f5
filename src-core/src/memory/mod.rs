//! In-memory implementations of the repository traits.
//!
//! They honour the same contracts a database adapter must honour
//! (conditional writes, append-only audit, one row per key) and back the
//! test suite and embedded setups.

mod audit_log;
mod directory;
mod stores;

pub use audit_log::InMemoryAuditLog;
pub use directory::InMemoryEmployeeDirectory;
pub use stores::{
    InMemoryKpiRepository, InMemoryMetricConfigRepository, InMemoryPayoutRepository,
    InMemoryPlanRepository, InMemoryTargetRepository,
};
