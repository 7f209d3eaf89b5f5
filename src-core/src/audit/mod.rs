pub mod audit_model;
pub mod audit_traits;

pub use audit_model::{AuditEntity, AuditEntry};
pub use audit_traits::AuditLogSinkTrait;
