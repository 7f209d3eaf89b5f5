use crate::audit::audit_model::AuditEntry;
use crate::errors::Result;
use async_trait::async_trait;

/// Append-only audit trail. Implementations must never edit or drop entries.
#[async_trait]
pub trait AuditLogSinkTrait: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<()>;

    /// Entries of one entity, oldest first.
    fn entries_for(&self, entity_id: &str) -> Result<Vec<AuditEntry>>;
}
