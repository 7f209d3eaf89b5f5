use crate::audit::{AuditEntry, AuditLogSinkTrait};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditLogSinkTrait for InMemoryAuditLog {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| Error::Repository(e.to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn entries_for(&self, entity_id: &str) -> Result<Vec<AuditEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| Error::Repository(e.to_string()))?;
        Ok(entries
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect())
    }
}
