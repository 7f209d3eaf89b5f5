use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditEntity {
    Plan,
    Payout,
}

/// Immutable record of one change. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub entity: AuditEntity,
    pub entity_id: String,
    pub actor: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub reason: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl AuditEntry {
    pub fn new(entity: AuditEntity, entity_id: &str, actor: &str, field: &str) -> Self {
        AuditEntry {
            id: Uuid::new_v4().to_string(),
            entity,
            entity_id: entity_id.to_string(),
            actor: actor.to_string(),
            field: field.to_string(),
            old_value: None,
            new_value: None,
            reason: None,
            timestamp: Utc::now().naive_utc(),
        }
    }

    pub fn change(mut self, old_value: Option<String>, new_value: Option<String>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}
