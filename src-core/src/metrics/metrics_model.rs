use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of metrics the evaluator knows how to score.
///
/// Wire keys are the Portuguese identifiers used by the metric tables
/// (`agendamentos`, `no_show`, ...). Anything else parses to `Unknown`,
/// which evaluates to zero instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKind {
    /// Meetings booked
    Agendamentos,
    /// Meetings actually held
    Realizadas,
    /// Call attempts
    Tentativas,
    /// Organization score, already a 0-100 percentage
    Organizacao,
    /// No-shows, lower is better
    NoShow,
    /// Contracts signed
    Contratos,
    R2Agendadas,
    OutsideSales,
    Unknown(String),
}

impl MetricKind {
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "agendamentos" => MetricKind::Agendamentos,
            "realizadas" => MetricKind::Realizadas,
            "tentativas" => MetricKind::Tentativas,
            "organizacao" => MetricKind::Organizacao,
            "no_show" => MetricKind::NoShow,
            "contratos" => MetricKind::Contratos,
            "r2_agendadas" => MetricKind::R2Agendadas,
            "outside_sales" => MetricKind::OutsideSales,
            _ => MetricKind::Unknown(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            MetricKind::Agendamentos => "agendamentos",
            MetricKind::Realizadas => "realizadas",
            MetricKind::Tentativas => "tentativas",
            MetricKind::Organizacao => "organizacao",
            MetricKind::NoShow => "no_show",
            MetricKind::Contratos => "contratos",
            MetricKind::R2Agendadas => "r2_agendadas",
            MetricKind::OutsideSales => "outside_sales",
            MetricKind::Unknown(key) => key.as_str(),
        }
    }

    pub fn default_label(&self) -> &str {
        match self {
            MetricKind::Agendamentos => "Reuniões agendadas",
            MetricKind::Realizadas => "Reuniões realizadas",
            MetricKind::Tentativas => "Tentativas de ligação",
            MetricKind::Organizacao => "Organização",
            MetricKind::NoShow => "No-show",
            MetricKind::Contratos => "Contratos",
            MetricKind::R2Agendadas => "R2 agendadas",
            MetricKind::OutsideSales => "Vendas outside",
            MetricKind::Unknown(key) => key.as_str(),
        }
    }

    /// Metrics that have no realized data source yet.
    pub fn is_inert(&self) -> bool {
        matches!(self, MetricKind::R2Agendadas | MetricKind::OutsideSales)
    }
}

impl From<String> for MetricKind {
    fn from(key: String) -> Self {
        MetricKind::from_key(&key)
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        kind.key().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Role family a cargo belongs to, selecting the built-in metric defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleFamily {
    Sdr,
    Closer,
}

impl RoleFamily {
    /// Infers the family from a cargo name; anything not naming a closer is SDR.
    pub fn from_cargo_name(name: &str) -> Self {
        if name.to_lowercase().contains("closer") {
            RoleFamily::Closer
        } else {
            RoleFamily::Sdr
        }
    }
}

/// Where a metric configuration applies. `squad: None` is the generic scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScope {
    pub cargo_id: String,
    pub month: NaiveDate,
    pub squad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfiguration {
    pub id: String,
    pub scope: MetricScope,
    pub metric: MetricKind,
    pub weight_percent: Decimal,
    pub target_override: Option<Decimal>,
    pub label: String,
    pub active: bool,
}

/// A weight entry in the built-in default tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWeight {
    pub metric: MetricKind,
    pub weight_percent: Decimal,
}

impl MetricWeight {
    pub fn new(metric: MetricKind, weight_percent: Decimal) -> Self {
        MetricWeight {
            metric,
            weight_percent,
        }
    }
}
