use crate::calendar::month_start;
use crate::employees::EmployeeDirectoryTrait;
use crate::errors::{Error, Result};
use crate::metrics::metrics_model::{MetricConfiguration, MetricScope, RoleFamily};
use crate::metrics::metrics_traits::MetricConfigRepositoryTrait;
use crate::settings::EngineSettings;
use chrono::NaiveDate;
use std::sync::Arc;

/// Resolves the weighted metric set that applies to a cargo in a month.
///
/// Precedence: squad-specific configuration, then the generic configuration
/// of the cargo, then the built-in defaults of the cargo's role family. The
/// result is never empty and always comes back in the same order.
pub struct MetricConfigResolver {
    config_repo: Arc<dyn MetricConfigRepositoryTrait>,
    directory: Arc<dyn EmployeeDirectoryTrait>,
    settings: Arc<EngineSettings>,
}

impl MetricConfigResolver {
    pub fn new(
        config_repo: Arc<dyn MetricConfigRepositoryTrait>,
        directory: Arc<dyn EmployeeDirectoryTrait>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        MetricConfigResolver {
            config_repo,
            directory,
            settings,
        }
    }

    pub fn resolve(
        &self,
        cargo_id: &str,
        month: NaiveDate,
        squad: Option<&str>,
    ) -> Result<Vec<MetricConfiguration>> {
        let month = month_start(month);

        if let Some(squad) = squad {
            let configs = self.active(cargo_id, month, Some(squad))?;
            if !configs.is_empty() {
                return Ok(sorted(configs));
            }
        }

        let generic = self.active(cargo_id, month, None)?;
        if !generic.is_empty() {
            return Ok(sorted(generic));
        }

        let family = self.role_family(cargo_id)?;
        log::warn!(
            "No metric configuration for cargo {} in {}, using {:?} defaults",
            cargo_id,
            month,
            family
        );
        let defaults = self.defaults(cargo_id, month, family);
        if defaults.is_empty() {
            return Err(Error::ConfigurationMissing {
                cargo_id: cargo_id.to_string(),
                month,
            });
        }
        Ok(sorted(defaults))
    }

    fn active(
        &self,
        cargo_id: &str,
        month: NaiveDate,
        squad: Option<&str>,
    ) -> Result<Vec<MetricConfiguration>> {
        Ok(self
            .config_repo
            .list_active(cargo_id, month, squad)?
            .into_iter()
            .filter(|c| c.active)
            .collect())
    }

    fn role_family(&self, cargo_id: &str) -> Result<RoleFamily> {
        Ok(match self.directory.get_cargo(cargo_id)? {
            Some(cargo) => cargo.role_family(),
            None => RoleFamily::from_cargo_name(cargo_id),
        })
    }

    fn defaults(&self, cargo_id: &str, month: NaiveDate, family: RoleFamily) -> Vec<MetricConfiguration> {
        self.settings
            .role_defaults(family)
            .iter()
            .map(|weight| MetricConfiguration {
                id: format!("default:{}:{}", cargo_id, weight.metric.key()),
                scope: MetricScope {
                    cargo_id: cargo_id.to_string(),
                    month,
                    squad: None,
                },
                metric: weight.metric.clone(),
                weight_percent: weight.weight_percent,
                target_override: None,
                label: weight.metric.default_label().to_string(),
                active: true,
            })
            .collect()
    }
}

/// Heaviest weight first, ties broken by metric key.
fn sorted(mut configs: Vec<MetricConfiguration>) -> Vec<MetricConfiguration> {
    configs.sort_by(|a, b| {
        b.weight_percent
            .cmp(&a.weight_percent)
            .then_with(|| a.metric.key().cmp(b.metric.key()))
    });
    configs
}
