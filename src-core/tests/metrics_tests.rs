/// Metric configuration precedence and the multiplier table.
mod common;

#[cfg(test)]
mod metric_resolution_tests {
    use crate::common::*;
    use fechamento_core::employees::JobCatalogEntry;
    use fechamento_core::errors::Error;
    use fechamento_core::metrics::{
        MetricConfigRepositoryTrait, MetricConfigResolver, MetricConfiguration, MetricKind,
        MetricScope,
    };
    use fechamento_core::settings::EngineSettings;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn config(id: &str, squad: Option<&str>, metric: MetricKind, weight: Decimal) -> MetricConfiguration {
        MetricConfiguration {
            id: id.to_string(),
            scope: MetricScope {
                cargo_id: "sdr-inside".to_string(),
                month: march_2025(),
                squad: squad.map(str::to_string),
            },
            label: metric.default_label().to_string(),
            metric,
            weight_percent: weight,
            target_override: None,
            active: true,
        }
    }

    fn resolver(h: &Harness) -> MetricConfigResolver {
        MetricConfigResolver::new(h.configs.clone(), h.directory.clone(), h.settings.clone())
    }

    async fn seed(h: &Harness) {
        for c in [
            config("g-1", None, MetricKind::Agendamentos, dec!(50)),
            config("g-2", None, MetricKind::Realizadas, dec!(50)),
            config("s-1", Some("alpha"), MetricKind::Tentativas, dec!(100)),
        ] {
            h.configs.upsert_config(c).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_squad_config_wins() {
        let h = harness();
        seed(&h).await;

        let resolved = resolver(&h).resolve("sdr-inside", date(2025, 3, 20), Some("alpha")).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].metric, MetricKind::Tentativas);
    }

    #[tokio::test]
    async fn test_generic_config_when_squad_has_none() {
        let h = harness();
        seed(&h).await;

        let resolved = resolver(&h).resolve("sdr-inside", march_2025(), Some("beta")).unwrap();
        let metrics: Vec<_> = resolved.iter().map(|c| c.metric.clone()).collect();
        assert_eq!(metrics, vec![MetricKind::Agendamentos, MetricKind::Realizadas]);

        let generic = resolver(&h).resolve("sdr-inside", march_2025(), None).unwrap();
        assert_eq!(generic, resolved);
    }

    #[tokio::test]
    async fn test_inactive_and_other_months_are_ignored() {
        let h = harness();
        let mut inactive = config("g-1", None, MetricKind::Agendamentos, dec!(100));
        inactive.active = false;
        h.configs.upsert_config(inactive).await.unwrap();

        let resolved = resolver(&h).resolve("sdr-inside", march_2025(), None).unwrap();
        assert!(resolved.iter().all(|c| c.id.starts_with("default:")));

        let april = resolver(&h).resolve("sdr-inside", date(2025, 4, 1), None).unwrap();
        assert_eq!(april, resolver(&h).resolve("sdr-inside", date(2025, 4, 30), None).unwrap());
    }

    #[test]
    fn test_role_family_defaults() {
        let h = harness();

        let sdr = resolver(&h).resolve("sdr-inside", march_2025(), None).unwrap();
        let total: Decimal = sdr.iter().map(|c| c.weight_percent).sum();
        assert_eq!(total, dec!(100));
        assert_eq!(sdr.len(), 4);

        h.directory.add_cargo(JobCatalogEntry {
            cargo_id: "c-42".to_string(),
            name: "Closer Consórcio".to_string(),
            role_family: None,
            fixed_amount: None,
            variable_amount: None,
        });
        let closer = resolver(&h).resolve("c-42", march_2025(), None).unwrap();
        let metrics: Vec<_> = closer.iter().map(|c| c.metric.clone()).collect();
        assert_eq!(
            metrics,
            vec![MetricKind::Contratos, MetricKind::Realizadas, MetricKind::Organizacao]
        );
    }

    #[test]
    fn test_empty_defaults_are_a_configuration_error() {
        let h = harness();
        let mut settings = EngineSettings::default();
        settings.sdr_weights.clear();
        let resolver = MetricConfigResolver::new(h.configs.clone(), h.directory.clone(), Arc::new(settings));

        assert!(matches!(
            resolver.resolve("sdr-inside", march_2025(), None),
            Err(Error::ConfigurationMissing { .. })
        ));
    }
}

#[cfg(test)]
mod multiplier_table_tests {
    use fechamento_core::payouts::{MultiplierTable, MultiplierTier};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_table_is_monotonic() {
        let table = MultiplierTable::default();
        let mut previous = Decimal::ZERO;
        let mut pct = Decimal::ZERO;
        while pct <= dec!(200) {
            let multiplier = table.multiplier_for(pct);
            assert!(multiplier >= previous, "multiplier dropped at {}", pct);
            assert!(multiplier <= Decimal::ONE);
            previous = multiplier;
            pct += dec!(0.5);
        }
        assert_eq!(table.multiplier_for(dec!(69.99)), Decimal::ZERO);
        assert_eq!(table.multiplier_for(dec!(70)), dec!(0.5));
        assert_eq!(table.multiplier_for(dec!(100)), Decimal::ONE);
        assert_eq!(table.multiplier_for(dec!(180)), Decimal::ONE);
    }

    #[test]
    fn test_custom_table_validation() {
        assert!(MultiplierTable::new(vec![
            MultiplierTier::new(dec!(50), dec!(0.8)),
            MultiplierTier::new(dec!(80), dec!(0.6)),
            MultiplierTier::new(dec!(100), dec!(1)),
        ])
        .is_err());

        let table = MultiplierTable::new(vec![
            MultiplierTier::new(dec!(60), dec!(0.4)),
            MultiplierTier::new(dec!(100), dec!(1)),
        ])
        .unwrap();
        assert_eq!(table.multiplier_for(dec!(99)), dec!(0.4));
    }
}
