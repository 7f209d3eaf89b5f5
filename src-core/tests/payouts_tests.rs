/// Payout computation through the service: fallback plans, determinism,
/// bonus thresholds and recompute rules.
mod common;

#[cfg(test)]
mod payout_computation_tests {
    use crate::common::*;
    use fechamento_core::audit::AuditLogSinkTrait;
    use fechamento_core::employees::{EmployeeProfile, JobCatalogEntry};
    use fechamento_core::errors::Error;
    use fechamento_core::kpi::KpiSnapshot;
    use fechamento_core::metrics::MetricKind;
    use fechamento_core::payouts::{PayoutFilter, PayoutStatus};
    use fechamento_core::plans::{CompensationPlanRepositoryTrait, PlanStatus, PlanWeights};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_fallback_plan_from_level_defaults() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        record(&h, snapshot("emp-1", march_2025(), dec!(90))).await;

        let payout = h
            .payout_service
            .compute_payout("emp-1", date(2025, 3, 17))
            .await
            .expect("level 3 employee without a plan gets a provisioned one");

        let plan = h
            .plan_service
            .get_covering_plan("emp-1", march_2025())
            .unwrap()
            .expect("plan provisioned");
        assert_eq!(plan.status, PlanStatus::Approved);
        assert_eq!(plan.approved_by.as_deref(), Some("system"));
        assert_eq!(plan.fixed_amount, dec!(2600));
        assert_eq!(plan.variable_amount, dec!(1400));
        assert_eq!(plan.effective_from, march_2025());
        assert_eq!(payout.breakdown.plan_id, plan.id);
        assert_eq!(payout.month, march_2025());

        let trail = h.audit.entries_for(&plan.id).unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].reason.as_deref(), Some("provisioned from level 3 defaults"));
    }

    #[tokio::test]
    async fn test_fallback_plan_prefers_job_catalog() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        h.directory
            .add_cargo(catalog_entry("sdr-inside", dec!(2800), dec!(1200)));

        let plan = h.plan_service.ensure_plan("emp-1", march_2025()).await.unwrap();
        assert_eq!(plan.fixed_amount, dec!(2800));
        assert_eq!(plan.variable_amount, dec!(1200));
        assert_eq!(plan.ote_total, dec!(4000));

        // Second call reuses the plan instead of provisioning again
        let again = h.plan_service.ensure_plan("emp-1", march_2025()).await.unwrap();
        assert_eq!(again.id, plan.id);
    }

    #[tokio::test]
    async fn test_missing_plan_without_defaults_fails() {
        let h = harness();
        h.directory.add_employee(sdr("emp-9", 9));

        let result = h.payout_service.compute_payout("emp-9", march_2025()).await;
        assert!(matches!(result, Err(Error::PlanNotFound { .. })));

        let unknown = h.payout_service.compute_payout("ghost", march_2025()).await;
        assert!(matches!(unknown, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_breakdown_values() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        record(&h, snapshot("emp-1", march_2025(), dec!(90))).await;

        let payout = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        let b = &payout.breakdown;
        assert_eq!(b.business_days_in_month, 21);
        assert_eq!(b.metrics.len(), 4);

        let line = |kind: MetricKind| b.metrics.iter().find(|m| m.metric == kind).unwrap();

        let booked = line(MetricKind::Agendamentos);
        assert_eq!(booked.meta, dec!(84));
        assert_eq!(booked.pct, dec!(100));
        assert_eq!(booked.valor_final, dec!(462));

        let held = line(MetricKind::Realizadas);
        assert_eq!(held.meta, dec!(59));
        assert_eq!(held.multiplier, Decimal::ONE);

        let org = line(MetricKind::Organizacao);
        assert_eq!(org.pct, dec!(90));
        assert_eq!(org.multiplier, dec!(0.7));
        assert_eq!(org.valor_final, dec!(166.6));

        assert_eq!(b.total_variable, dec!(1328.6));
        assert_eq!(b.global_pct, dec!(97.5));
        assert_eq!(b.bonus_stretch, Decimal::ZERO);
        assert_eq!(b.total_bonus, dec!(300));
        assert_eq!(payout.total_compensation, dec!(3928.6));
    }

    #[tokio::test]
    async fn test_valor_base_sums_to_variable_pool() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));

        let payout = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        let base_total: Decimal = payout.breakdown.metrics.iter().map(|m| m.valor_base).sum();
        assert_eq!(base_total, dec!(1400));
    }

    #[tokio::test]
    async fn test_missing_snapshot_scores_zero() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));

        let payout = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        assert!(payout.breakdown.metrics.iter().all(|m| m.realizado.is_zero()));
        assert!(payout.breakdown.metrics.iter().all(|m| m.valor_final.is_zero()));
        assert_eq!(payout.breakdown.global_pct, Decimal::ZERO);
        assert_eq!(payout.total_compensation, dec!(2600));
    }

    #[tokio::test]
    async fn test_stretch_bonus_threshold() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        h.directory.add_employee(sdr("emp-2", 3));
        // (100 + 100 + 100 + 99.6) / 4 = 99.9
        record(&h, snapshot("emp-1", march_2025(), dec!(99.6))).await;
        record(&h, snapshot("emp-2", march_2025(), dec!(100))).await;

        let below = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        assert_eq!(below.breakdown.global_pct, dec!(99.9));
        assert_eq!(below.breakdown.bonus_stretch, Decimal::ZERO);
        assert_eq!(below.breakdown.total_bonus, dec!(300));

        let at = h.payout_service.compute_payout("emp-2", march_2025()).await.unwrap();
        assert_eq!(at.breakdown.global_pct, dec!(100));
        assert_eq!(at.breakdown.bonus_stretch, dec!(500));
        assert_eq!(at.breakdown.total_bonus, dec!(800));
        // Bonuses are reported apart from the total compensation
        assert_eq!(at.total_compensation, at.breakdown.total_fixed + at.breakdown.total_variable);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        record(&h, snapshot("emp-1", march_2025(), dec!(90))).await;

        let first = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        let second = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.version, 1);

        let preview = h
            .payout_service
            .preview_breakdown("emp-1", march_2025())
            .await
            .unwrap();
        assert_eq!(preview, first.breakdown);
    }

    #[tokio::test]
    async fn test_recompute_draft_after_new_activity() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        record(&h, snapshot("emp-1", march_2025(), dec!(90))).await;
        let first = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();

        record(&h, snapshot("emp-1", march_2025(), dec!(100))).await;
        let second = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.version, 2);
        assert_eq!(second.status, PayoutStatus::Draft);
        assert!(second.total_compensation > first.total_compensation);
    }

    #[tokio::test]
    async fn test_approved_payout_is_not_recomputed() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        record(&h, snapshot("emp-1", march_2025(), dec!(90))).await;

        let draft = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        let approved = h.payout_service.approve_payout(&draft.id, "manager-1").await.unwrap();

        record(&h, snapshot("emp-1", march_2025(), dec!(100))).await;
        let after = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();

        assert_eq!(after, approved);
        assert_eq!(after.status, PayoutStatus::Approved);
        assert_eq!(after.breakdown, draft.breakdown);
    }

    #[tokio::test]
    async fn test_list_payouts_by_status() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        h.directory.add_employee(sdr("emp-2", 2));

        let first = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        h.payout_service.compute_payout("emp-2", march_2025()).await.unwrap();
        h.payout_service.approve_payout(&first.id, "manager-1").await.unwrap();

        let month = h
            .payout_service
            .list_payouts(&PayoutFilter {
                month: Some(march_2025()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(month.len(), 2);
        assert_eq!(month[0].employee_id, "emp-1");

        let drafts = h
            .payout_service
            .list_payouts(&PayoutFilter {
                status: Some(PayoutStatus::Draft),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].employee_id, "emp-2");
    }

    #[tokio::test]
    async fn test_unapproved_plan_never_drives_a_payout() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 1));
        let approved = approved_plan(&h, new_plan("emp-1", date(2025, 1, 1), None)).await;

        let mut draft = new_plan("emp-1", date(2025, 6, 1), None);
        draft.fixed_amount = dec!(3000);
        draft.variable_amount = dec!(1000);
        h.plan_service.create_plan(draft, "hr-1").await.unwrap();

        let june = h.payout_service.compute_payout("emp-1", date(2025, 6, 1)).await.unwrap();
        assert_eq!(june.breakdown.plan_id, approved.id);
        assert_eq!(june.breakdown.total_fixed, dec!(2500));
    }

    #[tokio::test]
    async fn test_month_under_review_is_not_provisioned() {
        let h = harness();
        h.directory.add_employee(sdr("emp-2", 3));
        let pending = h
            .plan_service
            .create_plan(new_plan("emp-2", date(2025, 1, 1), None), "hr-1")
            .await
            .unwrap();
        h.plan_service.submit_plan(&pending.id, "hr-1").await.unwrap();

        let result = h.payout_service.compute_payout("emp-2", march_2025()).await;
        assert!(matches!(result, Err(Error::PlanNotFound { .. })));
        assert_eq!(h.plans.list_for_employee("emp-2").unwrap().len(), 1);

        h.plan_service.approve_plan(&pending.id, "manager-1").await.unwrap();
        let payout = h.payout_service.compute_payout("emp-2", march_2025()).await.unwrap();
        assert_eq!(payout.breakdown.plan_id, pending.id);
    }

    #[tokio::test]
    async fn test_closer_payout_uses_closer_metrics() {
        let h = harness();
        h.directory.add_cargo(JobCatalogEntry {
            cargo_id: "closer-1".to_string(),
            name: "Closer Consórcio".to_string(),
            role_family: None,
            fixed_amount: Some(dec!(3000)),
            variable_amount: Some(dec!(2000)),
        });
        h.directory.add_employee(EmployeeProfile {
            id: "emp-c".to_string(),
            name: "Closer C".to_string(),
            cargo_id: "closer-1".to_string(),
            department: Some("Comercial".to_string()),
            squad: None,
            level: 2,
        });
        record(
            &h,
            KpiSnapshot {
                employee_id: "emp-c".to_string(),
                month: march_2025(),
                scheduled_meetings: 20,
                held_meetings: 14,
                no_shows: 6,
                call_attempts: 0,
                contracts: 10,
                organization_score: dec!(100),
            },
        )
        .await;

        let payout = h.payout_service.compute_payout("emp-c", march_2025()).await.unwrap();
        let b = &payout.breakdown;
        let metrics: Vec<_> = b.metrics.iter().map(|m| m.metric.clone()).collect();
        assert_eq!(
            metrics,
            vec![MetricKind::Contratos, MetricKind::Realizadas, MetricKind::Organizacao]
        );

        let contratos = &b.metrics[0];
        assert_eq!(contratos.meta, dec!(10));
        assert_eq!(contratos.pct, dec!(100));
        assert_eq!(contratos.valor_final, dec!(800));
        assert_eq!(b.metrics[1].meta, dec!(14));

        assert_eq!(b.total_variable, dec!(2000));
        assert_eq!(b.global_pct, dec!(100));
        assert_eq!(b.total_bonus, dec!(800));
        assert_eq!(payout.total_compensation, dec!(5000));
    }

    #[tokio::test]
    async fn test_plan_weights_do_not_reweigh_metrics() {
        let h = harness();
        h.directory.add_employee(sdr("emp-1", 3));
        let mut plan = new_plan("emp-1", date(2025, 1, 1), None);
        plan.weights = PlanWeights {
            agendamentos: dec!(70),
            realizadas: dec!(10),
            tentativas: dec!(10),
            organizacao: dec!(10),
        };
        approved_plan(&h, plan).await;

        let payout = h.payout_service.compute_payout("emp-1", march_2025()).await.unwrap();
        let booked = payout
            .breakdown
            .metrics
            .iter()
            .find(|m| m.metric == MetricKind::Agendamentos)
            .unwrap();
        assert_eq!(booked.weight_percent, dec!(33));
        assert_eq!(booked.valor_base, dec!(495));
    }
}
