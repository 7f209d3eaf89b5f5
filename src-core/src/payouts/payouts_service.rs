use crate::audit::{AuditEntity, AuditEntry, AuditLogSinkTrait};
use crate::calendar::{month_start, BusinessCalendar};
use crate::employees::EmployeeDirectoryTrait;
use crate::errors::{Error, Result};
use crate::kpi::{KpiSnapshot, KpiSnapshotRepositoryTrait};
use crate::metrics::{MetricConfigRepositoryTrait, MetricConfigResolver};
use crate::payouts::aggregator::{compute_for_employee_month, PayoutInput};
use crate::payouts::payouts_model::{NewAdjustment, OrgSnapshot, Payout, PayoutBreakdown, PayoutFilter, PayoutStatus};
use crate::payouts::payouts_traits::PayoutRepositoryTrait;
use crate::plans::PlanService;
use crate::settings::EngineSettings;
use chrono::NaiveDate;
use std::sync::Arc;

/// Computes, approves and adjusts monthly payouts.
///
/// Recompute is never triggered automatically: callers (a batch job, a queue
/// consumer, an admin action) invoke [`PayoutService::compute_payout`] per
/// employee and month whenever upstream data changed.
pub struct PayoutService {
    plan_service: Arc<PlanService>,
    kpi_repo: Arc<dyn KpiSnapshotRepositoryTrait>,
    payout_repo: Arc<dyn PayoutRepositoryTrait>,
    resolver: MetricConfigResolver,
    directory: Arc<dyn EmployeeDirectoryTrait>,
    calendar: Arc<dyn BusinessCalendar>,
    audit: Arc<dyn AuditLogSinkTrait>,
    settings: Arc<EngineSettings>,
}

impl PayoutService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plan_service: Arc<PlanService>,
        kpi_repo: Arc<dyn KpiSnapshotRepositoryTrait>,
        payout_repo: Arc<dyn PayoutRepositoryTrait>,
        config_repo: Arc<dyn MetricConfigRepositoryTrait>,
        directory: Arc<dyn EmployeeDirectoryTrait>,
        calendar: Arc<dyn BusinessCalendar>,
        audit: Arc<dyn AuditLogSinkTrait>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        let resolver = MetricConfigResolver::new(config_repo, directory.clone(), settings.clone());
        PayoutService {
            plan_service,
            kpi_repo,
            payout_repo,
            resolver,
            directory,
            calendar,
            audit,
            settings,
        }
    }

    pub fn get_payout(&self, payout_id: &str) -> Result<Payout> {
        self.payout_repo
            .get_payout(payout_id)?
            .ok_or_else(|| Error::NotFound(format!("payout {}", payout_id)))
    }

    pub fn list_payouts(&self, filter: &PayoutFilter) -> Result<Vec<Payout>> {
        self.payout_repo.list(filter)
    }

    /// Breakdown from current upstream state, without persisting anything
    /// except a provisioned fallback plan.
    pub async fn preview_breakdown(&self, employee_id: &str, month: NaiveDate) -> Result<PayoutBreakdown> {
        let (_, breakdown) = self.compute_breakdown(employee_id, month_start(month)).await?;
        Ok(breakdown)
    }

    /// Computes the payout and stores it as DRAFT.
    ///
    /// An APPROVED payout is returned untouched. A DRAFT payout with an
    /// identical breakdown is returned as is, so repeated calls converge.
    pub async fn compute_payout(&self, employee_id: &str, month: NaiveDate) -> Result<Payout> {
        let month = month_start(month);
        let (org, breakdown) = self.compute_breakdown(employee_id, month).await?;

        let existing = self.payout_repo.get_for_employee_month(employee_id, month)?;
        let (candidate, expected_version) = match existing {
            Some(current) if !current.is_draft() => {
                log::info!(
                    "Payout {} for {} in {} is {}, not recomputed",
                    current.id,
                    employee_id,
                    month,
                    current.status
                );
                return Ok(current);
            }
            Some(current) if current.breakdown == breakdown && current.org == org => {
                log::debug!("Payout {} unchanged", current.id);
                return Ok(current);
            }
            Some(current) => {
                let mut next = current.next_revision();
                next.org = org;
                next.breakdown = breakdown;
                next.refresh_totals();
                (next, Some(current.version))
            }
            None => (Payout::new_draft(employee_id, month, org, breakdown), None),
        };

        if let Some(stored) = self
            .payout_repo
            .upsert_if_version(candidate.clone(), expected_version)
            .await?
        {
            log::debug!(
                "Payout {} for {} in {} stored at version {}, total {}",
                stored.id,
                employee_id,
                month,
                stored.version,
                stored.total_compensation
            );
            return Ok(stored);
        }

        // Lost a race: accept the winner when it computed the same thing
        match self.payout_repo.get_for_employee_month(employee_id, month)? {
            Some(winner) if !winner.is_draft() || winner.breakdown == candidate.breakdown => Ok(winner),
            _ => Err(Error::ConcurrentUpdateConflict {
                entity: "payout",
                id: format!("{}/{}", employee_id, month),
            }),
        }
    }

    /// DRAFT -> APPROVED. Any other starting state is a conflict.
    ///
    /// The payout is written before its audit entry. When the audit sink
    /// fails the approval stays committed and the error is returned, so the
    /// caller has to reconcile the trail.
    pub async fn approve_payout(&self, payout_id: &str, approver_id: &str) -> Result<Payout> {
        let current = self.get_payout(payout_id)?;
        if current.status != PayoutStatus::Draft {
            return Err(Error::ConcurrentApprovalConflict {
                payout_id: payout_id.to_string(),
            });
        }

        let mut approved = current.next_revision();
        approved.status = PayoutStatus::Approved;
        approved.approved_by = Some(approver_id.to_string());
        approved.approved_at = Some(approved.updated_at);

        let approved = self
            .payout_repo
            .upsert_if_version(approved, Some(current.version))
            .await?
            .ok_or_else(|| Error::ConcurrentApprovalConflict {
                payout_id: payout_id.to_string(),
            })?;

        log::info!(
            "Payout {} approved by {} (total {})",
            payout_id,
            approver_id,
            approved.total_compensation
        );
        self.audit
            .append(
                AuditEntry::new(AuditEntity::Payout, payout_id, approver_id, "status")
                    .change(
                        Some(PayoutStatus::Draft.to_string()),
                        Some(PayoutStatus::Approved.to_string()),
                    ),
            )
            .await?;
        Ok(approved)
    }

    /// Appends a signed adjustment, on DRAFT or APPROVED payouts alike.
    ///
    /// Same write-then-audit order as [`PayoutService::approve_payout`].
    pub async fn add_adjustment(
        &self,
        payout_id: &str,
        adjustment: NewAdjustment,
        actor_id: &str,
    ) -> Result<Payout> {
        adjustment.validate()?;
        if actor_id.trim().is_empty() {
            return Err(Error::InvalidAdjustment("an actor is required".to_string()));
        }

        let current = self.get_payout(payout_id)?;
        let adjustment = adjustment.stamp(actor_id);
        let reason = adjustment.reason.clone();

        let mut next = current.next_revision();
        next.adjustments.push(adjustment);
        next.refresh_totals();

        let next = self
            .payout_repo
            .upsert_if_version(next, Some(current.version))
            .await?
            .ok_or_else(|| Error::ConcurrentUpdateConflict {
                entity: "payout",
                id: payout_id.to_string(),
            })?;

        log::info!(
            "Adjustment on payout {} by {}: {} -> {}",
            payout_id,
            actor_id,
            current.total_compensation,
            next.total_compensation
        );
        self.audit
            .append(
                AuditEntry::new(AuditEntity::Payout, payout_id, actor_id, "totalCompensation")
                    .change(
                        Some(current.total_compensation.to_string()),
                        Some(next.total_compensation.to_string()),
                    )
                    .with_reason(&reason),
            )
            .await?;
        Ok(next)
    }

    async fn compute_breakdown(&self, employee_id: &str, month: NaiveDate) -> Result<(OrgSnapshot, PayoutBreakdown)> {
        let employee = self
            .directory
            .resolve(employee_id)?
            .ok_or_else(|| Error::NotFound(format!("employee {}", employee_id)))?;

        let plan = self.plan_service.ensure_plan(employee_id, month).await?;

        let kpi = match self.kpi_repo.get_snapshot(employee_id, month)? {
            Some(snapshot) => snapshot,
            None => {
                log::warn!(
                    "No KPI snapshot for {} in {}, computing with zero activity",
                    employee_id,
                    month
                );
                KpiSnapshot::empty(employee_id, month)
            }
        };

        let metrics = self
            .resolver
            .resolve(&employee.cargo_id, month, employee.squad.as_deref())?;

        let business_days = match self.calendar.business_days_in_month(month) {
            0 => plan.business_days_assumed,
            days => days,
        };

        let breakdown = compute_for_employee_month(
            &PayoutInput {
                plan: &plan,
                kpi: &kpi,
                metrics: &metrics,
                business_days_in_month: business_days,
            },
            &self.settings,
        );

        let org = OrgSnapshot {
            employee_name: employee.name,
            cargo_id: employee.cargo_id,
            department: employee.department,
            squad: employee.squad,
        };
        Ok((org, breakdown))
    }
}
