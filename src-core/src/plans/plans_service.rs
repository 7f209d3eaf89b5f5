use crate::audit::{AuditEntity, AuditEntry, AuditLogSinkTrait};
use crate::calendar::month_start;
use crate::employees::EmployeeDirectoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::plans::plans_model::{CompensationPlan, NewCompensationPlan, PlanStatus};
use crate::plans::plans_traits::CompensationPlanRepositoryTrait;
use crate::settings::EngineSettings;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

/// Plan lifecycle and fallback provisioning.
pub struct PlanService {
    plan_repo: Arc<dyn CompensationPlanRepositoryTrait>,
    directory: Arc<dyn EmployeeDirectoryTrait>,
    audit: Arc<dyn AuditLogSinkTrait>,
    settings: Arc<EngineSettings>,
}

impl PlanService {
    pub fn new(
        plan_repo: Arc<dyn CompensationPlanRepositoryTrait>,
        directory: Arc<dyn EmployeeDirectoryTrait>,
        audit: Arc<dyn AuditLogSinkTrait>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        PlanService {
            plan_repo,
            directory,
            audit,
            settings,
        }
    }

    pub fn get_plan(&self, plan_id: &str) -> Result<CompensationPlan> {
        self.plan_repo
            .get_plan(plan_id)?
            .ok_or_else(|| Error::NotFound(format!("compensation plan {}", plan_id)))
    }

    /// The APPROVED plan in force for `month`, if any.
    pub fn get_covering_plan(&self, employee_id: &str, month: NaiveDate) -> Result<Option<CompensationPlan>> {
        self.plan_repo
            .get_covering_plan(employee_id, month_start(month))
    }

    /// Creates a DRAFT plan.
    ///
    /// A window opening inside an earlier open-ended plan is accepted; the
    /// earlier plan is only closed once this one is approved. Any other
    /// overlap is rejected.
    pub async fn create_plan(&self, new_plan: NewCompensationPlan, actor: &str) -> Result<CompensationPlan> {
        validate_new_plan(&new_plan)?;
        self.check_overlaps(&new_plan)?;

        let now = Utc::now().naive_utc();
        let plan = CompensationPlan {
            id: Uuid::new_v4().to_string(),
            employee_id: new_plan.employee_id,
            cargo_id: new_plan.cargo_id,
            effective_from: new_plan.effective_from,
            effective_to: new_plan.effective_to,
            fixed_amount: new_plan.fixed_amount,
            variable_amount: new_plan.variable_amount,
            ote_total: new_plan.fixed_amount + new_plan.variable_amount,
            bonus_base: new_plan.bonus_base,
            bonus_stretch: new_plan.bonus_stretch,
            business_days_assumed: new_plan.business_days_assumed,
            weights: new_plan.weights,
            targets: new_plan.targets,
            status: PlanStatus::Draft,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        let plan = self.plan_repo.upsert_plan(plan).await?;

        self.audit
            .append(
                AuditEntry::new(AuditEntity::Plan, &plan.id, actor, "status")
                    .change(None, Some(PlanStatus::Draft.to_string())),
            )
            .await?;
        Ok(plan)
    }

    pub async fn submit_plan(&self, plan_id: &str, actor: &str) -> Result<CompensationPlan> {
        self.transition(plan_id, PlanStatus::Pending, actor, None).await
    }

    pub async fn approve_plan(&self, plan_id: &str, approver: &str) -> Result<CompensationPlan> {
        self.transition(plan_id, PlanStatus::Approved, approver, None).await
    }

    pub async fn reject_plan(&self, plan_id: &str, actor: &str, reason: &str) -> Result<CompensationPlan> {
        if reason.trim().is_empty() {
            return Err(ValidationError::MissingField("reason".to_string()).into());
        }
        self.transition(plan_id, PlanStatus::Rejected, actor, Some(reason))
            .await
    }

    /// Returns the APPROVED plan covering `month`, provisioning one from the
    /// job catalog or the level table when the month has no plan at all.
    ///
    /// A month covered only by a plan still under review is not provisioned
    /// and fails with [`Error::PlanNotFound`] until that plan is decided.
    pub async fn ensure_plan(&self, employee_id: &str, month: NaiveDate) -> Result<CompensationPlan> {
        let month = month_start(month);
        if let Some(plan) = self.plan_repo.get_covering_plan(employee_id, month)? {
            return Ok(plan);
        }

        let plan_not_found = || Error::PlanNotFound {
            employee_id: employee_id.to_string(),
            month,
        };

        let existing = self.plan_repo.list_for_employee(employee_id)?;
        if let Some(under_review) = existing.iter().find(|p| p.is_in_force() && p.covers(month)) {
            log::info!(
                "Plan {} covering {} for employee {} is {}, not provisioning",
                under_review.id,
                month,
                employee_id,
                under_review.status
            );
            return Err(plan_not_found());
        }

        let employee = self
            .directory
            .resolve(employee_id)?
            .ok_or_else(plan_not_found)?;
        let defaults = &self.settings.plan_defaults;

        let catalog_split = self
            .directory
            .get_cargo(&employee.cargo_id)?
            .and_then(|cargo| cargo.compensation_split());
        let (fixed_amount, variable_amount, source) = match catalog_split {
            Some((fixed, variable)) => (fixed, variable, "job catalog".to_string()),
            None => {
                let level = defaults.level(employee.level).ok_or_else(plan_not_found)?;
                (
                    level.fixed_amount,
                    level.variable_amount,
                    format!("level {} defaults", level.level),
                )
            }
        };

        // Stop right before the next plan, if one is already scheduled
        let effective_to = existing
            .iter()
            .filter(|p| p.is_in_force() && p.effective_from > month)
            .map(|p| p.effective_from)
            .min()
            .and_then(|next| next.pred_opt());

        let now = Utc::now().naive_utc();
        let plan = CompensationPlan {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            cargo_id: employee.cargo_id.clone(),
            effective_from: month,
            effective_to,
            fixed_amount,
            variable_amount,
            ote_total: fixed_amount + variable_amount,
            bonus_base: defaults.bonus_base,
            bonus_stretch: defaults.bonus_stretch,
            business_days_assumed: defaults.business_days_assumed,
            weights: defaults.weights.clone(),
            targets: defaults.targets.clone(),
            status: PlanStatus::Approved,
            approved_by: Some(defaults.provisioning_actor.clone()),
            approved_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let plan = self.plan_repo.upsert_plan(plan).await?;

        log::info!(
            "Provisioned plan {} for employee {} from {} ({} fixed, {} variable)",
            plan.id,
            employee_id,
            source,
            fixed_amount,
            variable_amount
        );
        self.audit
            .append(
                AuditEntry::new(
                    AuditEntity::Plan,
                    &plan.id,
                    &defaults.provisioning_actor,
                    "status",
                )
                .change(None, Some(PlanStatus::Approved.to_string()))
                .with_reason(&format!("provisioned from {}", source)),
            )
            .await?;
        Ok(plan)
    }

    /// Moves a plan along its lifecycle under a status compare-and-set.
    ///
    /// Approval also closes the earlier open-ended plan this one replaces.
    /// Writes land before their audit entries: an audit failure is returned
    /// as an error after the change is committed, and the caller has to
    /// reconcile the trail.
    async fn transition(
        &self,
        plan_id: &str,
        next: PlanStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<CompensationPlan> {
        let current = self.get_plan(plan_id)?;
        if !current.status.can_transition_to(next) {
            return Err(Error::InvalidStateTransition {
                entity: "plan",
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }

        let to_supersede = if next == PlanStatus::Approved {
            self.plans_to_supersede(&current)?
        } else {
            Vec::new()
        };

        let now = Utc::now().naive_utc();
        let mut updated = current.clone();
        updated.status = next;
        updated.updated_at = now;
        if next == PlanStatus::Approved {
            updated.approved_by = Some(actor.to_string());
            updated.approved_at = Some(now);
        }

        let updated = self
            .plan_repo
            .update_if_status(updated, current.status)
            .await?
            .ok_or_else(|| Error::ConcurrentUpdateConflict {
                entity: "plan",
                id: plan_id.to_string(),
            })?;

        log::info!(
            "Plan {} moved {} -> {} by {}",
            plan_id,
            current.status,
            next,
            actor
        );
        let mut entry = AuditEntry::new(AuditEntity::Plan, plan_id, actor, "status")
            .change(Some(current.status.to_string()), Some(next.to_string()));
        if let Some(reason) = reason {
            entry = entry.with_reason(reason);
        }
        self.audit.append(entry).await?;

        for previous in to_supersede {
            self.supersede(previous, &updated, actor).await?;
        }
        Ok(updated)
    }

    async fn supersede(&self, mut previous: CompensationPlan, by: &CompensationPlan, actor: &str) -> Result<()> {
        let old_end = previous.effective_to;
        let new_end = by.effective_from.pred_opt().unwrap_or(by.effective_from);
        previous.effective_to = Some(new_end);
        previous.updated_at = Utc::now().naive_utc();
        let previous = self.plan_repo.upsert_plan(previous).await?;

        log::info!(
            "Plan {} of employee {} superseded by {} from {}",
            previous.id,
            previous.employee_id,
            by.id,
            by.effective_from
        );
        self.audit
            .append(
                AuditEntry::new(AuditEntity::Plan, &previous.id, actor, "effectiveTo")
                    .change(old_end.map(|d| d.to_string()), Some(new_end.to_string()))
                    .with_reason(&format!("superseded by plan {}", by.id)),
            )
            .await
    }

    /// Rejects windows that collide with a plan in force, except an earlier
    /// open-ended one that approval will close.
    fn check_overlaps(&self, new_plan: &NewCompensationPlan) -> Result<()> {
        for existing in self.plan_repo.list_for_employee(&new_plan.employee_id)? {
            if !existing.is_in_force() || !existing.overlaps(new_plan.effective_from, new_plan.effective_to) {
                continue;
            }
            if !replaceable_by(&existing, new_plan.effective_from) {
                return Err(overlap_error(&existing));
            }
        }
        Ok(())
    }

    /// Approved plans the approval of `plan` closes. Fails when an approved
    /// plan overlaps in any other way.
    fn plans_to_supersede(&self, plan: &CompensationPlan) -> Result<Vec<CompensationPlan>> {
        let mut superseded = Vec::new();
        for existing in self.plan_repo.list_for_employee(&plan.employee_id)? {
            if existing.id == plan.id
                || existing.status != PlanStatus::Approved
                || !existing.overlaps(plan.effective_from, plan.effective_to)
            {
                continue;
            }
            if replaceable_by(&existing, plan.effective_from) {
                superseded.push(existing);
            } else {
                return Err(overlap_error(&existing));
            }
        }
        Ok(superseded)
    }
}

fn replaceable_by(existing: &CompensationPlan, new_from: NaiveDate) -> bool {
    existing.effective_from < new_from && existing.effective_to.is_none()
}

fn overlap_error(existing: &CompensationPlan) -> Error {
    ValidationError::OverlappingWindow(format!(
        "plan {} already covers {} from {}",
        existing.id, existing.employee_id, existing.effective_from
    ))
    .into()
}

fn validate_new_plan(plan: &NewCompensationPlan) -> Result<()> {
    if plan.employee_id.trim().is_empty() {
        return Err(ValidationError::MissingField("employeeId".to_string()).into());
    }
    if plan.fixed_amount < Decimal::ZERO || plan.variable_amount < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(
            "fixed and variable amounts must not be negative".to_string(),
        )
        .into());
    }
    if let Some(ote) = plan.ote_total {
        if ote != plan.fixed_amount + plan.variable_amount {
            return Err(ValidationError::InvalidInput(format!(
                "OTE {} differs from fixed {} + variable {}",
                ote, plan.fixed_amount, plan.variable_amount
            ))
            .into());
        }
    }
    if let Some(to) = plan.effective_to {
        if to < plan.effective_from {
            return Err(ValidationError::InvalidInput(format!(
                "effective window ends ({}) before it starts ({})",
                to, plan.effective_from
            ))
            .into());
        }
    }
    if plan.weights.total() != dec!(100) {
        return Err(ValidationError::InvalidInput(format!(
            "plan weights add up to {}, expected 100",
            plan.weights.total()
        ))
        .into());
    }
    if plan.business_days_assumed == 0 {
        return Err(ValidationError::InvalidInput(
            "businessDaysAssumed must be positive".to_string(),
        )
        .into());
    }
    Ok(())
}
