pub mod plans_model;
pub mod plans_service;
pub mod plans_traits;

pub use plans_model::{CompensationPlan, NewCompensationPlan, PlanStatus, PlanTargets, PlanWeights};
pub use plans_service::PlanService;
pub use plans_traits::CompensationPlanRepositoryTrait;
