pub mod aggregator;
pub mod evaluator;
pub mod multiplier;
pub mod payouts_model;
pub mod payouts_service;
pub mod payouts_traits;

pub use aggregator::{compute_for_employee_month, PayoutInput};
pub use evaluator::{evaluate, no_show_performance, percent_achieved, Evaluation};
pub use multiplier::{MultiplierTable, MultiplierTier};
pub use payouts_model::{
    Adjustment, MetricResult, NewAdjustment, OrgSnapshot, Payout, PayoutBreakdown, PayoutFilter,
    PayoutStatus,
};
pub use payouts_service::PayoutService;
pub use payouts_traits::PayoutRepositoryTrait;
